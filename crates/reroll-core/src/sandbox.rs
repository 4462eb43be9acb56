//! In-memory world for tests and the simulator.
//!
//! A flat world with solid ground below `floor_y`, one player and any number
//! of targets. Time only moves when [`SandboxWorld::step`] is called, once per
//! tick, before the engine observes the world.

use std::collections::{HashMap, HashSet};

use reroll_events::{
    Aabb, BlockPos, BlockState, EntityId, EntityKind, EntitySnapshot, Inventory, ItemStack,
    OfferListing, PlayerSnapshot, Property, SimTime, TargetId, TargetSnapshot, Vec3, Workstation,
    CURRENCY_ITEM, HOTBAR_SIZE,
};
use uuid::Uuid;

use crate::ports::{ActionError, ActionPort, Movement, ProbeError, WorldProbe};
use crate::services::{Notification, Notifier, StatsRecorder};

const PLAYER_ENTITY: EntityId = EntityId(0);
const PLAYER_EYE_HEIGHT: f64 = 1.62;
const TARGET_EYE_HEIGHT: f64 = 1.62;
const JUMP_TICKS: u32 = 8;
const DROP_HEIGHT: f64 = 0.25;
const REACH: f64 = 6.0;

/// Produces the offer list a target gets when it claims a workstation.
pub type OfferRoller = Box<dyn FnMut() -> Vec<OfferListing>>;

#[derive(Debug, Clone)]
struct SandboxTarget {
    id: TargetId,
    position: Vec3,
    alive: bool,
    loaded: bool,
    claimed: Option<BlockPos>,
    pending_claim: Option<(BlockPos, SimTime)>,
    offers: Vec<OfferListing>,
}

#[derive(Debug, Clone)]
struct Drop {
    id: EntityId,
    stack: ItemStack,
    position: Vec3,
    spawned_at: SimTime,
}

#[derive(Debug, Clone, Copy)]
struct OpenView {
    target: TargetId,
    opened_at: SimTime,
}

/// Deterministic in-memory implementation of [`WorldProbe`] and [`ActionPort`].
pub struct SandboxWorld {
    now: SimTime,
    ready: bool,
    floor_y: i32,
    blocks: HashMap<BlockPos, BlockState>,

    player_position: Vec3,
    movement: Movement,
    jump_ticks: u32,
    inventory: Inventory,
    look_target: Option<Vec3>,

    targets: Vec<SandboxTarget>,
    claim_radius: i32,
    claim_delay_ms: u64,
    roller: OfferRoller,

    breaking: Option<(BlockPos, u32)>,
    break_ticks: u32,
    drops: Vec<Drop>,
    drop_offset: Vec3,
    spawn_drops: bool,
    pickup_enabled: bool,
    pickup_radius: f64,
    pickup_delay_ms: u64,
    next_entity: u64,

    view: Option<OpenView>,
    view_populate_ms: u64,

    rejected_positions: HashSet<BlockPos>,
    reject_all_placements: bool,
    reverts_remaining: u32,
    revert_delay_ms: u64,
    pending_reverts: Vec<(BlockPos, SimTime)>,

    break_log: Vec<BlockPos>,
    placements: u32,
    interactions: u32,
    jumps: u32,
}

impl SandboxWorld {
    /// Empty world with the player standing at (0.5, `floor_y`, 0.5).
    pub fn new(floor_y: i32) -> Self {
        Self {
            now: SimTime::ZERO,
            ready: true,
            floor_y,
            blocks: HashMap::new(),
            player_position: Vec3::new(0.5, floor_y as f64, 0.5),
            movement: Movement::STOP,
            jump_ticks: 0,
            inventory: Inventory::new(),
            look_target: None,
            targets: Vec::new(),
            claim_radius: 8,
            claim_delay_ms: 1_500,
            roller: Box::new(default_offers),
            breaking: None,
            break_ticks: 10,
            drops: Vec::new(),
            drop_offset: Vec3::ZERO,
            spawn_drops: true,
            pickup_enabled: true,
            pickup_radius: 1.5,
            pickup_delay_ms: 500,
            next_entity: 1,
            view: None,
            view_populate_ms: 100,
            rejected_positions: HashSet::new(),
            reject_all_placements: false,
            reverts_remaining: 0,
            revert_delay_ms: 1_000,
            pending_reverts: Vec::new(),
            break_log: Vec::new(),
            placements: 0,
            interactions: 0,
            jumps: 0,
        }
    }

    /// Adds an unemployed target standing at `position`. Ids are assigned
    /// deterministically in insertion order.
    pub fn add_target(&mut self, position: Vec3) -> TargetId {
        let id = TargetId(Uuid::from_u128(0x7a26_0000 + self.targets.len() as u128 + 1));
        self.targets.push(SandboxTarget {
            id,
            position,
            alive: true,
            loaded: true,
            claimed: None,
            pending_claim: None,
            offers: Vec::new(),
        });
        id
    }

    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        if state.is_air() {
            self.blocks.insert(pos, BlockState::Air);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    /// Puts a stack into an inventory slot, replacing what was there.
    pub fn give(&mut self, slot: usize, stack: ItemStack) {
        if let Some(cell) = self.inventory.slots.get_mut(slot) {
            *cell = Some(stack);
        }
    }

    pub fn select(&mut self, slot: usize) {
        if slot < HOTBAR_SIZE {
            self.inventory.selected = slot;
        }
    }

    /// Fills every empty slot with junk.
    pub fn fill_inventory(&mut self) {
        for cell in self.inventory.slots.iter_mut().filter(|cell| cell.is_none()) {
            *cell = Some(ItemStack::new("minecraft:cobblestone", 64));
        }
    }

    pub fn set_player_position(&mut self, position: Vec3) {
        self.player_position = position;
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn set_roller(&mut self, roller: impl FnMut() -> Vec<OfferListing> + 'static) {
        self.roller = Box::new(roller);
    }

    /// Rolls the given offer lists in order, repeating the last one.
    pub fn set_offer_sequence(&mut self, sequence: Vec<Vec<OfferListing>>) {
        let mut index = 0;
        self.roller = Box::new(move || {
            let offers = sequence
                .get(index)
                .or_else(|| sequence.last())
                .cloned()
                .unwrap_or_default();
            index += 1;
            offers
        });
    }

    pub fn set_claim_delay(&mut self, delay_ms: u64) {
        self.claim_delay_ms = delay_ms;
    }

    pub fn set_break_ticks(&mut self, ticks: u32) {
        self.break_ticks = ticks;
    }

    pub fn set_view_populate_delay(&mut self, delay_ms: u64) {
        self.view_populate_ms = delay_ms;
    }

    /// Where a broken block's drop lands relative to the block centre.
    pub fn set_drop_offset(&mut self, offset: Vec3) {
        self.drop_offset = offset;
    }

    /// Broken blocks leave nothing behind.
    pub fn disable_drops(&mut self) {
        self.spawn_drops = false;
    }

    /// Drops stay on the ground no matter how close the player gets.
    pub fn disable_pickup(&mut self) {
        self.pickup_enabled = false;
    }

    /// Placements at `pos` are acknowledged but never appear.
    pub fn reject_position(&mut self, pos: BlockPos) {
        self.rejected_positions.insert(pos);
    }

    pub fn allow_position(&mut self, pos: BlockPos) {
        self.rejected_positions.remove(&pos);
    }

    /// Every placement is acknowledged but never appears.
    pub fn reject_all_placements(&mut self, reject: bool) {
        self.reject_all_placements = reject;
    }

    /// The next `count` placements appear, then vanish after `delay_ms` with
    /// the item returned to the inventory.
    pub fn revert_placements(&mut self, count: u32, delay_ms: u64) {
        self.reverts_remaining = count;
        self.revert_delay_ms = delay_ms;
    }

    pub fn clear_drops(&mut self) {
        self.drops.clear();
    }

    pub fn kill_target(&mut self, id: TargetId) {
        if let Some(target) = self.target_mut(id) {
            target.alive = false;
        }
    }

    pub fn unload_target(&mut self, id: TargetId) {
        if let Some(target) = self.target_mut(id) {
            target.loaded = false;
        }
    }

    /// Drops the target's role; it re-claims after the claim delay.
    pub fn unclaim(&mut self, id: TargetId) {
        if let Some(target) = self.target_mut(id) {
            target.claimed = None;
            target.pending_claim = None;
        }
    }

    pub fn claimed_site(&self, id: TargetId) -> Option<BlockPos> {
        self.targets
            .iter()
            .find(|target| target.id == id)
            .and_then(|target| target.claimed)
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    pub fn current_movement(&self) -> Movement {
        self.movement
    }

    pub fn look_target(&self) -> Option<Vec3> {
        self.look_target
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    pub fn break_starts(&self) -> usize {
        self.break_log.len()
    }

    /// Positions of every break started, in order.
    pub fn break_log(&self) -> &[BlockPos] {
        &self.break_log
    }

    pub fn placements(&self) -> u32 {
        self.placements
    }

    pub fn interactions(&self) -> u32 {
        self.interactions
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    fn target_mut(&mut self, id: TargetId) -> Option<&mut SandboxTarget> {
        self.targets.iter_mut().find(|target| target.id == id)
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity + 1_000);
        self.next_entity += 1;
        id
    }

    fn on_ground(&self) -> bool {
        self.jump_ticks == 0
    }

    fn ticks_to_break(&self) -> u32 {
        let with_axe = self
            .inventory
            .selected_stack()
            .is_some_and(|stack| stack.is_axe());
        if with_axe {
            self.break_ticks
        } else {
            self.break_ticks * 3
        }
    }

    /// Advances the world to `now`: movement, pickups, claims and reverts.
    pub fn step(&mut self, now: SimTime) {
        self.now = now;
        self.step_movement();
        self.step_pickups();
        self.step_reverts();
        self.step_claims();
    }

    fn step_movement(&mut self) {
        if self.movement.jump && self.on_ground() {
            self.jump_ticks = JUMP_TICKS;
            self.jumps += 1;
        }

        let velocity = Vec3::new(self.movement.velocity.x, 0.0, self.movement.velocity.z);
        let next = self.player_position + velocity;
        let current_cell = self.player_position.block_pos();
        let next_cell = next.block_pos();
        let blocked = next_cell != current_cell
            && !self.block_at(next_cell).is_air()
            && self.jump_ticks == 0;
        if !blocked {
            self.player_position = next;
        }

        self.jump_ticks = self.jump_ticks.saturating_sub(1);
    }

    fn step_pickups(&mut self) {
        if !self.pickup_enabled {
            return;
        }
        let now = self.now;
        let player = self.player_position;
        let radius = self.pickup_radius;
        let delay = self.pickup_delay_ms;

        let mut remaining = Vec::with_capacity(self.drops.len());
        for drop in std::mem::take(&mut self.drops) {
            let collectable =
                now.since(drop.spawned_at) >= delay && player.distance(drop.position) <= radius;
            if collectable && self.inventory.insert(drop.stack.clone()) {
                continue;
            }
            remaining.push(drop);
        }
        self.drops = remaining;
    }

    fn step_reverts(&mut self) {
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_reverts)
            .into_iter()
            .partition(|(_, at)| now >= *at);
        self.pending_reverts = pending;

        for (pos, _) in due {
            if let Some(kind) = self.block_at(pos).workstation() {
                self.blocks.insert(pos, BlockState::Air);
                self.inventory.insert(ItemStack::workstation(kind, 1));
            }
        }
    }

    fn step_claims(&mut self) {
        let now = self.now;
        let claimed_by_others: Vec<(TargetId, BlockPos)> = self
            .targets
            .iter()
            .filter_map(|target| target.claimed.map(|pos| (target.id, pos)))
            .collect();

        for index in 0..self.targets.len() {
            let (id, position, alive, claimed, pending) = {
                let target = &self.targets[index];
                (
                    target.id,
                    target.position,
                    target.alive && target.loaded,
                    target.claimed,
                    target.pending_claim,
                )
            };
            if !alive {
                continue;
            }

            if let Some(pos) = claimed {
                if self.block_at(pos).workstation().is_none() {
                    self.targets[index].claimed = None;
                }
                continue;
            }

            match pending {
                Some((pos, _)) if self.block_at(pos).workstation().is_none() => {
                    self.targets[index].pending_claim = None;
                }
                Some((pos, due)) if now >= due => {
                    let offers = (self.roller)();
                    let target = &mut self.targets[index];
                    target.claimed = Some(pos);
                    target.pending_claim = None;
                    target.offers = offers;
                }
                Some(_) => {}
                None => {
                    let center = position.block_pos();
                    let free = self.nearest_free_site(center, id, &claimed_by_others);
                    if let Some(pos) = free {
                        self.targets[index].pending_claim =
                            Some((pos, now.plus_millis(self.claim_delay_ms)));
                    }
                }
            }
        }
    }

    fn nearest_free_site(
        &self,
        center: BlockPos,
        claimant: TargetId,
        claimed: &[(TargetId, BlockPos)],
    ) -> Option<BlockPos> {
        self.blocks
            .iter()
            .filter(|(_, state)| state.workstation().is_some())
            .map(|(pos, _)| *pos)
            .filter(|pos| {
                (pos.x - center.x).abs() <= self.claim_radius
                    && (pos.y - center.y).abs() <= self.claim_radius
                    && (pos.z - center.z).abs() <= self.claim_radius
            })
            .filter(|pos| {
                !claimed
                    .iter()
                    .any(|(owner, taken)| taken == pos && *owner != claimant)
            })
            .min_by_key(|pos| (pos.distance_sq(center), pos.x, pos.y, pos.z))
    }

    fn finish_break(&mut self, pos: BlockPos) {
        let Some(kind) = self.block_at(pos).workstation() else {
            self.blocks.insert(pos, BlockState::Air);
            return;
        };
        self.blocks.insert(pos, BlockState::Air);

        for target in self.targets.iter_mut() {
            if target.claimed == Some(pos) {
                target.claimed = None;
            }
            if target.pending_claim.is_some_and(|(pending, _)| pending == pos) {
                target.pending_claim = None;
            }
        }

        if self.spawn_drops {
            let id = self.next_entity_id();
            let base = pos.center() + Vec3::new(0.0, DROP_HEIGHT - 0.5, 0.0);
            self.drops.push(Drop {
                id,
                stack: ItemStack::workstation(kind, 1),
                position: base + self.drop_offset,
                spawned_at: self.now,
            });
        }
    }
}

impl WorldProbe for SandboxWorld {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn block_at(&self, pos: BlockPos) -> BlockState {
        match self.blocks.get(&pos) {
            Some(state) => *state,
            None if pos.y < self.floor_y => BlockState::Solid,
            None => BlockState::Air,
        }
    }

    fn player(&self) -> Option<PlayerSnapshot> {
        self.ready.then(|| PlayerSnapshot {
            position: self.player_position,
            eye_height: PLAYER_EYE_HEIGHT,
            on_ground: self.on_ground(),
        })
    }

    fn inventory(&self) -> Option<Inventory> {
        self.ready.then(|| self.inventory.clone())
    }

    fn entities_in(&self, bounds: Aabb) -> Vec<EntitySnapshot> {
        let mut found = Vec::new();
        if bounds.contains(self.player_position) {
            found.push(EntitySnapshot {
                id: PLAYER_ENTITY,
                kind: EntityKind::Player,
                position: self.player_position,
            });
        }
        for (index, target) in self.targets.iter().enumerate() {
            if target.alive && target.loaded && bounds.contains(target.position) {
                found.push(EntitySnapshot {
                    id: EntityId(index as u64 + 1),
                    kind: EntityKind::Target { id: target.id },
                    position: target.position,
                });
            }
        }
        for drop in &self.drops {
            if bounds.contains(drop.position) {
                found.push(EntitySnapshot {
                    id: drop.id,
                    kind: EntityKind::DroppedItem {
                        stack: drop.stack.clone(),
                    },
                    position: drop.position,
                });
            }
        }
        found
    }

    fn target(&self, id: TargetId) -> Option<TargetSnapshot> {
        self.targets
            .iter()
            .find(|target| target.id == id && target.loaded)
            .map(|target| TargetSnapshot {
                id: target.id,
                position: target.position,
                eye_height: TARGET_EYE_HEIGHT,
                alive: target.alive,
                has_role: target.claimed.is_some(),
            })
    }

    fn open_view(&self) -> Option<TargetId> {
        self.view.map(|view| view.target)
    }

    fn view_offers(&self) -> Result<Vec<OfferListing>, ProbeError> {
        let view = self.view.ok_or(ProbeError::NoView)?;
        if self.now.since(view.opened_at) < self.view_populate_ms {
            return Ok(Vec::new());
        }
        let target = self
            .targets
            .iter()
            .find(|target| target.id == view.target)
            .ok_or(ProbeError::NoView)?;
        Ok(target.offers.clone())
    }
}

impl ActionPort for SandboxWorld {
    fn select_slot(&mut self, slot: usize) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        if slot >= HOTBAR_SIZE {
            return Err(ActionError::Rejected(format!("slot {} is not selectable", slot)));
        }
        self.inventory.selected = slot;
        Ok(())
    }

    fn swap_slots(&mut self, slot: usize, hotbar_slot: usize) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        if hotbar_slot >= HOTBAR_SIZE || slot >= self.inventory.slots.len() {
            return Err(ActionError::Rejected("invalid swap".to_string()));
        }
        self.inventory.swap(slot, hotbar_slot);
        Ok(())
    }

    fn attack_block(&mut self, pos: BlockPos) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        if self.block_at(pos).is_air() {
            return Err(ActionError::Rejected(format!("nothing to break at {}", pos)));
        }
        self.breaking = Some((pos, 0));
        self.break_log.push(pos);
        Ok(())
    }

    fn progress_break(&mut self, pos: BlockPos) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        let Some((breaking, progress)) = self.breaking else {
            return Err(ActionError::Rejected("no break started".to_string()));
        };
        if breaking != pos {
            return Err(ActionError::Rejected(format!("not breaking {}", pos)));
        }

        let progress = progress + 1;
        if progress >= self.ticks_to_break() {
            self.breaking = None;
            self.finish_break(pos);
        } else {
            self.breaking = Some((pos, progress));
        }
        Ok(())
    }

    fn cancel_break(&mut self) {
        self.breaking = None;
    }

    fn use_item_on(&mut self, pos: BlockPos) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        let selected = self.inventory.selected;
        let kind = self
            .inventory
            .get(selected)
            .and_then(ItemStack::as_workstation)
            .ok_or_else(|| ActionError::Rejected("selected item cannot be placed".to_string()))?;
        if !self.block_at(pos).is_air() {
            return Err(ActionError::Rejected(format!("{} is occupied", pos)));
        }
        if self.block_at(pos.down()).is_air() {
            return Err(ActionError::Rejected(format!("nothing to place against below {}", pos)));
        }

        // Acknowledged but dropped by the server.
        if self.reject_all_placements || self.rejected_positions.contains(&pos) {
            return Ok(());
        }

        self.inventory.take_one(selected);
        self.blocks.insert(pos, BlockState::Workstation(kind));
        self.placements += 1;
        if self.reverts_remaining > 0 {
            self.reverts_remaining -= 1;
            self.pending_reverts
                .push((pos, self.now.plus_millis(self.revert_delay_ms)));
        }
        Ok(())
    }

    fn look_at(&mut self, point: Vec3) {
        self.look_target = Some(point);
    }

    fn apply_movement(&mut self, movement: Movement) {
        self.movement = movement;
    }

    fn interact_target(&mut self, target: TargetId) -> Result<(), ActionError> {
        if !self.ready {
            return Err(ActionError::NotReady);
        }
        let player = self.player_position;
        let now = self.now;
        let snapshot = self
            .targets
            .iter()
            .find(|candidate| candidate.id == target && candidate.alive && candidate.loaded)
            .ok_or_else(|| ActionError::Rejected("no such target".to_string()))?;
        if player.distance(snapshot.position) > REACH {
            return Err(ActionError::OutOfReach);
        }
        self.interactions += 1;
        if snapshot.claimed.is_none() {
            return Err(ActionError::Rejected("target has nothing to offer".to_string()));
        }
        self.view = Some(OpenView {
            target,
            opened_at: now,
        });
        Ok(())
    }

    fn close_view(&mut self) {
        self.view = None;
    }
}

/// Offers that never carry a property: enchanted books never show up.
pub fn default_offers() -> Vec<OfferListing> {
    vec![
        OfferListing::new(
            ItemStack::new(CURRENCY_ITEM, 1),
            ItemStack::new("minecraft:paper", 24),
        ),
        OfferListing::new(
            ItemStack::new("minecraft:bookshelf", 1),
            ItemStack::new(CURRENCY_ITEM, 9),
        ),
    ]
}

/// An enchanted book offer with one property.
pub fn book_offer(property: &str, level: u8, price: u32) -> OfferListing {
    OfferListing::new(
        ItemStack::new("minecraft:enchanted_book", 1).with_property(Property::new(property, level)),
        ItemStack::new(CURRENCY_ITEM, price),
    )
    .with_second_buy(ItemStack::new("minecraft:book", 1))
}

/// Notifier that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn texts(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .map(|notification| notification.text.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.notifications
            .iter()
            .any(|notification| notification.text.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Statistics kept in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    pub successes: Vec<u32>,
    pub failures: Vec<u32>,
}

impl MemoryStats {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

impl StatsRecorder for MemoryStats {
    fn record_success(&mut self, attempts: u32) {
        self.successes.push(attempts);
    }

    fn record_failure(&mut self, attempts: u32) {
        self.failures.push(attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_is_solid_below_floor() {
        let world = SandboxWorld::new(64);
        assert_eq!(world.block_at(BlockPos::new(0, 63, 0)), BlockState::Solid);
        assert!(world.block_at(BlockPos::new(0, 64, 0)).is_air());
    }

    #[test]
    fn test_target_claims_after_delay_and_loses_role_on_break() {
        let mut world = SandboxWorld::new(64);
        let id = world.add_target(Vec3::new(3.5, 64.0, 3.5));
        let site = BlockPos::new(3, 64, 1);
        world.set_block(site, BlockState::Workstation(Workstation::Lectern));

        world.step(SimTime::from_millis(0));
        assert!(!world.target(id).unwrap().has_role);
        world.step(SimTime::from_millis(1_500));
        assert!(world.target(id).unwrap().has_role);
        assert_eq!(world.claimed_site(id), Some(site));

        world.attack_block(site).unwrap();
        for _ in 0..40 {
            world.progress_break(site).unwrap_or(());
        }
        assert!(world.block_at(site).is_air());
        assert!(!world.target(id).unwrap().has_role);
        assert_eq!(world.drop_count(), 1);
    }

    #[test]
    fn test_rejected_placement_is_acknowledged_but_absent() {
        let mut world = SandboxWorld::new(64);
        let pos = BlockPos::new(2, 64, 2);
        world.give(0, ItemStack::workstation(Workstation::Lectern, 1));
        world.reject_position(pos);

        assert!(world.use_item_on(pos).is_ok());
        assert!(world.block_at(pos).is_air());
        assert_eq!(world.placements(), 0);
    }

    #[test]
    fn test_reverted_placement_returns_item() {
        let mut world = SandboxWorld::new(64);
        let pos = BlockPos::new(2, 64, 2);
        world.give(0, ItemStack::workstation(Workstation::Lectern, 1));
        world.revert_placements(1, 500);

        world.use_item_on(pos).unwrap();
        assert!(world.block_at(pos).workstation().is_some());

        world.step(SimTime::from_millis(500));
        assert!(world.block_at(pos).is_air());
        assert_eq!(world.inventory.count_workstation(Workstation::Lectern), 1);
    }

    #[test]
    fn test_view_populates_after_delay() {
        let mut world = SandboxWorld::new(64);
        let id = world.add_target(Vec3::new(1.5, 64.0, 0.5));
        world.set_block(BlockPos::new(1, 64, 2), BlockState::Workstation(Workstation::Lectern));
        world.set_claim_delay(0);
        world.step(SimTime::ZERO);
        world.step(SimTime::from_millis(50));

        world.interact_target(id).unwrap();
        assert_eq!(world.open_view(), Some(id));
        assert!(world.view_offers().unwrap().is_empty());

        world.step(SimTime::from_millis(200));
        assert_eq!(world.view_offers().unwrap(), default_offers());
    }

    #[test]
    fn test_offer_sequence_repeats_last() {
        let mut world = SandboxWorld::new(64);
        world.set_offer_sequence(vec![vec![], vec![book_offer("minecraft:mending", 1, 5)]]);

        assert!((world.roller)().is_empty());
        assert_eq!((world.roller)().len(), 1);
        assert_eq!((world.roller)().len(), 1);
    }
}
