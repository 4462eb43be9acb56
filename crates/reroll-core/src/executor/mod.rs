//! Physical actions against the world.
//!
//! The executor issues breaks, placements, movement and interactions through
//! the injected [`World`], and tracks multi-tick actions (breaking, walking to
//! a dropped item) across polls. It never blocks: every method does at most
//! one tick's worth of work and reports where it stands.

pub mod pickup;

use std::collections::HashMap;

use reroll_events::{Aabb, BlockPos, BlockState, SimTime, TargetId, Workstation, HOTBAR_SIZE};

use crate::error::RunError;
use crate::ports::{ActionError, Movement, World};

pub use pickup::PickupTracker;

/// Progress ticks after which a break is forced with a direct attack.
pub const FORCED_BREAK_TICKS: u32 = 100;

/// Radius around the broken block searched for its drop.
const DROP_SEARCH_RADIUS: f64 = 10.0;

/// Within this distance the item is collected passively.
const PASSIVE_PICKUP_RADIUS: f64 = 1.8;

/// Within this distance movement stops entirely.
const HALT_RADIUS: f64 = 0.5;

const APPROACH_SPEED: f64 = 0.2;
const CREEP_SPEED: f64 = 0.15;

/// How a pickup was concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupConfirmation {
    /// More of the broken workstation is in the inventory than before the break.
    Confirmed,
    /// No matching dropped item is observable any more.
    AssumedSuccess,
}

/// Result of one pickup poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PickupResult {
    Success(PickupConfirmation),
    InProgress,
    Fatal(RunError),
}

/// Result of one break poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakProgress {
    InProgress,
    /// The position is empty.
    Broken,
    /// The progress limit passed and a direct attack was re-issued with the
    /// tick count reset. A break that keeps stalling is forced again every
    /// [`FORCED_BREAK_TICKS`] ticks; only the orchestrator's break timeout
    /// ends it.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BreakJob {
    pos: BlockPos,
    ticks: u32,
}

/// Issues physical actions and tracks their multi-tick progress.
pub struct ActionExecutor<W: World> {
    world: W,
    remembered: HashMap<BlockPos, Workstation>,
    breaking: Option<BreakJob>,
    last_broken: Option<BlockPos>,
    /// Hotbar slot selected before a tool switch.
    saved_slot: Option<usize>,
    /// Count of the remembered workstation kind when the break started.
    baseline_count: u32,
    pickup: PickupTracker,
    destructive_locked: bool,
}

impl<W: World> ActionExecutor<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            remembered: HashMap::new(),
            breaking: None,
            last_broken: None,
            saved_slot: None,
            baseline_count: 0,
            pickup: PickupTracker::new(),
            destructive_locked: false,
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Clears everything a previous run left behind, including the lock.
    pub fn reset_for_run(&mut self) {
        self.cancel_break();
        self.remembered.clear();
        self.last_broken = None;
        self.baseline_count = 0;
        self.pickup.reset();
        self.destructive_locked = false;
    }

    /// Forbids any further break until the next run.
    pub fn lock_destructive(&mut self) {
        if !self.destructive_locked {
            tracing::info!("Destructive actions locked");
        }
        self.destructive_locked = true;
        self.cancel_break();
    }

    pub fn is_locked(&self) -> bool {
        self.destructive_locked
    }

    pub fn is_job_site(&self, pos: BlockPos) -> bool {
        self.world.block_at(pos).workstation().is_some()
    }

    pub fn remember(&mut self, pos: BlockPos, kind: Workstation) {
        self.remembered.insert(pos, kind);
    }

    pub fn remembered_at(&self, pos: BlockPos) -> Option<Workstation> {
        self.remembered.get(&pos).copied()
    }

    pub fn last_broken(&self) -> Option<BlockPos> {
        self.last_broken
    }

    pub fn is_breaking(&self) -> bool {
        self.breaking.is_some()
    }

    /// Nearest workstation within the search volume around `center`.
    pub fn find_job_site_near(
        &self,
        center: BlockPos,
        horizontal: i32,
        vertical: i32,
    ) -> Option<BlockPos> {
        let mut best: Option<BlockPos> = None;
        for dx in -horizontal..=horizontal {
            for dy in -vertical..=vertical {
                for dz in -horizontal..=horizontal {
                    let pos = center.offset(dx, dy, dz);
                    if !self.is_job_site(pos) {
                        continue;
                    }
                    let closer = best.map_or(true, |current| {
                        pos.distance_sq(center) < current.distance_sq(center)
                    });
                    if closer {
                        best = Some(pos);
                    }
                }
            }
        }
        best
    }

    /// Empty cell on solid ground with no entity inside.
    pub fn is_valid_placement(&self, pos: BlockPos) -> bool {
        self.world.block_at(pos.down()) == BlockState::Solid
            && self.world.block_at(pos).is_air()
            && self.obstructing_entities(pos) == 0
    }

    /// Entities that would collide with a block placed at `pos`. Dropped
    /// items never obstruct.
    fn obstructing_entities(&self, pos: BlockPos) -> usize {
        self.world
            .entities_in(Aabb::of_block(pos))
            .iter()
            .filter(|entity| entity.dropped_stack().is_none())
            .count()
    }

    /// First valid placement on the rings of radius 1..=`max_radius` around
    /// `center`, inner rings first.
    pub fn find_placement_near(&self, center: BlockPos, max_radius: i32) -> Option<BlockPos> {
        for radius in 1..=max_radius {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if dx.abs() != radius && dz.abs() != radius {
                        continue;
                    }
                    let pos = center.offset(dx, 0, dz);
                    if self.is_valid_placement(pos) {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    pub fn has_workstation(&self) -> bool {
        self.world
            .inventory()
            .is_some_and(|inventory| inventory.has_any_workstation())
    }

    pub fn inventory_full(&self) -> bool {
        self.world
            .inventory()
            .is_some_and(|inventory| inventory.is_full())
    }

    /// Starts breaking the workstation at `pos`, switching to a hotbar axe
    /// when one is available.
    pub fn start_break(&mut self, pos: BlockPos) -> Result<(), RunError> {
        if self.destructive_locked {
            tracing::error!("Refusing to break {}: destructive actions locked", pos);
            return Err(RunError::rejected("break", "destructive actions locked"));
        }
        if !self.world.is_ready() {
            return Err(RunError::context("client not ready"));
        }
        let kind = self
            .world
            .block_at(pos)
            .workstation()
            .ok_or_else(|| RunError::rejected("break", format!("no workstation at {}", pos)))?;
        let inventory = self
            .world
            .inventory()
            .ok_or_else(|| RunError::context("inventory unavailable"))?;

        self.remembered.insert(pos, kind);
        self.baseline_count = inventory.count_workstation(kind);
        self.saved_slot = Some(inventory.selected);

        match inventory.find_hotbar_slot(|stack| stack.is_axe()) {
            Some(axe) => {
                if let Err(err) = self.world.select_slot(axe) {
                    tracing::warn!("Could not equip axe from slot {}: {}", axe, err);
                } else {
                    tracing::info!(
                        "Equipped axe from slot {} (original: {})",
                        axe,
                        inventory.selected
                    );
                }
            }
            None => tracing::warn!("No axe found in hotbar, breaking with current tool"),
        }

        if let Err(err) = self.world.attack_block(pos) {
            self.restore_slot();
            return Err(action_error("break", err));
        }

        self.breaking = Some(BreakJob { pos, ticks: 0 });
        tracing::info!("Started breaking {} at {}", kind, pos);
        Ok(())
    }

    /// Advances the current break by one tick.
    pub fn continue_break(&mut self) -> Result<BreakProgress, RunError> {
        let Some(mut job) = self.breaking else {
            return Err(RunError::context("no break in progress"));
        };
        if self.destructive_locked {
            self.cancel_break();
            return Err(RunError::rejected("break", "destructive actions locked"));
        }

        if self.world.block_at(job.pos).is_air() {
            tracing::info!("Block at {} broken after {} ticks", job.pos, job.ticks);
            self.breaking = None;
            self.last_broken = Some(job.pos);
            self.restore_slot();
            return Ok(BreakProgress::Broken);
        }

        if let Err(err) = self.world.progress_break(job.pos) {
            self.breaking = None;
            self.world.cancel_break();
            self.restore_slot();
            return Err(action_error("break", err));
        }
        job.ticks += 1;

        if job.ticks > FORCED_BREAK_TICKS {
            tracing::error!(
                "Breaking {} exceeded {} ticks, forcing with a direct attack",
                job.pos,
                FORCED_BREAK_TICKS
            );
            if let Err(err) = self.world.attack_block(job.pos) {
                tracing::warn!("Forced attack rejected: {}", err);
            }
            self.breaking = Some(BreakJob {
                pos: job.pos,
                ticks: 0,
            });
            return Ok(BreakProgress::Forced);
        }

        self.breaking = Some(job);
        Ok(BreakProgress::InProgress)
    }

    pub fn cancel_break(&mut self) {
        if let Some(job) = self.breaking.take() {
            tracing::info!("Cancelled break at {}", job.pos);
            self.world.cancel_break();
        }
        self.restore_slot();
    }

    fn restore_slot(&mut self) {
        if let Some(slot) = self.saved_slot.take() {
            self.select_quietly(slot);
        }
    }

    fn select_quietly(&mut self, slot: usize) {
        if slot >= HOTBAR_SIZE {
            return;
        }
        match self.world.select_slot(slot) {
            Ok(()) => tracing::debug!("Restored hotbar slot {}", slot),
            Err(err) => tracing::warn!("Could not restore hotbar slot {}: {}", slot, err),
        }
    }

    /// Replaces the remembered workstation at `pos`, or at the first free
    /// lateral neighbour. Returns where it landed and re-anchors the memory
    /// there.
    pub fn place(&mut self, pos: BlockPos) -> Result<BlockPos, RunError> {
        if !self.world.is_ready() {
            return Err(RunError::context("client not ready"));
        }
        let kind = self
            .remembered_at(pos)
            .ok_or_else(|| RunError::context(format!("no remembered workstation for {}", pos)))?;

        let [east, west, south, north] = pos.lateral_neighbors();
        let placed = self.place_kind(kind, &[pos, east, west, south, north])?;

        if placed != pos {
            tracing::info!("Job site moved from {} to {}", pos, placed);
            self.remembered.remove(&pos);
            self.remembered.insert(placed, kind);
            if self.last_broken == Some(pos) {
                self.last_broken = Some(placed);
            }
        }
        Ok(placed)
    }

    /// Places any workstation from the inventory at exactly `pos`.
    pub fn place_initial(&mut self, pos: BlockPos) -> Result<BlockPos, RunError> {
        if !self.world.is_ready() {
            return Err(RunError::context("client not ready"));
        }
        let (_, kind) = self
            .world
            .inventory()
            .and_then(|inventory| inventory.find_any_workstation())
            .ok_or_else(|| RunError::exhausted("no workstation in inventory"))?;

        let placed = self.place_kind(kind, &[pos])?;
        self.remembered.insert(placed, kind);
        tracing::info!("Placed initial {} at {}", kind, placed);
        Ok(placed)
    }

    fn place_kind(&mut self, kind: Workstation, candidates: &[BlockPos]) -> Result<BlockPos, RunError> {
        let inventory = self
            .world
            .inventory()
            .ok_or_else(|| RunError::context("inventory unavailable"))?;
        let slot = inventory
            .find_workstation(kind)
            .ok_or_else(|| RunError::exhausted(format!("no {} in inventory", kind)))?;

        let original = inventory.selected;
        let result = self.try_candidates(kind, slot, candidates);
        self.select_quietly(original);
        result
    }

    fn try_candidates(
        &mut self,
        kind: Workstation,
        slot: usize,
        candidates: &[BlockPos],
    ) -> Result<BlockPos, RunError> {
        let hotbar_slot = if slot >= HOTBAR_SIZE {
            tracing::info!("Moving {} from slot {} to hotbar", kind, slot);
            self.world
                .select_slot(0)
                .map_err(|err| action_error("select", err))?;
            self.world
                .swap_slots(slot, 0)
                .map_err(|err| action_error("swap", err))?;
            0
        } else {
            slot
        };
        self.world
            .select_slot(hotbar_slot)
            .map_err(|err| action_error("select", err))?;

        for (index, &candidate) in candidates.iter().enumerate() {
            if !self.world.block_at(candidate).is_air() {
                if index == 0 {
                    tracing::warn!("Position {} is occupied, trying alternatives", candidate);
                }
                continue;
            }
            let blocking = self.obstructing_entities(candidate);
            if blocking > 0 {
                tracing::debug!("Position {} blocked by {} entities", candidate, blocking);
                continue;
            }

            if let Err(err) = self.world.use_item_on(candidate) {
                tracing::warn!("Placement at {} rejected: {}", candidate, err);
                continue;
            }
            if self.is_job_site(candidate) {
                tracing::info!("Placed {} at {}", kind, candidate);
                return Ok(candidate);
            }
            tracing::warn!(
                "Placement at {} reported success but no workstation is there",
                candidate
            );
        }

        Err(RunError::rejected(
            "place",
            format!("no candidate position accepted {}", kind),
        ))
    }

    pub fn reset_pickup(&mut self) {
        self.pickup.reset();
    }

    /// One poll of the walk to the dropped workstation.
    pub fn try_pickup(&mut self, now: SimTime) -> PickupResult {
        let (Some(player), Some(inventory)) = (self.world.player(), self.world.inventory()) else {
            self.pickup.reset();
            return PickupResult::Fatal(RunError::context("player unavailable during pickup"));
        };
        let Some(broken) = self.last_broken else {
            self.pickup.reset();
            return PickupResult::Fatal(RunError::context("no broken position to pick up from"));
        };
        let Some(kind) = self.remembered_at(broken) else {
            tracing::warn!("No remembered workstation for {}, assuming picked up", broken);
            self.pickup.reset();
            return PickupResult::Success(PickupConfirmation::AssumedSuccess);
        };

        if inventory.count_workstation(kind) > self.baseline_count {
            tracing::debug!("{} confirmed in inventory", kind);
            self.pickup.reset();
            return PickupResult::Success(PickupConfirmation::Confirmed);
        }

        let bounds = Aabb::of_block(broken).expand(DROP_SEARCH_RADIUS);
        let closest = self
            .world
            .entities_in(bounds)
            .into_iter()
            .filter(|entity| {
                entity
                    .dropped_stack()
                    .is_some_and(|stack| stack.as_workstation() == Some(kind))
            })
            .map(|entity| (player.position.distance(entity.position), entity.position))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((distance, item)) = closest else {
            tracing::warn!("No dropped {} observable, assuming picked up", kind);
            self.pickup.reset();
            return PickupResult::Success(PickupConfirmation::AssumedSuccess);
        };

        self.pickup.observe(now, player.position, distance);
        self.world.look_at(item);

        let speed = if distance <= HALT_RADIUS {
            tracing::debug!("Item {:.2} blocks away, waiting for pickup", distance);
            None
        } else if distance <= PASSIVE_PICKUP_RADIUS {
            tracing::debug!("Item {:.2} blocks away, moving closer", distance);
            Some(CREEP_SPEED)
        } else if distance > DROP_SEARCH_RADIUS {
            tracing::warn!("Item is {:.2} blocks away, far from the broken block", distance);
            Some(CREEP_SPEED)
        } else {
            tracing::debug!("Item {:.2} blocks away, walking toward it", distance);
            Some(APPROACH_SPEED)
        };

        match speed {
            None => self.world.apply_movement(Movement::STOP),
            Some(speed) => {
                let jump = self.pickup.should_jump();
                if jump {
                    tracing::info!("Player stuck, jumping toward item");
                    self.pickup.jumped();
                }
                self.world
                    .apply_movement(Movement::toward(player.position, item, speed, jump));
            }
        }
        PickupResult::InProgress
    }

    pub fn halt_movement(&mut self) {
        self.world.apply_movement(Movement::STOP);
    }

    /// Faces and interacts with the target. True once its negotiation view is
    /// open.
    pub fn open_negotiation(&mut self, target: TargetId, reach: f64) -> Result<bool, RunError> {
        let player = self
            .world
            .player()
            .ok_or_else(|| RunError::context("player unavailable"))?;
        let snapshot = self
            .world
            .target(target)
            .ok_or_else(|| RunError::target_lost("target is no longer loaded"))?;

        let distance = player.position.distance(snapshot.position);
        if distance > reach {
            tracing::warn!("Target is too far away: {:.2} blocks", distance);
            return Ok(false);
        }

        self.world.look_at(snapshot.eye_position());
        if let Err(err) = self.world.interact_target(target) {
            tracing::debug!("Interaction with target not accepted: {}", err);
            return Ok(false);
        }
        Ok(self.world.open_view() == Some(target))
    }

    pub fn close_view(&mut self) {
        self.world.close_view();
    }
}

fn action_error(action: &'static str, err: ActionError) -> RunError {
    match err {
        ActionError::NotReady => RunError::context("client not ready"),
        ActionError::OutOfReach => RunError::rejected(action, "out of reach"),
        ActionError::Rejected(reason) => RunError::rejected(action, reason),
    }
}

#[cfg(all(test, feature = "sandbox"))]
mod tests {
    use super::*;
    use crate::ports::WorldProbe;
    use crate::sandbox::SandboxWorld;
    use reroll_events::ItemStack;

    const FLOOR: i32 = 64;

    fn site() -> BlockPos {
        BlockPos::new(3, FLOOR, 0)
    }

    fn executor() -> ActionExecutor<SandboxWorld> {
        let mut world = SandboxWorld::new(FLOOR);
        world.set_block(site(), BlockState::Workstation(Workstation::Lectern));
        world.give(2, ItemStack::new("minecraft:iron_axe", 1));
        ActionExecutor::new(world)
    }

    fn break_fully(executor: &mut ActionExecutor<SandboxWorld>, now: &mut SimTime) {
        executor.start_break(site()).unwrap();
        for _ in 0..200 {
            *now = now.plus_millis(50);
            executor.world_mut().step(*now);
            if executor.continue_break().unwrap() == BreakProgress::Broken {
                return;
            }
        }
        panic!("block never broke");
    }

    #[test]
    fn test_break_uses_axe_and_restores_slot() {
        let mut executor = executor();
        executor.world_mut().select(4);
        let mut now = SimTime::ZERO;

        executor.start_break(site()).unwrap();
        assert_eq!(executor.world().inventory().unwrap().selected, 2);

        for _ in 0..200 {
            now = now.plus_millis(50);
            executor.world_mut().step(now);
            if executor.continue_break().unwrap() == BreakProgress::Broken {
                break;
            }
        }

        assert!(!executor.is_job_site(site()));
        assert_eq!(executor.last_broken(), Some(site()));
        assert_eq!(executor.world().inventory().unwrap().selected, 4);
    }

    #[test]
    fn test_cancel_restores_slot() {
        let mut executor = executor();
        executor.world_mut().select(5);

        executor.start_break(site()).unwrap();
        executor.cancel_break();

        assert!(!executor.is_breaking());
        assert!(executor.is_job_site(site()));
        assert_eq!(executor.world().inventory().unwrap().selected, 5);
    }

    #[test]
    fn test_stalled_break_is_forced_and_keeps_going() {
        let mut executor = executor();
        executor.world_mut().set_break_ticks(10_000);
        executor.world_mut().select(5);
        executor.start_break(site()).unwrap();

        for _ in 0..FORCED_BREAK_TICKS {
            assert_eq!(executor.continue_break().unwrap(), BreakProgress::InProgress);
        }
        assert_eq!(executor.continue_break().unwrap(), BreakProgress::Forced);

        // Re-attacked with a fresh tick count, still holding the axe.
        assert_eq!(executor.world().break_starts(), 2);
        assert!(executor.is_breaking());
        assert_eq!(executor.world().inventory().unwrap().selected, 2);
        assert_eq!(executor.continue_break().unwrap(), BreakProgress::InProgress);

        executor.cancel_break();
        assert!(!executor.is_breaking());
        assert_eq!(executor.world().inventory().unwrap().selected, 5);
        assert!(executor.is_job_site(site()));
    }

    #[test]
    fn test_locked_executor_refuses_to_break() {
        let mut executor = executor();
        executor.lock_destructive();

        let err = executor.start_break(site()).unwrap_err();
        assert!(err.to_string().contains("locked"));
        assert_eq!(executor.world().break_starts(), 0);

        executor.reset_for_run();
        assert!(executor.start_break(site()).is_ok());
    }

    #[test]
    fn test_break_place_round_trip_restores_job_site() {
        let mut executor = executor();
        executor.world_mut().select(4);
        let mut now = SimTime::ZERO;

        break_fully(&mut executor, &mut now);
        // Spare so placement does not depend on walking to the drop.
        executor.world_mut().give(20, ItemStack::workstation(Workstation::Lectern, 1));

        let placed = executor.place(site()).unwrap();

        assert_eq!(placed, site());
        assert!(executor.is_job_site(placed));
        // Moved from the main inventory into the hotbar, selection restored.
        assert_eq!(executor.world().inventory().unwrap().selected, 4);
        assert!(executor.world().inventory().unwrap().get(20).is_none());
    }

    #[test]
    fn test_place_falls_back_to_neighbour_and_reanchors() {
        let mut executor = executor();
        let mut now = SimTime::ZERO;

        break_fully(&mut executor, &mut now);
        executor.world_mut().give(1, ItemStack::workstation(Workstation::Lectern, 1));
        executor.world_mut().reject_position(site());

        let placed = executor.place(site()).unwrap();
        let [east, ..] = site().lateral_neighbors();

        assert_eq!(placed, east);
        assert_eq!(executor.remembered_at(east), Some(Workstation::Lectern));
        assert_eq!(executor.remembered_at(site()), None);
        assert_eq!(executor.last_broken(), Some(east));
    }

    #[test]
    fn test_place_without_stock_is_exhausted() {
        let mut executor = executor();
        let mut now = SimTime::ZERO;

        break_fully(&mut executor, &mut now);
        executor.world_mut().clear_drops();

        let err = executor.place(site()).unwrap_err();
        assert!(matches!(err, RunError::ResourceExhausted(_)));
    }

    #[test]
    fn test_pickup_walks_to_drop_and_confirms() {
        let mut executor = executor();
        let mut now = SimTime::ZERO;

        break_fully(&mut executor, &mut now);
        executor.reset_pickup();

        let mut result = PickupResult::InProgress;
        for _ in 0..400 {
            now = now.plus_millis(50);
            executor.world_mut().step(now);
            result = executor.try_pickup(now);
            if result != PickupResult::InProgress {
                break;
            }
        }

        assert_eq!(result, PickupResult::Success(PickupConfirmation::Confirmed));
        assert_eq!(
            executor
                .world()
                .inventory()
                .unwrap()
                .count_workstation(Workstation::Lectern),
            1
        );
    }

    #[test]
    fn test_pickup_without_visible_drop_is_assumed() {
        let mut executor = executor();
        let mut now = SimTime::ZERO;

        break_fully(&mut executor, &mut now);
        executor.world_mut().clear_drops();

        assert_eq!(
            executor.try_pickup(now),
            PickupResult::Success(PickupConfirmation::AssumedSuccess)
        );
    }

    #[test]
    fn test_pickup_jumps_over_obstacle() {
        let mut executor = executor();
        let mut now = SimTime::ZERO;
        // Wall between the player at x=0.5 and the drop at x=3.5.
        executor
            .world_mut()
            .set_block(BlockPos::new(2, FLOOR, 0), BlockState::Solid);

        break_fully(&mut executor, &mut now);
        executor.reset_pickup();

        let mut result = PickupResult::InProgress;
        for _ in 0..600 {
            now = now.plus_millis(50);
            executor.world_mut().step(now);
            result = executor.try_pickup(now);
            if result != PickupResult::InProgress {
                break;
            }
        }

        assert_eq!(result, PickupResult::Success(PickupConfirmation::Confirmed));
        assert!(executor.world().jumps() > 0);
    }

    #[test]
    fn test_job_site_search_prefers_nearest() {
        let mut executor = executor();
        let far = BlockPos::new(7, FLOOR, 7);
        executor
            .world_mut()
            .set_block(far, BlockState::Workstation(Workstation::Barrel));

        let found = executor.find_job_site_near(BlockPos::new(1, FLOOR, 0), 8, 3);
        assert_eq!(found, Some(site()));
    }

    #[test]
    fn test_placement_validity() {
        let executor = executor();
        let player_cell = executor.world().player_position().block_pos();

        assert!(!executor.is_valid_placement(player_cell));
        assert!(!executor.is_valid_placement(site()));
        assert!(!executor.is_valid_placement(BlockPos::new(5, FLOOR + 2, 5)));
        assert!(executor.is_valid_placement(BlockPos::new(-2, FLOOR, 0)));

        let found = executor.find_placement_near(player_cell, 3).unwrap();
        assert!(executor.is_valid_placement(found));
        assert_eq!(found.distance_sq(player_cell), 2);
    }
}
