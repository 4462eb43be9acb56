//! World observation types: blocks, workstations, items, inventory and entities.
//!
//! These are snapshots. Anything read from the world may be stale by the time
//! it is acted upon, so consumers re-query after every action.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::geometry::{BlockPos, Vec3};
use crate::offer::Property;

/// Number of directly selectable inventory slots.
pub const HOTBAR_SIZE: usize = 9;

/// Total number of inventory slots (hotbar included).
pub const INVENTORY_SIZE: usize = 36;

/// Maximum stack size for plain items.
const MAX_STACK: u32 = 64;

/// Workstation blocks that grant a target its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workstation {
    Lectern,
    BlastFurnace,
    Smoker,
    CartographyTable,
    BrewingStand,
    Composter,
    Barrel,
    FletchingTable,
    Cauldron,
    Stonecutter,
    Loom,
    SmithingTable,
    Grindstone,
}

impl Workstation {
    /// Every workstation, in inventory search order.
    pub const ALL: [Workstation; 13] = [
        Workstation::Lectern,
        Workstation::BlastFurnace,
        Workstation::Smoker,
        Workstation::CartographyTable,
        Workstation::BrewingStand,
        Workstation::Composter,
        Workstation::Barrel,
        Workstation::FletchingTable,
        Workstation::Cauldron,
        Workstation::Stonecutter,
        Workstation::Loom,
        Workstation::SmithingTable,
        Workstation::Grindstone,
    ];

    /// Item id of the placeable item for this workstation.
    pub fn item_id(self) -> &'static str {
        match self {
            Workstation::Lectern => "minecraft:lectern",
            Workstation::BlastFurnace => "minecraft:blast_furnace",
            Workstation::Smoker => "minecraft:smoker",
            Workstation::CartographyTable => "minecraft:cartography_table",
            Workstation::BrewingStand => "minecraft:brewing_stand",
            Workstation::Composter => "minecraft:composter",
            Workstation::Barrel => "minecraft:barrel",
            Workstation::FletchingTable => "minecraft:fletching_table",
            Workstation::Cauldron => "minecraft:cauldron",
            Workstation::Stonecutter => "minecraft:stonecutter",
            Workstation::Loom => "minecraft:loom",
            Workstation::SmithingTable => "minecraft:smithing_table",
            Workstation::Grindstone => "minecraft:grindstone",
        }
    }

    /// The role a target takes when it claims this workstation.
    pub fn profession(self) -> &'static str {
        match self {
            Workstation::Lectern => "librarian",
            Workstation::BlastFurnace => "armorer",
            Workstation::Smoker => "butcher",
            Workstation::CartographyTable => "cartographer",
            Workstation::BrewingStand => "cleric",
            Workstation::Composter => "farmer",
            Workstation::Barrel => "fisherman",
            Workstation::FletchingTable => "fletcher",
            Workstation::Cauldron => "leatherworker",
            Workstation::Stonecutter => "mason",
            Workstation::Loom => "shepherd",
            Workstation::SmithingTable => "toolsmith",
            Workstation::Grindstone => "weaponsmith",
        }
    }

    pub fn from_item_id(item_id: &str) -> Option<Workstation> {
        Workstation::ALL
            .into_iter()
            .find(|station| station.item_id() == item_id)
    }
}

impl fmt::Display for Workstation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.item_id())
    }
}

/// What occupies a block cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    Air,
    Solid,
    Workstation(Workstation),
}

impl BlockState {
    pub fn is_air(self) -> bool {
        matches!(self, BlockState::Air)
    }

    pub fn workstation(self) -> Option<Workstation> {
        match self {
            BlockState::Workstation(station) => Some(station),
            _ => None,
        }
    }
}

/// A stack of items in an inventory slot or on the ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, count: u32) -> Self {
        Self {
            item_id: item_id.into(),
            count,
            properties: Vec::new(),
        }
    }

    pub fn workstation(kind: Workstation, count: u32) -> Self {
        Self::new(kind.item_id(), count)
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// The workstation this stack places, if any.
    pub fn as_workstation(&self) -> Option<Workstation> {
        Workstation::from_item_id(&self.item_id)
    }

    /// True for breaking tools that speed up workstation removal.
    pub fn is_axe(&self) -> bool {
        self.item_id.ends_with("_axe") && !self.item_id.ends_with("pickaxe")
    }

    fn stacks_with(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id
            && self.properties.is_empty()
            && other.properties.is_empty()
    }
}

/// Snapshot of the player's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub slots: Vec<Option<ItemStack>>,
    /// Currently selected hotbar slot.
    pub selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
            selected: 0,
        }
    }

    /// Builder-style slot assignment. Out-of-range slots are ignored.
    pub fn with_item(mut self, slot: usize, stack: ItemStack) -> Self {
        if let Some(cell) = self.slots.get_mut(slot) {
            *cell = Some(stack);
        }
        self
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.get(self.selected)
    }

    /// First slot whose stack satisfies `pred`.
    pub fn find_slot(&self, pred: impl Fn(&ItemStack) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|cell| cell.as_ref().is_some_and(&pred))
    }

    /// First hotbar slot whose stack satisfies `pred`.
    pub fn find_hotbar_slot(&self, pred: impl Fn(&ItemStack) -> bool) -> Option<usize> {
        (0..HOTBAR_SIZE).find(|slot| self.get(*slot).is_some_and(&pred))
    }

    pub fn find_workstation(&self, kind: Workstation) -> Option<usize> {
        self.find_slot(|stack| stack.as_workstation() == Some(kind))
    }

    /// First workstation found, searching kinds in [`Workstation::ALL`] order.
    pub fn find_any_workstation(&self) -> Option<(usize, Workstation)> {
        Workstation::ALL
            .into_iter()
            .find_map(|kind| self.find_workstation(kind).map(|slot| (slot, kind)))
    }

    pub fn has_any_workstation(&self) -> bool {
        self.find_any_workstation().is_some()
    }

    /// Total number of items of the given workstation kind across all slots.
    pub fn count_workstation(&self, kind: Workstation) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.as_workstation() == Some(kind))
            .map(|stack| stack.count)
            .sum()
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Removes one item from `slot`, clearing the slot when it empties.
    pub fn take_one(&mut self, slot: usize) -> Option<ItemStack> {
        let cell = self.slots.get_mut(slot)?;
        let stack = cell.as_mut()?;
        let mut single = stack.clone();
        single.count = 1;
        stack.count = stack.count.saturating_sub(1);
        if stack.count == 0 {
            *cell = None;
        }
        Some(single)
    }

    /// Adds a stack, merging into a matching stack first. Returns false when
    /// there was no room.
    pub fn insert(&mut self, stack: ItemStack) -> bool {
        if let Some(existing) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|existing| existing.stacks_with(&stack) && existing.count + stack.count <= MAX_STACK)
        {
            existing.count += stack.count;
            return true;
        }
        match self.first_empty() {
            Some(slot) => {
                self.slots[slot] = Some(stack);
                true
            }
            None => false,
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.slots.len() && b < self.slots.len() {
            self.slots.swap(a, b);
        }
    }
}

/// Stable identity of a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observed state of the target being processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub id: TargetId,
    pub position: Vec3,
    pub eye_height: f64,
    pub alive: bool,
    /// Whether the target currently holds a role from a workstation.
    pub has_role: bool,
}

impl TargetSnapshot {
    pub fn block_pos(&self) -> BlockPos {
        self.position.block_pos()
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.eye_height, 0.0)
    }
}

/// Observed state of the player the engine acts through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub eye_height: f64,
    pub on_ground: bool,
}

impl PlayerSnapshot {
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.eye_height, 0.0)
    }
}

/// Identity of an arbitrary entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum EntityKind {
    Player,
    Target { id: TargetId },
    DroppedItem { stack: ItemStack },
    Other,
}

/// An entity found by a bounding-volume query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
}

impl EntitySnapshot {
    pub fn dropped_stack(&self) -> Option<&ItemStack> {
        match &self.kind {
            EntityKind::DroppedItem { stack } => Some(stack),
            _ => None,
        }
    }
}
