//! Shared data types for the trade reroller.
//!
//! This crate contains pure data structures with no automation logic.
//! It is a dependency for all other crates in the workspace.

pub mod geometry;
pub mod offer;
pub mod outcome;
pub mod timestamp;
pub mod world;

// Re-export geometry types
pub use geometry::{Aabb, BlockPos, Vec3};

// Re-export timestamp types
pub use timestamp::{SimTime, TICK_MS};

// Re-export world types
pub use world::{
    BlockState, EntityId, EntityKind, EntitySnapshot, Inventory, ItemStack, PlayerSnapshot,
    TargetId, TargetSnapshot, Workstation, HOTBAR_SIZE, INVENTORY_SIZE,
};

// Re-export offer types
pub use offer::{CapturedOffer, ItemCategory, OfferListing, PriceComponent, Property, CURRENCY_ITEM};

// Re-export outcome types
pub use outcome::{OutcomeKind, RunOutcome};
