//! World boundary.
//!
//! The engine never touches a global client or world. Everything it reads goes
//! through [`WorldProbe`] and everything it does goes through [`ActionPort`];
//! both are injected at construction so tests can substitute a fake world.
//! All observations are potentially stale and are re-verified after every
//! action.

use reroll_events::{
    Aabb, BlockPos, BlockState, EntitySnapshot, Inventory, OfferListing, PlayerSnapshot, TargetId,
    TargetSnapshot, Vec3,
};
use thiserror::Error;

/// Read-only queries against the world and client view.
pub trait WorldProbe {
    /// False while the player, world or interaction handle is unavailable.
    fn is_ready(&self) -> bool;

    fn block_at(&self, pos: BlockPos) -> BlockState;

    fn player(&self) -> Option<PlayerSnapshot>;

    fn inventory(&self) -> Option<Inventory>;

    /// Entities whose position lies inside `bounds`.
    fn entities_in(&self, bounds: Aabb) -> Vec<EntitySnapshot>;

    fn target(&self, id: TargetId) -> Option<TargetSnapshot>;

    /// The target whose negotiation view is currently open, if any.
    fn open_view(&self) -> Option<TargetId>;

    /// Offers listed in the open negotiation view.
    fn view_offers(&self) -> Result<Vec<OfferListing>, ProbeError>;
}

/// Physical actions issued on behalf of the player.
pub trait ActionPort {
    fn select_slot(&mut self, slot: usize) -> Result<(), ActionError>;

    /// Swaps an inventory slot with a hotbar slot.
    fn swap_slots(&mut self, slot: usize, hotbar_slot: usize) -> Result<(), ActionError>;

    /// Starts breaking the block at `pos`.
    fn attack_block(&mut self, pos: BlockPos) -> Result<(), ActionError>;

    /// Continues breaking the block at `pos` for one tick.
    fn progress_break(&mut self, pos: BlockPos) -> Result<(), ActionError>;

    fn cancel_break(&mut self);

    /// Uses the selected item against `pos`, placing it when it is a block.
    fn use_item_on(&mut self, pos: BlockPos) -> Result<(), ActionError>;

    fn look_at(&mut self, point: Vec3);

    /// Replaces the current movement impulse.
    fn apply_movement(&mut self, movement: Movement);

    fn interact_target(&mut self, target: TargetId) -> Result<(), ActionError>;

    fn close_view(&mut self);
}

/// Everything the engine needs from the outside world.
pub trait World: WorldProbe + ActionPort {}

impl<T: WorldProbe + ActionPort> World for T {}

/// Horizontal movement impulse with an optional jump.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement {
    /// Horizontal velocity in blocks per tick; `y` is ignored.
    pub velocity: Vec3,
    pub jump: bool,
}

impl Movement {
    pub const STOP: Movement = Movement {
        velocity: Vec3::ZERO,
        jump: false,
    };

    /// Movement from `from` toward `to` at `speed` blocks per tick.
    pub fn toward(from: Vec3, to: Vec3, speed: f64, jump: bool) -> Self {
        let mut direction = to - from;
        direction.y = 0.0;
        Self {
            velocity: direction.normalize().scale(speed),
            jump,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.velocity.horizontal_length() <= f64::EPSILON && !self.jump
    }
}

/// Failure reported by the world for an issued action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("client not ready")]
    NotReady,
    #[error("out of reach")]
    OutOfReach,
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Failure reading the negotiation view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("no negotiation view open")]
    NoView,
    #[error("malformed offer list: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_toward_is_horizontal() {
        let movement = Movement::toward(
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::new(3.0, 70.0, 4.0),
            0.2,
            false,
        );

        assert_eq!(movement.velocity.y, 0.0);
        assert!((movement.velocity.horizontal_length() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_stop_is_stopped() {
        assert!(Movement::STOP.is_stopped());
        assert!(!Movement {
            velocity: Vec3::ZERO,
            jump: true
        }
        .is_stopped());
    }
}
