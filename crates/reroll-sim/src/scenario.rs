//! Sandbox scenario: one target, one player, one lectern.

use reroll_core::sandbox::SandboxWorld;
use reroll_events::{BlockPos, BlockState, ItemStack, TargetId, Vec3, Workstation};

use crate::roller::OfferRoller;

pub const FLOOR_Y: i32 = 64;

/// Where the starting lectern stands.
pub const JOB_SITE: BlockPos = BlockPos::new(3, FLOOR_Y, 2);

/// Knobs for building the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOptions {
    pub seed: u64,
    /// Extra lecterns in the main inventory.
    pub spares: u32,
    /// Start with a lectern already placed next to the target.
    pub initial_site: bool,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            spares: 0,
            initial_site: true,
        }
    }
}

/// A populated sandbox and the target to reroll.
pub struct Scenario {
    pub world: SandboxWorld,
    pub target: TargetId,
}

impl Scenario {
    pub fn build(options: &ScenarioOptions) -> Self {
        let mut world = SandboxWorld::new(FLOOR_Y);
        let target = world.add_target(Vec3::new(2.5, FLOOR_Y as f64, 0.5));
        world.give(1, ItemStack::new("minecraft:iron_axe", 1));

        if options.initial_site {
            world.set_block(JOB_SITE, BlockState::Workstation(Workstation::Lectern));
        } else {
            world.give(2, ItemStack::workstation(Workstation::Lectern, 1));
        }
        if options.spares > 0 {
            world.give(
                9,
                ItemStack::workstation(Workstation::Lectern, options.spares),
            );
        }

        let mut roller = OfferRoller::new(options.seed);
        world.set_roller(move || roller.roll());

        tracing::info!(
            "Scenario: seed {}, {} spares, initial site: {}",
            options.seed,
            options.spares,
            options.initial_site
        );
        Self { world, target }
    }
}
