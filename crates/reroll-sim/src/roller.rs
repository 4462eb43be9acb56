//! Seeded offer generation for sandbox targets.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use reroll_core::trade::catalog::PROPERTIES;
use reroll_events::{ItemStack, OfferListing, Property, CURRENCY_ITEM};

/// Chance that a fresh claim lists an enchanted book first.
const BOOK_CHANCE: f64 = 0.35;

/// Most currency a single price component can ask for.
const MAX_PRICE: u32 = 64;

/// Rolls the offer list a target gets each time it claims a workstation.
#[derive(Debug, Clone)]
pub struct OfferRoller {
    rng: SmallRng,
}

impl OfferRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn roll(&mut self) -> Vec<OfferListing> {
        let first = if self.rng.gen_bool(BOOK_CHANCE) {
            self.roll_book()
        } else {
            OfferListing::new(
                ItemStack::new(CURRENCY_ITEM, 1),
                ItemStack::new("minecraft:paper", self.rng.gen_range(24..=36)),
            )
        };
        let second = OfferListing::new(
            ItemStack::new("minecraft:bookshelf", 1),
            ItemStack::new(CURRENCY_ITEM, self.rng.gen_range(9..=11)),
        );
        vec![first, second]
    }

    fn roll_book(&mut self) -> OfferListing {
        let info = PROPERTIES[self.rng.gen_range(0..PROPERTIES.len())];
        let level = self.rng.gen_range(1..=info.max_level);
        let spread = 4 + 10 * level as u32;
        let price = (2 + 3 * level as u32 + self.rng.gen_range(0..=spread)).min(MAX_PRICE);

        tracing::debug!("Rolled {} for {}", info.display_string(level), price);
        OfferListing::new(
            ItemStack::new("minecraft:enchanted_book", 1)
                .with_property(Property::new(info.id, level)),
            ItemStack::new(CURRENCY_ITEM, price),
        )
        .with_second_buy(ItemStack::new("minecraft:book", 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reroll_core::trade::catalog;

    #[test]
    fn test_same_seed_same_offers() {
        let mut a = OfferRoller::new(7);
        let mut b = OfferRoller::new(7);

        for _ in 0..50 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_books_stay_within_catalog() {
        let mut roller = OfferRoller::new(99);
        let mut books = 0;

        for _ in 0..500 {
            let offers = roller.roll();
            assert_eq!(offers.len(), 2);
            for property in &offers[0].sell.properties {
                books += 1;
                let max = catalog::max_level(&property.id).unwrap();
                assert!(property.level >= 1 && property.level <= max);
                assert!(offers[0].first_buy.count <= MAX_PRICE);
            }
        }
        assert!(books > 0);
    }
}
