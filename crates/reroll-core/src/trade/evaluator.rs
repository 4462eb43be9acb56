//! Informational offer scoring.
//!
//! Scores never affect acceptance; they rank offers for display. A cheaper
//! offer earns ten points per currency unit below its category ceiling, every
//! carried property earns `priority * level` (plus a bonus at its maximum
//! level), and configured slot/whitelist memberships add flat bonuses.

use reroll_events::CapturedOffer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::{FilterConfig, PriceCeilings};
use crate::trade::catalog;

const COST_WEIGHT: u32 = 10;
const DEFAULT_PRIORITY: u32 = 50;
const MAX_LEVEL_BONUS: u32 = 20;
const FIRST_SLOT_BONUS: u32 = 20;
const WHITELIST_BONUS: u32 = 30;

/// Letter grade derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: u32) -> Grade {
        match score {
            s if s >= 200 => Grade::S,
            s if s >= 150 => Grade::A,
            s if s >= 100 => Grade::B,
            s if s >= 50 => Grade::C,
            _ => Grade::D,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Score, grade and a human-readable breakdown for one offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeScore {
    pub slot: usize,
    pub score: u32,
    pub grade: Grade,
    pub reason: String,
}

impl fmt::Display for TradeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {} [{}] - {}", self.score, self.grade, self.reason)
    }
}

/// Scores offers by price and carried properties.
#[derive(Debug, Clone)]
pub struct TradeEvaluator {
    priorities: HashMap<String, u32>,
    ceilings: PriceCeilings,
    preferred_first_slot_items: Vec<String>,
    item_whitelist: Vec<String>,
}

impl TradeEvaluator {
    pub fn new(filters: &FilterConfig) -> Self {
        Self {
            priorities: default_priorities(),
            ceilings: filters.ceilings.clone(),
            preferred_first_slot_items: filters.preferred_first_slot_items.clone(),
            item_whitelist: filters.item_whitelist.clone(),
        }
    }

    pub fn priority(&self, id: &str) -> u32 {
        self.priorities.get(id).copied().unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn evaluate(&self, offer: &CapturedOffer) -> TradeScore {
        let mut score: u32 = 0;
        let mut parts = Vec::new();

        let ceiling = self.ceilings.for_category(offer.category());
        let cost = offer.currency_cost();
        if cost <= ceiling {
            let cost_score = (ceiling - cost).saturating_mul(COST_WEIGHT);
            score += cost_score;
            parts.push(format!("Cost: {} (+{})", cost, cost_score));
        } else {
            parts.push(format!("Cost: {} (too expensive)", cost));
        }

        if !offer.properties.is_empty() {
            let property_score: u32 = offer
                .properties
                .iter()
                .map(|property| {
                    let value = self
                        .priority(&property.id)
                        .saturating_mul(property.level as u32);
                    if catalog::max_level(&property.id) == Some(property.level) {
                        value.saturating_add(MAX_LEVEL_BONUS)
                    } else {
                        value
                    }
                })
                .fold(0, u32::saturating_add);
            score = score.saturating_add(property_score);
            parts.push(format!("Properties (+{})", property_score));
        }

        if offer.slot == 0 && self.preferred_first_slot_items.contains(&offer.item_id) {
            score = score.saturating_add(FIRST_SLOT_BONUS);
            parts.push(format!("First slot bonus (+{})", FIRST_SLOT_BONUS));
        }

        if self.item_whitelist.contains(&offer.item_id) {
            score = score.saturating_add(WHITELIST_BONUS);
            parts.push(format!("Whitelisted item (+{})", WHITELIST_BONUS));
        }

        TradeScore {
            slot: offer.slot,
            score,
            grade: Grade::from_score(score),
            reason: parts.join(", "),
        }
    }

    /// Scores for every offer, best first.
    pub fn rank(&self, offers: &[CapturedOffer]) -> Vec<TradeScore> {
        let mut scores: Vec<TradeScore> = offers.iter().map(|offer| self.evaluate(offer)).collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score).then(a.slot.cmp(&b.slot)));
        scores
    }
}

fn default_priorities() -> HashMap<String, u32> {
    let table: [(&str, u32); 26] = [
        ("minecraft:mending", 100),
        ("minecraft:unbreaking", 90),
        ("minecraft:fortune", 95),
        ("minecraft:silk_touch", 90),
        ("minecraft:efficiency", 85),
        ("minecraft:sharpness", 85),
        ("minecraft:looting", 90),
        ("minecraft:protection", 85),
        ("minecraft:feather_falling", 70),
        ("minecraft:respiration", 65),
        ("minecraft:aqua_affinity", 65),
        ("minecraft:depth_strider", 70),
        ("minecraft:frost_walker", 60),
        ("minecraft:swift_sneak", 75),
        ("minecraft:soul_speed", 75),
        ("minecraft:fire_aspect", 60),
        ("minecraft:knockback", 50),
        ("minecraft:sweeping_edge", 55),
        ("minecraft:power", 70),
        ("minecraft:punch", 60),
        ("minecraft:flame", 65),
        ("minecraft:infinity", 80),
        ("minecraft:channeling", 70),
        ("minecraft:riptide", 70),
        ("minecraft:loyalty", 65),
        ("minecraft:impaling", 60),
    ];
    table
        .into_iter()
        .map(|(id, priority)| (id.to_string(), priority))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reroll_events::{ItemStack, OfferListing, Property, CURRENCY_ITEM};

    fn offer(slot: usize, item: &str, price: u32, properties: &[(&str, u8)]) -> CapturedOffer {
        let mut sell = ItemStack::new(item, 1);
        for (id, level) in properties {
            sell = sell.with_property(Property::new(*id, *level));
        }
        let listing = OfferListing::new(sell, ItemStack::new(CURRENCY_ITEM, price));
        CapturedOffer::from_listing(slot, &listing)
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(200), Grade::S);
        assert_eq!(Grade::from_score(199), Grade::A);
        assert_eq!(Grade::from_score(150), Grade::A);
        assert_eq!(Grade::from_score(100), Grade::B);
        assert_eq!(Grade::from_score(50), Grade::C);
        assert_eq!(Grade::from_score(49), Grade::D);
    }

    #[test]
    fn test_mending_book_scores_cost_and_max_level() {
        let evaluator = TradeEvaluator::new(&FilterConfig::default());
        // ceiling 20, cost 10 -> 100; mending 100*1 + max level 20 -> 120
        let score = evaluator.evaluate(&offer(1, "minecraft:enchanted_book", 10, &[("minecraft:mending", 1)]));

        assert_eq!(score.score, 220);
        assert_eq!(score.grade, Grade::S);
        assert!(score.reason.contains("Cost: 10 (+100)"));
        assert!(score.reason.contains("Properties (+120)"));
    }

    #[test]
    fn test_expensive_offer_gets_no_cost_score() {
        let evaluator = TradeEvaluator::new(&FilterConfig::default());
        let score = evaluator.evaluate(&offer(0, "minecraft:enchanted_book", 40, &[("mod:unknown", 1)]));

        assert_eq!(score.score, DEFAULT_PRIORITY);
        assert!(score.reason.contains("too expensive"));
        assert_eq!(score.grade, Grade::C);
    }

    #[test]
    fn test_slot_and_whitelist_bonuses() {
        let mut filters = FilterConfig::default();
        filters.preferred_first_slot_items = vec!["minecraft:bookshelf".to_string()];
        filters.item_whitelist = vec!["minecraft:bookshelf".to_string()];
        let evaluator = TradeEvaluator::new(&filters);

        let first = evaluator.evaluate(&offer(0, "minecraft:bookshelf", 16, &[]));
        let second = evaluator.evaluate(&offer(1, "minecraft:bookshelf", 16, &[]));

        // misc ceiling 16, cost 16 -> 0 cost score
        assert_eq!(first.score, FIRST_SLOT_BONUS + WHITELIST_BONUS);
        assert_eq!(second.score, WHITELIST_BONUS);
    }

    #[test]
    fn test_rank_orders_best_first() {
        let evaluator = TradeEvaluator::new(&FilterConfig::default());
        let offers = vec![
            offer(0, "minecraft:paper", 16, &[]),
            offer(1, "minecraft:enchanted_book", 5, &[("minecraft:unbreaking", 3)]),
            offer(2, "minecraft:enchanted_book", 15, &[("minecraft:knockback", 1)]),
        ];

        let ranked = evaluator.rank(&offers);
        let slots: Vec<usize> = ranked.iter().map(|score| score.slot).collect();

        assert_eq!(slots, vec![1, 2, 0]);
    }

    #[test]
    fn test_unknown_property_uses_default_priority() {
        let evaluator = TradeEvaluator::new(&FilterConfig::default());
        assert_eq!(evaluator.priority("mod:custom"), DEFAULT_PRIORITY);
        assert_eq!(evaluator.priority("minecraft:mending"), 100);
    }

    #[test]
    fn test_huge_ceiling_saturates() {
        let mut filters = FilterConfig::default();
        filters.ceilings.books = u32::MAX;
        let evaluator = TradeEvaluator::new(&filters);

        let score = evaluator.evaluate(&offer(0, "minecraft:enchanted_book", 1, &[("minecraft:mending", 1)]));

        assert_eq!(score.score, u32::MAX);
        assert_eq!(score.grade, Grade::S);
    }
}
