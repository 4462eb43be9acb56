//! Acceptance decisions against the configured criteria.

use reroll_events::CapturedOffer;

use crate::config::AcceptanceCriteria;

/// Decides whether captured offers satisfy the acceptance criteria.
pub struct TradeJudge;

impl TradeJudge {
    /// True iff the offer is of the accepted category, costs no more than that
    /// category's ceiling, and carries the target property at or above the
    /// minimum level.
    pub fn matches(offer: &CapturedOffer, criteria: &AcceptanceCriteria) -> bool {
        let category = offer.category();
        if category != criteria.accepted_category {
            return false;
        }

        if offer.currency_cost() > criteria.ceilings.for_category(category) {
            return false;
        }

        offer
            .properties
            .iter()
            .any(|property| {
                property.id == criteria.target_property && property.level >= criteria.min_level
            })
    }

    /// The matching offers, in capture order.
    pub fn filter<'a>(
        offers: &'a [CapturedOffer],
        criteria: &AcceptanceCriteria,
    ) -> Vec<&'a CapturedOffer> {
        let matched: Vec<&CapturedOffer> = offers
            .iter()
            .filter(|offer| Self::matches(offer, criteria))
            .collect();

        tracing::info!(
            "Filter result: {} matching offers from {} total (target {} >= {})",
            matched.len(),
            offers.len(),
            criteria.target_property,
            criteria.min_level
        );
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reroll_events::{ItemCategory, ItemStack, OfferListing, Property, CURRENCY_ITEM};

    fn book(property: &str, level: u8, price: u32) -> CapturedOffer {
        let listing = OfferListing::new(
            ItemStack::new("minecraft:enchanted_book", 1).with_property(Property::new(property, level)),
            ItemStack::new(CURRENCY_ITEM, price),
        )
        .with_second_buy(ItemStack::new("minecraft:book", 1));
        CapturedOffer::from_listing(0, &listing)
    }

    fn criteria(property: &str, min_level: u8, ceiling: u32) -> AcceptanceCriteria {
        let mut criteria = AcceptanceCriteria::default();
        criteria.target_property = property.to_string();
        criteria.min_level = min_level;
        criteria.ceilings.books = ceiling;
        criteria
    }

    #[test]
    fn test_match_at_level_and_under_ceiling() {
        let offer = book("minecraft:protection", 3, 8);
        assert!(TradeJudge::matches(&offer, &criteria("minecraft:protection", 3, 10)));
    }

    #[test]
    fn test_price_equal_to_ceiling_matches() {
        let offer = book("minecraft:mending", 1, 10);
        assert!(TradeJudge::matches(&offer, &criteria("minecraft:mending", 1, 10)));
    }

    #[test]
    fn test_price_above_ceiling_rejected() {
        let offer = book("minecraft:mending", 1, 11);
        assert!(!TradeJudge::matches(&offer, &criteria("minecraft:mending", 1, 10)));
    }

    #[test]
    fn test_level_below_minimum_rejected() {
        let offer = book("minecraft:protection", 2, 5);
        assert!(!TradeJudge::matches(&offer, &criteria("minecraft:protection", 3, 10)));
    }

    #[test]
    fn test_other_property_rejected() {
        let offer = book("minecraft:unbreaking", 3, 5);
        assert!(!TradeJudge::matches(&offer, &criteria("minecraft:mending", 1, 64)));
    }

    #[test]
    fn test_wrong_category_rejected() {
        let listing = OfferListing::new(
            ItemStack::new("minecraft:diamond_axe", 1).with_property(Property::new("minecraft:mending", 1)),
            ItemStack::new(CURRENCY_ITEM, 5),
        );
        let offer = CapturedOffer::from_listing(0, &listing);
        let criteria = criteria("minecraft:mending", 1, 64);

        assert_eq!(offer.category(), ItemCategory::Tool);
        assert!(!TradeJudge::matches(&offer, &criteria));
    }

    #[test]
    fn test_tool_category_uses_tool_ceiling() {
        let listing = OfferListing::new(
            ItemStack::new("minecraft:diamond_axe", 1).with_property(Property::new("minecraft:efficiency", 4)),
            ItemStack::new(CURRENCY_ITEM, 30),
        );
        let offer = CapturedOffer::from_listing(0, &listing);
        let mut criteria = criteria("minecraft:efficiency", 3, 5);
        criteria.accepted_category = ItemCategory::Tool;
        criteria.ceilings.tools = 32;

        assert!(TradeJudge::matches(&offer, &criteria));
    }

    #[test]
    fn test_filter_keeps_capture_order() {
        let offers = vec![
            book("minecraft:mending", 1, 30),
            book("minecraft:mending", 1, 9),
            book("minecraft:unbreaking", 3, 9),
            book("minecraft:mending", 1, 12),
        ];
        let criteria = criteria("minecraft:mending", 1, 15);

        let matched = TradeJudge::filter(&offers, &criteria);
        let prices: Vec<u32> = matched.iter().map(|offer| offer.currency_cost()).collect();

        assert_eq!(prices, vec![9, 12]);
    }
}
