//! Offer types: what a negotiation view lists and what the engine captures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::ItemStack;

/// Item counted as the price currency.
pub const CURRENCY_ITEM: &str = "minecraft:emerald";

const BOOK_ITEM: &str = "minecraft:enchanted_book";

/// A bonus property carried by an offered item, e.g. an enchantment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub level: u8,
}

impl Property {
    pub fn new(id: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.level)
    }
}

/// Price category an offered item falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    #[default]
    Book,
    Tool,
    Armor,
    Misc,
}

impl ItemCategory {
    /// Classifies an item id.
    pub fn of(item_id: &str) -> ItemCategory {
        const TOOLS: [&str; 5] = ["_pickaxe", "_axe", "_shovel", "_hoe", "_sword"];
        const ARMOR: [&str; 4] = ["_helmet", "_chestplate", "_leggings", "_boots"];

        if item_id == BOOK_ITEM {
            ItemCategory::Book
        } else if TOOLS.iter().any(|suffix| item_id.contains(suffix)) {
            ItemCategory::Tool
        } else if ARMOR.iter().any(|suffix| item_id.contains(suffix)) {
            ItemCategory::Armor
        } else {
            ItemCategory::Misc
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Book => write!(f, "book"),
            ItemCategory::Tool => write!(f, "tool"),
            ItemCategory::Armor => write!(f, "armor"),
            ItemCategory::Misc => write!(f, "misc"),
        }
    }
}

/// One row of an open negotiation view, as the world exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferListing {
    pub sell: ItemStack,
    pub first_buy: ItemStack,
    #[serde(default)]
    pub second_buy: Option<ItemStack>,
}

impl OfferListing {
    pub fn new(sell: ItemStack, first_buy: ItemStack) -> Self {
        Self {
            sell,
            first_buy,
            second_buy: None,
        }
    }

    pub fn with_second_buy(mut self, stack: ItemStack) -> Self {
        self.second_buy = Some(stack);
        self
    }
}

/// One component of an offer's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceComponent {
    pub item_id: String,
    pub count: u32,
}

/// Immutable record of one offer, taken when a negotiation view is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOffer {
    pub slot: usize,
    pub item_id: String,
    pub price: Vec<PriceComponent>,
    pub properties: Vec<Property>,
}

impl CapturedOffer {
    pub fn from_listing(slot: usize, listing: &OfferListing) -> Self {
        let price = std::iter::once(&listing.first_buy)
            .chain(listing.second_buy.as_ref())
            .filter(|stack| stack.count > 0)
            .map(|stack| PriceComponent {
                item_id: stack.item_id.clone(),
                count: stack.count,
            })
            .collect();

        Self {
            slot,
            item_id: listing.sell.item_id.clone(),
            price,
            properties: listing.sell.properties.clone(),
        }
    }

    /// Sum of the currency components of the price.
    pub fn currency_cost(&self) -> u32 {
        self.price
            .iter()
            .filter(|component| component.item_id == CURRENCY_ITEM)
            .map(|component| component.count)
            .sum()
    }

    pub fn category(&self) -> ItemCategory {
        ItemCategory::of(&self.item_id)
    }

    /// Level of the given property, if carried.
    pub fn property_level(&self, id: &str) -> Option<u8> {
        self.properties
            .iter()
            .filter(|property| property.id == id)
            .map(|property| property.level)
            .max()
    }
}

impl fmt::Display for CapturedOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let properties: Vec<String> = self.properties.iter().map(ToString::to_string).collect();
        write!(
            f,
            "Offer[slot={}, item={}, cost={}, properties=[{}]]",
            self.slot,
            self.item_id,
            self.currency_cost(),
            properties.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_category_classification() {
        assert_eq!(ItemCategory::of("minecraft:enchanted_book"), ItemCategory::Book);
        assert_eq!(ItemCategory::of("minecraft:diamond_pickaxe"), ItemCategory::Tool);
        assert_eq!(ItemCategory::of("minecraft:iron_chestplate"), ItemCategory::Armor);
        assert_eq!(ItemCategory::of("minecraft:bookshelf"), ItemCategory::Misc);
    }

    #[test]
    fn test_currency_cost_sums_both_buy_slots() {
        let listing = OfferListing::new(
            ItemStack::new("minecraft:enchanted_book", 1),
            ItemStack::new(CURRENCY_ITEM, 12),
        )
        .with_second_buy(ItemStack::new("minecraft:book", 1));
        let offer = CapturedOffer::from_listing(0, &listing);

        assert_eq!(offer.price.len(), 2);
        assert_eq!(offer.currency_cost(), 12);

        let double = OfferListing::new(
            ItemStack::new("minecraft:iron_axe", 1),
            ItemStack::new(CURRENCY_ITEM, 3),
        )
        .with_second_buy(ItemStack::new(CURRENCY_ITEM, 4));
        assert_eq!(CapturedOffer::from_listing(1, &double).currency_cost(), 7);
    }

    #[test]
    fn test_property_level_takes_highest() {
        let listing = OfferListing::new(
            ItemStack::new("minecraft:enchanted_book", 1)
                .with_property(Property::new("minecraft:unbreaking", 2))
                .with_property(Property::new("minecraft:unbreaking", 3)),
            ItemStack::new(CURRENCY_ITEM, 10),
        );
        let offer = CapturedOffer::from_listing(0, &listing);

        assert_eq!(offer.property_level("minecraft:unbreaking"), Some(3));
        assert_eq!(offer.property_level("minecraft:mending"), None);
    }
}
