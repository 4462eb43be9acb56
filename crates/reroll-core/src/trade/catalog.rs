//! Known offer properties with display names and maximum levels.

/// One entry of the property catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub max_level: u8,
}

impl PropertyInfo {
    const fn new(id: &'static str, display_name: &'static str, max_level: u8) -> Self {
        Self {
            id,
            display_name,
            max_level,
        }
    }

    /// "Unbreaking III", or just "Mending" for single-level properties.
    pub fn display_string(&self, level: u8) -> String {
        if self.max_level == 1 {
            self.display_name.to_string()
        } else {
            format!("{} {}", self.display_name, roman(level))
        }
    }

    /// Filter key in `id:level` form.
    pub fn filter_string(&self, level: u8) -> String {
        format!("{}:{}", self.id, level)
    }
}

/// Every property a librarian-style target can offer.
pub const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::new("minecraft:mending", "Mending", 1),
    PropertyInfo::new("minecraft:unbreaking", "Unbreaking", 3),
    PropertyInfo::new("minecraft:protection", "Protection", 4),
    PropertyInfo::new("minecraft:fire_protection", "Fire Protection", 4),
    PropertyInfo::new("minecraft:blast_protection", "Blast Protection", 4),
    PropertyInfo::new("minecraft:projectile_protection", "Projectile Protection", 4),
    PropertyInfo::new("minecraft:feather_falling", "Feather Falling", 4),
    PropertyInfo::new("minecraft:thorns", "Thorns", 3),
    PropertyInfo::new("minecraft:respiration", "Respiration", 3),
    PropertyInfo::new("minecraft:aqua_affinity", "Aqua Affinity", 1),
    PropertyInfo::new("minecraft:depth_strider", "Depth Strider", 3),
    PropertyInfo::new("minecraft:frost_walker", "Frost Walker", 2),
    PropertyInfo::new("minecraft:sharpness", "Sharpness", 5),
    PropertyInfo::new("minecraft:smite", "Smite", 5),
    PropertyInfo::new("minecraft:bane_of_arthropods", "Bane of Arthropods", 5),
    PropertyInfo::new("minecraft:knockback", "Knockback", 2),
    PropertyInfo::new("minecraft:fire_aspect", "Fire Aspect", 2),
    PropertyInfo::new("minecraft:looting", "Looting", 3),
    PropertyInfo::new("minecraft:sweeping_edge", "Sweeping Edge", 3),
    PropertyInfo::new("minecraft:efficiency", "Efficiency", 5),
    PropertyInfo::new("minecraft:silk_touch", "Silk Touch", 1),
    PropertyInfo::new("minecraft:fortune", "Fortune", 3),
    PropertyInfo::new("minecraft:power", "Power", 5),
    PropertyInfo::new("minecraft:punch", "Punch", 2),
    PropertyInfo::new("minecraft:flame", "Flame", 1),
    PropertyInfo::new("minecraft:infinity", "Infinity", 1),
    PropertyInfo::new("minecraft:luck_of_the_sea", "Luck of the Sea", 3),
    PropertyInfo::new("minecraft:lure", "Lure", 3),
    PropertyInfo::new("minecraft:loyalty", "Loyalty", 3),
    PropertyInfo::new("minecraft:impaling", "Impaling", 5),
    PropertyInfo::new("minecraft:riptide", "Riptide", 3),
    PropertyInfo::new("minecraft:channeling", "Channeling", 1),
    PropertyInfo::new("minecraft:multishot", "Multishot", 1),
    PropertyInfo::new("minecraft:quick_charge", "Quick Charge", 3),
    PropertyInfo::new("minecraft:piercing", "Piercing", 4),
    PropertyInfo::new("minecraft:density", "Density", 5),
    PropertyInfo::new("minecraft:breach", "Breach", 4),
];

pub fn lookup(id: &str) -> Option<&'static PropertyInfo> {
    PROPERTIES.iter().find(|info| info.id == id)
}

pub fn max_level(id: &str) -> Option<u8> {
    lookup(id).map(|info| info.max_level)
}

/// Human-readable name for a property at a level, falling back to the raw id.
pub fn display_string(id: &str, level: u8) -> String {
    match lookup(id) {
        Some(info) => info.display_string(level),
        None => format!("{} {}", id, level),
    }
}

fn roman(level: u8) -> String {
    match level {
        1 => "I".to_string(),
        2 => "II".to_string(),
        3 => "III".to_string(),
        4 => "IV".to_string(),
        5 => "V".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(display_string("minecraft:mending", 1), "Mending");
        assert_eq!(display_string("minecraft:unbreaking", 3), "Unbreaking III");
        assert_eq!(display_string("minecraft:sharpness", 4), "Sharpness IV");
        assert_eq!(display_string("mod:custom", 2), "mod:custom 2");
    }

    #[test]
    fn test_levels_beyond_five_are_numeric() {
        let info = lookup("minecraft:efficiency").unwrap();
        assert_eq!(info.display_string(7), "Efficiency 7");
    }

    #[test]
    fn test_max_levels() {
        assert_eq!(max_level("minecraft:mending"), Some(1));
        assert_eq!(max_level("minecraft:protection"), Some(4));
        assert_eq!(max_level("minecraft:unknown"), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = PROPERTIES.iter().map(|info| info.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), PROPERTIES.len());
    }
}
