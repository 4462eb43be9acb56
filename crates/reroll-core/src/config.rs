//! Configuration loading for the reroll engine.
//!
//! All engine settings are loaded from a TOML configuration file. The engine
//! reads a [`ConfigSource`] once per run and freezes the result until the run
//! ends.

use reroll_events::ItemCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RerollConfig {
    /// Enablement, mode and pacing
    #[serde(default)]
    pub general: GeneralConfig,
    /// Offer acceptance and scoring
    #[serde(default)]
    pub filters: FilterConfig,
    /// Pause conditions and loss budgets
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Search and interaction distances
    #[serde(default)]
    pub reach: ReachConfig,
    /// Timeouts, settle windows and retry limits
    #[serde(default)]
    pub timings: Timings,
}

impl RerollConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The read-only acceptance criteria derived from the filter section.
    pub fn criteria(&self) -> AcceptanceCriteria {
        AcceptanceCriteria {
            accepted_category: self.filters.accepted_category,
            ceilings: self.filters.ceilings.clone(),
            target_property: self.filters.target_property.clone(),
            min_level: self.filters.min_level,
        }
    }
}

/// How much the engine may do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Highlight only; automatic runs are refused.
    Manual,
    /// Break the workstation, then hand back to the user.
    SemiAuto,
    /// Complete automation.
    #[default]
    FullAuto,
}

/// Where the notification collaborator should display messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStyle {
    Chat,
    #[default]
    ActionBar,
    Overlay,
}

/// General engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch
    pub enabled: bool,
    /// Operation mode
    pub mode: OperationMode,
    /// Break/replace cycles allowed per run
    pub max_attempts: u32,
    /// Minimum delay between attempts
    pub reroll_delay_ms: u64,
    /// Attach sound cues to notifications
    pub sound_notifications: bool,
    /// Display channel hint for notifications
    pub notification_style: NotificationStyle,
    /// Leave the negotiation view open for the user when an offer matches
    pub reveal_view_only_on_match: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: OperationMode::FullAuto,
            max_attempts: 100,
            reroll_delay_ms: 500,
            sound_notifications: true,
            notification_style: NotificationStyle::ActionBar,
            reveal_view_only_on_match: false,
        }
    }
}

/// Maximum acceptable price per item category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceCeilings {
    pub books: u32,
    pub tools: u32,
    pub armor: u32,
    pub misc: u32,
}

impl Default for PriceCeilings {
    fn default() -> Self {
        Self {
            books: 20,
            tools: 32,
            armor: 32,
            misc: 16,
        }
    }
}

impl PriceCeilings {
    pub fn for_category(&self, category: ItemCategory) -> u32 {
        match category {
            ItemCategory::Book => self.books,
            ItemCategory::Tool => self.tools,
            ItemCategory::Armor => self.armor,
            ItemCategory::Misc => self.misc,
        }
    }
}

/// Offer filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Only offers of this category can match
    pub accepted_category: ItemCategory,
    /// Property id the offer must carry
    pub target_property: String,
    /// Minimum level of the target property
    pub min_level: u8,
    /// Items that earn a bonus when offered in the first slot
    pub preferred_first_slot_items: Vec<String>,
    /// Items that always earn a bonus
    pub item_whitelist: Vec<String>,
    /// Price ceilings per category
    pub ceilings: PriceCeilings,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            accepted_category: ItemCategory::Book,
            target_property: "minecraft:mending".to_string(),
            min_level: 1,
            preferred_first_slot_items: Vec::new(),
            item_whitelist: Vec::new(),
            ceilings: PriceCeilings::default(),
        }
    }
}

/// Safety settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Stop before breaking when the inventory has no free slot
    pub pause_if_inventory_full: bool,
    /// How often the target may drop its claim between claiming and opening
    pub max_claim_losses: u32,
    /// Views that may open without listing offers before the run gives up
    pub max_empty_views: u32,
    /// Times a vanished negotiation view is reopened before the run gives up
    pub max_view_reopens: u32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            pause_if_inventory_full: true,
            max_claim_losses: 3,
            max_empty_views: 3,
            max_view_reopens: 3,
        }
    }
}

/// Reach and search distances, in blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachConfig {
    /// Maximum distance to the target when opening negotiation
    pub interaction: f64,
    /// Initial radius of the placement search around the target
    pub placement_search: i32,
    /// Horizontal radius of the job-site search around the target
    pub job_site_search: i32,
    /// Vertical half-height of the job-site search
    pub job_site_search_height: i32,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            interaction: 4.5,
            placement_search: 3,
            job_site_search: 8,
            job_site_search_height: 3,
        }
    }
}

/// Timeouts, settle windows and retry limits of the run state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub initial_placement_tries: u32,
    pub initial_settle_ms: u64,
    pub break_timeout_ms: u64,
    pub drop_settle_ms: u64,
    pub pickup_timeout_ms: u64,
    pub pickup_notice_ms: u64,
    pub place_settle_ms: u64,
    pub place_verify_window_ms: u64,
    pub place_verify_retries: u32,
    pub max_place_failures: u32,
    pub place_backoff_ms: u64,
    pub claim_settle_ms: u64,
    pub claim_timeout_ms: u64,
    pub open_timeout_ms: u64,
    pub view_populate_wait_ms: u64,
    pub view_reopen_ms: u64,
    pub offers_timeout_ms: u64,
    pub close_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_placement_tries: 5,
            initial_settle_ms: 1_000,
            break_timeout_ms: 10_000,
            drop_settle_ms: 500,
            pickup_timeout_ms: 20_000,
            pickup_notice_ms: 3_000,
            place_settle_ms: 500,
            place_verify_window_ms: 3_000,
            place_verify_retries: 3,
            max_place_failures: 50,
            place_backoff_ms: 100,
            claim_settle_ms: 2_000,
            claim_timeout_ms: 8_000,
            open_timeout_ms: 5_000,
            view_populate_wait_ms: 200,
            view_reopen_ms: 1_500,
            offers_timeout_ms: 3_000,
            close_delay_ms: 400,
        }
    }
}

/// Acceptance criteria handed to the judge. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriteria {
    pub accepted_category: ItemCategory,
    pub ceilings: PriceCeilings,
    pub target_property: String,
    pub min_level: u8,
}

impl Default for AcceptanceCriteria {
    fn default() -> Self {
        RerollConfig::default().criteria()
    }
}

/// Supplies configuration to the engine at the start of each run.
pub trait ConfigSource {
    fn load(&self) -> RerollConfig;
}

impl ConfigSource for RerollConfig {
    fn load(&self) -> RerollConfig {
        self.clone()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Error serializing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Trade Reroller Configuration

[general]
enabled = true
mode = "full_auto"
max_attempts = 100
reroll_delay_ms = 500
sound_notifications = true
notification_style = "action_bar"
reveal_view_only_on_match = false

[filters]
accepted_category = "book"
target_property = "minecraft:mending"
min_level = 1
preferred_first_slot_items = []
item_whitelist = []

[filters.ceilings]
books = 20
tools = 32
armor = 32
misc = 16

[safety]
pause_if_inventory_full = true
max_claim_losses = 3
max_empty_views = 3
max_view_reopens = 3

[reach]
interaction = 4.5
placement_search = 3
job_site_search = 8
job_site_search_height = 3

[timings]
initial_placement_tries = 5
initial_settle_ms = 1000
break_timeout_ms = 10000
drop_settle_ms = 500
pickup_timeout_ms = 20000
pickup_notice_ms = 3000
place_settle_ms = 500
place_verify_window_ms = 3000
place_verify_retries = 3
max_place_failures = 50
place_backoff_ms = 100
claim_settle_ms = 2000
claim_timeout_ms = 8000
open_timeout_ms = 5000
view_populate_wait_ms = 200
view_reopen_ms = 1500
offers_timeout_ms = 3000
close_delay_ms = 400
"#
    .to_string()
}
