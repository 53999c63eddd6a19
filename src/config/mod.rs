pub mod toml_config;

use crate::adapters::supabase::DEFAULT_TABLE;
use crate::core::ConfigProvider;
use crate::utils::error::{AvailabilityError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDateTime;
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Look-ahead of the experience detail view.
pub const DEFAULT_DAYS_AHEAD: u32 = 14;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;
/// One year.
pub const MAX_MIN_LEAD_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "availability-resolver"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Resolve the bookable slots of an experience, grouped by date")
)]
pub struct CliConfig {
    /// Experience whose slots should be resolved
    #[cfg_attr(feature = "cli", arg(long, default_value = ""))]
    pub activity_id: String,

    /// TOML configuration file; flags below override its values
    #[cfg_attr(feature = "cli", arg(long))]
    pub config: Option<String>,

    /// Supabase project URL
    #[cfg_attr(feature = "cli", arg(long))]
    pub store_url: Option<String>,

    /// Supabase API key
    #[cfg_attr(feature = "cli", arg(long))]
    pub api_key: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub table: Option<String>,

    /// Read slots from a local JSON file instead of Supabase
    #[cfg_attr(feature = "cli", arg(long, conflicts_with = "store_url"))]
    pub slots_file: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub days_ahead: Option<u32>,

    /// Extra minimum gap between now and a slot start
    #[cfg_attr(feature = "cli", arg(long))]
    pub min_lead_minutes: Option<i64>,

    /// Evaluate "now" at this UTC offset instead of the host's local time
    #[cfg_attr(feature = "cli", arg(long, allow_hyphen_values = true))]
    pub venue_utc_offset_minutes: Option<i32>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub timeout_seconds: Option<u64>,

    /// Pretend the venue-local time is this (e.g. 2026-02-18T12:00:00)
    #[cfg_attr(feature = "cli", arg(long))]
    pub now: Option<String>,

    /// Print only the first N upcoming slots
    #[cfg_attr(feature = "cli", arg(long))]
    pub preview: Option<usize>,

    /// Print the availability state as JSON
    #[cfg_attr(feature = "cli", arg(long))]
    pub json: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,
}

impl CliConfig {
    pub fn fixed_now(&self) -> Result<Option<NaiveDateTime>> {
        self.now
            .as_deref()
            .map(|raw| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                    .map_err(|e| AvailabilityError::InvalidConfigValueError {
                        field: "now".to_string(),
                        value: raw.to_string(),
                        reason: format!("expected YYYY-MM-DDTHH:MM[:SS] ({})", e),
                    })
            })
            .transpose()
    }
}

impl ConfigProvider for CliConfig {
    fn store_url(&self) -> Option<&str> {
        self.store_url.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn days_ahead(&self) -> u32 {
        self.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD)
    }

    fn min_lead_minutes(&self) -> i64 {
        self.min_lead_minutes.unwrap_or(0)
    }

    fn venue_utc_offset_minutes(&self) -> Option<i32> {
        self.venue_utc_offset_minutes
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.store_url {
            validation::validate_url("store_url", url)?;
        }
        if let Some(path) = &self.slots_file {
            validation::validate_non_empty_string("slots_file", path)?;
        }
        if self.config.is_none() && self.slots_file.is_none() && self.store_url.is_none() {
            return Err(AvailabilityError::ConfigError {
                message: "one of --config, --store-url or --slots-file is required".to_string(),
            });
        }
        if self.store_url.is_some() && self.api_key.is_none() {
            return Err(AvailabilityError::ConfigError {
                message: "--api-key is required together with --store-url".to_string(),
            });
        }

        validation::validate_table_name("table", self.table())?;
        validation::validate_positive_number("days_ahead", u64::from(self.days_ahead()), 1)?;
        validation::validate_positive_number("timeout_seconds", self.request_timeout_seconds(), 1)?;
        validation::validate_range(
            "min_lead_minutes",
            self.min_lead_minutes(),
            0,
            MAX_MIN_LEAD_MINUTES,
        )?;
        if let Some(offset) = self.venue_utc_offset_minutes {
            validation::validate_range(
                "venue_utc_offset_minutes",
                offset,
                -MAX_UTC_OFFSET_MINUTES,
                MAX_UTC_OFFSET_MINUTES,
            )?;
        }
        self.fixed_now()?;
        Ok(())
    }
}
