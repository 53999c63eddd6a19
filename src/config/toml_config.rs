use crate::adapters::supabase::DEFAULT_TABLE;
use crate::config::{
    DEFAULT_DAYS_AHEAD, DEFAULT_TIMEOUT_SECONDS, MAX_MIN_LEAD_MINUTES, MAX_UTC_OFFSET_MINUTES,
};
use crate::core::ConfigProvider;
use crate::utils::error::{AvailabilityError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    pub resolution: Option<ResolutionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub days_ahead: Option<u32>,
    pub min_lead_minutes: Option<i64>,
    pub venue_utc_offset_minutes: Option<i32>,
    pub preview_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AvailabilityError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse the configuration from a TOML string, after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AvailabilityError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${API_KEY}` style references with environment values.
    /// Unset variables are left untouched so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AvailabilityError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("store.url", &self.store.url)?;
        validation::validate_non_empty_string("store.api_key", &self.store.api_key)?;
        if self.store.api_key.starts_with("${") {
            return Err(AvailabilityError::InvalidConfigValueError {
                field: "store.api_key".to_string(),
                value: self.store.api_key.clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }
        validation::validate_table_name("store.table", self.table())?;
        validation::validate_positive_number("store.timeout_seconds", self.request_timeout_seconds(), 1)?;

        validation::validate_positive_number(
            "resolution.days_ahead",
            u64::from(self.days_ahead()),
            1,
        )?;
        validation::validate_range(
            "resolution.min_lead_minutes",
            self.min_lead_minutes(),
            0,
            MAX_MIN_LEAD_MINUTES,
        )?;
        if let Some(offset) = self.venue_utc_offset_minutes() {
            validation::validate_range(
                "resolution.venue_utc_offset_minutes",
                offset,
                -MAX_UTC_OFFSET_MINUTES,
                MAX_UTC_OFFSET_MINUTES,
            )?;
        }

        Ok(())
    }

    pub fn preview_limit(&self) -> Option<usize> {
        self.resolution.as_ref().and_then(|r| r.preview_limit)
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    fn resolution_section(&self) -> Option<&ResolutionConfig> {
        self.resolution.as_ref()
    }
}

impl ConfigProvider for TomlConfig {
    fn store_url(&self) -> Option<&str> {
        Some(&self.store.url)
    }

    fn api_key(&self) -> Option<&str> {
        Some(&self.store.api_key)
    }

    fn table(&self) -> &str {
        self.store.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.store.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn days_ahead(&self) -> u32 {
        self.resolution_section()
            .and_then(|r| r.days_ahead)
            .unwrap_or(DEFAULT_DAYS_AHEAD)
    }

    fn min_lead_minutes(&self) -> i64 {
        self.resolution_section().and_then(|r| r.min_lead_minutes).unwrap_or(0)
    }

    fn venue_utc_offset_minutes(&self) -> Option<i32> {
        self.resolution_section().and_then(|r| r.venue_utc_offset_minutes)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
