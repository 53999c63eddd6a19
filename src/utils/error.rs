use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Slot store responded with status {status}: {body}")]
    StoreStatusError { status: u16, body: String },

    #[error("Invalid slot date '{value}': {reason}")]
    InvalidDateError { value: String, reason: String },

    #[error("Invalid slot time '{value}': {reason}")]
    InvalidTimeError { value: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid guest count {guests}: {reason}")]
    InvalidGuestCountError { guests: u32, reason: String },

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmountError { field: String, value: f64 },
}

impl AvailabilityError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AvailabilityError::HttpError(_) | AvailabilityError::StoreStatusError { .. } => {
                "Couldn't load availability from the slot store".to_string()
            }
            AvailabilityError::IoError(e) => format!("Couldn't read a local file: {}", e),
            AvailabilityError::SerializationError(_) => {
                "The slot data could not be understood".to_string()
            }
            AvailabilityError::InvalidDateError { value, .. } => {
                format!("'{}' is not a valid YYYY-MM-DD date", value)
            }
            AvailabilityError::InvalidTimeError { value, .. } => {
                format!("'{}' is not a valid HH:MM[:SS] time", value)
            }
            AvailabilityError::ConfigError { message } => format!("Configuration problem: {}", message),
            AvailabilityError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            AvailabilityError::InvalidGuestCountError { guests, reason } => {
                format!("Cannot book for {} guest(s): {}", guests, reason)
            }
            AvailabilityError::InvalidAmountError { field, value } => {
                format!("'{}' is not a usable price for {}", value, field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AvailabilityError::HttpError(_) => "Check network connectivity and the store URL, then try again",
            AvailabilityError::StoreStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API key is valid for this project"
            }
            AvailabilityError::StoreStatusError { .. } => "Check the table name and try again later",
            AvailabilityError::IoError(_) => "Make sure the file exists and is readable",
            AvailabilityError::SerializationError(_) => {
                "Make sure slot rows follow the availability_slots schema"
            }
            AvailabilityError::InvalidDateError { .. } | AvailabilityError::InvalidTimeError { .. } => {
                "Fix the offending slot row in the store"
            }
            AvailabilityError::ConfigError { .. } | AvailabilityError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML config file"
            }
            AvailabilityError::InvalidGuestCountError { .. } => "Pick fewer guests or another slot",
            AvailabilityError::InvalidAmountError { .. } => {
                "Prices must be finite and not negative; check the experience listing"
            }
        }
    }
}

/// Failure of a single availability resolution.
///
/// Only a failed store fetch is an error. An activity with no qualifying
/// slots resolves to an empty list.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Failed to load availability: {source}")]
    FetchFailed {
        #[source]
        source: AvailabilityError,
    },
}

impl ResolutionError {
    /// Message suitable for an inline error state.
    pub fn display_message(&self) -> String {
        match self {
            ResolutionError::FetchFailed { source } => source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
