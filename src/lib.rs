pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FixedClock, InMemorySlotStore, SupabaseSlotStore, SystemClock, VenueClock};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{
    labels::{date_label, format_slot_time, preview_slots},
    quote::{BookingQuote, QuoteOptions},
    resolver::AvailabilityResolver,
    session::{AvailabilitySession, LoadOutcome},
};
pub use domain::model::{
    parse_slot_date, parse_slot_time, AvailabilityRequest, AvailabilityState, ResolutionWindow,
    Slot, SlotGroup, SlotPreview,
};
pub use domain::ports::{Clock, ConfigProvider, SlotStore};
pub use utils::error::{AvailabilityError, ResolutionError, Result};
