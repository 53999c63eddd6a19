pub mod labels;
pub mod quote;
pub mod resolver;
pub mod session;

pub use crate::domain::model::{AvailabilityRequest, AvailabilityState, Slot, SlotGroup};
pub use crate::domain::ports::{Clock, ConfigProvider, SlotStore};
pub use crate::utils::error::{ResolutionError, Result};
