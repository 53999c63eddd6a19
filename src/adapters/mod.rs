// Adapters layer: concrete slot stores and clocks behind the domain ports.

pub mod clock;
pub mod memory;
pub mod supabase;

pub use clock::{FixedClock, SystemClock, VenueClock};
pub use memory::InMemorySlotStore;
pub use supabase::SupabaseSlotStore;
