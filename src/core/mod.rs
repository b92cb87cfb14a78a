//! Core business logic abstractions

pub mod config;
pub mod fund;
pub mod log;
pub mod period;

// Re-export main types for cleaner imports
pub use fund::{FilteredResponse, FundMetadata, FundProvider, FundRecord, NavPoint};
pub use period::{DateRange, PeriodError};
