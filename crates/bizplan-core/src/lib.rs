pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "forecast")]
pub mod forecast;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "ratios")]
pub mod ratios;

#[cfg(feature = "planning")]
pub mod planning;

pub use error::BizplanError;
pub use types::*;

/// Standard result type for all bizplan operations
pub type BizplanResult<T> = Result<T, BizplanError>;
