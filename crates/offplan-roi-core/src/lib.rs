pub mod error;
pub mod time_value;
pub mod types;

pub mod inputs;
pub mod validation;

pub mod schedule;
pub mod appreciation;
pub mod costs;
pub mod payment_plan;
pub mod projection;
pub mod exit;
pub mod mortgage;
pub mod quote;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::RoiError;
pub use types::*;

/// Standard result type for all off-plan ROI operations
pub type RoiResult<T> = Result<T, RoiError>;
