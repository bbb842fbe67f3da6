pub mod hold;
pub mod yearly;

pub use hold::{hold_analysis, HoldAnalysis};
pub use yearly::{annual_service_charge, full_year_rent, project, RentBreakdown, YearlyProjection};
