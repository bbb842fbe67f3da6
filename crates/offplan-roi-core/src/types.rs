use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::RoiResult;

/// All monetary values, in the property's base currency.
pub type Money = Decimal;

/// Percentages as whole numbers (7 = 7%). Every user-facing rate uses this.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Internal periodic rates only.
pub type Rate = Decimal;

/// Currency code of the quote. Amounts are never converted inside the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    AED,
    USD,
    EUR,
    GBP,
    Other(String),
}

/// A calendar month, the granularity every schedule in this crate works at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> RoiResult<Self> {
        let ym = YearMonth { year, month };
        ym.validate()?;
        Ok(ym)
    }

    pub fn validate(&self) -> RoiResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(RoiError::DateError(format!(
                "month {} of year {} is outside 1..=12",
                self.month, self.year
            )));
        }
        Ok(())
    }

    /// First day of the month.
    pub fn to_date(&self) -> RoiResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            RoiError::DateError(format!("{}-{:02} is not a valid date", self.year, self.month))
        })
    }

    /// Signed number of whole months from `self` to `later`.
    pub fn months_until(&self, later: &YearMonth) -> i64 {
        (later.year as i64 - self.year as i64) * 12 + (later.month as i64 - self.month as i64)
    }

    pub fn add_months(&self, months: u32) -> RoiResult<YearMonth> {
        let date = self
            .to_date()?
            .checked_add_months(Months::new(months))
            .ok_or_else(|| {
                RoiError::DateError(format!(
                    "adding {months} months to {}-{:02} overflows",
                    self.year, self.month
                ))
            })?;
        Ok(YearMonth {
            year: date.year(),
            month: date.month(),
        })
    }

    /// "Q3 2027"
    pub fn quarter_label(&self) -> String {
        format!("Q{} {}", (self.month.max(1) - 1) / 3 + 1, self.year)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
