use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::schedule;
use crate::types::{Currency, Money, Percent, YearMonth};
use crate::RoiResult;

pub const DEFAULT_PROJECTION_YEARS: u32 = 10;
/// Longest projection horizon accepted.
pub const MAX_PROJECTION_YEARS: u32 = 50;
/// Latest month (from booking) for handover or an exit.
pub const MAX_HOLD_MONTHS: u32 = MAX_PROJECTION_YEARS * 12;
pub const DEFAULT_DLD_FEE_PERCENT: Decimal = dec!(4);

// ---------------------------------------------------------------------------
// Payment plan inputs
// ---------------------------------------------------------------------------

/// How a milestone's `trigger_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Month offset from booking
    Time,
    /// Percent of construction completed (0..=100)
    Construction,
}

/// An installment due during construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMilestone {
    pub id: String,
    pub trigger: TriggerKind,
    pub trigger_value: Decimal,
    pub payment_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Developer-financed balance paid in equal monthly installments after handover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostHandoverPlan {
    pub percent: Percent,
    /// Number of monthly installments, starting the month after handover
    pub duration_months: u32,
}

// ---------------------------------------------------------------------------
// Appreciation inputs
// ---------------------------------------------------------------------------

/// Growth assumption once the property is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PostHandoverGrowth {
    /// One annual rate for every post-handover year
    Flat { rate: Percent },
    /// `growth_rate` for the first `growth_period_years`, then `mature_rate`
    Phased {
        growth_rate: Percent,
        growth_period_years: u32,
        mature_rate: Percent,
    },
}

impl Default for PostHandoverGrowth {
    fn default() -> Self {
        PostHandoverGrowth::Flat { rate: Decimal::ZERO }
    }
}

/// Piecewise annual appreciation schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppreciationProfile {
    /// Flat annual rate during construction
    #[serde(default)]
    pub construction_rate: Percent,
    /// Per-construction-year overrides; index 0 is the first year after booking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_schedule: Option<Vec<Percent>>,
    #[serde(default)]
    pub post_handover: PostHandoverGrowth,
}

// ---------------------------------------------------------------------------
// Transaction costs
// ---------------------------------------------------------------------------

fn default_dld_fee_percent() -> Percent {
    DEFAULT_DLD_FEE_PERCENT
}

/// One-time fees charged at acquisition and at resale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCosts {
    /// Land department transfer fee on the purchase price
    #[serde(default = "default_dld_fee_percent")]
    pub dld_fee_percent: Percent,
    /// Off-plan registration fee (flat amount)
    #[serde(default)]
    pub oqood_fee: Money,
    #[serde(default)]
    pub entry_agent_commission_percent: Percent,
    #[serde(default)]
    pub exit_agent_commission_enabled: bool,
    /// Developer NOC fee charged on resale (flat amount)
    #[serde(default)]
    pub exit_noc_fee: Money,
}

impl Default for TransactionCosts {
    fn default() -> Self {
        TransactionCosts {
            dld_fee_percent: DEFAULT_DLD_FEE_PERCENT,
            oqood_fee: Decimal::ZERO,
            entry_agent_commission_percent: Decimal::ZERO,
            exit_agent_commission_enabled: false,
            exit_noc_fee: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Investment input
// ---------------------------------------------------------------------------

/// Everything that describes one investment quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    #[serde(default)]
    pub currency: Currency,
    pub base_price: Money,
    pub booking: YearMonth,
    pub handover: YearMonth,
    pub downpayment_percent: Percent,
    /// Declared cumulative percent paid through handover (downpayment included)
    pub pre_handover_percent: Percent,
    /// Derived as the unallocated remainder when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_handover_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_handover: Option<PostHandoverPlan>,
    #[serde(default)]
    pub additional_payments: Vec<PaymentMilestone>,
    #[serde(default)]
    pub appreciation: AppreciationProfile,
    #[serde(default)]
    pub rental_yield_percent: Percent,
    #[serde(default)]
    pub rent_growth_rate: Percent,
    #[serde(default)]
    pub service_charge_per_sqft: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_size_sqft: Option<Decimal>,
    #[serde(default)]
    pub costs: TransactionCosts,
    /// Percent of price that must be paid before a resale is allowed
    #[serde(default)]
    pub minimum_exit_threshold: Percent,
    #[serde(default)]
    pub resell_eligible_percent: Percent,
    #[serde(default)]
    pub mortgage_eligible_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_years: Option<u32>,
}

impl InvestmentInput {
    /// Hard checks only: a quote without a price or with an impossible
    /// calendar month cannot be projected at all.
    pub fn validate(&self) -> RoiResult<()> {
        if self.base_price <= Decimal::ZERO {
            return Err(RoiError::InvalidInput {
                field: "base_price".into(),
                reason: "Base price must be positive".into(),
            });
        }
        self.booking.validate()?;
        self.handover.validate()?;
        if self.horizon_years() > MAX_PROJECTION_YEARS {
            return Err(RoiError::InvalidInput {
                field: "projection_years".into(),
                reason: format!("Projection is limited to {MAX_PROJECTION_YEARS} years"),
            });
        }
        if self.booking.months_until(&self.handover) > i64::from(MAX_HOLD_MONTHS) {
            return Err(RoiError::InvalidInput {
                field: "handover".into(),
                reason: format!("Handover must fall within {MAX_HOLD_MONTHS} months of booking"),
            });
        }
        Ok(())
    }

    pub fn construction_months(&self) -> u32 {
        schedule::construction_months(&self.booking, &self.handover)
    }

    pub fn horizon_years(&self) -> u32 {
        self.projection_years.unwrap_or(DEFAULT_PROJECTION_YEARS)
    }

    /// Unit size when one is set and positive.
    pub fn unit_size(&self) -> Option<Decimal> {
        self.unit_size_sqft.filter(|s| *s > Decimal::ZERO)
    }

    pub fn post_handover_percent(&self) -> Percent {
        self.post_handover
            .as_ref()
            .map(|p| p.percent)
            .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Mortgage and exit parameters
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Bank financing terms applied at handover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Loan-to-value in percent
    pub financing_percent: Percent,
    /// Annual interest rate in percent
    pub interest_rate: Percent,
    pub loan_term_years: u32,
    #[serde(default)]
    pub processing_fee_percent: Percent,
    #[serde(default)]
    pub valuation_fee: Money,
    #[serde(default)]
    pub mortgage_registration_percent: Percent,
    /// Annual premium as a percent of the loan amount
    #[serde(default)]
    pub life_insurance_percent: Percent,
    /// Annual premium (flat amount)
    #[serde(default)]
    pub property_insurance: Money,
}

/// Candidate resale points, in months after booking. Always sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct ExitScenarioSet {
    months: Vec<u32>,
}

impl ExitScenarioSet {
    pub fn new(months: impl IntoIterator<Item = u32>) -> Self {
        let mut months: Vec<u32> = months.into_iter().collect();
        months.sort_unstable();
        months.dedup();
        ExitScenarioSet { months }
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl From<Vec<u32>> for ExitScenarioSet {
    fn from(months: Vec<u32>) -> Self {
        ExitScenarioSet::new(months)
    }
}

impl From<ExitScenarioSet> for Vec<u32> {
    fn from(set: ExitScenarioSet) -> Self {
        set.months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_set_sorted_and_unique() {
        let set = ExitScenarioSet::new(vec![36, 12, 36, 24]);
        assert_eq!(set.months(), &[12, 24, 36]);
    }

    #[test]
    fn test_exit_set_deserializes_from_list() {
        let set: ExitScenarioSet = serde_json::from_str("[60, 24, 24]").unwrap();
        assert_eq!(set.months(), &[24, 60]);
    }

    #[test]
    fn test_minimal_input_uses_defaults() {
        let input: InvestmentInput = serde_json::from_value(serde_json::json!({
            "base_price": 1000000,
            "booking": {"year": 2025, "month": 1},
            "handover": {"year": 2027, "month": 1},
            "downpayment_percent": 20,
            "pre_handover_percent": 50
        }))
        .unwrap();
        assert_eq!(input.costs.dld_fee_percent, dec!(4));
        assert_eq!(input.currency, Currency::AED);
        assert_eq!(input.horizon_years(), 10);
        assert_eq!(input.construction_months(), 24);
        assert!(input.unit_size().is_none());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut input: InvestmentInput = serde_json::from_value(serde_json::json!({
            "base_price": 1,
            "booking": {"year": 2025, "month": 1},
            "handover": {"year": 2027, "month": 1},
            "downpayment_percent": 20,
            "pre_handover_percent": 50
        }))
        .unwrap();
        input.base_price = Decimal::ZERO;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_phased_growth_tagged_json() {
        let growth: PostHandoverGrowth = serde_json::from_value(serde_json::json!({
            "mode": "phased",
            "growth_rate": 8,
            "growth_period_years": 3,
            "mature_rate": 4
        }))
        .unwrap();
        assert_eq!(
            growth,
            PostHandoverGrowth::Phased {
                growth_rate: dec!(8),
                growth_period_years: 3,
                mature_rate: dec!(4),
            }
        );
    }
}
