pub mod metrics;
pub mod recommendation;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RoiError;
use crate::inputs::{ExitScenarioSet, InvestmentInput, MortgageConfig};
use crate::quote::calculate_quote;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RoiResult;

pub use metrics::{build_rows, Direction, MetricRow, MetricValue};
pub use recommendation::{recommend, AxisScores, QuoteScore, Recommendation, RecommendationWeights};

/// Exit months shown side by side when the caller does not choose any.
pub const DEFAULT_EXIT_POINTS: [u32; 4] = [24, 36, 48, 60];

fn default_exit_points() -> Vec<u32> {
    DEFAULT_EXIT_POINTS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonQuote {
    pub label: String,
    pub input: InvestmentInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage: Option<MortgageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub quotes: Vec<ComparisonQuote>,
    #[serde(default = "default_exit_points")]
    pub exit_points: Vec<u32>,
    #[serde(default)]
    pub weights: RecommendationWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPoint {
    pub month: u32,
    pub true_profit: Money,
    pub annualized_roe: Percent,
    pub is_available: bool,
}

/// The figures of one quote that the comparison reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub label: String,
    pub price: Money,
    pub price_per_sqft: Option<Money>,
    pub handover_label: String,
    pub construction_months: u32,
    pub plan_shape: String,
    pub pre_handover_percent: Percent,
    pub monthly_burn_rate: Money,
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
    pub exits: Vec<ExitPoint>,
    pub mortgage_monthly_payment: Option<Money>,
    pub mortgage_total_interest: Option<Money>,
    pub financing_gap_percent: Option<Percent>,
    pub rent_coverage_ratio: Option<Decimal>,
    pub warnings: Vec<String>,
}

impl QuoteSummary {
    pub fn exit_at(&self, month: u32) -> Option<&ExitPoint> {
        self.exits.iter().find(|e| e.month == month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub exit_points: Vec<u32>,
    pub quotes: Vec<QuoteSummary>,
    pub rows: Vec<MetricRow>,
    pub recommendation: Recommendation,
}

/// Run the quote pipeline for one entry and keep the comparable figures.
pub fn summarize_quote(quote: &ComparisonQuote, exit_points: &ExitScenarioSet) -> RoiResult<QuoteSummary> {
    let calc = calculate_quote(&quote.input, quote.mortgage.as_ref(), exit_points)?.result;

    let price = quote.input.base_price;
    let price_per_sqft = quote.input.unit_size().map(|size| (price / size).round_dp(2));
    let mortgage = calc.mortgage.as_ref();

    Ok(QuoteSummary {
        label: quote.label.clone(),
        price,
        price_per_sqft,
        handover_label: calc.handover_label.clone(),
        construction_months: calc.construction_months,
        plan_shape: calc.payment_schedule.shape_label(),
        pre_handover_percent: calc.payment_schedule.pre_handover_percent,
        monthly_burn_rate: calc.payment_schedule.monthly_burn_rate,
        gross_rental_yield: calc.hold_analysis.gross_rental_yield,
        net_rental_yield: calc.hold_analysis.net_rental_yield,
        exits: calc
            .exit_scenarios
            .iter()
            .map(|e| ExitPoint {
                month: e.exit_month,
                true_profit: e.true_profit,
                annualized_roe: e.annualized_roe,
                is_available: e.is_available,
            })
            .collect(),
        mortgage_monthly_payment: mortgage.map(|m| m.monthly_payment),
        mortgage_total_interest: mortgage.map(|m| m.total_interest),
        financing_gap_percent: mortgage.map(|m| m.financing_gap.gap_percent),
        rent_coverage_ratio: mortgage.and_then(|m| m.rent_coverage_ratio),
        warnings: calc.validation.messages(),
    })
}

/// Side-by-side comparison of several quotes with per-metric best/worst
/// markers and a weighted recommendation.
pub fn compare_quotes(input: &ComparisonInput) -> RoiResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    if input.quotes.is_empty() {
        return Err(RoiError::InvalidInput {
            field: "quotes".into(),
            reason: "At least one quote is required".into(),
        });
    }

    let exit_set = ExitScenarioSet::new(input.exit_points.clone());
    let exit_points = exit_set.months().to_vec();

    let quotes = input
        .quotes
        .iter()
        .map(|q| summarize_quote(q, &exit_set))
        .collect::<RoiResult<Vec<_>>>()?;

    let rows = build_rows(&quotes, &exit_points);
    let recommendation = recommend(&quotes, &input.weights, &exit_points);

    let warnings: Vec<String> = quotes
        .iter()
        .flat_map(|q| q.warnings.iter().map(move |w| format!("{}: {}", q.label, w)))
        .collect();

    tracing::debug!(
        quotes = quotes.len(),
        rows = rows.len(),
        winner = ?recommendation.overall_winner,
        "quotes compared"
    );

    let output = ComparisonOutput {
        exit_points,
        quotes,
        rows,
        recommendation,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Multi-quote comparison (per-metric ranking, weighted ROI/safety/cashflow scores)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mortgage_config, scenario_input};
    use rust_decimal_macros::dec;

    fn quote(label: &str, input: InvestmentInput) -> ComparisonQuote {
        ComparisonQuote {
            label: label.into(),
            input,
            mortgage: None,
        }
    }

    #[test]
    fn test_empty_comparison_rejected() {
        let input = ComparisonInput {
            quotes: vec![],
            exit_points: default_exit_points(),
            weights: RecommendationWeights::default(),
        };
        assert!(compare_quotes(&input).is_err());
    }

    #[test]
    fn test_cheaper_quote_wins_price_row() {
        let mut pricier = scenario_input();
        pricier.base_price = dec!(1800000);
        let input = ComparisonInput {
            quotes: vec![quote("A", pricier), quote("B", scenario_input())],
            exit_points: default_exit_points(),
            weights: RecommendationWeights::default(),
        };
        let out = compare_quotes(&input).unwrap().result;
        let price = out.rows.iter().find(|r| r.key == "price").unwrap();
        assert_eq!(price.best_index, Some(1));
        assert_eq!(price.worst_index, Some(0));
        assert_eq!(out.quotes.len(), 2);
        assert_eq!(out.exit_points, vec![24, 36, 48, 60]);
    }

    #[test]
    fn test_summary_reads_quote_pipeline() {
        let mut input = scenario_input();
        input.unit_size_sqft = Some(dec!(1000));
        let summary = summarize_quote(&quote("A", input), &ExitScenarioSet::new(vec![24])).unwrap();
        assert_eq!(summary.price_per_sqft, Some(dec!(1500)));
        assert_eq!(summary.construction_months, 24);
        assert_eq!(summary.plan_shape, "20/40/60");
        assert_eq!(summary.exits.len(), 1);
        assert!(summary.exit_at(24).is_some());
        assert!(summary.exit_at(36).is_none());
    }

    #[test]
    fn test_mortgage_rows_only_when_financed() {
        let plain = ComparisonInput {
            quotes: vec![quote("A", scenario_input()), quote("B", scenario_input())],
            exit_points: vec![24],
            weights: RecommendationWeights::default(),
        };
        let out = compare_quotes(&plain).unwrap().result;
        assert!(!out.rows.iter().any(|r| r.key == "mortgage_monthly_payment"));

        let mut financed = plain.clone();
        financed.quotes[1].mortgage = Some(mortgage_config());
        let out = compare_quotes(&financed).unwrap().result;
        let row = out
            .rows
            .iter()
            .find(|r| r.key == "mortgage_monthly_payment")
            .unwrap();
        assert_eq!(row.values[0], MetricValue::NotAvailable);
    }

    #[test]
    fn test_order_does_not_change_scores() {
        let mut fast = scenario_input();
        fast.appreciation.construction_rate = dec!(10);
        let forward = ComparisonInput {
            quotes: vec![quote("A", scenario_input()), quote("B", fast.clone())],
            exit_points: default_exit_points(),
            weights: RecommendationWeights::default(),
        };
        let mut reversed = forward.clone();
        reversed.quotes.reverse();

        let a = compare_quotes(&forward).unwrap().result.recommendation;
        let b = compare_quotes(&reversed).unwrap().result.recommendation;
        assert_eq!(a.scores[0].scores, b.scores[1].scores);
        assert_eq!(a.scores[1].scores, b.scores[0].scores);
        assert_eq!(a.overall_winner, Some(1));
        assert_eq!(b.overall_winner, Some(0));
    }
}
