use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::QuoteSummary;

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
    /// Shown for context, never highlighted
    Informational,
}

/// One cell of a comparison row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Amount(Decimal),
    Text(String),
    /// Rendered as "N/A"
    NotAvailable,
}

/// A metric across every quote, in quote order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub key: String,
    pub label: String,
    pub direction: Direction,
    pub values: Vec<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_index: Option<usize>,
}

impl MetricRow {
    pub fn numeric(
        key: impl Into<String>,
        label: impl Into<String>,
        direction: Direction,
        values: Vec<Option<Decimal>>,
    ) -> Self {
        let (best_index, worst_index) = rank(&values, direction);
        MetricRow {
            key: key.into(),
            label: label.into(),
            direction,
            values: values
                .into_iter()
                .map(|v| v.map(MetricValue::Amount).unwrap_or(MetricValue::NotAvailable))
                .collect(),
            best_index,
            worst_index,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>, values: Vec<String>) -> Self {
        MetricRow {
            key: key.into(),
            label: label.into(),
            direction: Direction::Informational,
            values: values.into_iter().map(MetricValue::Text).collect(),
            best_index: None,
            worst_index: None,
        }
    }
}

/// Indices of the best and worst available values. Ties go to the
/// first-listed quote; fewer than two values, or all values equal, leave the
/// worst slot empty.
pub fn rank(values: &[Option<Decimal>], direction: Direction) -> (Option<usize>, Option<usize>) {
    if direction == Direction::Informational {
        return (None, None);
    }

    let present: Vec<(usize, Decimal)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    if present.len() < 2 {
        return (None, None);
    }

    let better = |a: Decimal, b: Decimal| match direction {
        Direction::HigherIsBetter => a > b,
        Direction::LowerIsBetter => a < b,
        Direction::Informational => false,
    };

    let mut best = present[0];
    let mut worst = present[0];
    for &(i, v) in &present[1..] {
        if better(v, best.1) {
            best = (i, v);
        }
        if better(worst.1, v) {
            worst = (i, v);
        }
    }

    if best.1 == worst.1 {
        (Some(best.0), None)
    } else {
        (Some(best.0), Some(worst.0))
    }
}

fn column(quotes: &[QuoteSummary], f: impl Fn(&QuoteSummary) -> Option<Decimal>) -> Vec<Option<Decimal>> {
    quotes.iter().map(f).collect()
}

/// Column-aligned rows for a set of summarised quotes.
pub fn build_rows(quotes: &[QuoteSummary], exit_points: &[u32]) -> Vec<MetricRow> {
    let mut rows = vec![
        MetricRow::numeric("price", "Price", Direction::LowerIsBetter, column(quotes, |q| Some(q.price))),
        MetricRow::numeric(
            "price_per_sqft",
            "Price per sqft",
            Direction::LowerIsBetter,
            column(quotes, |q| q.price_per_sqft),
        ),
        MetricRow::text(
            "handover",
            "Handover",
            quotes.iter().map(|q| q.handover_label.clone()).collect(),
        ),
        MetricRow::numeric(
            "construction_months",
            "Construction (months)",
            Direction::LowerIsBetter,
            column(quotes, |q| Some(Decimal::from(q.construction_months))),
        ),
        MetricRow::text(
            "payment_plan",
            "Payment plan",
            quotes.iter().map(|q| q.plan_shape.clone()).collect(),
        ),
        MetricRow::numeric(
            "pre_handover_percent",
            "Paid before handover (%)",
            Direction::Informational,
            column(quotes, |q| Some(q.pre_handover_percent)),
        ),
        MetricRow::numeric(
            "monthly_burn_rate",
            "Monthly burn rate",
            Direction::LowerIsBetter,
            column(quotes, |q| Some(q.monthly_burn_rate)),
        ),
        MetricRow::numeric(
            "gross_rental_yield",
            "Gross rental yield (%)",
            Direction::HigherIsBetter,
            column(quotes, |q| Some(q.gross_rental_yield)),
        ),
        MetricRow::numeric(
            "net_rental_yield",
            "Net rental yield (%)",
            Direction::HigherIsBetter,
            column(quotes, |q| Some(q.net_rental_yield)),
        ),
    ];

    for &month in exit_points {
        rows.push(MetricRow::numeric(
            format!("exit_profit_{month}"),
            format!("Exit profit at {month}m"),
            Direction::HigherIsBetter,
            column(quotes, |q| q.exit_at(month).map(|e| e.true_profit)),
        ));
        rows.push(MetricRow::numeric(
            format!("exit_roe_{month}"),
            format!("Annualized ROE at {month}m (%)"),
            Direction::HigherIsBetter,
            column(quotes, |q| q.exit_at(month).map(|e| e.annualized_roe)),
        ));
    }

    if quotes.iter().any(|q| q.mortgage_monthly_payment.is_some()) {
        rows.push(MetricRow::numeric(
            "mortgage_monthly_payment",
            "Mortgage monthly payment",
            Direction::LowerIsBetter,
            column(quotes, |q| q.mortgage_monthly_payment),
        ));
        rows.push(MetricRow::numeric(
            "mortgage_total_interest",
            "Mortgage total interest",
            Direction::LowerIsBetter,
            column(quotes, |q| q.mortgage_total_interest),
        ));
        rows.push(MetricRow::numeric(
            "financing_gap_percent",
            "Financing gap (%)",
            Direction::LowerIsBetter,
            column(quotes, |q| q.financing_gap_percent),
        ));
    }

    rows
}
