use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::QuoteSummary;
use crate::types::Percent;

// Safety heuristic: points lost per unit of exposure, and their caps.
const PRE_HANDOVER_PENALTY_PER_POINT: Decimal = dec!(0.5);
const CONSTRUCTION_PENALTY_PER_YEAR: Decimal = dec!(7.5);
const CONSTRUCTION_PENALTY_CAP: Decimal = dec!(30);
const FINANCING_GAP_PENALTY_CAP: Decimal = dec!(20);

fn default_roi_weight() -> Decimal {
    dec!(0.4)
}

fn default_safety_weight() -> Decimal {
    dec!(0.3)
}

fn default_cashflow_weight() -> Decimal {
    dec!(0.3)
}

fn default_target_roe() -> Percent {
    dec!(15)
}

fn default_target_yield() -> Percent {
    dec!(7)
}

/// Scoring policy. The weights and targets are product choices, not a
/// financial standard; callers are expected to tune them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationWeights {
    #[serde(default = "default_roi_weight")]
    pub roi: Decimal,
    #[serde(default = "default_safety_weight")]
    pub safety: Decimal,
    #[serde(default = "default_cashflow_weight")]
    pub cashflow: Decimal,
    /// Annualized ROE that earns a full ROI score
    #[serde(default = "default_target_roe")]
    pub target_annualized_roe: Percent,
    /// Net rental yield that earns a full cashflow score
    #[serde(default = "default_target_yield")]
    pub target_net_yield: Percent,
    /// Exit month the ROI axis is judged at; defaults to the last exit point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_exit_month: Option<u32>,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        RecommendationWeights {
            roi: default_roi_weight(),
            safety: default_safety_weight(),
            cashflow: default_cashflow_weight(),
            target_annualized_roe: default_target_roe(),
            target_net_yield: default_target_yield(),
            reference_exit_month: None,
        }
    }
}

/// 0..=100 per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScores {
    pub roi: Decimal,
    pub safety: Decimal,
    pub cashflow: Decimal,
    pub overall: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteScore {
    pub label: String,
    pub scores: AxisScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub reference_exit_month: Option<u32>,
    pub scores: Vec<QuoteScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_winner: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_winner: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashflow_winner: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_winner: Option<usize>,
}

fn clamp_score(v: Decimal) -> Decimal {
    v.clamp(Decimal::ZERO, dec!(100)).round_dp(1)
}

fn ratio_score(value: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    clamp_score(value / target * dec!(100))
}

/// Score one quote. Depends only on that quote, so scores do not change
/// with the order quotes are listed in.
pub fn score_quote(
    quote: &QuoteSummary,
    weights: &RecommendationWeights,
    reference_exit_month: Option<u32>,
) -> AxisScores {
    let roe = reference_exit_month
        .and_then(|m| quote.exit_at(m))
        .map(|e| e.annualized_roe)
        .unwrap_or(Decimal::ZERO);
    let roi = ratio_score(roe, weights.target_annualized_roe);

    let construction_years = Decimal::from(quote.construction_months) / dec!(12);
    let exposure_penalty = quote.pre_handover_percent * PRE_HANDOVER_PENALTY_PER_POINT;
    let duration_penalty =
        (construction_years * CONSTRUCTION_PENALTY_PER_YEAR).min(CONSTRUCTION_PENALTY_CAP);
    let gap_penalty = quote
        .financing_gap_percent
        .unwrap_or(Decimal::ZERO)
        .min(FINANCING_GAP_PENALTY_CAP);
    let safety = clamp_score(dec!(100) - exposure_penalty - duration_penalty - gap_penalty);

    let mut cashflow = ratio_score(quote.net_rental_yield, weights.target_net_yield);
    if let Some(coverage) = quote.rent_coverage_ratio {
        if coverage < Decimal::ONE {
            cashflow = clamp_score(cashflow * coverage.max(Decimal::ZERO));
        }
    }

    let weight_sum = weights.roi + weights.safety + weights.cashflow;
    let overall = if weight_sum > Decimal::ZERO {
        (roi * weights.roi + safety * weights.safety + cashflow * weights.cashflow) / weight_sum
    } else {
        (roi + safety + cashflow) / dec!(3)
    };

    AxisScores {
        roi,
        safety,
        cashflow,
        overall: clamp_score(overall),
    }
}

/// Highest score; ties go to the first-listed quote.
fn winner(scores: &[QuoteScore], axis: impl Fn(&AxisScores) -> Decimal) -> Option<usize> {
    let mut best: Option<(usize, Decimal)> = None;
    for (i, s) in scores.iter().enumerate() {
        let v = axis(&s.scores);
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn recommend(
    quotes: &[QuoteSummary],
    weights: &RecommendationWeights,
    exit_points: &[u32],
) -> Recommendation {
    let reference_exit_month = weights
        .reference_exit_month
        .or_else(|| exit_points.last().copied());

    let scores: Vec<QuoteScore> = quotes
        .iter()
        .map(|q| QuoteScore {
            label: q.label.clone(),
            scores: score_quote(q, weights, reference_exit_month),
        })
        .collect();

    Recommendation {
        reference_exit_month,
        roi_winner: winner(&scores, |s| s.roi),
        safety_winner: winner(&scores, |s| s.safety),
        cashflow_winner: winner(&scores, |s| s.cashflow),
        overall_winner: winner(&scores, |s| s.overall),
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ExitPoint;
    use rust_decimal_macros::dec;

    fn summary(label: &str, roe: Decimal, pre_handover: Decimal, net_yield: Decimal) -> QuoteSummary {
        QuoteSummary {
            label: label.into(),
            price: dec!(1000000),
            price_per_sqft: None,
            handover_label: "Q4 2027".into(),
            construction_months: 24,
            plan_shape: "20/40/60".into(),
            pre_handover_percent: pre_handover,
            monthly_burn_rate: dec!(8000),
            gross_rental_yield: net_yield,
            net_rental_yield: net_yield,
            exits: vec![ExitPoint {
                month: 60,
                true_profit: dec!(100000),
                annualized_roe: roe,
                is_available: true,
            }],
            mortgage_monthly_payment: None,
            mortgage_total_interest: None,
            financing_gap_percent: None,
            rent_coverage_ratio: None,
            warnings: vec![],
        }
    }

    #[test]
    fn test_scores_use_targets() {
        let q = summary("A", dec!(7.5), dec!(40), dec!(7));
        let s = score_quote(&q, &RecommendationWeights::default(), Some(60));
        assert_eq!(s.roi, dec!(50));
        // 100 - 20 (exposure) - 15 (two years)
        assert_eq!(s.safety, dec!(65));
        assert_eq!(s.cashflow, dec!(100));
        // 0.4*50 + 0.3*65 + 0.3*100
        assert_eq!(s.overall, dec!(69.5));
    }

    #[test]
    fn test_scores_clamped() {
        let q = summary("A", dec!(45), dec!(40), dec!(-2));
        let s = score_quote(&q, &RecommendationWeights::default(), Some(60));
        assert_eq!(s.roi, dec!(100));
        assert_eq!(s.cashflow, Decimal::ZERO);
    }

    #[test]
    fn test_missing_reference_exit_scores_zero_roi() {
        let q = summary("A", dec!(10), dec!(40), dec!(7));
        let s = score_quote(&q, &RecommendationWeights::default(), Some(36));
        assert_eq!(s.roi, Decimal::ZERO);
    }

    #[test]
    fn test_winners_per_axis() {
        let quotes = vec![
            summary("A", dec!(12), dec!(60), dec!(5)),
            summary("B", dec!(9), dec!(30), dec!(6.5)),
        ];
        let rec = recommend(&quotes, &RecommendationWeights::default(), &[24, 60]);
        assert_eq!(rec.reference_exit_month, Some(60));
        assert_eq!(rec.roi_winner, Some(0));
        assert_eq!(rec.safety_winner, Some(1));
        assert_eq!(rec.cashflow_winner, Some(1));
    }

    #[test]
    fn test_tie_goes_to_first() {
        let quotes = vec![
            summary("A", dec!(10), dec!(40), dec!(7)),
            summary("B", dec!(10), dec!(40), dec!(7)),
        ];
        let rec = recommend(&quotes, &RecommendationWeights::default(), &[60]);
        assert_eq!(rec.overall_winner, Some(0));
        assert_eq!(rec.roi_winner, Some(0));
    }

    #[test]
    fn test_weights_are_a_policy_parameter() {
        let q = summary("A", dec!(7.5), dec!(40), dec!(7));
        let roi_only = RecommendationWeights {
            roi: Decimal::ONE,
            safety: Decimal::ZERO,
            cashflow: Decimal::ZERO,
            ..RecommendationWeights::default()
        };
        assert_eq!(score_quote(&q, &roi_only, Some(60)).overall, dec!(50));
    }
}
