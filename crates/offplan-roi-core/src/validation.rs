use serde::{Deserialize, Serialize};

/// Condition worth surfacing to the caller. None of these stop a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    PlanImbalance,
    PreHandoverMismatch,
    PreHandoverExceedsTotal,
    DownpaymentExceedsPreHandover,
    TriggerOutOfRange,
    HandoverNotAfterBooking,
    UnitSizeMissing,
    FinancingGap,
    MortgageTermMissing,
    ExitBelowThreshold,
    ExitBeyondHorizon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub message: String,
}

/// Soft validation findings collected while a quote is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: IssueCode, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?code, %message, "validation issue");
        self.issues.push(ValidationIssue { code, message });
    }

    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Messages in the order they were raised, for the output envelope.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }
}
