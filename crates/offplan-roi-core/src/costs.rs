use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::inputs::TransactionCosts;
use crate::time_value::percent_to_rate;
use crate::types::{Money, Percent};

/// Agent commission on resale, charged on the exit price when enabled.
pub const EXIT_AGENT_COMMISSION_PERCENT: Percent = dec!(2);

/// Fees paid once at acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryCosts {
    pub dld_fee: Money,
    pub oqood_fee: Money,
    pub agent_commission: Money,
    pub total: Money,
}

/// Fees paid on a resale at a given price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitCosts {
    pub agent_commission: Money,
    pub noc_fee: Money,
    pub total: Money,
}

pub fn entry_costs(base_price: Money, costs: &TransactionCosts) -> EntryCosts {
    let dld_fee = base_price * percent_to_rate(costs.dld_fee_percent);
    let agent_commission = base_price * percent_to_rate(costs.entry_agent_commission_percent);
    let oqood_fee = costs.oqood_fee;

    EntryCosts {
        dld_fee,
        oqood_fee,
        agent_commission,
        total: dld_fee + oqood_fee + agent_commission,
    }
}

pub fn exit_costs(exit_price: Money, costs: &TransactionCosts) -> ExitCosts {
    let agent_commission = if costs.exit_agent_commission_enabled {
        exit_price * percent_to_rate(EXIT_AGENT_COMMISSION_PERCENT)
    } else {
        Decimal::ZERO
    };

    ExitCosts {
        agent_commission,
        noc_fee: costs.exit_noc_fee,
        total: agent_commission + costs.exit_noc_fee,
    }
}
