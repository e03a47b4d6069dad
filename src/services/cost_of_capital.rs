// src/services/cost_of_capital.rs
use log::debug;

use crate::models::CapitalCostResult;

pub const COST_OF_DEBT: f64 = 0.06;
pub const DEBT_TO_EQUITY_POLICY: f64 = 0.2;
/// Equity value used when market cap is unknown. A unit placeholder, not dollars.
pub const PLACEHOLDER_EQUITY_VALUE: f64 = 1.0;

pub fn cost_of_equity(risk_free_rate: f64, market_return: f64, beta: f64) -> f64 {
    risk_free_rate + beta * (market_return - risk_free_rate)
}

/// Two-component WACC. Debt is always `debt_ratio` times equity, so the
/// weights do not depend on market cap.
pub fn calculate_capital_cost(
    risk_free_rate: f64,
    market_return: f64,
    beta: f64,
    market_cap: Option<f64>,
    cost_of_debt: f64,
    debt_ratio: f64,
) -> CapitalCostResult {
    let cost_of_equity = cost_of_equity(risk_free_rate, market_return, beta);

    let equity_value = market_cap
        .filter(|cap| *cap != 0.0)
        .unwrap_or(PLACEHOLDER_EQUITY_VALUE);
    let debt_value = equity_value * debt_ratio;
    let total_value = equity_value + debt_value;

    let weight_equity = equity_value / total_value;
    let weight_debt = debt_value / total_value;
    let wacc = weight_equity * cost_of_equity + weight_debt * cost_of_debt;

    debug!(
        "CAPM {:.4}, weights E={:.4} D={:.4}, WACC {:.4}",
        cost_of_equity, weight_equity, weight_debt, wacc
    );

    CapitalCostResult {
        cost_of_equity,
        cost_of_debt,
        weight_equity,
        weight_debt,
        wacc,
    }
}
