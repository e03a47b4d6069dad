// src/services/valuation.rs
use anyhow::Result;
use chrono::Utc;
use log::info;

use crate::config::AppConfig;
use crate::models::{
    DcfSummary, FinancialsSummary, FundamentalsRecord, MarketSegment, RateInputs, StatementSet,
    ValuationSummary,
};
use super::cost_of_capital::{calculate_capital_cost, COST_OF_DEBT, DEBT_TO_EQUITY_POLICY};
use super::fundamentals::{normalize, FieldBag};
use super::intrinsic_value::{valuation_band, SENSITIVITY_STEP};
use super::statements::dupont_roe;

/// Constants shared by every request for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationPolicy {
    pub cost_of_debt: f64,
    /// Debt value as a fraction of equity value. Fixed; the fetched
    /// debt_to_equity field is not consulted.
    pub debt_ratio: f64,
    pub sensitivity_step: f64,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        ValuationPolicy {
            cost_of_debt: COST_OF_DEBT,
            debt_ratio: DEBT_TO_EQUITY_POLICY,
            sensitivity_step: SENSITIVITY_STEP,
        }
    }
}

/// Optional per-request overrides, usually taken from the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateOverrides {
    pub growth_rate: Option<f64>,
    pub risk_free_rate: Option<f64>,
    pub market_return: Option<f64>,
}

/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct ValuationService {
    policy: ValuationPolicy,
    defaults: RateInputs,
}

impl ValuationService {
    pub fn new(policy: ValuationPolicy, defaults: RateInputs) -> Self {
        Self { policy, defaults }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ValuationPolicy::default(),
            RateInputs {
                growth_rate: config.growth_rate,
                risk_free_rate: config.risk_free_rate,
                market_return: config.market_return,
            },
        )
    }

    pub fn rates(&self, overrides: RateOverrides) -> RateInputs {
        RateInputs {
            growth_rate: overrides.growth_rate.unwrap_or(self.defaults.growth_rate),
            risk_free_rate: overrides.risk_free_rate.unwrap_or(self.defaults.risk_free_rate),
            market_return: overrides.market_return.unwrap_or(self.defaults.market_return),
        }
    }

    pub fn fundamentals(&self, bag: &FieldBag, ticker: &str, market: &MarketSegment) -> FundamentalsRecord {
        normalize(bag, ticker, market)
    }

    pub fn value(&self, fundamentals: FundamentalsRecord, overrides: RateOverrides) -> ValuationSummary {
        let rates = self.rates(overrides);
        let cost_of_capital = calculate_capital_cost(
            rates.risk_free_rate,
            rates.market_return,
            fundamentals.beta_or_default(),
            fundamentals.market_cap,
            self.policy.cost_of_debt,
            self.policy.debt_ratio,
        );
        let valuation = valuation_band(
            fundamentals.eps_or_default(),
            rates.growth_rate,
            cost_of_capital.wacc,
            self.policy.sensitivity_step,
        );
        info!(
            "Valued {}: WACC {:.4}, intrinsic {:?}",
            fundamentals.ticker, cost_of_capital.wacc, valuation.intrinsic_value
        );

        ValuationSummary {
            roe_pct: fundamentals.roe_pct(),
            fundamentals,
            cost_of_capital,
            valuation,
            growth_rate_used: rates.growth_rate,
            discount_rate_used: cost_of_capital.wacc,
            risk_free_rate_used: rates.risk_free_rate,
            market_return_used: rates.market_return,
            generated_at: Utc::now(),
        }
    }

    pub fn financials(&self, ticker: String, market: MarketSegment, statements: StatementSet) -> Result<FinancialsSummary> {
        let dupont_roe = dupont_roe(&statements.income, &statements.balance_sheet)?;
        info!("Computed DuPont ROE for {} over {} periods", ticker, dupont_roe.len());
        Ok(FinancialsSummary {
            ticker,
            market,
            statements,
            dupont_roe,
            generated_at: Utc::now(),
        })
    }

    pub fn dcf(&self, summary: &ValuationSummary) -> DcfSummary {
        DcfSummary {
            ticker: summary.fundamentals.ticker.clone(),
            intrinsic_value: summary.valuation.intrinsic_value,
            current_price: summary.fundamentals.current_price,
            wacc: summary.discount_rate_used * 100.0,
            terminal_growth: summary.growth_rate_used * 100.0,
        }
    }
}
