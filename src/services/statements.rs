// src/services/statements.rs
use anyhow::{bail, Result};
use log::{debug, error};

use crate::models::{DupontDecomposition, StatementTable};

pub const MAX_PERIODS: usize = 5;
/// Stand-in for a missing line item so a gap degrades the ratio instead of
/// dividing by zero.
pub const NEUTRAL_LINE_ITEM: f64 = 1.0;

pub const NET_INCOME: &str = "Net Income";
pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const TOTAL_ASSETS: &str = "Total Assets";
pub const TOTAL_EQUITY: &str = "Total Stockholder Equity";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DupontFactors {
    pub net_margin: f64,
    pub asset_turnover: f64,
    pub equity_multiplier: f64,
}

impl DupontFactors {
    pub fn from_line_items(net_income: f64, revenue: f64, assets: f64, equity: f64) -> Self {
        DupontFactors {
            net_margin: net_income / revenue,
            asset_turnover: revenue / assets,
            equity_multiplier: assets / equity,
        }
    }

    pub fn roe(&self) -> f64 {
        self.net_margin * self.asset_turnover * self.equity_multiplier
    }
}

fn line_item_or_neutral(table: &StatementTable, period: &str, item: &str) -> f64 {
    table.line_item(period, item).unwrap_or(NEUTRAL_LINE_ITEM)
}

/// Three-factor ROE for every income-statement period. Periods that only
/// appear in the balance sheet are ignored. A line item that is reported as
/// zero is not defaulted, so a zero divisor fails the whole decomposition.
pub fn dupont_roe(income: &StatementTable, balance_sheet: &StatementTable) -> Result<DupontDecomposition> {
    let mut decomposition = DupontDecomposition::new();
    for period in income.periods() {
        let factors = DupontFactors::from_line_items(
            line_item_or_neutral(income, period, NET_INCOME),
            line_item_or_neutral(income, period, TOTAL_REVENUE),
            line_item_or_neutral(balance_sheet, period, TOTAL_ASSETS),
            line_item_or_neutral(balance_sheet, period, TOTAL_EQUITY),
        );
        debug!("DuPont {}: {:?}", period, factors);

        let roe = factors.roe();
        if !roe.is_finite() {
            error!("DuPont ROE for {} is {} ({:?})", period, roe, factors);
            bail!(
                "DuPont ROE for period {} is undefined: {}, {} or {} is zero",
                period, TOTAL_REVENUE, TOTAL_ASSETS, TOTAL_EQUITY
            );
        }
        decomposition.insert(period.clone(), roe);
    }
    Ok(decomposition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn table(value: serde_json::Value) -> StatementTable {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_three_factor_roe() {
        let income = table(json!({ "2024": { "Net Income": 100.0, "Total Revenue": 1000.0 } }));
        let balance = table(json!({ "2024": { "Total Assets": 2000.0, "Total Stockholder Equity": 500.0 } }));

        let roe = dupont_roe(&income, &balance).unwrap();
        assert_eq!(roe.len(), 1);
        assert_relative_eq!(roe["2024"], (100.0 / 1000.0) * (1000.0 / 2000.0) * (2000.0 / 500.0), epsilon = 1e-12);
        assert_relative_eq!(roe["2024"], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_factors_are_kept() {
        let factors = DupontFactors::from_line_items(100.0, 1000.0, 2000.0, 500.0);
        assert_relative_eq!(factors.net_margin, 0.1, epsilon = 1e-12);
        assert_relative_eq!(factors.asset_turnover, 0.5, epsilon = 1e-12);
        assert_relative_eq!(factors.equity_multiplier, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_balance_period_defaults_to_one() {
        let income = table(json!({ "2023": { "Net Income": 80.0, "Total Revenue": 400.0 } }));
        let balance = table(json!({ "2024": { "Total Assets": 2000.0, "Total Stockholder Equity": 500.0 } }));

        let roe = dupont_roe(&income, &balance).unwrap();
        assert_relative_eq!(roe["2023"], (80.0 / 400.0) * (400.0 / 1.0) * (1.0 / 1.0), epsilon = 1e-12);
        assert!(!roe.contains_key("2024"));
    }

    #[test]
    fn test_missing_income_items_default_to_one() {
        let income = table(json!({ "2024": { "Net Income": 50.0 } }));
        let balance = table(json!({ "2024": { "Total Assets": 200.0, "Total Stockholder Equity": 100.0 } }));

        let roe = dupont_roe(&income, &balance).unwrap();
        assert_relative_eq!(roe["2024"], (50.0 / 1.0) * (1.0 / 200.0) * (200.0 / 100.0), epsilon = 1e-12);
    }

    #[test]
    fn test_only_income_periods_reported() {
        let income = table(json!({
            "2022": { "Net Income": 10.0, "Total Revenue": 100.0 },
            "2023": { "Net Income": 12.0, "Total Revenue": 110.0 },
        }));
        let balance = table(json!({
            "2021": { "Total Assets": 1.0 },
            "2023": { "Total Assets": 300.0, "Total Stockholder Equity": 150.0 },
        }));

        let roe = dupont_roe(&income, &balance).unwrap();
        assert_eq!(roe.keys().cloned().collect::<Vec<_>>(), vec!["2022", "2023"]);
    }

    #[test]
    fn test_empty_income_gives_empty_decomposition() {
        let balance = table(json!({ "2024": { "Total Assets": 1.0 } }));
        assert!(dupont_roe(&StatementTable::default(), &balance).unwrap().is_empty());
    }

    #[test]
    fn test_reported_zero_divisor_is_error() {
        let balance = table(json!({ "2024": { "Total Assets": 2000.0, "Total Stockholder Equity": 500.0 } }));

        let income = table(json!({ "2024": { "Net Income": 100.0, "Total Revenue": 0.0 } }));
        let err = dupont_roe(&income, &balance).unwrap_err();
        assert!(err.to_string().contains("period 2024 is undefined"));

        let income = table(json!({ "2024": { "Net Income": 100.0, "Total Revenue": 1000.0 } }));
        let no_equity = table(json!({ "2024": { "Total Assets": 2000.0, "Total Stockholder Equity": 0.0 } }));
        assert!(dupont_roe(&income, &no_equity).is_err());
    }

    #[test]
    fn test_zero_net_income_is_a_valid_roe() {
        let income = table(json!({ "2024": { "Net Income": 0.0, "Total Revenue": 1000.0 } }));
        let balance = table(json!({ "2024": { "Total Assets": 2000.0, "Total Stockholder Equity": 500.0 } }));
        assert_eq!(dupont_roe(&income, &balance).unwrap()["2024"], 0.0);
    }

    #[test]
    fn test_most_recent_keeps_latest_periods() {
        let income = table(json!({
            "2018-12-31": {}, "2019-12-31": {}, "2020-12-31": {},
            "2021-12-31": {}, "2022-12-31": {}, "2023-12-31": {}, "2024-12-31": {},
        }))
        .most_recent(MAX_PERIODS);

        assert_eq!(income.len(), 5);
        assert_eq!(income.periods().next().map(String::as_str), Some("2020-12-31"));
        assert!(income.period("2024-12-31").is_some());
    }
}
