// src/models.rs
use serde::{Serialize, Deserialize, Serializer};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Market segment a ticker is quoted on. Only `India` changes ticker handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketSegment {
    Us,
    India,
    Other(String),
}

impl MarketSegment {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "" | "us" => MarketSegment::Us,
            "india" => MarketSegment::India,
            _ => MarketSegment::Other(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MarketSegment::Us => "us",
            MarketSegment::India => "india",
            MarketSegment::Other(tag) => tag,
        }
    }
}

impl Default for MarketSegment {
    fn default() -> Self {
        MarketSegment::Us
    }
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for MarketSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FundamentalsRecord {
    pub ticker: String,
    pub market: MarketSegment,
    pub current_price: Option<f64>,
    pub eps: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub beta: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub book_value: Option<f64>,
    pub market_cap: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapitalCostResult {
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub weight_equity: f64,
    pub weight_debt: f64,
    pub wacc: f64,
}

/// `valuation_low` and `valuation_high` name the direction the rates were
/// pushed, not a numeric bound; low may exceed high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValuationResult {
    pub intrinsic_value: Option<f64>,
    pub valuation_low: Option<f64>,
    pub valuation_high: Option<f64>,
}

/// Period key -> line item -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementTable(pub BTreeMap<String, BTreeMap<String, f64>>);

impl StatementTable {
    pub fn period(&self, key: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(key)
    }

    pub fn line_item(&self, key: &str, item: &str) -> Option<f64> {
        self.period(key).and_then(|items| items.get(item).copied())
    }

    pub fn periods(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keeps the `limit` most recent periods. Keys are ISO dates or fiscal
    /// year labels, so the largest keys are the latest.
    pub fn most_recent(mut self, limit: usize) -> Self {
        while self.0.len() > limit {
            self.0.pop_first();
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementSet {
    pub income: StatementTable,
    pub cashflow: StatementTable,
    pub balance_sheet: StatementTable,
}

pub type DupontDecomposition = BTreeMap<String, f64>;

/// Per-request rates after query overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateInputs {
    pub growth_rate: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
}

#[derive(Debug, Serialize)]
pub struct ValuationSummary {
    #[serde(flatten)]
    pub fundamentals: FundamentalsRecord,
    pub roe_pct: Option<f64>,
    pub cost_of_capital: CapitalCostResult,
    #[serde(flatten)]
    pub valuation: ValuationResult,
    pub growth_rate_used: f64,
    pub discount_rate_used: f64,
    pub risk_free_rate_used: f64,
    pub market_return_used: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FinancialsSummary {
    pub ticker: String,
    pub market: MarketSegment,
    #[serde(flatten)]
    pub statements: StatementSet,
    pub dupont_roe: DupontDecomposition,
    pub generated_at: DateTime<Utc>,
}

/// Compact shape read by the browser client; rates are in percent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfSummary {
    pub ticker: String,
    pub intrinsic_value: Option<f64>,
    pub current_price: Option<f64>,
    pub wacc: f64,
    pub terminal_growth: f64,
}
