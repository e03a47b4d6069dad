// src/services/fundamentals.rs
use serde_json::{Map, Value};
use log::debug;

use crate::models::{FundamentalsRecord, MarketSegment};

pub const INDIA_SUFFIX: &str = ".NS";
pub const DEFAULT_EPS: f64 = 0.0;
pub const DEFAULT_BETA: f64 = 1.0;

/// Raw field bag as handed over by the data-fetch collaborator.
pub type FieldBag = Map<String, Value>;

// (field name, upstream provider key)
const FIELD_KEYS: [(&str, &str); 10] = [
    ("current_price", "currentPrice"),
    ("eps", "trailingEps"),
    ("pe_ratio", "trailingPE"),
    ("forward_pe", "forwardPE"),
    ("beta", "beta"),
    ("pb_ratio", "priceToBook"),
    ("book_value", "bookValue"),
    ("market_cap", "marketCap"),
    ("return_on_equity", "returnOnEquity"),
    ("debt_to_equity", "debtToEquity"),
];

pub fn normalize_ticker(ticker: &str, market: &MarketSegment) -> String {
    let upper = ticker.trim().to_uppercase();
    if *market == MarketSegment::India && !upper.ends_with(INDIA_SUFFIX) {
        format!("{}{}", upper, INDIA_SUFFIX)
    } else {
        upper
    }
}

fn upstream_key(field: &str) -> Option<&'static str> {
    FIELD_KEYS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, upstream)| *upstream)
}

fn read_field(bag: &FieldBag, field: &str) -> Option<f64> {
    bag.get(field).and_then(Value::as_f64).or_else(|| {
        upstream_key(field)
            .and_then(|key| bag.get(key))
            .and_then(Value::as_f64)
    })
}

pub fn normalize(bag: &FieldBag, ticker: &str, market: &MarketSegment) -> FundamentalsRecord {
    let record = FundamentalsRecord {
        ticker: normalize_ticker(ticker, market),
        market: market.clone(),
        current_price: read_field(bag, "current_price"),
        eps: read_field(bag, "eps"),
        pe_ratio: read_field(bag, "pe_ratio"),
        forward_pe: read_field(bag, "forward_pe"),
        beta: read_field(bag, "beta"),
        pb_ratio: read_field(bag, "pb_ratio"),
        book_value: read_field(bag, "book_value"),
        market_cap: read_field(bag, "market_cap"),
        return_on_equity: read_field(bag, "return_on_equity"),
        debt_to_equity: read_field(bag, "debt_to_equity"),
    };
    debug!("Normalized fundamentals for {}: {:?}", record.ticker, record);
    record
}

impl FundamentalsRecord {
    pub fn eps_or_default(&self) -> f64 {
        self.eps.unwrap_or(DEFAULT_EPS)
    }

    pub fn beta_or_default(&self) -> f64 {
        self.beta.unwrap_or(DEFAULT_BETA)
    }

    /// ROE as a percentage, the way the dashboard displays it.
    pub fn roe_pct(&self) -> Option<f64> {
        self.return_on_equity.map(|roe| roe * 100.0)
    }
}
