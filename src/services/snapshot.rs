// src/services/snapshot.rs
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::{StatementSet, StatementTable};
use super::fundamentals::FieldBag;
use super::statements::MAX_PERIODS;

/// Everything the data-fetch collaborator dropped for one ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerSnapshot {
    pub info: FieldBag,
    pub statements: StatementSet,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    info: Option<Map<String, Value>>,
    #[serde(default)]
    income: Option<Map<String, Value>>,
    #[serde(default)]
    cashflow: Option<Map<String, Value>>,
    #[serde(default)]
    balance_sheet: Option<Map<String, Value>>,
}

/// Keeps numeric line items only; upstream tables carry NaN as null or strings.
fn parse_table(name: &str, raw: Option<Map<String, Value>>) -> StatementTable {
    let mut periods = BTreeMap::new();
    for (period, items) in raw.unwrap_or_default() {
        let Value::Object(items) = items else {
            warn!("Skipping {} period {}: not an object", name, period);
            continue;
        };
        let line_items: BTreeMap<String, f64> = items
            .into_iter()
            .filter_map(|(item, value)| value.as_f64().map(|v| (item, v)))
            .collect();
        periods.insert(period, line_items);
    }
    StatementTable(periods).most_recent(MAX_PERIODS)
}

pub fn parse_snapshot(raw: &str) -> Result<TickerSnapshot> {
    let raw: RawSnapshot = serde_json::from_str(raw).context("Malformed snapshot JSON")?;
    Ok(TickerSnapshot {
        info: raw.info.unwrap_or_default(),
        statements: StatementSet {
            income: parse_table("income", raw.income),
            cashflow: parse_table("cashflow", raw.cashflow),
            balance_sheet: parse_table("balance_sheet", raw.balance_sheet),
        },
    })
}

pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Reading ticker snapshots from {}", root.display());
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Symbols like `M&M.NS` or `^GSPC` are file names as-is; only input that
    /// could leave the snapshot directory is refused.
    fn path_for(&self, ticker: &str) -> Result<PathBuf> {
        let valid = !ticker.is_empty()
            && !ticker.contains(['/', '\\', '\0'])
            && !ticker.contains("..");
        if !valid {
            return Err(anyhow!("Invalid ticker symbol: {}", ticker));
        }
        Ok(self.root.join(format!("{}.json", ticker)))
    }

    /// `ticker` must already be normalized.
    pub async fn load(&self, ticker: &str) -> Result<TickerSnapshot> {
        let path = self.path_for(ticker)?;
        debug!("Loading snapshot {}", path.display());

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(anyhow!("No data found for ticker {}", ticker));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let snapshot = parse_snapshot(&raw)
            .with_context(|| format!("Failed to parse snapshot for {}", ticker))?;
        info!(
            "Loaded {} ({} info fields, {} income periods)",
            ticker,
            snapshot.info.len(),
            snapshot.statements.income.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_snapshot() {
        let raw = json!({
            "info": { "trailingEps": 6.0, "beta": null },
            "income": { "2024": { "Net Income": 10.0, "Total Revenue": "NaN" } },
            "cashflow": { "2024": { "Free Cash Flow": 4.0 } },
            "balance_sheet": { "2024": { "Total Assets": 50.0 } },
        })
        .to_string();

        let snapshot = parse_snapshot(&raw).unwrap();
        assert_eq!(snapshot.info.get("trailingEps").and_then(Value::as_f64), Some(6.0));
        assert_eq!(snapshot.statements.income.line_item("2024", "Net Income"), Some(10.0));
        assert_eq!(snapshot.statements.income.line_item("2024", "Total Revenue"), None);
        assert_eq!(snapshot.statements.cashflow.line_item("2024", "Free Cash Flow"), Some(4.0));
    }

    #[test]
    fn test_sections_are_optional() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert!(snapshot.info.is_empty());
        assert!(snapshot.statements.income.is_empty());
        assert!(snapshot.statements.balance_sheet.is_empty());
    }

    #[test]
    fn test_tables_truncated_to_five_periods() {
        let income: Map<String, Value> = (2015..2025)
            .map(|year| (year.to_string(), json!({ "Net Income": year })))
            .collect();
        let raw = json!({ "income": income }).to_string();

        let snapshot = parse_snapshot(&raw).unwrap();
        let periods: Vec<&String> = snapshot.statements.income.periods().collect();
        assert_eq!(periods, vec!["2020", "2021", "2022", "2023", "2024"]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_snapshot("not json").is_err());
    }

    #[test]
    fn test_rejects_path_like_tickers() {
        let store = SnapshotStore::new("/tmp");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("..").is_err());
        assert!(store.path_for("A/B").is_err());
        assert!(store.path_for("A\\B").is_err());
        assert!(store.path_for("A\0B").is_err());
        assert!(store.path_for("TCS.NS").is_ok());
        assert!(store.path_for("M&M.NS").is_ok());
        assert!(store.path_for("^GSPC").is_ok());
    }

    #[tokio::test]
    async fn test_missing_ticker_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let err = store.load("NOPE").await.unwrap_err();
        assert_eq!(err.to_string(), "No data found for ticker NOPE");
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("AAPL.json"),
            json!({ "info": { "eps": 6.5 } }).to_string(),
        )
        .unwrap();

        let store = SnapshotStore::new(dir.path());
        let snapshot = store.load("AAPL").await.unwrap();
        assert_eq!(snapshot.info.get("eps").and_then(Value::as_f64), Some(6.5));
    }
}
