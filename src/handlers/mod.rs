// src/handlers/mod.rs
use log::error;
use warp::Rejection;

use self::error::ApiError;

pub mod error;
pub mod financials;
pub mod valuation;

/// Path segments reach handlers still percent-encoded (`m%26m`, `%5EGSPC`).
pub(crate) fn decode_ticker(raw: &str) -> Result<String, Rejection> {
    urlencoding::decode(raw)
        .map(|ticker| ticker.into_owned())
        .map_err(|e| {
            error!("Ticker {} is not valid UTF-8 once decoded: {}", raw, e);
            warp::reject::custom(ApiError::new(format!("Invalid ticker symbol: {}", raw)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ticker() {
        assert_eq!(decode_ticker("m%26m").unwrap(), "m&m");
        assert_eq!(decode_ticker("%5EGSPC").unwrap(), "^GSPC");
        assert_eq!(decode_ticker("aapl").unwrap(), "aapl");
    }

    #[test]
    fn test_decode_ticker_rejects_invalid_utf8() {
        assert!(decode_ticker("%FF%FE").is_err());
    }
}
