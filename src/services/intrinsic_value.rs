// src/services/intrinsic_value.rs
use log::debug;

use crate::models::ValuationResult;

pub const SENSITIVITY_STEP: f64 = 0.02;

/// Single-stage Gordon growth value per share. `None` when the model does not
/// apply: zero eps (a missing eps arrives here as the 0.0 default), or a
/// discount rate not above growth.
pub fn gordon_growth(eps: f64, growth_rate: f64, discount_rate: f64) -> Option<f64> {
    if eps != 0.0 && discount_rate > growth_rate {
        Some(eps * (1.0 + growth_rate) / (discount_rate - growth_rate))
    } else {
        None
    }
}

/// Central value plus a band where "low" lowers growth and raises the
/// discount rate by `step`, and "high" does the opposite. Each leg is gated
/// on its own rates and the results are reported as-is.
pub fn valuation_band(
    eps: f64,
    growth_rate: f64,
    discount_rate: f64,
    step: f64,
) -> ValuationResult {
    let (low_growth, low_disc) = (growth_rate - step, discount_rate + step);
    let (high_growth, high_disc) = (growth_rate + step, discount_rate - step);

    let result = ValuationResult {
        intrinsic_value: gordon_growth(eps, growth_rate, discount_rate),
        valuation_low: gordon_growth(eps, low_growth, low_disc),
        valuation_high: gordon_growth(eps, high_growth, high_disc),
    };
    debug!(
        "Gordon growth g={:.4} r={:.4}: {:?}",
        growth_rate, discount_rate, result
    );
    result
}
