// src/services/mod.rs
pub mod cost_of_capital;
pub mod fundamentals;
pub mod intrinsic_value;
pub mod snapshot;
pub mod statements;
pub mod valuation;
