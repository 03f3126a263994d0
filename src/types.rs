//! Core domain types for holdings, quotes and portfolio summaries.

use serde::{Deserialize, Serialize};

/// One portfolio position. Pricing fields stay at zero until a quote
/// for the symbol has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Uppercase, trimmed ticker. Unique within a portfolio.
    pub symbol: String,
    /// Display label, may be empty.
    pub name: String,
    pub shares: f64,
    /// Cost basis per share.
    pub avg_cost: f64,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub total_value: f64,
    pub gain_loss: f64,
    /// Non-finite when the cost basis is zero; rendered as a sentinel.
    pub gain_loss_percent: f64,
}

impl Holding {
    pub fn new(symbol: String, name: String, shares: f64, avg_cost: f64) -> Self {
        Self {
            symbol,
            name,
            shares,
            avg_cost,
            current_price: 0.0,
            previous_close: 0.0,
            change: 0.0,
            change_percent: 0.0,
            total_value: 0.0,
            gain_loss: 0.0,
            gain_loss_percent: 0.0,
        }
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares * self.avg_cost
    }

    /// Name shown in tables; falls back to the symbol when empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.symbol
        } else {
            &self.name
        }
    }
}

/// Point-in-time price snapshot for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Portfolio-level aggregation. Recomputed in full on every update,
/// never cached or maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub today_change: f64,
    pub today_change_percent: f64,
    pub holdings_count: usize,
}

/// Sort order for the holdings view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Symbol,
    Name,
    Price,
    Change,
    #[default]
    Value,
}

impl SortKey {
    /// Unrecognized keys fall back to `Value`, the default sort.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "symbol" => SortKey::Symbol,
            "name" => SortKey::Name,
            "price" => SortKey::Price,
            "change" => SortKey::Change,
            _ => SortKey::Value,
        }
    }
}
