//! Portfolio state: the holdings collection plus the metrics aggregation.
//! Single writer; holdings are only ever replaced wholesale on import and
//! priced wholesale from one fetch cycle's quote map.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Holding, Quote, Summary};

#[derive(Debug, Default)]
pub struct Portfolio {
    holdings: Vec<Holding>,
    /// Bumped on every wholesale replacement. Quotes fetched under an
    /// older generation are discarded instead of being applied.
    generation: u64,
}

impl Portfolio {
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the whole collection (a fresh import). Any in-flight fetch
    /// keyed to the prior generation becomes stale.
    pub fn set_holdings(&mut self, holdings: Vec<Holding>) {
        self.holdings = holdings;
        self.generation += 1;
        debug!(
            "holdings replaced: {} positions, generation {}",
            self.holdings.len(),
            self.generation
        );
    }

    /// Price the holdings from one fetch cycle's quote map. Returns false
    /// (and changes nothing) when the quotes were fetched under an older
    /// generation. Holdings without a matching quote stay unpriced.
    pub fn apply_quotes(&mut self, generation: u64, quotes: &HashMap<String, Quote>) -> bool {
        if generation != self.generation {
            debug!(
                "discarding stale quotes (fetched at generation {generation}, now {})",
                self.generation
            );
            return false;
        }
        for h in &mut self.holdings {
            if let Some(q) = quotes.get(&h.symbol) {
                price_holding(h, q);
            }
        }
        true
    }

    pub fn summarize(&self) -> Summary {
        summarize(&self.holdings)
    }
}

/// Per-holding derived values are a pure function of the holding and its
/// quote; nothing here looks at any other holding.
fn price_holding(h: &mut Holding, q: &Quote) {
    h.current_price = q.price;
    h.previous_close = q.previous_close;
    h.change = q.change;
    h.change_percent = q.change_percent;
    h.total_value = h.shares * h.current_price;
    h.gain_loss = h.total_value - h.cost_basis();
    // Non-finite when the cost basis is zero; rendering maps it to N/A.
    h.gain_loss_percent = h.gain_loss / h.cost_basis() * 100.0;
}

/// Full recomputation every time, no incremental maintenance.
pub fn summarize(holdings: &[Holding]) -> Summary {
    let total_value: f64 = holdings.iter().map(|h| h.total_value).sum();
    let total_cost: f64 = holdings.iter().map(|h| h.cost_basis()).sum();
    let total_gain_loss = total_value - total_cost;
    let total_gain_loss_percent = total_gain_loss / total_cost * 100.0;
    let today_change: f64 = holdings.iter().map(|h| h.change * h.shares).sum();
    // Denominator approximates yesterday's total value; kept as-is for
    // parity with the dashboard this replaces.
    let today_change_percent = today_change / (total_value - today_change) * 100.0;
    Summary {
        total_value,
        total_cost,
        total_gain_loss,
        total_gain_loss_percent,
        today_change,
        today_change_percent,
        holdings_count: holdings.len(),
    }
}
