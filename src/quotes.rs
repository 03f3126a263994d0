//! Quote retrieval: one GET per symbol against the provider, joined as a
//! batch, with synthetic demo quotes whenever real data is unavailable.

use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::future::join_all;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Holding, Quote};

pub struct QuoteClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl QuoteClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch a quote for every holding, all requests in flight together.
    ///
    /// The batch is all-or-nothing: a single transport failure downgrades
    /// the entire cycle to synthetic quotes for every symbol (with a
    /// warning), never a partial result. A response that arrives but lacks
    /// the expected quote fields gets a synthetic quote for that symbol
    /// only. The returned map always covers every requested symbol.
    pub async fn fetch_all<R: Rng>(
        &self,
        holdings: &[Holding],
        rng: &mut R,
    ) -> HashMap<String, Quote> {
        if holdings.is_empty() {
            return HashMap::new();
        }
        let results = join_all(holdings.iter().map(|h| self.fetch_one(&h.symbol))).await;
        assemble_quotes(holdings, results, rng)
    }

    async fn fetch_one(&self, symbol: &str) -> Result<Value> {
        let body = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await
            .with_context(|| format!("quote request for {symbol}"))?
            .json::<Value>()
            .await
            .with_context(|| format!("quote response body for {symbol}"))?;
        Ok(body)
    }
}

/// Combine one joined batch of responses into the quote map. A transport
/// error anywhere downgrades every symbol to synthetic; an intact response
/// that fails to parse downgrades only its own symbol.
fn assemble_quotes<R: Rng>(
    holdings: &[Holding],
    results: Vec<Result<Value>>,
    rng: &mut R,
) -> HashMap<String, Quote> {
    let mut quotes = HashMap::with_capacity(holdings.len());

    if let Some(err) = results.iter().find_map(|r| r.as_ref().err()) {
        warn!(
            "quote fetch failed ({err:#}); using synthetic data for all {} symbols",
            holdings.len()
        );
        for h in holdings {
            quotes.insert(h.symbol.clone(), synthetic_quote(rng, basis_for(h)));
        }
        return quotes;
    }

    for (h, result) in holdings.iter().zip(results) {
        let Ok(body) = result else { continue };
        match parse_global_quote(&body) {
            Some(q) => {
                debug!("quote {} = {:.2}", h.symbol, q.price);
                quotes.insert(h.symbol.clone(), q);
            }
            None => {
                warn!("no quote data returned for {}; using synthetic", h.symbol);
                quotes.insert(h.symbol.clone(), synthetic_quote(rng, basis_for(h)));
            }
        }
    }
    quotes
}

/// Reference price for synthetic data: the position's cost basis per
/// share, or 100 when there is none to anchor on.
fn basis_for(holding: &Holding) -> f64 {
    if holding.avg_cost > 0.0 {
        holding.avg_cost
    } else {
        100.0
    }
}

/// Random quote shaped like a real one: price within ±20% of the basis,
/// previous close within ±2% of the price.
pub fn synthetic_quote<R: Rng>(rng: &mut R, basis: f64) -> Quote {
    let price = basis * rng.gen_range(0.8..1.2);
    let previous_close = price * rng.gen_range(0.98..1.02);
    let change = price - previous_close;
    let change_percent = change / previous_close * 100.0;
    Quote {
        price,
        previous_close,
        change,
        change_percent,
    }
}

/// Pull the fields out of a `GLOBAL_QUOTE` response. The percent field is
/// a string with a trailing `%` on the wire.
fn parse_global_quote(body: &Value) -> Option<Quote> {
    let q = body.get("Global Quote")?;
    Some(Quote {
        price: field_f64(q, "05. price")?,
        previous_close: field_f64(q, "08. previous close")?,
        change: field_f64(q, "09. change")?,
        change_percent: field_f64(q, "10. change percent")?,
    })
}

fn field_f64(v: &Value, key: &str) -> Option<f64> {
    match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "160.0000",
                "08. previous close": "155.0000",
                "09. change": "5.0000",
                "10. change percent": "3.3000%"
            }
        })
    }

    #[test]
    fn parses_global_quote_and_strips_percent() {
        let q = parse_global_quote(&sample_body()).unwrap();
        assert_eq!(q.price, 160.0);
        assert_eq!(q.previous_close, 155.0);
        assert_eq!(q.change, 5.0);
        assert_eq!(q.change_percent, 3.3);
    }

    #[test]
    fn missing_quote_object_yields_none() {
        assert!(parse_global_quote(&json!({"Note": "rate limited"})).is_none());
        assert!(parse_global_quote(&json!({})).is_none());
    }

    #[test]
    fn partial_quote_object_yields_none() {
        let body = json!({"Global Quote": {"05. price": "160.0"}});
        assert!(parse_global_quote(&body).is_none());
    }

    #[test]
    fn synthetic_quote_stays_in_policy_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let q = synthetic_quote(&mut rng, 150.0);
            assert!(q.price >= 150.0 * 0.8 && q.price < 150.0 * 1.2);
            assert!(q.previous_close >= q.price * 0.98 && q.previous_close < q.price * 1.02);
            assert!((q.change - (q.price - q.previous_close)).abs() < 1e-9);
            let expect_pct = q.change / q.previous_close * 100.0;
            assert!((q.change_percent - expect_pct).abs() < 1e-9);
        }
    }

    #[test]
    fn synthetic_quote_is_deterministic_under_a_seed() {
        let a = synthetic_quote(&mut StdRng::seed_from_u64(42), 100.0);
        let b = synthetic_quote(&mut StdRng::seed_from_u64(42), 100.0);
        assert_eq!(a, b);
    }

    fn holdings2() -> Vec<Holding> {
        vec![
            Holding::new("AAPL".into(), String::new(), 10.0, 150.0),
            Holding::new("MSFT".into(), String::new(), 5.0, 300.0),
        ]
    }

    #[test]
    fn one_transport_failure_downgrades_the_whole_batch() {
        let holdings = holdings2();
        // AAPL came back fine; the MSFT request failed on the wire.
        let results = vec![Ok(sample_body()), Err(anyhow::anyhow!("connection reset"))];
        let mut rng = StdRng::seed_from_u64(3);
        let quotes = assemble_quotes(&holdings, results, &mut rng);

        assert_eq!(quotes.len(), 2);
        // The good AAPL response is discarded too: its quote must be the
        // synthetic one drawn around its cost basis, not the real 160.
        let mut expect_rng = StdRng::seed_from_u64(3);
        assert_eq!(quotes["AAPL"], synthetic_quote(&mut expect_rng, 150.0));
        assert_eq!(quotes["MSFT"], synthetic_quote(&mut expect_rng, 300.0));
    }

    #[test]
    fn unparseable_body_downgrades_only_its_own_symbol() {
        let holdings = holdings2();
        let results = vec![Ok(sample_body()), Ok(json!({"Note": "rate limited"}))];
        let mut rng = StdRng::seed_from_u64(4);
        let quotes = assemble_quotes(&holdings, results, &mut rng);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes["AAPL"].price, 160.0);
        assert_eq!(quotes["AAPL"].change_percent, 3.3);
        let msft = quotes["MSFT"];
        assert_ne!(msft.price, 160.0);
        assert!(msft.price >= 300.0 * 0.8 && msft.price < 300.0 * 1.2);
    }

    #[test]
    fn all_good_responses_pass_through_untouched() {
        let holdings = holdings2();
        let results = vec![Ok(sample_body()), Ok(sample_body())];
        let quotes = assemble_quotes(&holdings, results, &mut StdRng::seed_from_u64(5));
        assert_eq!(quotes["AAPL"].price, 160.0);
        assert_eq!(quotes["MSFT"].price, 160.0);
    }

    #[test]
    fn basis_falls_back_to_100_without_cost() {
        let h = Holding::new("X".into(), String::new(), 1.0, 0.0);
        assert_eq!(basis_for(&h), 100.0);
        let h = Holding::new("Y".into(), String::new(), 1.0, 50.0);
        assert_eq!(basis_for(&h), 50.0);
    }
}
