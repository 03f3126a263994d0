//! Normalize heterogeneous spreadsheet rows into canonical holdings.
//! Column names vary by broker export, so each field is located by an
//! ordered list of candidate names, matched case-insensitively.

use serde_json::Value;
use thiserror::Error;

use crate::types::Holding;

/// One decoded spreadsheet row: column name -> cell value. Values may be
/// strings or numbers depending on the decoder.
pub type Row = serde_json::Map<String, Value>;

pub const SYMBOL_COLUMNS: &[&str] = &["symbol", "ticker", "stock symbol", "stock"];
pub const NAME_COLUMNS: &[&str] = &["company name", "name", "company", "description"];
pub const SHARES_COLUMNS: &[&str] = &["shares", "quantity", "qty", "share count", "position"];
pub const COST_COLUMNS: &[&str] = &[
    "average cost",
    "avg cost",
    "cost basis",
    "price paid",
    "purchase price",
];

#[derive(Debug, Error)]
pub enum ImportError {
    /// Aborts the whole import, matching the source tool's behavior.
    #[error("row {row}: no stock symbol column found (tried {:?})", SYMBOL_COLUMNS)]
    MissingSymbolColumn { row: usize },
    #[error("no usable holdings in the imported file")]
    NoRows,
    #[error("could not read portfolio file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode portfolio file: {0}")]
    Csv(#[from] csv::Error),
}

/// Map raw rows to holdings. Symbols are upper-cased and trimmed; rows
/// without a positive share count are dropped; a duplicated symbol keeps
/// the last occurrence. The first row with no symbol-like column at all
/// aborts the batch with [`ImportError::MissingSymbolColumn`].
pub fn normalize(rows: &[Row]) -> Result<Vec<Holding>, ImportError> {
    let mut out: Vec<Holding> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let symbol_cell = find_column(row, SYMBOL_COLUMNS)
            .ok_or(ImportError::MissingSymbolColumn { row: i + 1 })?;
        let symbol = cell_string(symbol_cell).trim().to_uppercase();

        let name = find_column(row, NAME_COLUMNS)
            .map(cell_string)
            .unwrap_or_default();
        let shares = find_column(row, SHARES_COLUMNS)
            .and_then(cell_f64)
            .unwrap_or(0.0);
        let avg_cost = find_column(row, COST_COLUMNS)
            .and_then(cell_f64)
            .unwrap_or(0.0);

        if symbol.is_empty() || !(shares > 0.0) {
            continue;
        }

        let holding = Holding::new(symbol, name, shares, avg_cost);
        match out.iter_mut().find(|h| h.symbol == holding.symbol) {
            // Last occurrence wins, first occurrence keeps its slot.
            Some(existing) => *existing = holding,
            None => out.push(holding),
        }
    }
    Ok(out)
}

/// First candidate name that matches a column wins; candidates are tried
/// in list order, not row order.
fn find_column<'a>(row: &'a Row, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|want| {
        row.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(want))
            .map(|(_, v)| v)
    })
}

fn cell_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
