//! Spreadsheet decoding: read a portfolio CSV export into untyped rows
//! for the normalizer. Column names are whatever the export used.

use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::debug;

use crate::normalize::{self, ImportError, Row};
use crate::types::Holding;

/// Read every record of the file as a column-name -> value map. Cells are
/// kept as strings; the normalizer does its own numeric parsing.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Row>, ImportError> {
    // Open the file ourselves so a missing/unreadable path surfaces as an
    // I/O failure, distinct from a malformed spreadsheet.
    let file = std::fs::File::open(path.as_ref())?;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(row);
    }
    debug!("decoded {} rows from {:?}", rows.len(), path.as_ref());
    Ok(rows)
}

/// Full import path: decode the file and normalize it. A file that yields
/// no usable holdings is an error rather than an empty dashboard.
pub fn import_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>, ImportError> {
    let rows = read_rows(path)?;
    let holdings = normalize::normalize(&rows)?;
    if holdings.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal scoped temp file so these tests need no extra dev-deps.
    struct TempCsv(std::path::PathBuf);

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn write_csv(name: &str, contents: &str) -> TempCsv {
        let mut p = std::env::temp_dir();
        p.push(format!("portfolio-dash-{}-{name}.csv", std::process::id()));
        std::fs::write(&p, contents).unwrap();
        TempCsv(p)
    }

    #[test]
    fn decodes_headers_and_cells() {
        let f = write_csv("decode", "Symbol,Shares,Average Cost\nAAPL,10,150\nMSFT,5,310\n");
        let rows = read_rows(&f.0).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Symbol"], serde_json::json!("AAPL"));
        assert_eq!(rows[1]["Shares"], serde_json::json!("5"));
    }

    #[test]
    fn import_maps_to_holdings() {
        let f = write_csv("import", "Ticker,Company Name,Qty,Avg Cost\naapl,Apple Inc,10,150\n");
        let hs = import_holdings(&f.0).unwrap();
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].symbol, "AAPL");
        assert_eq!(hs[0].shares, 10.0);
    }

    #[test]
    fn import_with_no_usable_rows_is_an_error() {
        let f = write_csv("empty", "Symbol,Shares\nAAPL,0\n");
        assert!(matches!(import_holdings(&f.0), Err(ImportError::NoRows)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = import_holdings("/nonexistent/portfolio.csv").unwrap_err();
        assert!(matches!(err, ImportError::Io(_)), "got {err:?}");
    }
}
