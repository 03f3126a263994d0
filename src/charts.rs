//! Chart-ready series for the display layer: allocation labels/values/
//! colors and a synthetic 30-day trailing performance line. Display-only;
//! nothing downstream feeds back into the core.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::types::Holding;

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// `hsl(h, 70%, 60%)` strings, hue evenly spaced across the entries.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Per-holding allocation, largest position first.
pub fn allocation(holdings: &[Holding]) -> AllocationChart {
    let mut sorted: Vec<&Holding> = holdings.iter().collect();
    sorted.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    AllocationChart {
        labels: sorted.iter().map(|h| h.symbol.clone()).collect(),
        values: sorted.iter().map(|h| h.total_value).collect(),
        colors: chart_colors(sorted.len()),
    }
}

pub fn chart_colors(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let hue = i as f64 * 360.0 / count as f64;
            format!("hsl({hue}, 70%, 60%)")
        })
        .collect()
}

/// Synthetic trailing series: 30 dated points ending today. Point `i` days
/// back is `0.9 + (i/30)*0.2` of the current total value plus up to 5%
/// jitter. There is no historical data source; this is demo shape only.
pub fn performance<R: Rng>(total_value: f64, today: NaiveDate, rng: &mut R) -> PerformanceSeries {
    let mut labels = Vec::with_capacity(30);
    let mut values = Vec::with_capacity(30);
    for days_back in (0..30).rev() {
        let date = today - Duration::days(days_back);
        labels.push(date.format("%b %-d").to_string());
        let factor = 0.9 + (days_back as f64 / 30.0) * 0.2 + rng.gen::<f64>() * 0.05;
        values.push(total_value * factor);
    }
    PerformanceSeries { labels, values }
}
