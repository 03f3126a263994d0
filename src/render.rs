//! Terminal rendering of the summary, holdings table and chart series.
//! Display glue only; the core never depends on anything produced here.

use crate::charts::{AllocationChart, PerformanceSeries};
use crate::types::{Holding, Summary};

/// Sentinel shown for non-finite ratios (zero cost basis and friends).
const NOT_AVAILABLE: &str = "N/A";

/// `$1,234.56` with thousands grouping, sentinel for non-finite input.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let negative = value < 0.0;
    let cents = format!("{:.2}", value.abs());
    let (int_part, frac_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if negative { "-" } else { "" };
    format!("${sign}{grouped}.{frac_part}")
}

/// Signed two-decimal percentage, sentinel for non-finite input.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

pub fn render_summary(s: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total Value      {:>14}  ({})\n",
        format_currency(s.total_value),
        format_percent(s.total_gain_loss_percent)
    ));
    out.push_str(&format!(
        "Today's Change   {:>14}  ({})\n",
        format_currency(s.today_change),
        format_percent(s.today_change_percent)
    ));
    out.push_str(&format!(
        "Total Gain/Loss  {:>14}  ({})\n",
        format_currency(s.total_gain_loss),
        format_percent(s.total_gain_loss_percent)
    ));
    out.push_str(&format!("Holdings         {:>14}\n", s.holdings_count));
    out
}

pub fn render_table(view: &[Holding]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<22} {:>10} {:>10} {:>10} {:>20} {:>12} {:>22}\n",
        "Symbol", "Name", "Shares", "Avg Cost", "Price", "Change", "Value", "Gain/Loss"
    ));
    if view.is_empty() {
        out.push_str("(no holdings match)\n");
        return out;
    }
    for h in view {
        out.push_str(&format!(
            "{:<8} {:<22} {:>10} {:>10} {:>10} {:>20} {:>12} {:>22}\n",
            h.symbol,
            truncate(h.display_name(), 22),
            h.shares,
            format_currency(h.avg_cost),
            format_currency(h.current_price),
            format!(
                "{} ({})",
                format_currency(h.change),
                format_percent(h.change_percent)
            ),
            format_currency(h.total_value),
            format!(
                "{} ({})",
                format_currency(h.gain_loss),
                format_percent(h.gain_loss_percent)
            ),
        ));
    }
    out
}

pub fn render_allocation(chart: &AllocationChart) -> String {
    let total: f64 = chart.values.iter().sum();
    let mut out = String::from("Allocation\n");
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let share = if total > 0.0 {
            value / total * 100.0
        } else {
            f64::NAN
        };
        out.push_str(&format!(
            "  {:<8} {:>14}  {}\n",
            label,
            format_currency(*value),
            format_percent(share)
        ));
    }
    out
}

pub fn render_performance(series: &PerformanceSeries) -> String {
    let mut out = String::from("Trailing 30 days (synthetic)\n  ");
    out.push_str(&sparkline(&series.values));
    out.push('\n');
    if let (Some(first), Some(last)) = (series.labels.first(), series.labels.last()) {
        out.push_str(&format!("  {first} .. {last}\n"));
    }
    out
}

fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];
    let (min, max) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    });
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= 0.0 {
                BARS[0]
            } else {
                let idx = ((v - min) / span * 7.0).round() as usize;
                BARS[idx.min(7)]
            }
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}
