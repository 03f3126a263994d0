//! Entry point. Wires CSV import -> Normalizer -> Quotes -> Aggregation -> View.

mod charts;
mod config;
mod normalize;
mod portfolio;
mod quotes;
mod render;
mod sheet;
mod types;
mod view;

use anyhow::Context;
use chrono::Local;
use dotenvy::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::portfolio::Portfolio;
use crate::quotes::QuoteClient;
use crate::types::SortKey;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = args
        .next()
        .context("usage: portfolio-dash <portfolio.csv> [config.yaml]")?;
    let cfg_path = args.next().unwrap_or_else(|| "config.yaml".to_string());
    let cfg = config::AppConfig::load_or_default(&cfg_path)
        .with_context(|| format!("load config {cfg_path}"))?;

    // Import replaces the collection wholesale; a failed import leaves
    // nothing behind to render.
    let holdings = sheet::import_holdings(&csv_path)
        .with_context(|| format!("import portfolio {csv_path}"))?;
    info!("imported {} holdings from {}", holdings.len(), csv_path);

    let mut portfolio = Portfolio::default();
    portfolio.set_holdings(holdings);

    let client = QuoteClient::new(cfg.quotes.base_url.clone(), cfg.api_key());
    let mut rng = StdRng::from_entropy();
    let sort_key = SortKey::parse(&cfg.view.sort_by);

    refresh_cycle(&client, &mut portfolio, &mut rng).await;
    print_dashboard(&portfolio, &cfg.view.search, sort_key, &mut rng);

    // Optional watch mode: periodically re-fetch quotes for the current
    // holdings, the way the dashboard's refresh button did.
    if let Some(secs) = cfg.refresh.interval_sec {
        info!("refreshing quotes every {secs}s (ctrl-c to stop)");
        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        ticker.tick().await; // the first tick fires immediately
        loop {
            ticker.tick().await;
            refresh_cycle(&client, &mut portfolio, &mut rng).await;
            print_dashboard(&portfolio, &cfg.view.search, sort_key, &mut rng);
        }
    }

    Ok(())
}

/// One fetch cycle: start every lookup together, join, then apply the
/// quote map to the generation it was fetched for.
async fn refresh_cycle(client: &QuoteClient, portfolio: &mut Portfolio, rng: &mut StdRng) {
    let generation = portfolio.generation();
    let quotes = client.fetch_all(portfolio.holdings(), rng).await;
    if !portfolio.apply_quotes(generation, &quotes) {
        warn!("quotes arrived for a replaced portfolio; skipped");
    }
}

fn print_dashboard(portfolio: &Portfolio, search: &str, sort_key: SortKey, rng: &mut StdRng) {
    let summary = portfolio.summarize();
    let projected = view::project(portfolio.holdings(), search, sort_key);
    let alloc = charts::allocation(portfolio.holdings());
    let perf = charts::performance(summary.total_value, Local::now().date_naive(), rng);

    println!();
    print!("{}", render::render_summary(&summary));
    println!();
    print!("{}", render::render_table(&projected));
    println!();
    print!("{}", render::render_allocation(&alloc));
    println!();
    print!("{}", render::render_performance(&perf));
}
