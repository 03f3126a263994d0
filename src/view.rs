//! Search filter and sort order over the holdings collection. Pure: the
//! projected view is re-derived from the holdings alone on every call.

use crate::types::{Holding, SortKey};

/// Case-insensitive substring filter over symbol or name (empty term
/// keeps everything), then a stable sort by the chosen key.
pub fn project(holdings: &[Holding], search_term: &str, sort_key: SortKey) -> Vec<Holding> {
    let term = search_term.trim().to_lowercase();
    let mut view: Vec<Holding> = holdings
        .iter()
        .filter(|h| {
            term.is_empty()
                || h.symbol.to_lowercase().contains(&term)
                || h.name.to_lowercase().contains(&term)
        })
        .cloned()
        .collect();

    match sort_key {
        SortKey::Symbol => view.sort_by(|a, b| a.symbol.cmp(&b.symbol)),
        SortKey::Name => view.sort_by(|a, b| a.display_name().cmp(b.display_name())),
        SortKey::Price => view.sort_by(|a, b| b.current_price.total_cmp(&a.current_price)),
        SortKey::Change => view.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent)),
        SortKey::Value => view.sort_by(|a, b| b.total_value.total_cmp(&a.total_value)),
    }
    view
}
