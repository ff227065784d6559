//! Aggregate statistics over the cached catalog

use serde::{Deserialize, Serialize};

use crate::models::Boat;

/// Earliest build year considered plausible
const MIN_PLAUSIBLE_YEAR: i64 = 1900;

/// Price and build-year aggregates for a set of boats
///
/// Prices ignore missing and zero values; years ignore anything not after
/// 1900. Every aggregate is zero when nothing qualifies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub avg_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub avg_year: i64,
    pub max_year: i64,
    pub min_year: i64,
    pub total_boats: usize,
}

/// Compute [`CatalogStats`] for `boats`
pub fn calculate_stats(boats: &[Boat]) -> CatalogStats {
    let prices: Vec<f64> = boats.iter().filter_map(Boat::sell_price).collect();
    let years: Vec<i64> = boats
        .iter()
        .filter_map(Boat::year_built)
        .filter(|y| *y > MIN_PLAUSIBLE_YEAR)
        .collect();

    let (avg_price, max_price, min_price) = if prices.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            prices.iter().sum::<f64>() / prices.len() as f64,
            prices.iter().copied().fold(f64::MIN, f64::max),
            prices.iter().copied().fold(f64::MAX, f64::min),
        )
    };

    let (avg_year, max_year, min_year) = if years.is_empty() {
        (0, 0, 0)
    } else {
        (
            // Truncated, matching what the dashboard displays
            years.iter().sum::<i64>() / years.len() as i64,
            years.iter().copied().max().unwrap_or(0),
            years.iter().copied().min().unwrap_or(0),
        )
    };

    CatalogStats {
        avg_price,
        max_price,
        min_price,
        avg_year,
        max_year,
        min_year,
        total_boats: boats.len(),
    }
}
