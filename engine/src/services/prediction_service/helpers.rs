// Input preparation shared by the prediction handlers
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::models::PriceSeries;

use crate::config::EngineSettings;
use crate::data::{HistoryProvider, MetadataProvider};

pub const CACHE_KEY_PREFIX: &str = "coin_prediction_v2_";

pub fn cache_key(asset_id: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, asset_id)
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// History after sanitation, and whether the two-point fallback had to stand in for it.
#[derive(Debug, Clone)]
pub struct PreparedHistory {
    pub series: PriceSeries,
    pub fallback: bool,
}

/// Fetches and sanitizes history. Provider failures and series shorter than
/// `min_observations` are replaced by the fallback series, never propagated.
pub fn prepare_history<P: HistoryProvider + ?Sized>(
    provider: &P,
    asset_id: &str,
    min_observations: usize,
    now: DateTime<Utc>,
) -> PreparedHistory {
    let raw = match provider.fetch_history(asset_id) {
        Ok(series) => series,
        Err(e) => {
            if e.is_not_found() {
                tracing::info!(asset_id = %asset_id, "No stored history, using fallback series");
            } else {
                tracing::warn!(asset_id = %asset_id, error = %e, "History unavailable, using fallback series");
            }
            return PreparedHistory { series: PriceSeries::fallback(now), fallback: true };
        }
    };

    let series = raw.sanitized();
    if series.len() < min_observations.max(1) {
        tracing::warn!(
            asset_id = %asset_id,
            received = raw.len(),
            usable = series.len(),
            required = min_observations,
            "Insufficient history, using fallback series"
        );
        return PreparedHistory { series: PriceSeries::fallback(now), fallback: true };
    }

    if series.len() < raw.len() {
        tracing::debug!(asset_id = %asset_id, dropped = raw.len() - series.len(), "Dropped invalid observations");
    }
    PreparedHistory { series, fallback: false }
}

/// Coin name and market cap with configured defaults for anything missing or invalid.
pub fn resolve_coin<P: MetadataProvider + ?Sized>(provider: &P, asset_id: &str, settings: &EngineSettings) -> (String, f64) {
    let info = provider.fetch_info(asset_id);
    if info.is_none() {
        tracing::debug!(asset_id = %asset_id, "No coin metadata, using defaults");
    }
    let info = info.unwrap_or_default();

    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| settings.default_coin_name.clone());
    let market_cap = info
        .market_cap
        .filter(|cap| cap.is_finite() && *cap > 0.0)
        .unwrap_or(settings.default_market_cap);
    (name, market_cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market_data::MarketDataStore;
    use chrono::{Duration, TimeZone};
    use rand::Rng;
    use shared::models::{CoinInfo, PricePoint};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint { timestamp: now() - Duration::days(i as i64), price: *p, volume: 1.0 })
            .collect()
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("bitcoin"), "coin_prediction_v2_bitcoin");
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let a: u64 = make_rng(Some(5)).gen();
        let b: u64 = make_rng(Some(5)).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_history_falls_back() {
        let store = MarketDataStore::new();
        let prepared = prepare_history(&store, "nope", 10, now());
        assert!(prepared.fallback);
        assert_eq!(prepared.series, PriceSeries::fallback(now()));
    }

    #[test]
    fn test_sanitation_then_minimum_check() {
        let mut store = MarketDataStore::new();
        let mut prices = vec![1.0; 9];
        prices.extend([f64::NAN, -2.0, 0.0]);
        store.add_points("thin", points(&prices));

        let prepared = prepare_history(&store, "thin", 10, now());
        assert!(prepared.fallback);

        let prepared = prepare_history(&store, "thin", 5, now());
        assert!(!prepared.fallback);
        assert_eq!(prepared.series.len(), 9);
    }

    #[test]
    fn test_resolve_coin_defaults() {
        let mut store = MarketDataStore::new();
        let settings = EngineSettings::default();
        assert_eq!(resolve_coin(&store, "x", &settings), ("Unknown".to_string(), 1e9));

        store.set_coin_info("x", CoinInfo { name: Some("Xcoin".into()), market_cap: Some(f64::NAN) });
        assert_eq!(resolve_coin(&store, "x", &settings), ("Xcoin".to_string(), 1e9));

        store.set_coin_info("x", CoinInfo { name: Some(" ".into()), market_cap: Some(5e6) });
        assert_eq!(resolve_coin(&store, "x", &settings), ("Unknown".to_string(), 5e6));
    }
}
