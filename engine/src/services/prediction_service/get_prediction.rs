// Full prediction bundle: cache lookup, input preparation, forecast, cache store
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use shared::models::{PredictionBundle, PriceSeries};

use super::helpers::{cache_key, make_rng, prepare_history, resolve_coin};
use crate::config::EngineSettings;
use crate::data::cache::PredictionCache;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use crate::prediction::Forecaster;

fn cached_bundle(cache: &dyn PredictionCache, key: &str) -> Option<PredictionBundle> {
    match cache.get(key) {
        Ok(Some(value)) => match serde_json::from_value::<PredictionBundle>(value) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable cached prediction");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cache lookup failed");
            None
        }
    }
}

fn store_bundle(cache: &dyn PredictionCache, key: &str, bundle: &PredictionBundle, settings: &EngineSettings) {
    match cache.purge_expired() {
        Ok(0) => {}
        Ok(purged) => tracing::debug!(purged, "Purged expired cache entries"),
        Err(e) => tracing::warn!(error = %e, "Cache purge failed"),
    }

    let stored = serde_json::to_value(bundle)
        .map_err(EngineError::from)
        .and_then(|value| cache.set(key, value, settings.cache_ttl()));
    if let Err(e) = stored {
        tracing::warn!(key = %key, error = %e, "Failed to cache prediction");
    }
}

pub async fn handle_get_prediction(
    asset_id: &str,
    refresh: bool,
    now: DateTime<Utc>,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    cache: &dyn PredictionCache,
    settings: &EngineSettings,
) -> Result<PredictionBundle, EngineError> {
    let started = Instant::now();
    let key = cache_key(asset_id);

    if !refresh {
        if let Some(bundle) = cached_bundle(cache, &key) {
            tracing::info!(asset_id = %asset_id, "Serving cached prediction");
            return Ok(bundle);
        }
    }

    let (prepared, (coin_name, market_cap)) = {
        let store = market_data_store.read().await;
        (
            prepare_history(&*store, asset_id, settings.min_observations, now),
            resolve_coin(&*store, asset_id, settings),
        )
    };

    let options = settings.forecast_options();
    let forecaster = Forecaster::new(prepared.series, market_cap, now, options.clone())
        .or_else(|| Forecaster::new(PriceSeries::fallback(now), market_cap, now, options))
        .ok_or_else(|| EngineError::ProcessingError(format!("No usable price data for '{}'", asset_id)))?;

    let mut rng = make_rng(settings.rng_seed);
    let bundle = forecaster.bundle(&mut rng);
    store_bundle(cache, &key, &bundle, settings);

    tracing::info!(
        asset_id = %asset_id,
        coin = %coin_name,
        current_price = bundle.current_price,
        fallback_history = prepared.fallback,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Prediction computed"
    );
    Ok(bundle)
}
