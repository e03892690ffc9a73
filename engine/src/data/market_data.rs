// In-memory history and metadata per asset
use chrono::{DateTime, Utc};
use shared::models::{CoinInfo, PricePoint, PriceSeries};
use std::collections::HashMap;

use super::{HistoryProvider, MetadataProvider};
use crate::error::EngineError;

pub struct MarketDataStore {
    series: HashMap<String, Vec<PricePoint>>,
    coins: HashMap<String, CoinInfo>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            series: HashMap::new(),
            coins: HashMap::new(),
        }
    }

    /// Merges new observations, keeping the series sorted with one point per timestamp.
    /// Returns the number of stored points for the asset.
    pub fn add_points(&mut self, asset_id: &str, new_points: Vec<PricePoint>) -> usize {
        let points = self.series.entry(asset_id.to_string()).or_default();
        points.extend(new_points);
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        points.len()
    }

    pub fn get_series(
        &self,
        asset_id: &str,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<PriceSeries> {
        self.series.get(asset_id).map(|points| {
            PriceSeries::new(
                points
                    .iter()
                    .filter(|p| from_timestamp.map_or(true, |start| p.timestamp >= start))
                    .filter(|p| to_timestamp.map_or(true, |end| p.timestamp <= end))
                    .cloned()
                    .collect(),
            )
        })
    }

    pub fn set_coin_info(&mut self, asset_id: &str, info: CoinInfo) {
        self.coins.insert(asset_id.to_string(), info);
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for MarketDataStore {
    fn fetch_history(&self, asset_id: &str) -> Result<PriceSeries, EngineError> {
        self.get_series(asset_id, None, None)
            .ok_or_else(|| EngineError::MarketDataError(format!("History not found for asset '{}'", asset_id)))
    }
}

impl MetadataProvider for MarketDataStore {
    fn fetch_info(&self, asset_id: &str) -> Option<CoinInfo> {
        self.coins.get(asset_id).cloned()
    }
}
