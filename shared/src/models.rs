use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::month_name;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
}

// Ordered historical observations for one asset, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Two-point series used when the history provider fails or returns too little data.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            points: vec![
                PricePoint { timestamp: now - Duration::days(30), price: 1000.0, volume: 1_000_000.0 },
                PricePoint { timestamp: now, price: 1100.0, volume: 1_100_000.0 },
            ],
        }
    }

    /// Drops observations whose price is not a positive finite number.
    /// Missing or invalid volumes are read as zero.
    pub fn sanitized(&self) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| p.price.is_finite() && p.price > 0.0)
            .map(|p| PricePoint {
                volume: if p.volume.is_finite() && p.volume > 0.0 { p.volume } else { 0.0 },
                ..*p
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn since(&self, from: DateTime<Utc>) -> impl Iterator<Item = &PricePoint> {
        self.points.iter().filter(move |p| p.timestamp >= from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPhase {
    Bullish,
    Bearish,
    Neutral,
    Recovery,
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketPhase::Bullish => "bullish",
            MarketPhase::Bearish => "bearish",
            MarketPhase::Neutral => "neutral",
            MarketPhase::Recovery => "recovery",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub roi: f64,
    pub confidence: f64,
    pub sentiment: String,
}

// One simulated month of the long-horizon path. `month` is 1-based (January = 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPrediction {
    pub month: u32,
    pub year: i32,
    pub price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub roi: f64,
    pub sentiment: String,
    pub market_phase: MarketPhase,
    pub confidence: f64,
}

impl MonthlyPrediction {
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl From<&MonthlyPrediction> for PredictionResult {
    fn from(m: &MonthlyPrediction) -> Self {
        PredictionResult {
            price: m.price,
            min_price: m.min_price,
            max_price: m.max_price,
            roi: m.roi,
            confidence: m.confidence,
            sentiment: m.sentiment.clone(),
        }
    }
}

pub type YearlyPredictions = BTreeMap<i32, Vec<MonthlyPrediction>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonPredictions {
    pub three_day: PredictionResult,
    pub five_day: PredictionResult,
    pub one_month: PredictionResult,
    pub three_month: PredictionResult,
    pub six_month: PredictionResult,
    pub one_year: PredictionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSummary {
    pub sma50: f64,
    pub sma200: f64,
    pub rsi14: f64,
    pub fear_greed_index: u32,
    pub fear_greed_zone: String,
    pub green_days: String,
    pub is_profitable: bool,
}

// Everything the presentation layer needs for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBundle {
    pub current_price: f64,
    pub predictions: HorizonPredictions,
    pub yearly_predictions: YearlyPredictions,
    pub technical_indicators: TechnicalSummary,
    pub chart_data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPredictions {
    pub three_day: PredictionResult,
    pub five_day: PredictionResult,
    pub one_month: PredictionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickMetadata {
    pub coin_name: String,
    pub current_price: f64,
    pub volatility: f64,
    pub calculated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub fallback: bool,
}

// Short-horizon-only estimates, cheap enough to compute on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSummary {
    pub predictions: QuickPredictions,
    pub metadata: QuickMetadata,
}

// Asset metadata as returned by a metadata provider; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub name: Option<String>,
    pub market_cap: Option<f64>,
}
