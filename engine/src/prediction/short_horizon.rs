// Deterministic point forecast for targets less than two weeks out
use shared::models::PredictionResult;
use shared::utils::{clamp_or, finite_or};

use super::sentiment::{score_sentiment, SentimentInputs};
use crate::indicators::{compute_indicator_set, Levels};
use crate::models::IndicatorSet;

pub const SHORT_HORIZON_DAYS: i64 = 14;

const CHANGE_EPSILON: f64 = 0.0001;
const BASE_BULLISH_BIAS: f64 = 0.1;

/// Returned when there are fewer than two observations to work with.
pub fn insufficient_data_result(current_price: f64) -> PredictionResult {
    PredictionResult {
        price: current_price * 1.05,
        min_price: current_price * 0.95,
        max_price: current_price * 1.15,
        roi: 5.0,
        confidence: 70.0,
        sentiment: "Neutral".to_string(),
    }
}

fn last_change(values: &[f64]) -> f64 {
    match values {
        [.., previous, last] => (last - previous) / previous.max(CHANGE_EPSILON),
        _ => 0.01,
    }
}

pub struct ShortHorizonPredictor {
    current_price: f64,
    indicators: IndicatorSet,
    price_change_24h: f64,
    volume_change_24h: f64,
}

impl ShortHorizonPredictor {
    /// `None` when either series has fewer than two observations.
    pub fn new(prices: &[f64], volumes: &[f64], current_price: f64) -> Option<Self> {
        if prices.len() < 2 || volumes.len() < 2 {
            return None;
        }
        Some(Self::with_indicators(prices, volumes, current_price, compute_indicator_set(prices, volumes)))
    }

    pub fn with_indicators(prices: &[f64], volumes: &[f64], current_price: f64, indicators: IndicatorSet) -> Self {
        Self {
            current_price,
            indicators,
            price_change_24h: last_change(prices),
            volume_change_24h: last_change(volumes),
        }
    }

    pub fn predict(&self, days_to_target: i64) -> PredictionResult {
        let current = self.current_price;
        let rsi = self.indicators.rsi_or_neutral();
        let histogram = self.indicators.histogram_or_flat();
        let days = days_to_target as f64;

        let sentiment = score_sentiment(
            &SentimentInputs {
                rsi,
                macd_histogram: histogram,
                price_change_24h: self.price_change_24h,
                volume_change_24h: self.volume_change_24h,
            }
            .with_bullish_bias(),
        );

        let time_factor = finite_or((365.0 / days.max(1.0)).min(1.0), 0.5);

        let macd_trend: f64 = if histogram < -0.25 { -0.3 } else { 1.2 };
        let rsi_trend: f64 = if rsi < 35.0 { -0.3 } else { 1.2 };
        let trend_strength = (macd_trend + rsi_trend) / 2.0;

        let severely_bearish = rsi < 25.0 && histogram < -0.3 && self.price_change_24h < -0.15;
        let trend_strength = if severely_bearish { trend_strength } else { trend_strength.max(0.25) };

        let volatility = finite_or(self.indicators.volatility, 0.0);
        let volatility_adjustment = finite_or(volatility * (days / 365.0).sqrt(), 0.2);

        let mut price = current * (1.0 + trend_strength * volatility_adjustment);
        if !severely_bearish {
            let long_term_bias = (days / 365.0 * 0.4).min(0.35);
            price *= 1.0 + BASE_BULLISH_BIAS + long_term_bias;
        }
        price = price.max(current * 0.1);

        let mut min_price = (price * (1.0 - volatility_adjustment * 1.5)).max(current * 0.05);
        let mut max_price = price * (1.0 + volatility_adjustment * 1.5);

        let support = Levels::nearest(&self.indicators.support_levels, price).unwrap_or(current * 0.8);
        let resistance = Levels::nearest(&self.indicators.resistance_levels, price).unwrap_or(current * 1.2);
        if price < support {
            price = (price + support) / 2.0;
        }
        if price > resistance {
            price = (price + resistance) / 2.0;
        }
        // The band was sized before the pull; stretch it so it still contains the forecast.
        min_price = min_price.min(price);
        max_price = max_price.max(price);

        let roi = (price - current) / current * 100.0;
        let confidence_bias = if price > current { 10.0 } else { -5.0 };
        let confidence = clamp_or(
            sentiment.score * 0.3 + time_factor * 40.0 + (1.0 - volatility_adjustment) * 30.0 + confidence_bias,
            0.0,
            100.0,
            70.0,
        );

        tracing::debug!(
            days_to_target,
            trend_strength,
            volatility_adjustment,
            severely_bearish,
            sentiment_score = sentiment.score,
            price,
            "short-horizon forecast"
        );

        PredictionResult {
            price,
            min_price,
            max_price,
            roi,
            confidence,
            sentiment: sentiment.label.to_string(),
        }
    }
}

pub fn predict_short_horizon(prices: &[f64], volumes: &[f64], current_price: f64, days_to_target: i64) -> PredictionResult {
    match ShortHorizonPredictor::new(prices, volumes, current_price) {
        Some(predictor) => predictor.predict(days_to_target),
        None => insufficient_data_result(current_price),
    }
}
