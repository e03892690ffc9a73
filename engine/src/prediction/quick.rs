// Lightweight estimator for the 3-day, 5-day and 1-month horizons.
// Uses only the most recent observations and no simulation, so it is cheap enough
// to serve without caching.
use chrono::{DateTime, Utc};
use std::time::Instant;

use shared::models::{PredictionResult, QuickMetadata, QuickPredictions, QuickSummary};
use shared::utils::{finite_or, round_to};

use crate::indicators::{annualized_volatility, AnnualizationBasis};

pub const DEFAULT_WINDOW: usize = 50;

const MOMENTUM_SPAN: usize = 5;
const VOLATILITY_SPAN: usize = 20;
const DEFAULT_VOLATILITY: f64 = 0.2;
const FALLBACK_BASE_PRICE: f64 = 100.0;

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Calendar-day annualized volatility; 0.2 when it cannot be measured.
pub fn quick_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return DEFAULT_VOLATILITY;
    }
    finite_or(annualized_volatility(prices, AnnualizationBasis::CalendarDays), DEFAULT_VOLATILITY)
}

pub fn quick_prediction(prices: &[f64], current_price: f64, days: i64) -> PredictionResult {
    if prices.len() < MOMENTUM_SPAN {
        return PredictionResult {
            price: current_price * 1.05,
            min_price: current_price * 0.9,
            max_price: current_price * 1.2,
            roi: 5.0,
            confidence: 60.0,
            sentiment: "Neutral".to_string(),
        };
    }

    let reference = prices[prices.len() - MOMENTUM_SPAN];
    let momentum = finite_or((prices[prices.len() - 1] - reference) / reference, 0.0);
    let volatility = quick_volatility(tail(prices, VOLATILITY_SPAN));

    let days = days as f64;
    let time_factor = (days / 30.0).min(1.0);
    let price = current_price * (1.0 + momentum * (1.0 - time_factor * 0.5));

    let range = volatility * (days.max(0.0) / 365.0).sqrt();
    let roi = (price - current_price) / current_price * 100.0;
    let confidence = (80.0 - days * 2.0).clamp(50.0, 90.0);

    let sentiment = if roi > 10.0 {
        "Bullish"
    } else if roi < -10.0 {
        "Bearish"
    } else {
        "Neutral"
    };

    PredictionResult {
        price: round_to(price, 6),
        min_price: round_to((price * (1.0 - range)).max(0.0), 6),
        max_price: round_to(price * (1.0 + range), 6),
        roi: round_to(roi, 2),
        confidence: confidence.round(),
        sentiment: sentiment.to_string(),
    }
}

pub fn quick_predictions(prices: &[f64], current_price: f64) -> QuickPredictions {
    QuickPredictions {
        three_day: quick_prediction(prices, current_price, 3),
        five_day: quick_prediction(prices, current_price, 5),
        one_month: quick_prediction(prices, current_price, 30),
    }
}

/// Estimates over the last `window` prices. `started` marks when the request
/// began so the reported processing time includes data loading.
pub fn quick_summary(
    prices: &[f64],
    coin_name: &str,
    window: usize,
    now: DateTime<Utc>,
    started: Instant,
) -> Option<QuickSummary> {
    let current_price = *prices.last()?;
    let recent = tail(prices, window);

    let predictions = quick_predictions(recent, current_price);
    Some(QuickSummary {
        predictions,
        metadata: QuickMetadata {
            coin_name: coin_name.to_string(),
            current_price,
            volatility: round_to(quick_volatility(recent), 2),
            calculated_at: now,
            processing_time_ms: started.elapsed().as_millis() as u64,
            fallback: false,
        },
    })
}

fn fixed(price: f64, min: f64, max: f64, roi: f64, confidence: f64) -> PredictionResult {
    PredictionResult {
        price: FALLBACK_BASE_PRICE * price,
        min_price: FALLBACK_BASE_PRICE * min,
        max_price: FALLBACK_BASE_PRICE * max,
        roi,
        confidence,
        sentiment: "Neutral".to_string(),
    }
}

/// Served when no usable history is available at all.
pub fn fallback_summary(now: DateTime<Utc>) -> QuickSummary {
    QuickSummary {
        predictions: QuickPredictions {
            three_day: fixed(1.02, 0.95, 1.1, 2.0, 50.0),
            five_day: fixed(1.03, 0.92, 1.15, 3.0, 45.0),
            one_month: fixed(1.05, 0.85, 1.25, 5.0, 40.0),
        },
        metadata: QuickMetadata {
            coin_name: "Unknown".to_string(),
            current_price: FALLBACK_BASE_PRICE,
            volatility: 0.3,
            calculated_at: now,
            processing_time_ms: 0,
            fallback: true,
        },
    }
}
