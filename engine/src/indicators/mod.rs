// Technical indicators module
pub mod bollinger;
pub mod ema;
pub mod fear_greed;
pub mod levels;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use bollinger::{Bands, BollingerBands};
pub use ema::Ema;
pub use fear_greed::fear_greed_index;
pub use levels::{support_resistance, Levels};
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::{annualized_volatility, AnnualizationBasis};

use serde_json::Value;

use crate::models::{BollingerSnapshot, IndicatorSet};

// Common trait for single-series indicators.
// Positions without enough history are NaN; callers substitute a neutral value.
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, prices: &[f64]) -> Vec<f64>;
}

fn latest(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(f64::NAN)
}

fn latest_of(calculator: &dyn IndicatorCalculator, prices: &[f64]) -> f64 {
    let value = latest(&calculator.calculate(prices));
    tracing::trace!(indicator = calculator.name(), parameters = %calculator.parameters(), value, "indicator evaluated");
    value
}

/// Readings at the latest observation. Raw values are kept (NaN included);
/// the accessors on [`IndicatorSet`] apply the neutral fallbacks.
pub fn compute_indicator_set(prices: &[f64], volumes: &[f64]) -> IndicatorSet {
    let macd = Macd::default().calculate(prices);
    let bands = BollingerBands::default().calculate(prices);
    let levels = support_resistance(prices, levels::DEFAULT_WINDOW);

    let set = IndicatorSet {
        sma50: latest_of(&Sma::new(50), prices),
        sma200: latest_of(&Sma::new(200), prices),
        rsi14: latest_of(&Rsi::new(14), prices),
        macd_histogram: latest(&macd.histogram),
        bollinger: BollingerSnapshot {
            upper: latest(&bands.upper),
            middle: latest(&bands.middle),
            lower: latest(&bands.lower),
        },
        support_levels: levels.support,
        resistance_levels: levels.resistance,
        volatility: annualized_volatility(prices, AnnualizationBasis::TradingDays),
        fear_greed_index: fear_greed_index(prices, volumes),
    };

    tracing::debug!(
        observations = prices.len(),
        rsi14 = set.rsi14,
        macd_histogram = set.macd_histogram,
        volatility = set.volatility,
        fear_greed = set.fear_greed_index,
        supports = set.support_levels.len(),
        resistances = set.resistance_levels.len(),
        "indicator set computed"
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_indicator_set() {
        let prices = vec![42.0; 300];
        let volumes = vec![1_000.0; 300];
        let set = compute_indicator_set(&prices, &volumes);

        assert!((set.sma50 - 42.0).abs() < 1e-9);
        assert!((set.sma200 - 42.0).abs() < 1e-9);
        assert!(set.rsi14.is_nan());
        assert_eq!(set.rsi_or_neutral(), 50.0);
        assert_eq!(set.histogram_or_flat(), 0.0);
        assert!((set.bollinger.upper - 42.0).abs() < 1e-9);
        assert!((set.bollinger.lower - 42.0).abs() < 1e-9);
        assert_eq!(set.volatility, 0.0);
    }

    #[test]
    fn test_indicator_set_is_idempotent() {
        let prices: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.1).collect();
        let volumes: Vec<f64> = (0..250).map(|i| 1_000.0 + (i % 7) as f64 * 50.0).collect();

        let first = compute_indicator_set(&prices, &volumes);
        let second = compute_indicator_set(&prices, &volumes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_series_yields_undefined_readings() {
        let set = compute_indicator_set(&[10.0, 11.0], &[1.0, 1.0]);
        assert!(set.sma50.is_nan());
        assert!(set.rsi14.is_nan());
        assert!(set.bollinger.middle.is_nan());
        assert!(set.support_levels.is_empty());
        assert_eq!(set.rsi_or_neutral(), 50.0);
    }
}
