// Technical readings at the latest observation of a price series.
use shared::utils::finite_or;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerSnapshot {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Recomputed from scratch for every request; undefined readings are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub sma50: f64,
    pub sma200: f64,
    pub rsi14: f64,
    pub macd_histogram: f64,
    pub bollinger: BollingerSnapshot,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    /// Annualized over trading days.
    pub volatility: f64,
    pub fear_greed_index: u32,
}

impl IndicatorSet {
    pub fn rsi_or_neutral(&self) -> f64 {
        finite_or(self.rsi14, 50.0)
    }

    pub fn histogram_or_flat(&self) -> f64 {
        finite_or(self.macd_histogram, 0.0)
    }
}
