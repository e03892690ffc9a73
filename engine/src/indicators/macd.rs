// Moving Average Convergence/Divergence (MACD)
use super::{Ema, IndicatorCalculator};

pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }

    pub fn calculate(&self, prices: &[f64]) -> MacdOutput {
        let fast = Ema::new(self.fast).calculate(prices);
        let slow = Ema::new(self.slow).calculate(prices);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = Ema::new(self.signal).calculate(&macd);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput { macd, signal, histogram }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}
