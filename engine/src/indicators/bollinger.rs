// Bollinger Bands: SMA middle line with population-stdev envelopes
use super::{IndicatorCalculator, Sma};

pub struct BollingerBands {
    period: usize,
    multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }

    pub fn calculate(&self, prices: &[f64]) -> Bands {
        let middle = Sma::new(self.period).calculate(prices);
        let mut upper = Vec::with_capacity(prices.len());
        let mut lower = Vec::with_capacity(prices.len());

        for (i, mean) in middle.iter().enumerate() {
            if mean.is_nan() {
                upper.push(f64::NAN);
                lower.push(f64::NAN);
                continue;
            }
            let window = &prices[i + 1 - self.period..=i];
            let variance = window.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / self.period as f64;
            let std_dev = variance.sqrt();
            upper.push(mean + self.multiplier * std_dev);
            lower.push(mean - self.multiplier * std_dev);
        }

        Bands { upper, middle, lower }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_collapses_bands() {
        let bands = BollingerBands::default().calculate(&[50.0; 40]);
        for i in 19..40 {
            assert_eq!(bands.upper[i], 50.0);
            assert_eq!(bands.middle[i], 50.0);
            assert_eq!(bands.lower[i], 50.0);
        }
        assert!(bands.upper[18].is_nan());
    }

    #[test]
    fn test_band_width() {
        // Window [1, 3]: mean 2, population stdev 1
        let bands = BollingerBands::new(2, 2.0).calculate(&[1.0, 3.0]);
        assert!(bands.middle[0].is_nan());
        assert_eq!(bands.middle[1], 2.0);
        assert_eq!(bands.upper[1], 4.0);
        assert_eq!(bands.lower[1], 0.0);
    }
}
