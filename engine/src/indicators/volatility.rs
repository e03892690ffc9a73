// Annualized volatility of simple returns

/// Two conventions are in use: trading-day annualization for the short-horizon
/// predictor and the regime simulator, calendar-day annualization for the
/// fear/greed index and the quick estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnualizationBasis {
    TradingDays,
    CalendarDays,
}

impl AnnualizationBasis {
    pub fn periods_per_year(self) -> f64 {
        match self {
            AnnualizationBasis::TradingDays => 252.0,
            AnnualizationBasis::CalendarDays => 365.0,
        }
    }
}

/// Population standard deviation of simple returns, annualized.
/// NaN when fewer than two prices are given.
pub fn annualized_volatility(prices: &[f64], basis: AnnualizationBasis) -> f64 {
    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    if returns.is_empty() {
        return f64::NAN;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() * basis.periods_per_year().sqrt()
}
