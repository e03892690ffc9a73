// Composite market sentiment score (0-100) and its five-level label
use shared::utils::finite_or;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentInputs {
    pub rsi: f64,
    pub macd_histogram: f64,
    /// Fractional change over the last observation (0.05 = +5%).
    pub price_change_24h: f64,
    pub volume_change_24h: f64,
}

const BULLISH_BIAS: f64 = 0.25;

impl SentimentInputs {
    /// The optimistic view the short-horizon predictor scores against.
    /// Readings that are already strongly bearish pass through unchanged.
    pub fn with_bullish_bias(self) -> Self {
        let macd_histogram = if self.macd_histogram < -0.3 {
            self.macd_histogram
        } else {
            (self.macd_histogram + 0.05).max(0.1)
        };
        let price_change_24h = if self.price_change_24h < -0.15 {
            self.price_change_24h
        } else {
            (self.price_change_24h + BULLISH_BIAS).max(0.02)
        };

        SentimentInputs {
            rsi: (self.rsi + 15.0).min(75.0),
            macd_histogram,
            price_change_24h,
            volume_change_24h: self.volume_change_24h + BULLISH_BIAS * 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    VeryBearish,
    Bearish,
    Neutral,
    Bullish,
    VeryBullish,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            SentimentLabel::VeryBullish
        } else if score >= 60.0 {
            SentimentLabel::Bullish
        } else if score >= 40.0 {
            SentimentLabel::Neutral
        } else if score >= 25.0 {
            SentimentLabel::Bearish
        } else {
            SentimentLabel::VeryBearish
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::VeryBearish => "Very Bearish",
            SentimentLabel::Bearish => "Bearish",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::VeryBullish => "Very Bullish",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub score: f64,
    pub label: SentimentLabel,
}

pub fn score_sentiment(inputs: &SentimentInputs) -> SentimentScore {
    let rsi = finite_or(inputs.rsi, 50.0);
    let histogram = finite_or(inputs.macd_histogram, 0.0);
    let price_change = finite_or(inputs.price_change_24h, 0.0);
    let volume_change = finite_or(inputs.volume_change_24h, 0.0);

    let mut score: f64 = 50.0;

    // RSI: overbought reads bearish, oversold reads bullish
    if rsi > 70.0 {
        score -= 20.0;
    } else if rsi < 30.0 {
        score += 20.0;
    } else {
        score += (rsi - 50.0) / 20.0 * 10.0;
    }

    score += (histogram * 100.0).clamp(-15.0, 15.0);
    score += (price_change * 2.0).clamp(-10.0, 10.0);
    score += (volume_change / 20.0).clamp(-5.0, 5.0);

    let score = score.clamp(0.0, 100.0);
    SentimentScore { score, label: SentimentLabel::from_score(score) }
}
