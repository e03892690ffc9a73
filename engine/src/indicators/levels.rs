// Support / resistance detection from local extrema

pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

impl Levels {
    /// Level closest to `price`; ties keep the earlier level.
    pub fn nearest(levels: &[f64], price: f64) -> Option<f64> {
        levels.iter().copied().fold(None, |best, level| match best {
            Some(b) if (level - price).abs() >= (b - price).abs() => Some(b),
            _ => Some(level),
        })
    }
}

/// Flags index `i` as support when it is the minimum of `prices[i - window .. i + window]`
/// and as resistance when it is the maximum. Only indices with a full window on
/// both sides are examined; one point may be both.
pub fn support_resistance(prices: &[f64], window: usize) -> Levels {
    let mut levels = Levels::default();
    if window == 0 || prices.len() <= 2 * window {
        return levels;
    }

    for i in window..prices.len() - window {
        let slice = &prices[i - window..i + window];
        let current = prices[i];
        if slice.iter().all(|p| current <= *p) {
            levels.support.push(current);
        }
        if slice.iter().all(|p| current >= *p) {
            levels.resistance.push(current);
        }
    }
    levels
}
