// Engine-internal models. Boundary types live in `shared::models`.
pub mod indicator_set;

pub use indicator_set::{BollingerSnapshot, IndicatorSet};
