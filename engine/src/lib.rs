// Engine library root
// Forecasting core (indicators, prediction) plus the data, service and config layers around it.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod prediction;
pub mod services;
