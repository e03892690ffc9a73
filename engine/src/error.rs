use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error("Prediction cache error: {0}")]
    CacheError(String),

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Splits a loader error back into the concrete I/O or CSV failure when there is one.
    /// Anything else is reported as a data format problem with its full context chain.
    pub fn from_loader(err: anyhow::Error) -> Self {
        let err = match err.downcast::<std::io::Error>() {
            Ok(source) => return EngineError::IoError { source },
            Err(err) => err,
        };
        match err.downcast::<csv::Error>() {
            Ok(source) => EngineError::CsvSystemError { source },
            Err(err) => EngineError::CsvDataFormatError(format!("{:#}", err)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            EngineError::MarketDataError(msg) => msg.to_lowercase().contains("not found"),
            EngineError::IoError { source } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
