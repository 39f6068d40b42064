use thiserror::Error;

/// Failure to read the bracketed chip amount of a single log line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("No bracketed amount in line")]
    Missing,
    #[error("Bracketed amount is not terminated")]
    Unterminated,
    #[error("Bracketed amount is not numeric: {0:?}")]
    NotNumeric(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("Positions not defined for {0} players")]
    UnsupportedTableSize(usize),
    #[error("Big blind player not found")]
    BigBlindNotFound,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Table size {size} has {labels} position labels")]
    LengthMismatch { size: usize, labels: usize },
    #[error("Table size {size} repeats position {label}")]
    DuplicateLabel { size: usize, label: String },
    #[error("Table size {size} does not start with the button")]
    ButtonNotFirst { size: usize },
    #[error("Table size {0} is below the two-seat minimum")]
    TooFewSeats(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<TableError> for ConfigError {
    fn from(err: TableError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
