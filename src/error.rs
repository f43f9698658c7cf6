use thiserror::Error;

pub type Result<T> = std::result::Result<T, WasteVizError>;

#[derive(Debug, Error)]
pub enum WasteVizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV header: {0}")]
    CsvHeader(String),

    #[error("Invalid CSV row {row}: expected at least 5 columns, got {got}")]
    CsvRow { row: usize, got: usize },

    #[error("Invalid amount at row {row}, column {column}: {value}")]
    AmountParse {
        row: usize,
        column: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Negative amount at row {row}, column {column}: {value}")]
    NegativeAmount {
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("Duplicate sector at row {row}: {sector}")]
    DuplicateSector { row: usize, sector: String },

    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    #[error("Unknown improvement action: {0}")]
    UnknownAction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for WasteVizError {
    fn from(err: toml::de::Error) -> Self {
        WasteVizError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for WasteVizError {
    fn from(err: serde_json::Error) -> Self {
        WasteVizError::Io(std::io::Error::other(format!("JSON error: {}", err)))
    }
}
