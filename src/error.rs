use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    /// Required columns missing or a data file that cannot be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// The submitted preferences are incomplete or inconsistent.
    #[error("invalid preferences: {0}")]
    Validation(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FitError>;
