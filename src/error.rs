use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Stats service returned {code} for {endpoint}")]
    Status { code: u16, endpoint: String },

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Team not found in tournament data: {0}")]
    UnknownTeam(String),

    #[error("No map records found in {0}")]
    NoMaps(String),
}
