use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlucodynError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),
}

pub type GDResult<T> = Result<T, GlucodynError>;
