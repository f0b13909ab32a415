use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Shorthand for a missing or blank required field.
    pub fn missing(field: &str) -> Self {
        BookingError::Validation(format!("Missing required field: {field}"))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
