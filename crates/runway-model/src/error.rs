use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid runner id '{id}': {reason}")]
    InvalidRunnerId { id: String, reason: &'static str },

    #[error("invalid provisioning policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid resource quantity for {field}: '{value}'")]
    InvalidQuantity { field: &'static str, value: String },

    #[error("unknown identity strategy: {0}")]
    UnknownIdentityStrategy(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
