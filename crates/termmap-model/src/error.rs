use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown coding system: {0}")]
    UnknownSystem(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
