use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown column role: {0}")]
    UnknownRole(String),
    #[error("unknown data warehouse mode: {0}")]
    UnknownMode(String),
    #[error("unknown wizard: {0}")]
    UnknownWizard(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
