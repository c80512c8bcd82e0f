use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The offending key for `NotFound`, `None` otherwise.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::NotFound { key } => Some(key),
            _ => None,
        }
    }
}
