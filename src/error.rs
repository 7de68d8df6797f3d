use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller of a mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A parameter is outside of its valid range.
    InvalidParameter(String),
    /// The collection engine failed while evaluating a dataset.
    Engine(String),
}

impl Error {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Error::InvalidParameter(message.into())
    }

    pub(crate) fn engine(message: impl Into<String>) -> Self {
        Error::Engine(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(message) => write!(f, "invalid parameter: {}", message),
            Error::Engine(message) => write!(f, "engine failure: {}", message),
        }
    }
}

impl std::error::Error for Error {}
