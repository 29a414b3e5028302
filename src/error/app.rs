use thiserror::Error;

use super::{ConfigError, HttpError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    #[must_use]
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    #[must_use]
    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }
}
