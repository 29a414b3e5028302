use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to encode credential header: {source}")]
    EncodeCredentials {
        #[source]
        source: serde_json::Error,
    },
    #[error("Credential header contains invalid characters.")]
    InvalidCredentialHeader {
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}
