use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Base URL '{url}' has no host.")]
    BaseUrlMissingHost { url: String },
    #[error("Missing API client id. Set --client-id or AISMOKE_CLIENT_ID.")]
    MissingClientId,
    #[error("Missing API secret. Set --secret or AISMOKE_SECRET.")]
    MissingSecret,
    #[error("Missing owner id. Set --owner-id or AISMOKE_OWNER_ID.")]
    MissingOwnerId,
    #[error("Missing tenant id. Set --tenant-id or AISMOKE_TENANT_ID.")]
    MissingTenantId,
}
