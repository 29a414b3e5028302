use clap::Parser;
use serde::{Deserialize, Serialize};

/// Base URL used when neither the CLI, environment, nor config provides one.
pub const DEFAULT_BASE_URL: &str = "https://app.blackwire.ai/api";

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Sequential smoke tester for a tenant AI HTTP API - runs a fixed request battery, prints per-request status/timing, and cleans up created resources."
)]
pub struct SmokeArgs {
    /// Base URL of the API under test
    #[arg(long = "base-url", env = "AISMOKE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API client id (personal token)
    #[arg(long = "client-id", env = "AISMOKE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// API client secret (personal token)
    #[arg(long, env = "AISMOKE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Owner id placed in session payloads (see the /settings response)
    #[arg(long = "owner-id", env = "AISMOKE_OWNER_ID")]
    pub owner_id: Option<String>,

    /// Tenant id placed in registry/session payloads (see the /settings response)
    #[arg(long = "tenant-id", env = "AISMOKE_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Path to a TOML/JSON config file
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
