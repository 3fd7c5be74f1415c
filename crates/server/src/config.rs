use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use upload::UploadConfig;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum multipart upload body size in MB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,

    /// Enable CORS; when on, the CORS layer answers OPTIONS preflights itself
    #[serde(default)]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Exact `Authorization` header value accepted by `/auth`
    #[serde(default = "default_auth_token")]
    pub auth_token: String,

    /// User reported on successful authentication
    #[serde(default = "default_auth_user")]
    pub auth_user: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_upload_mb: default_max_upload_mb(),
            enable_cors: false,
            log_level: default_log_level(),
            service_name: default_service_name(),
            auth_token: default_auth_token(),
            auth_user: default_auth_user(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("FORMGATE_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.auth_token == default_auth_token() {
            tracing::warn!("No auth token configured, using the development token");
        }

        config.upload_config().validate()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max upload size in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Upload policy derived from this configuration
    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig::with_max_body_bytes(self.max_upload_bytes())
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_upload_mb() -> u64 {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "file-service".to_string()
}

fn default_auth_token() -> String {
    "Bearer valid-token".to_string()
}

fn default_auth_user() -> String {
    "test-user".to_string()
}
