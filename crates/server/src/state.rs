use crate::auth::{CredentialVerifier, StaticTokenVerifier};
use crate::config::ServerConfig;
use std::sync::Arc;
use upload::UploadConfig;

/// Shared application state
///
/// Built once at start-up and only read afterwards.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Upload policy (body ceiling)
    pub upload: Arc<UploadConfig>,

    /// Credential check behind `/auth`
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl ServerState {
    /// Create new server state with the configured static token
    pub fn new(config: ServerConfig) -> Self {
        let verifier = Arc::new(StaticTokenVerifier::new(config.auth_token.clone()));
        Self::with_verifier(config, verifier)
    }

    /// Create new server state with a custom credential verifier
    pub fn with_verifier(config: ServerConfig, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            upload: Arc::new(config.upload_config()),
            config: Arc::new(config),
            verifier,
        }
    }
}
