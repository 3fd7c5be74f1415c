//! formgate server - HTTP front end for multipart upload ingestion
//!
//! This crate wires the [`upload`] processor into an axum router next to a
//! few small collaborator endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - Static landing page
//! - `GET /hello` - Hello World JSON
//! - `GET /health` - Liveness probe
//! - `GET|POST /auth` - Bearer token check
//! - `POST /upload` - multipart/form-data ingestion
//!
//! Any other method on these paths gets 405; unknown paths get 404.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{CredentialVerifier, StaticTokenVerifier};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
