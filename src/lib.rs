//! # shellenv-client
//!
//! Typed access to a service that edits the environment variables exported
//! by shell startup files (`~/.zshrc` and friends).
//!
//! The service wraps every answer in an [`ApiResponse`] envelope. This crate
//! provides the payload types, an async HTTP client for the service, and
//! [`LocalEnvService`], an in-process implementation of the same operations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shellenv_client::{EnvClient, EnvVariableRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EnvClient::builder().base_url("http://localhost:1420").build()?;
//!
//!     let zshrc = client.config_files().find_by_id(3).await?;
//!     let vars = client.config_files().load(&zshrc.path).await?;
//!     for var in &vars {
//!         println!("{:>4} {}={}", var.index, var.key, var.value.join(":"));
//!     }
//!
//!     client
//!         .env_variables()
//!         .add(&EnvVariableRequest::new(0, "EDITOR", vec!["hx".to_string()]))
//!         .await?;
//!     client.config_files().save().await?;
//!
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod error;
pub mod models;
pub mod shell;

pub use api::config_files::ConfigFileHandler;
pub use api::env_variables::EnvVariableHandler;
#[cfg(feature = "default-client")]
pub use client::{initialize, instance};
pub use client::{EnvClient, EnvClientBuilder};
pub use error::{EnvError, EnvResult, UrlParseError};
pub use models::{
    ApiFailure, ApiOutcome, ApiResponse, ConfigFile, EnvVariableRequest, EnvVariableResponse,
};
pub use shell::{EnvVariable, LocalEnvService, ShellConfig};
