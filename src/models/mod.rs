//! Data models for the environment service API.
//!
//! These mirror the JSON payloads the service produces and accepts.

pub mod api_response;
pub mod config_file;
pub mod env_variable;

pub use api_response::{ApiFailure, ApiOutcome, ApiResponse};
pub use config_file::ConfigFile;
pub use env_variable::{EnvVariableRequest, EnvVariableResponse};
