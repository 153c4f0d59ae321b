//! Producer side of the API: reading and rewriting `export` statements in
//! shell startup files.

pub mod config;
pub mod service;

pub use config::{default_config_files, home_dir, EnvVariable, ShellConfig};
pub use service::LocalEnvService;
