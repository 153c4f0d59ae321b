use std::path::PathBuf;

use log::warn;
use tokio::sync::Mutex;
use tokio::task;

use super::config::{default_config_files, home_dir, EnvVariable, ShellConfig};
use crate::models::{ApiResponse, ConfigFile, EnvVariableRequest, EnvVariableResponse};
use crate::EnvError;

/// In-process implementation of the environment service.
///
/// Answers every operation with the same envelope the remote service
/// produces, so it can back a server route or stand in for one in tests.
/// At most one file is loaded at a time; loading another replaces it and
/// discards unsaved edits. File reads and writes run on tokio's blocking
/// pool, so the service needs a tokio runtime.
#[derive(Debug, Default)]
pub struct LocalEnvService {
    home: Option<PathBuf>,
    config: Mutex<Option<ShellConfig>>,
}

fn failure<T>(message: &str, err: &EnvError) -> ApiResponse<T> {
    warn!("{message}: {err}");
    ApiResponse::error(err.code(), message, &err.to_string())
}

impl LocalEnvService {
    /// A service resolving config files under `$HOME` at call time.
    pub fn new() -> Self {
        Self::default()
    }

    /// A service resolving config files under `home`.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            config: Mutex::new(None),
        }
    }

    pub fn config_files(&self) -> ApiResponse<Vec<ConfigFile>> {
        let home = match &self.home {
            Some(home) => home.clone(),
            None => match home_dir() {
                Ok(home) => home,
                Err(e) => {
                    warn!("{e}");
                    return ApiResponse::error(500, "Failed to get home directory", &e.to_string());
                }
            },
        };
        ApiResponse::success(default_config_files(&home))
    }

    pub async fn load_config_file(&self, file_path: &str) -> ApiResponse<Vec<EnvVariableResponse>> {
        let mut config = ShellConfig::new(file_path);
        let loaded = task::spawn_blocking(move || config.load().map(|()| config)).await;

        match loaded {
            Ok(Ok(config)) => {
                let vars = config.variables();
                *self.config.lock().await = Some(config);
                ApiResponse::success(vars)
            }
            Ok(Err(e)) => ApiResponse::error(500, "Failed to load config file", &e.to_string()),
            Err(e) => ApiResponse::error(500, "Failed to load config file", &e.to_string()),
        }
    }

    pub async fn update_env_variable(&self, request: EnvVariableRequest) -> ApiResponse<bool> {
        let env = EnvVariable::new(request.key, request.value);
        self.edit("Failed to update environment variable", |config| {
            config.update_env(request.index, &env)
        })
        .await
    }

    pub async fn add_env_variable(&self, request: EnvVariableRequest) -> ApiResponse<bool> {
        let env = EnvVariable::new(request.key, request.value);
        self.edit("Failed to add environment variable", |config| {
            config.add_env(&env).map(|_| ())
        })
        .await
    }

    pub async fn delete_env_variable(&self, index: u64) -> ApiResponse<bool> {
        self.edit("Failed to remove environment variable", |config| {
            config.remove_env(index)
        })
        .await
    }

    pub async fn save_config_file(&self) -> ApiResponse<bool> {
        // Held across the write and the reload that follows it.
        let mut guard = self.config.lock().await;
        let Some(mut config) = guard.take() else {
            return failure("Failed to save config file", &EnvError::NoConfigLoaded);
        };

        let saved = task::spawn_blocking(move || {
            let result = config.save();
            (config, result)
        })
        .await;

        match saved {
            Ok((config, result)) => {
                *guard = Some(config);
                match result {
                    Ok(()) => ApiResponse::success(true),
                    Err(e) => ApiResponse::error(500, "Failed to save config file", &e.to_string()),
                }
            }
            Err(e) => ApiResponse::error(500, "Failed to save config file", &e.to_string()),
        }
    }

    /// Variables of the loaded file including unsaved edits.
    pub async fn variables(&self) -> Option<Vec<EnvVariableResponse>> {
        self.config.lock().await.as_ref().map(ShellConfig::variables)
    }

    async fn edit<F>(&self, message: &str, f: F) -> ApiResponse<bool>
    where
        F: FnOnce(&mut ShellConfig) -> Result<(), EnvError>,
    {
        let mut guard = self.config.lock().await;
        let result = match guard.as_mut() {
            Some(config) => f(config),
            None => Err(EnvError::NoConfigLoaded),
        };
        match result {
            Ok(()) => ApiResponse::success(true),
            Err(e) => failure(message, &e),
        }
    }
}
