use reqwest::Method;

use super::routes;
use crate::models::EnvVariableRequest;
use crate::{EnvClient, EnvResult};

/// Provides methods for editing the variables of the loaded config file.
///
/// Edits are held by the service until the file is saved.
#[derive(Debug)]
pub struct EnvVariableHandler {
    client: EnvClient,
}

impl EnvVariableHandler {
    pub(crate) fn new(client: EnvClient) -> Self {
        Self { client }
    }

    /// Replaces the variable at `request.index`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use shellenv_client::EnvVariableRequest;
    /// # async fn example(client: &shellenv_client::EnvClient) -> shellenv_client::EnvResult<()> {
    /// let mut vars = client.config_files().load("/home/me/.zshrc").await?;
    /// let mut path: EnvVariableRequest = vars.remove(0).into();
    /// path.value.insert(0, "/opt/bin".to_string());
    /// client.env_variables().update(&path).await?;
    /// client.config_files().save().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(&self, request: &EnvVariableRequest) -> EnvResult<bool> {
        self.client
            .request(Method::PUT, routes::ENV_VARIABLES, Some(request))
            .await
    }

    /// Adds a new variable. The service appends it after the last line and
    /// ignores `request.index`.
    pub async fn add(&self, request: &EnvVariableRequest) -> EnvResult<bool> {
        self.client
            .request(Method::POST, routes::ENV_VARIABLES, Some(request))
            .await
    }

    /// Removes the variable at `index`.
    pub async fn delete(&self, index: u64) -> EnvResult<bool> {
        self.client
            .request(Method::DELETE, &routes::env_variable(index), None::<()>)
            .await
    }
}
