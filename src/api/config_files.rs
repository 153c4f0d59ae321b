use reqwest::Method;
use serde::Serialize;

use super::routes;
use crate::models::{ConfigFile, EnvVariableResponse};
use crate::{EnvClient, EnvError, EnvResult};

#[derive(Debug, Serialize)]
struct LoadConfigFileRequest<'a> {
    file_path: &'a str,
}

/// Provides methods for discovering, loading and saving shell config files.
///
/// The service keeps one loaded file per session; variable edits made
/// through [`crate::EnvVariableHandler`] apply to it until [`save`] writes
/// them back.
///
/// [`save`]: ConfigFileHandler::save
#[derive(Debug)]
pub struct ConfigFileHandler {
    client: EnvClient,
}

impl ConfigFileHandler {
    pub(crate) fn new(client: EnvClient) -> Self {
        Self { client }
    }

    /// Lists the config files the service knows about.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &shellenv_client::EnvClient) -> shellenv_client::EnvResult<()> {
    /// for file in client.config_files().list().await? {
    ///     println!("{file}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self) -> EnvResult<Vec<ConfigFile>> {
        self.client
            .request(Method::GET, routes::CONFIG_FILES, None::<()>)
            .await
    }

    /// Finds a listed config file by its id.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Api` with code 404 if no listed file has that id.
    pub async fn find_by_id(&self, id: u8) -> EnvResult<ConfigFile> {
        self.list()
            .await?
            .into_iter()
            .find(|file| file.id == id)
            .ok_or_else(|| EnvError::Api {
                code: 404,
                message: "Config file not found".to_string(),
                error: Some(format!("no config file with id {id}")),
            })
    }

    /// Loads a config file on the service and returns the variables it
    /// exports, ordered by line.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: &shellenv_client::EnvClient) -> shellenv_client::EnvResult<()> {
    /// let vars = client.config_files().load("/home/me/.zshrc").await?;
    /// for var in vars {
    ///     println!("{} = {}", var.key, var.value.join(":"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, file_path: &str) -> EnvResult<Vec<EnvVariableResponse>> {
        let body = LoadConfigFileRequest { file_path };
        self.client
            .request(Method::POST, routes::CONFIG_FILES_LOAD, Some(body))
            .await
    }

    /// Writes pending variable edits back to the loaded file.
    pub async fn save(&self) -> EnvResult<bool> {
        self.client
            .request(Method::POST, routes::CONFIG_FILES_SAVE, None::<()>)
            .await
    }
}
