use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "default-client")]
use arc_swap::ArcSwap;
use log::{debug, warn};
#[cfg(feature = "default-client")]
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::config_files::ConfigFileHandler;
use crate::api::env_variables::EnvVariableHandler;
use crate::models::ApiResponse;
use crate::{EnvError, EnvResult};

const DEFAULT_USER_AGENT: &str = concat!("shellenv-client/", env!("CARGO_PKG_VERSION"));

#[cfg(feature = "default-client")]
static ENV_CLIENT: Lazy<ArcSwap<EnvClient>> =
    Lazy::new(|| ArcSwap::new(Arc::new(EnvClient::default())));

/// Installs `client` as the process-wide instance returned by [`instance`].
#[cfg(feature = "default-client")]
pub fn initialize(client: EnvClient) {
    ENV_CLIENT.store(Arc::new(client));
}

/// Returns the process-wide client.
///
/// Until [`initialize`] is called this is a client pointed at
/// `http://localhost:1420` with no token.
#[cfg(feature = "default-client")]
pub fn instance() -> Arc<EnvClient> {
    ENV_CLIENT.load_full()
}

/// Builder for [`EnvClient`].
///
/// Validation happens in [`EnvClientBuilder::build`]; nothing touches the
/// network until the first request.
#[derive(Default)]
pub struct EnvClientBuilder {
    base_url: Option<String>,
    api_token: Option<SecretString>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<ReqwestClient>,
    env_error: Option<String>,
}

impl EnvClientBuilder {
    /// Sets the service base URL, e.g. `http://localhost:1420`.
    ///
    /// Routes are absolute paths (`/api/...`) and replace any path in the
    /// base URL: with `http://host/envsvc/` requests still go to
    /// `http://host/api/...`. Put the service at the root of its host, or
    /// route `/api` to it with a reverse proxy.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Reads the base URL from an environment variable.
    ///
    /// A missing variable is reported by `build()` as a configuration error.
    pub fn base_url_from_env(mut self, var_name: &str) -> Self {
        match std::env::var(var_name) {
            Ok(url) => self.base_url = Some(url),
            Err(e) => {
                self.env_error =
                    Some(format!("Failed to read environment variable '{var_name}': {e}"))
            }
        }
        self
    }

    /// Sets a bearer token sent with every request.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a custom reqwest client (e.g., for testing or custom middleware).
    pub fn http_client(mut self, http_client: ReqwestClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> EnvResult<EnvClient> {
        if let Some(msg) = self.env_error {
            return Err(EnvError::ConfigurationError(msg));
        }

        let base_url = self
            .base_url
            .ok_or_else(|| EnvError::ConfigurationError("Base URL is required".into()))
            .and_then(|url_str| {
                Url::parse(&url_str).map_err(|e| {
                    EnvError::ConfigurationError(format!("Invalid base URL: {e}"))
                })
            })?;

        if let Some(token) = &self.api_token {
            if token.expose_secret().trim().is_empty() {
                return Err(EnvError::ConfigurationError("API token must not be empty".into()));
            }
        }

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        let user_agent = self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http_client = match self.http_client {
            Some(custom_client) => custom_client,
            None => ReqwestClient::builder()
                .timeout(timeout)
                .user_agent(user_agent.as_str())
                .build()
                .map_err(|e| {
                    EnvError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
                })?,
        };

        Ok(EnvClient {
            base_url,
            api_token: self.api_token.map(Arc::new),
            timeout,
            user_agent,
            http_client,
        })
    }
}

/// Client for the environment service.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct EnvClient {
    base_url: Url,
    api_token: Option<Arc<SecretString>>,
    timeout: Duration,
    user_agent: String,
    http_client: ReqwestClient,
}

impl Default for EnvClient {
    fn default() -> Self {
        EnvClient {
            base_url: Url::parse("http://localhost:1420").expect("static URL is valid"),
            api_token: None,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: ReqwestClient::new(),
        }
    }
}

impl fmt::Debug for EnvClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvClient")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl EnvClient {
    pub fn builder() -> EnvClientBuilder {
        EnvClientBuilder::default()
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Gets the config file API interface.
    pub fn config_files(&self) -> ConfigFileHandler {
        ConfigFileHandler::new(self.clone())
    }

    /// Gets the environment variable API interface.
    pub fn env_variables(&self) -> EnvVariableHandler {
        EnvVariableHandler::new(self.clone())
    }

    fn auth_headers(&self) -> EnvResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| EnvError::ConfigurationError(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn endpoint_url(&self, endpoint: &str) -> EnvResult<Url> {
        if endpoint.contains('?') || endpoint.contains('#') {
            return Err(EnvError::InvalidEndpoint(format!(
                "endpoint must not include query or fragment: {endpoint}"
            )));
        }
        Ok(self.base_url.join(endpoint)?)
    }

    /// Sends a request and returns the HTTP status with the decoded envelope.
    ///
    /// A body that does not decode is reported as `EnvError::Api` for a
    /// non-2xx status and as a serialization error otherwise.
    async fn send<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<B>,
    ) -> EnvResult<(StatusCode, ApiResponse<R>)>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint)?;
        debug!("{method} {url}");

        let mut request = self
            .http_client
            .request(method, url)
            .headers(self.auth_headers()?);

        if let Some(data) = body {
            request = request.json(&data);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<R>>(&bytes) {
            Ok(envelope) => Ok((status, envelope)),
            Err(_) if !status.is_success() => Err(EnvError::Api {
                code: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                error: Some(String::from_utf8_lossy(&bytes).into_owned()).filter(|s| !s.is_empty()),
            }),
            Err(e) => Err(EnvError::SerializationError(e)),
        }
    }

    /// Sends a request and returns the envelope as received.
    ///
    /// The envelope is returned even for non-2xx HTTP statuses, as long as
    /// the body decodes. Use [`EnvClient::request`] to have error envelopes
    /// and error statuses turned into [`EnvError::Api`].
    pub async fn request_envelope<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<B>,
    ) -> EnvResult<ApiResponse<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.send(method, endpoint, body)
            .await
            .map(|(_, envelope)| envelope)
    }

    /// Sends a request and unwraps the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint includes a query string or fragment.
    /// - The request fails due to network issues.
    /// - The HTTP status is not 2xx, whatever the envelope says.
    /// - The envelope carries an `error` or a non-2xx `code`.
    /// - The envelope carries no `data`.
    pub async fn request<B, R>(&self, method: Method, endpoint: &str, body: Option<B>) -> EnvResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let (status, envelope): (StatusCode, ApiResponse<R>) =
            self.send(method, endpoint, body).await?;

        if !status.is_success() {
            warn!("{endpoint} failed with HTTP status {status}");
            let message = if envelope.message.is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                envelope.message
            };
            return Err(EnvError::Api {
                code: status.as_u16(),
                message,
                error: envelope.error,
            });
        }

        match envelope.into_result() {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(EnvError::MissingData),
            Err(failure) => {
                warn!(
                    "{endpoint} failed with code {}: {}",
                    failure.code, failure.message
                );
                Err(failure.into())
            }
        }
    }
}
