use shellenv_client::EnvClient;

pub const TEST_TOKEN: &str = "test-token";

/// Builds a client pointed at the mock server, authenticating with
/// [`TEST_TOKEN`].
pub fn setup_test_client(mock_server_uri: &str) -> EnvClient {
    let _ = env_logger::builder().is_test(true).try_init();

    EnvClient::builder()
        .base_url(mock_server_uri)
        .api_token(TEST_TOKEN)
        .build()
        .expect("Failed to build EnvClient")
}

#[allow(dead_code)]
pub fn bearer() -> String {
    format!("Bearer {TEST_TOKEN}")
}
