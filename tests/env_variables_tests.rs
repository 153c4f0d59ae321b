use std::fs;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::setup_test_client;
use shellenv_client::{EnvError, EnvVariableRequest, EnvVariableResponse, LocalEnvService};

fn ok_true() -> serde_json::Value {
    json!({ "code": 200, "message": "OK", "data": true, "error": null })
}

#[tokio::test]
async fn test_update_sends_request_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/env-variables"))
        .and(body_json(json!({
            "index": 18446744073709551615u64,
            "key": "PATH",
            "value": ["/opt/bin", "/usr/bin"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_true()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let request = EnvVariableRequest::new(
        u64::MAX,
        "PATH",
        vec!["/opt/bin".to_string(), "/usr/bin".to_string()],
    );
    assert!(client.env_variables().update(&request).await.unwrap());
}

#[tokio::test]
async fn test_add_duplicate_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/env-variables"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "message": "Failed to add environment variable",
            "data": null,
            "error": "Environment variable already exists: EDITOR"
        })))
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let request = EnvVariableRequest::new(0, "EDITOR", vec!["vim".to_string()]);

    match client.env_variables().add(&request).await {
        Err(EnvError::Api { code, error, .. }) => {
            assert_eq!(code, 400);
            assert_eq!(error.as_deref(), Some("Environment variable already exists: EDITOR"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_uses_index_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/env-variables/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_true()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    assert!(client.env_variables().delete(42).await.unwrap());
}

#[tokio::test]
async fn test_success_without_data_is_missing_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/env-variables/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "OK"
        })))
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    assert!(matches!(
        client.env_variables().delete(1).await,
        Err(EnvError::MissingData)
    ));
}

#[tokio::test]
async fn test_edit_round_trip_against_local_service() {
    // What it tests: a variable loaded through the client converts into a
    // request that the in-process service accepts, and the saved file holds
    // the edited value.
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join(".zprofile");
    fs::write(&rc, "export PATH=\"/usr/bin:/bin\"\n").unwrap();
    let rc_path = rc.to_string_lossy().into_owned();

    let service = LocalEnvService::with_home(dir.path());
    let loaded = service.load_config_file(&rc_path).await;

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config-files/load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&loaded))
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let mut vars: Vec<EnvVariableResponse> = client.config_files().load(&rc_path).await.unwrap();
    assert_eq!(vars.len(), 1);

    let mut request: EnvVariableRequest = vars.remove(0).into();
    request.value.insert(0, "/opt/homebrew/bin".to_string());

    // The body the client would send is what the service consumes.
    let wire = serde_json::to_value(&request).unwrap();
    let received: EnvVariableRequest = serde_json::from_value(wire).unwrap();
    assert_eq!(service.update_env_variable(received).await.data, Some(true));
    assert_eq!(service.save_config_file().await.data, Some(true));

    assert_eq!(
        fs::read_to_string(&rc).unwrap(),
        "export PATH=\"/opt/homebrew/bin:/usr/bin:/bin\"\n"
    );
}
