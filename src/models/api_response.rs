use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard response envelope returned by the environment service.
///
/// `data` and `error` are independent: a well-behaved producer fills exactly
/// one of them, but nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Status/result code, HTTP-like.
    pub code: u16,

    /// Human-readable summary.
    pub message: String,

    /// The payload, if any.
    pub data: Option<T>,

    /// Error description, if any.
    pub error: Option<String>,
}

/// Error half of [`ApiResponse::into_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub code: u16,
    pub message: String,
    pub error: Option<String>,
}

/// Borrowed view of which envelope fields are populated.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiOutcome<'a, T> {
    /// Only `data` is present.
    Success(&'a T),
    /// Only `error` is present.
    Failure(&'a str),
    /// Neither field is present.
    Empty,
    /// Both fields are present.
    Both { data: &'a T, error: &'a str },
}

impl<T> ApiResponse<T> {
    /// A `200 OK` envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "OK".to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// A failure envelope with no payload.
    pub fn error(code: u16, message: &str, error: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// The code as an HTTP status, if it is a valid one (100–999).
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.code).ok()
    }

    /// Returns true when the code is 2xx and no error text is present.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code) && self.error.is_none()
    }

    pub fn outcome(&self) -> ApiOutcome<'_, T> {
        match (&self.data, &self.error) {
            (Some(data), None) => ApiOutcome::Success(data),
            (None, Some(error)) => ApiOutcome::Failure(error),
            (None, None) => ApiOutcome::Empty,
            (Some(data), Some(error)) => ApiOutcome::Both { data, error },
        }
    }

    /// Converts the envelope into a `Result`.
    ///
    /// A populated `error` or a non-2xx `code` yields `Err`, even if `data`
    /// is also present. A success without payload yields `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, ApiFailure> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ApiFailure {
                code: self.code,
                message: self.message,
                error: self.error,
            })
        }
    }

    /// Maps the payload, leaving the rest of the envelope untouched.
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            code: self.code,
            message: self.message,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Result<T, String>> for ApiResponse<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => ApiResponse::success(data),
            Err(e) => {
                let (code, msg) = if e.contains("connection") {
                    (503, "Service Unavailable")
                } else {
                    (500, "Internal Server Error")
                };
                ApiResponse::error(code, msg, &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::ConfigFile;

    #[test]
    fn config_file_envelope_round_trips_with_absent_error() {
        let response = ApiResponse {
            code: 200,
            message: "ok".to_string(),
            data: Some(ConfigFile {
                path: "/etc/app.conf".to_string(),
                id: 3,
            }),
            error: None,
        };

        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(
            encoded,
            json!({
                "code": 200,
                "message": "ok",
                "data": { "path": "/etc/app.conf", "id": 3 },
                "error": null
            })
        );

        let decoded: ApiResponse<ConfigFile> = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, response);
        assert!(decoded.error.is_none());
    }

    #[test]
    fn failure_envelope_keeps_data_absent() {
        let response: ApiResponse<bool> = ApiResponse::error(400, "bad", "no such variable");
        let text = serde_json::to_string(&response).unwrap();
        let decoded: ApiResponse<bool> = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded.data, None);
        assert_eq!(decoded.error.as_deref(), Some("no such variable"));
    }

    #[test]
    fn missing_optional_keys_decode_as_none() {
        let decoded: ApiResponse<Vec<ConfigFile>> =
            serde_json::from_value(json!({ "code": 204, "message": "empty" })).unwrap();
        assert_eq!(decoded.outcome(), ApiOutcome::Empty);
        assert_eq!(decoded.into_result(), Ok(None));
    }

    #[test]
    fn code_outside_u16_is_rejected() {
        let result: Result<ApiResponse<bool>, _> =
            serde_json::from_value(json!({ "code": 65536, "message": "x", "data": true, "error": null }));
        assert!(result.is_err());

        let max: ApiResponse<bool> =
            serde_json::from_value(json!({ "code": 65535, "message": "x", "data": true, "error": null }))
                .unwrap();
        assert_eq!(max.code, u16::MAX);
        assert_eq!(max.status(), None);
    }

    #[test]
    fn both_fields_populated_are_preserved() {
        let value = json!({ "code": 200, "message": "odd", "data": true, "error": "warning" });
        let decoded: ApiResponse<bool> = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(decoded.outcome(), ApiOutcome::Both { data: &true, error: "warning" });
        assert_eq!(serde_json::to_value(&decoded).unwrap(), value);

        let failure = decoded.into_result().unwrap_err();
        assert_eq!(failure.code, 200);
        assert_eq!(failure.error.as_deref(), Some("warning"));
    }

    #[test]
    fn from_result_picks_status_by_message() {
        let ok: ApiResponse<u8> = Ok(7).into();
        assert_eq!(ok.code, 200);
        assert_eq!(ok.message, "OK");
        assert_eq!(ok.status(), Some(StatusCode::OK));

        let down: ApiResponse<u8> = Err("connection refused".to_string()).into();
        assert_eq!(down.code, 503);
        assert_eq!(down.message, "Service Unavailable");

        let other: ApiResponse<u8> = Err("disk full".to_string()).into();
        assert_eq!(other.code, 500);
        assert_eq!(other.error.as_deref(), Some("disk full"));
    }

    #[test]
    fn map_keeps_envelope_metadata() {
        let mapped = ApiResponse::success(vec![1u8, 2, 3]).map(|v| v.len());
        assert_eq!(mapped.data, Some(3));
        assert_eq!(mapped.code, 200);
    }
}
