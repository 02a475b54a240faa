use crate::error::{EngineError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Bumped whenever a response shape changes incompatibly.
pub const SCHEMA_VERSION: u8 = 1;

const SERIALIZATION_FAILED: &str =
    r#"{"success":false,"data":null,"error":{"code":"internal","message":"serialization failed"},"schema_version":1}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&EngineError> for ApiError {
    fn from(err: &EngineError) -> Self {
        Self { code: err.code().to_string(), message: err.to_string() }
    }
}

/// Envelope for every JSON entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: u8,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, schema_version: SCHEMA_VERSION }
    }

    pub fn fail(err: &EngineError) -> Self {
        Self { success: false, data: None, error: Some(err.into()), schema_version: SCHEMA_VERSION }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| SERIALIZATION_FAILED.to_string())
    }
}

pub(crate) fn parse_request<T: DeserializeOwned>(request_json: &str) -> Result<T> {
    Ok(serde_json::from_str(request_json)?)
}

pub(crate) fn respond<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(data) => ApiResponse::ok(data).to_json(),
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "request rejected");
            ApiResponse::<T>::fail(&err).to_json()
        }
    }
}
