//! Check request and result types.

use serde::Serialize;

use crate::error_handling::CheckErrorCode;
use crate::trace::TraceInfo;

/// One check invocation, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    /// Check URL issued by the backend
    pub url: String,
    /// Bearer token sent as `Authorization`
    pub access_token: Option<String>,
    /// Carrier operator code hint
    pub operator: Option<String>,
    /// Correlation id
    pub request_id: Option<String>,
    /// Collect and return a trace
    pub debug: bool,
    /// PATCH the final body back to the check URL
    pub patch_result: bool,
}

impl CheckRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_patch_result(mut self, patch: bool) -> Self {
        self.patch_result = patch;
        self
    }
}

/// Combined outcome of a check.
///
/// Serializes to `{used_cellular, http_status, response_body?}` on success and
/// `{used_cellular, error, error_description}` on failure, plus `trace` when
/// debug was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckResult {
    /// The exchange ran over the acquired cellular network
    pub used_cellular: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceInfo>,
}

impl CheckResult {
    pub fn success(http_status: u16, response_body: Option<serde_json::Value>) -> Self {
        Self {
            used_cellular: true,
            http_status: Some(http_status),
            response_body,
            ..Default::default()
        }
    }

    pub fn failure(error: CheckErrorCode, description: impl Into<String>) -> Self {
        Self {
            error: Some(error),
            error_description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_json_shape() {
        let result = CheckResult::success(200, Some(json!({"code": "abc"})));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"used_cellular": true, "http_status": 200, "response_body": {"code": "abc"}})
        );
        assert!(result.is_success());
    }

    #[test]
    fn test_success_without_body_omits_field() {
        let value = serde_json::to_value(CheckResult::success(204, None)).unwrap();
        assert_eq!(value, json!({"used_cellular": true, "http_status": 204}));
    }

    #[test]
    fn test_failure_json_shape() {
        let result = CheckResult::failure(CheckErrorCode::NoDataConnectivity, "no data");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "used_cellular": false,
                "error": "sdk_no_data_connectivity",
                "error_description": "no data"
            })
        );
        assert!(!result.is_success());
    }

    #[test]
    fn test_request_builder() {
        let req = CheckRequest::new("https://example.com/check")
            .with_access_token("t")
            .with_operator("op")
            .with_request_id("r")
            .with_debug(true)
            .with_patch_result(true);
        assert_eq!(req.access_token.as_deref(), Some("t"));
        assert_eq!(req.operator.as_deref(), Some("op"));
        assert_eq!(req.request_id.as_deref(), Some("r"));
        assert!(req.debug && req.patch_result);
    }
}
