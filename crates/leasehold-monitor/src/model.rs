//! Monitoring API response model

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Envelope returned by every API endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub results: Vec<ApiResult>,
}

/// One entry of a batch response.
///
/// Mutating endpoints report a per-object `code`; query endpoints return the
/// object itself (`attrs`) without one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    /// Per-entry status code, sometimes encoded as a float (`200.0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiResult {
    /// Entries without a code carry data, not an outcome
    pub fn is_success(&self) -> bool {
        self.code.is_none_or(|code| (200.0..300.0).contains(&code))
    }

    fn describe(&self) -> String {
        format!(
            "{} ({}): {}",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.code.map(|c| c as i64).unwrap_or_default(),
            self.status.as_deref().unwrap_or("no status")
        )
    }
}

impl ApiResponse {
    /// Check a decoded response for the request `method`.
    ///
    /// Any failing entry fails the whole call, even if others succeeded. An
    /// empty result set is a failure for mutating methods; a query may
    /// legitimately match nothing.
    pub fn ensure_success(&self, method: &Method) -> Result<()> {
        if self.results.is_empty() {
            if is_read_only(method) {
                return Ok(());
            }
            return Err(MonitorError::EmptyResults);
        }

        let failed: Vec<String> = self
            .results
            .iter()
            .filter(|result| !result.is_success())
            .map(ApiResult::describe)
            .collect();

        if !failed.is_empty() {
            return Err(MonitorError::PartialFailure(failed));
        }
        Ok(())
    }
}

fn is_read_only(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(code: Option<f64>, name: &str) -> ApiResult {
        ApiResult {
            code,
            name: Some(name.to_string()),
            status: Some("Attributes updated.".to_string()),
            kind: Some("Service".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_batch_response() {
        let json = r#"{
            "results": [
                {
                    "code": 200.0,
                    "name": "client1.example.com!check_docker",
                    "status": "Attributes updated.",
                    "type": "Service"
                }
            ]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].code, Some(200.0));
        assert_eq!(response.results[0].kind.as_deref(), Some("Service"));
        assert!(response.ensure_success(&Method::POST).is_ok());
    }

    #[test]
    fn test_any_failed_entry_fails_the_batch() {
        let response = ApiResponse {
            results: vec![result(Some(200.0), "ok"), result(Some(500.0), "broken")],
        };
        match response.ensure_success(&Method::POST) {
            Err(MonitorError::PartialFailure(failed)) => {
                assert_eq!(failed, vec!["broken (500): Attributes updated.".to_string()]);
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_results_by_method() {
        let response = ApiResponse::default();
        assert!(matches!(
            response.ensure_success(&Method::POST),
            Err(MonitorError::EmptyResults)
        ));
        assert!(matches!(
            response.ensure_success(&Method::DELETE),
            Err(MonitorError::EmptyResults)
        ));
        assert!(response.ensure_success(&Method::GET).is_ok());
    }

    #[test]
    fn test_query_results_without_code_succeed() {
        let json = r#"{"results": [{"name": "web-1", "type": "Host", "attrs": {"state": 0.0}}]}"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.results[0].is_success());
        assert!(response.ensure_success(&Method::GET).is_ok());
    }

    #[test]
    fn test_missing_results_does_not_decode() {
        assert!(serde_json::from_str::<ApiResponse>(r#"{"error": 404}"#).is_err());
    }
}
