//! Wire types and the backend seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use fiterior_utils::error::TransformError;

/// Body POSTed to the transform endpoint.
///
/// Every field is optional on the wire; absent fields are omitted from the
/// JSON rather than sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    /// Opaque locator of the source photo
    #[serde(rename = "imageUri", skip_serializing_if = "Option::is_none", default)]
    pub image_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub theme_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_id: Option<String>,
}

impl TransformRequest {
    #[must_use]
    pub fn new(
        image_reference: impl Into<String>,
        theme_id: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            image_reference: Some(image_reference.into()),
            theme_id: Some(theme_id.into()),
            model_id: Some(model_id.into()),
        }
    }

    /// True once image, theme and model are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.image_reference.is_some() && self.theme_id.is_some() && self.model_id.is_some()
    }

    /// Names of the fields still missing, in wire order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.image_reference.is_none() {
            missing.push("imageUri");
        }
        if self.theme_id.is_none() {
            missing.push("themeId");
        }
        if self.model_id.is_none() {
            missing.push("modelId");
        }
        missing
    }
}

/// Body returned by the transform endpoint on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub job_id: String,
    pub result_url: String,
}

impl TransformResponse {
    /// Synthetic response standing in for the backend: the result is the
    /// original photo, or empty when none was given.
    #[must_use]
    pub fn fallback_for(request: &TransformRequest, job_id: String) -> Self {
        Self {
            job_id,
            result_url: request.image_reference.clone().unwrap_or_default(),
        }
    }
}

/// Why the client answered with a synthetic response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No complete response within the request timeout
    Timeout,
    /// The backend answered with a non-2xx status
    Status(u16),
    /// Connection or transport failure (message already redacted)
    Network(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "backend returned HTTP {code}"),
            Self::Network(message) => write!(f, "network error: {message}"),
        }
    }
}

/// Result of one transform call.
///
/// The fallback branch is part of the type so callers that care (tests,
/// `--json` output, a stricter production policy) can tell a real result from
/// a synthetic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Delivered(TransformResponse),
    Fallback {
        response: TransformResponse,
        reason: FallbackReason,
    },
}

impl TransformOutcome {
    #[must_use]
    pub fn response(&self) -> &TransformResponse {
        match self {
            Self::Delivered(response) | Self::Fallback { response, .. } => response,
        }
    }

    #[must_use]
    pub fn into_response(self) -> TransformResponse {
        match self {
            Self::Delivered(response) | Self::Fallback { response, .. } => response,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Fallback { reason, .. } => Some(reason),
            Self::Delivered(_) => None,
        }
    }
}

/// Anything that can turn a request into a transform outcome.
///
/// [`crate::TransformClient`] is the HTTP implementation; the orchestrator only
/// sees this trait.
#[async_trait]
pub trait TransformBackend: Send + Sync {
    /// Submit one request and wait for its outcome
    ///
    /// # Errors
    ///
    /// Implementations absorb network failures into
    /// [`TransformOutcome::Fallback`]; an `Err` means the exchange produced
    /// something the caller cannot use at all.
    async fn transform(&self, request: &TransformRequest)
    -> Result<TransformOutcome, TransformError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_wire_names() {
        let request = TransformRequest::new("file://a.jpg", "modern", "gpt-4o");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"imageUri": "file://a.jpg", "themeId": "modern", "modelId": "gpt-4o"})
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let request = TransformRequest {
            theme_id: Some("nordic".to_string()),
            ..TransformRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"themeId": "nordic"})
        );
        assert!(!request.is_complete());
        assert_eq!(request.missing_fields(), vec!["imageUri", "modelId"]);
    }

    #[test]
    fn test_response_parses_camel_case() {
        let response: TransformResponse =
            serde_json::from_str(r#"{"jobId":"j1","resultUrl":"https://x/y.png"}"#).unwrap();
        assert_eq!(response.job_id, "j1");
        assert_eq!(response.result_url, "https://x/y.png");
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let response: TransformResponse = serde_json::from_str(
            r#"{"jobId":"j2","resultUrl":"u","status":"done","credits":3}"#,
        )
        .unwrap();
        assert_eq!(response.job_id, "j2");
    }

    #[test]
    fn test_fallback_result_url() {
        let request = TransformRequest::new("file://a.jpg", "modern", "gpt-4o");
        let response = TransformResponse::fallback_for(&request, "job-1".to_string());
        assert_eq!(response.result_url, "file://a.jpg");

        let empty = TransformResponse::fallback_for(&TransformRequest::default(), "job-2".into());
        assert_eq!(empty.result_url, "");
    }

    #[test]
    fn test_outcome_accessors() {
        let response = TransformResponse {
            job_id: "j1".to_string(),
            result_url: "u".to_string(),
        };
        let delivered = TransformOutcome::Delivered(response.clone());
        assert!(!delivered.is_fallback());
        assert!(delivered.fallback_reason().is_none());

        let fallback = TransformOutcome::Fallback {
            response: response.clone(),
            reason: FallbackReason::Status(503),
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.fallback_reason(), Some(&FallbackReason::Status(503)));
        assert_eq!(fallback.into_response(), response);
    }

    #[test]
    fn test_fallback_reason_display() {
        assert_eq!(FallbackReason::Timeout.to_string(), "request timed out");
        assert_eq!(
            FallbackReason::Status(404).to_string(),
            "backend returned HTTP 404"
        );
    }
}
