//! Before/after summary of a finished transform.

use serde::Serialize;

use fiterior_catalog::{Model, Theme};
use fiterior_client::{FallbackReason, TransformResponse};

/// What the result view needs: both images, what produced them, and whether
/// the "after" image is real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub job_id: String,
    pub result_url: String,
    /// The photo the user submitted, kept for the comparison view
    pub original_image: String,
    pub theme: &'static Theme,
    pub model: &'static Model,
    /// The backend did not answer; the result is a synthetic stand-in
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Attempts it took, counting the successful one
    pub attempts: u32,
}

impl ResultSummary {
    pub(crate) fn new(
        response: TransformResponse,
        fallback: Option<&FallbackReason>,
        original_image: String,
        theme: &'static Theme,
        model: &'static Model,
        attempts: u32,
    ) -> Self {
        Self {
            job_id: response.job_id,
            result_url: response.result_url,
            original_image,
            theme,
            model,
            is_fallback: fallback.is_some(),
            fallback_reason: fallback.map(ToString::to_string),
            attempts,
        }
    }

    /// Whether there is anything to compare: the result is a different image.
    #[must_use]
    pub fn has_distinct_result(&self) -> bool {
        !self.result_url.is_empty() && self.result_url != self.original_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiterior_catalog::{ModelId, ThemeId};

    fn response(job_id: &str, result_url: &str) -> TransformResponse {
        TransformResponse {
            job_id: job_id.to_string(),
            result_url: result_url.to_string(),
        }
    }

    fn summary(response: TransformResponse, fallback: Option<&FallbackReason>) -> ResultSummary {
        ResultSummary::new(
            response,
            fallback,
            "file://a.jpg".to_string(),
            ThemeId::Modern.theme(),
            ModelId::Gpt4o.model(),
            1,
        )
    }

    #[test]
    fn test_delivered_result_is_distinct() {
        let result = summary(response("j1", "https://x/y.png"), None);
        assert!(!result.is_fallback);
        assert!(result.has_distinct_result());
        assert_eq!(result.original_image, "file://a.jpg");
    }

    #[test]
    fn test_fallback_result_is_the_original() {
        let result = summary(
            response("job-1", "file://a.jpg"),
            Some(&FallbackReason::Timeout),
        );
        assert!(result.is_fallback);
        assert_eq!(result.fallback_reason.as_deref(), Some("request timed out"));
        assert!(!result.has_distinct_result());
    }

    #[test]
    fn test_serialized_shape() {
        let result = summary(response("j1", "https://x/y.png"), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["theme"]["id"], "modern");
        assert_eq!(json["model"]["id"], "gpt-4o");
        assert_eq!(json["is_fallback"], false);
        assert!(json.get("fallback_reason").is_none());
    }
}
