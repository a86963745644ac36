//! Async HTTP client for the remote generator service
//!
//! The service accepts one instruction plus the optional current document
//! and returns a complete replacement document. The local pipeline never
//! depends on it; the session only calls through here when a client has
//! been attached.

use crate::core::error::{ForgeError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Async client for the remote generator endpoint.
pub struct GeneratorClient {
    client: Client,
    endpoint: String,
}

impl GeneratorClient {
    /// Create a client with an explicit endpoint URL.
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: BASEFORGE_API_URL
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("BASEFORGE_API_URL")
            .map_err(|_| ForgeError::Remote("BASEFORGE_API_URL not set".into()))?;
        Ok(Self::new(endpoint))
    }

    /// Send one instruction to the service
    ///
    /// # Arguments
    /// * `instruction` - The natural-language instruction
    /// * `current` - The current document text, if one exists
    ///
    /// # Returns
    /// The complete replacement document text
    pub async fn generate(&self, instruction: &str, current: Option<&str>) -> Result<String> {
        let request = GenerateRequest {
            instruction: instruction.into(),
            current_document: current.map(Into::into),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ForgeError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);
            return Err(ForgeError::Remote(message));
        }

        let completion: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::Remote(e.to_string()))?;

        Ok(strip_code_fences(&completion.document).to_string())
    }
}

/// Strip a surrounding markdown code fence, if present. The service is
/// asked for bare document text but occasionally wraps it anyway.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first, remainder)) if first.chars().all(|c| c.is_ascii_alphanumeric()) => {
            remainder.trim_matches('\n')
        }
        _ => body.trim_matches('\n'),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_document: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    document: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeneratorClient::new("https://api.example.com/generate".into());
        assert_eq!(client.endpoint, "https://api.example.com/generate");
    }

    #[test]
    fn test_strip_plain_fence() {
        let wrapped = "```\nfilters:\n  and:\n    - file.hasTag(\"x\")\n```";
        assert_eq!(
            strip_code_fences(wrapped),
            "filters:\n  and:\n    - file.hasTag(\"x\")"
        );
    }

    #[test]
    fn test_strip_tagged_fence() {
        let wrapped = "```yaml\nviews:\n  - type: table\n```";
        assert_eq!(strip_code_fences(wrapped), "views:\n  - type: table");
    }

    #[test]
    fn test_no_fence_untouched() {
        assert_eq!(strip_code_fences("views:\n  - type: table"), "views:\n  - type: table");
    }

    #[test]
    fn test_request_shape() {
        let with_doc = GenerateRequest {
            instruction: "add a map view".into(),
            current_document: Some("filters:".into()),
        };
        let json = serde_json::to_value(&with_doc).unwrap();
        assert_eq!(json["instruction"], "add a map view");
        assert_eq!(json["currentDocument"], "filters:");

        let without = GenerateRequest {
            instruction: "show tasks".into(),
            current_document: None,
        };
        let json = serde_json::to_value(&without).unwrap();
        assert!(json.get("currentDocument").is_none());
    }
}
