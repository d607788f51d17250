use crate::InferError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body of the remote interpretation endpoint: raw base64 JPEG
/// (any data-URI prefix already stripped).
#[derive(Debug, Serialize)]
pub struct InterpretRequest {
    pub image: String,
}

/// Response body of the remote interpretation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretResponse {
    #[serde(default)]
    pub gesture: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// The outbound call the remote classifier makes, pulled behind a
/// trait so tests can count requests and script responses.
pub trait InterpretTransport {
    fn interpret(&mut self, image_b64: &str) -> Result<InterpretResponse, InferError>;
}

/// HTTP transport over ureq with a global timeout covering connect,
/// send and read.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl InterpretTransport for HttpTransport {
    fn interpret(&mut self, image_b64: &str) -> Result<InterpretResponse, InferError> {
        let resp = self
            .agent
            .post(&self.endpoint)
            .send_json(&InterpretRequest {
                image: image_b64.to_string(),
            })?;

        Ok(resp.into_body().read_json::<InterpretResponse>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let json = serde_json::to_value(InterpretRequest {
            image: "AAAA".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "image": "AAAA" }));
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let full: InterpretResponse =
            serde_json::from_str(r#"{"gesture": "hello", "confidence": 0.8}"#).unwrap();
        assert_eq!(full.gesture, "hello");
        assert_eq!(full.confidence, Some(0.8));

        let sparse: InterpretResponse = serde_json::from_str(r#"{"gesture": "yes"}"#).unwrap();
        assert_eq!(sparse.confidence, None);

        let empty: InterpretResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.gesture.is_empty());
    }
}
