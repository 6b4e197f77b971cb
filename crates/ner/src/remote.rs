//! Hosted token-classification backend.
//!
//! Speaks the Hugging Face inference protocol: POST `{"inputs": text}` and get
//! back grouped entities such as
//! `[{"entity_group": "ORG", "score": 0.99, "word": "Starbucks", "start": 0, "end": 9}]`.

use serde::Deserialize;

use crate::recognizer::NerError;
use crate::types::{Entity, EntityLabel};

#[derive(Debug, Deserialize)]
struct GroupedEntity {
    #[serde(alias = "entity")]
    entity_group: String,
    score: f32,
    word: String,
}

/// Decode an inference response body into entities, in model order.
pub fn parse_inference_response(body: &str) -> Result<Vec<Entity>, NerError> {
    let raw: Vec<GroupedEntity> =
        serde_json::from_str(body).map_err(|e| NerError::Response(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|g| Entity::new(EntityLabel::from_tag(&g.entity_group), g.word, g.score))
        .collect())
}

#[cfg(feature = "remote")]
pub use http::HttpRecognizer;

#[cfg(feature = "remote")]
mod http {
    use std::time::Duration;

    use super::parse_inference_response;
    use crate::recognizer::{EntityRecognizer, NerError};
    use crate::types::Entity;

    pub struct HttpRecognizer {
        client: reqwest::blocking::Client,
        endpoint: String,
        token: Option<String>,
        timeout: Duration,
    }

    impl HttpRecognizer {
        pub fn new(
            endpoint: impl Into<String>,
            token: Option<String>,
            timeout: Duration,
        ) -> Result<Self, NerError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| NerError::Engine(e.to_string()))?;
            Ok(Self { client, endpoint: endpoint.into(), token, timeout })
        }
    }

    impl EntityRecognizer for HttpRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
            let mut req = self
                .client
                .post(&self.endpoint)
                .json(&serde_json::json!({
                    "inputs": text,
                    "parameters": { "aggregation_strategy": "simple" },
                }));
            if let Some(token) = &self.token {
                req = req.bearer_auth(token);
            }

            let resp = req.send().map_err(|e| {
                if e.is_timeout() {
                    NerError::Timeout(self.timeout)
                } else {
                    NerError::Engine(e.to_string())
                }
            })?;
            let status = resp.status();
            let body = resp.text().map_err(|e| NerError::Engine(e.to_string()))?;
            if !status.is_success() {
                return Err(NerError::Engine(format!("HTTP {status}: {body}")));
            }
            parse_inference_response(&body)
        }
    }
}
