use std::{env, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};

use crate::{
    foundation::error::{AdError, AdResult},
    inference::{AnalysisModel, AnalysisRequest, ImageModel, ImageRequest},
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_model: String,
    pub analysis_model: String,
    /// Transport-level timeout; stages apply their own deadline on top.
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            request_timeout: Duration::from_secs(90),
        }
    }

    /// Read `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) plus optional `ADFORGE_GEMINI_*` overrides.
    pub fn from_env() -> AdResult<Self> {
        let api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("GOOGLE_API_KEY"))
            .ok_or_else(|| AdError::validation("GEMINI_API_KEY or GOOGLE_API_KEY not set"))?;

        let mut config = Self::new(api_key);
        if let Some(base) = non_empty_env("ADFORGE_GEMINI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty_env("ADFORGE_GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(model) = non_empty_env("ADFORGE_GEMINI_ANALYSIS_MODEL") {
            config.analysis_model = model;
        }
        Ok(config)
    }
}

/// Blocking Gemini `generateContent` client serving both model seams.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> AdResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdError::inference(format!("failed to build http client: {e}")))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.api_base)
    }

    fn post(&self, model: &str, payload: &Value) -> AdResult<Value> {
        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", self.config.api_key.as_str())])
            .json(payload)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AdError::timeout(format!("gemini request to {model} timed out"))
                } else {
                    AdError::inference(format!("gemini request to {model} failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            return Err(AdError::inference(format!(
                "gemini {model} returned {status}: {snippet}"
            )));
        }

        response
            .json::<Value>()
            .map_err(|e| AdError::parse(format!("gemini {model} response is not JSON: {e}")))
    }
}

impl ImageModel for GeminiClient {
    fn generate(&self, request: &ImageRequest) -> AdResult<Vec<u8>> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    inline_png(&request.reference_png),
                    { "text": request.prompt },
                ],
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
            },
        });

        let response = self.post(&self.config.image_model, &payload)?;
        let mut images = extract_inline_images(&response)?;
        if images.is_empty() {
            let text = extract_text(&response);
            let snippet: String = text.chars().take(200).collect();
            return Err(AdError::inference(format!(
                "gemini returned no image part (text: {snippet:?})"
            )));
        }
        Ok(images.swap_remove(0))
    }
}

impl AnalysisModel for GeminiClient {
    fn analyze(&self, request: &AnalysisRequest) -> AdResult<String> {
        let mut parts = Vec::new();
        if let Some(png) = &request.image_png {
            parts.push(inline_png(png));
        }
        parts.push(json!({ "text": request.prompt }));

        let payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.2,
            },
        });

        let response = self.post(&self.config.analysis_model, &payload)?;
        let text = extract_text(&response);
        if text.trim().is_empty() {
            return Err(AdError::inference("gemini analysis returned no text"));
        }
        Ok(text)
    }
}

fn inline_png(bytes: &[u8]) -> Value {
    json!({
        "inlineData": {
            "mimeType": "image/png",
            "data": BASE64.encode(bytes),
        }
    })
}

fn response_parts(response: &Value) -> impl Iterator<Item = &Value> {
    response
        .get("candidates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|candidate| candidate.pointer("/content/parts").and_then(Value::as_array))
        .flatten()
}

fn extract_inline_images(response: &Value) -> AdResult<Vec<Vec<u8>>> {
    let mut out = Vec::new();
    for part in response_parts(response) {
        let Some(inline) = part.get("inlineData").or_else(|| part.get("inline_data")) else {
            continue;
        };
        let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
        if data.is_empty() {
            continue;
        }
        let bytes = BASE64
            .decode(data.as_bytes())
            .map_err(|e| AdError::parse(format!("gemini image base64 decode failed: {e}")))?;
        out.push(bytes);
    }
    Ok(out)
}

fn extract_text(response: &Value) -> String {
    response_parts(response)
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("")
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_inline_images_and_text() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "here is " },
                        {
                            "inlineData": {
                                "mimeType": "image/png",
                                "data": BASE64.encode([1u8, 2, 3]),
                            }
                        },
                        { "text": "your ad" },
                    ]
                }
            }]
        });
        assert_eq!(extract_inline_images(&response).unwrap(), vec![vec![1, 2, 3]]);
        assert_eq!(extract_text(&response), "here is your ad");
    }

    #[test]
    fn missing_candidates_yield_nothing() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_inline_images(&response).unwrap().is_empty());
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn bad_base64_is_a_parse_error() {
        let response = json!({
            "candidates": [{ "content": { "parts": [ { "inlineData": { "data": "@@@" } } ] } }]
        });
        assert!(matches!(
            extract_inline_images(&response),
            Err(AdError::Parse(_))
        ));
    }

    #[test]
    fn endpoint_uses_configured_base() {
        let mut config = GeminiConfig::new("k");
        config.api_base = "http://localhost:9000/v1".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint("m"),
            "http://localhost:9000/v1/models/m:generateContent"
        );
    }
}
