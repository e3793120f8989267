//! Google Gemini vision classifier
//!
//! Sends the image and an analysis prompt to the Generative Language API
//! (`models/{model}:generateContent`) and parses the JSON object out of the
//! model's text answer.
//!
//! Transport failures are errors. A reply that cannot be parsed degrades to
//! the placeholder classification.

use crate::classify::{encode_image, parse_analysis_response, Classification, Classifier};
use crate::constants::api::GEMINI_URL;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT_SECS: u64 = 30;

const ANALYSIS_PROMPT: &str = r#"Analyze this image and determine if it shows any public infrastructure issue.

Look for these types of issues:
1. pothole - Road damage, holes, or surface depressions
2. broken_light - Non-functioning street lights or traffic signals
3. garbage - Accumulated waste, litter, or illegal dumping
4. waterlogging - Standing water, flooding, or drainage problems
5. other - Other infrastructure problems (specify in description)

If no infrastructure issue is visible, respond with issue_type: "none".

Respond in JSON format:
{
    "issue_type": "pothole|broken_light|garbage|waterlogging|other|none",
    "severity": "low|medium|high",
    "confidence": 0.0-1.0,
    "description": "Brief description of the issue",
    "details": "Additional details about location, size, or urgency"
}

Consider these severity criteria:
- high: Safety hazard, immediate risk to people or vehicles
- medium: Significant inconvenience, should be fixed soon
- low: Minor issue, can be scheduled for routine maintenance"#;

/// Gemini classifier
///
/// Note: requests run on a separate thread so the blocking client never
/// executes inside tokio's runtime.
#[derive(Debug)]
pub struct GeminiClassifier {
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_URL,
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.api_key)
        )
    }

    fn request_body(image: &[u8], mime_type: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: ANALYSIS_PROMPT,
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: encode_image(image),
                        },
                    },
                ],
            }],
        };
        Ok(serde_json::to_string(&request)?)
    }

    /// Send the request and return the model's text answer
    fn generate(&self, body: String) -> Result<String> {
        let url = self.endpoint();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = (|| -> Result<String> {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                    .build()
                    .map_err(|e| {
                        Error::Classifier(format!("Failed to build HTTP client: {}", e))
                    })?;

                let response = client
                    .post(&url)
                    .header("content-type", "application/json")
                    .body(body)
                    .send()
                    .map_err(|e| Error::Classifier(format!("Gemini request failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::Classifier(format!(
                        "Gemini API returned status: {}",
                        response.status()
                    )));
                }

                let parsed: GenerateResponse = response.json().map_err(|e| {
                    Error::Classifier(format!("Failed to parse Gemini response: {}", e))
                })?;

                parsed
                    .text()
                    .ok_or_else(|| Error::Classifier("Gemini returned no text".to_string()))
            })();

            let _ = tx.send(result);
        });

        rx.recv().map_err(|_| {
            Error::Classifier("Failed to receive response from HTTP thread".to_string())
        })?
    }
}

impl Classifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn description(&self) -> &'static str {
        "Google Gemini vision model"
    }

    fn classify(&self, image: &[u8], mime_type: &str) -> Result<Classification> {
        if image.is_empty() {
            return Err(Error::Validation("Image data is empty".to_string()));
        }

        let body = Self::request_body(image, mime_type)?;
        let text = self.generate(body)?;
        let result = parse_analysis_response(&text);

        info!(
            model = %self.model,
            issue_type = ?result.issue_type,
            severity = %result.severity,
            "gemini analysis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_key() {
        let classifier = GeminiClassifier::new("a b&c", "gemini-1.5-flash");
        assert_eq!(
            classifier.endpoint(),
            format!("{}/gemini-1.5-flash:generateContent?key=a%20b%26c", GEMINI_URL)
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GeminiClassifier::request_body(b"hello", "image/png").unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let parts = &json["contents"][0]["parts"];

        assert!(parts[0]["text"].as_str().unwrap().contains("broken_light"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "aGVsbG8=");
    }

    #[test]
    fn test_response_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"issue_type\":"},{"text":"\"garbage\"}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().unwrap(), r#"{"issue_type":"garbage"}"#);

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn test_empty_image_rejected() {
        let classifier = GeminiClassifier::new("key", "gemini-1.5-flash");
        assert!(matches!(
            classifier.classify(b"", "image/jpeg"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    #[ignore = "Requires network access and a Gemini API key"]
    fn test_gemini_live() {
        let key = std::env::var("GEMINI_API_KEY").unwrap();
        let classifier = GeminiClassifier::new(key, "gemini-1.5-flash");
        let result = classifier.classify(&[0xff, 0xd8, 0xff], "image/jpeg");
        assert!(result.is_ok());
    }
}
