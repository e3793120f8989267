//! Image classifiers
//!
//! This module defines the `Classifier` trait: image bytes in, an issue label
//! and severity out. Each classifier is a single file implementing the trait.
//!
//! ## Flex Point
//! Adding a new classifier requires:
//! 1. Create `src/classify/{classifier_name}.rs` implementing `Classifier`
//! 2. Add `pub mod {classifier_name};` below
//! 3. Register it in `get_classifier` and `available_classifiers`

pub mod gemini;
pub mod placeholder;

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::report::{IssueType, Severity};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Result of classifying one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Detected issue, `None` when the image shows no infrastructure problem
    #[serde(with = "issue_label")]
    pub issue_type: Option<IssueType>,
    pub severity: Severity,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    /// False when the result is a stand-in rather than a model answer
    #[serde(default)]
    pub ai_analyzed: bool,
}

impl Classification {
    /// Stand-in used when no model answer is available
    pub fn placeholder() -> Self {
        Self {
            issue_type: Some(IssueType::Pothole),
            severity: Severity::Medium,
            confidence: 0.8,
            description: "Potential infrastructure issue detected".to_string(),
            details: "AI analysis not available - using placeholder".to_string(),
            ai_analyzed: false,
        }
    }

    /// Issue type to file the report under when the user gave none
    pub fn issue_type_or_other(&self) -> IssueType {
        self.issue_type.unwrap_or(IssueType::Other)
    }
}

/// Serializes `Option<IssueType>` with "none" for the empty case
mod issue_label {
    use crate::report::IssueType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<IssueType>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.to_string()),
            None => s.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<IssueType>, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(super::normalize_issue_type(&raw))
    }
}

/// Trait for image classifiers
///
/// Implementations must be thread-safe (Send + Sync) to work with the async
/// server.
pub trait Classifier: Send + Sync {
    /// Returns the classifier name (e.g., "placeholder", "gemini")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this classifier
    fn description(&self) -> &'static str;

    /// Classify raw image bytes of the given MIME type
    fn classify(&self, image: &[u8], mime_type: &str) -> Result<Classification>;
}

/// Information about a classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierInfo {
    pub name: String,
    pub description: String,
    /// Whether an API key is needed
    pub requires_key: bool,
}

/// Build the classifier named in `config`
pub fn get_classifier(
    config: &ClassifierConfig,
    api_key: Option<&str>,
) -> Result<Arc<dyn Classifier>> {
    match config.backend.as_str() {
        "placeholder" => Ok(Arc::new(placeholder::PlaceholderClassifier::new())),
        "gemini" => match api_key {
            Some(key) if !key.is_empty() => Ok(Arc::new(gemini::GeminiClassifier::new(
                key,
                config.model.clone(),
            ))),
            _ => Err(Error::Config(
                "Gemini classifier requires api_keys.gemini".to_string(),
            )),
        },
        other => Err(Error::Config(format!("Unknown classifier: {}", other))),
    }
}

/// List all available classifiers with their info
pub fn available_classifiers() -> Vec<ClassifierInfo> {
    vec![
        ClassifierInfo {
            name: "placeholder".to_string(),
            description: "Fixed answer, no model call".to_string(),
            requires_key: false,
        },
        ClassifierInfo {
            name: "gemini".to_string(),
            description: "Google Gemini vision model".to_string(),
            requires_key: true,
        },
    ]
}

/// Map a model label to an issue type; "none" means no issue, anything
/// unrecognised becomes `other`
pub fn normalize_issue_type(raw: &str) -> Option<IssueType> {
    let raw = raw.trim().to_lowercase();
    if raw == "none" {
        return None;
    }
    Some(raw.parse().unwrap_or(IssueType::Other))
}

/// Map a model severity to a level, defaulting to medium
pub fn normalize_severity(raw: &str) -> Severity {
    raw.trim().parse().unwrap_or(Severity::Medium)
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    issue_type: Option<String>,
    severity: Option<String>,
    confidence: Option<f64>,
    description: Option<String>,
    details: Option<String>,
}

/// Extract a classification from free-form model text
///
/// Takes the span from the first `{` to the last `}` and parses it as JSON.
/// Falls back to the placeholder when no usable object is found.
pub fn parse_analysis_response(text: &str) -> Classification {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            warn!("model response contained no JSON object");
            return Classification::placeholder();
        }
    };

    let raw: RawAnalysis = match serde_json::from_str(span) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "failed to parse model response");
            return Classification::placeholder();
        }
    };

    Classification {
        issue_type: normalize_issue_type(raw.issue_type.as_deref().unwrap_or("other")),
        severity: normalize_severity(raw.severity.as_deref().unwrap_or("medium")),
        confidence: raw.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        description: raw
            .description
            .unwrap_or_else(|| "Infrastructure issue detected".to_string()),
        details: raw.details.unwrap_or_default(),
        ai_analyzed: true,
    }
}

/// Decoded image payload
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Decode a base64 image, with or without a `data:` URL header
///
/// The MIME type comes from the header (png, gif, webp), otherwise jpeg.
pub fn decode_image_payload(data: &str) -> Result<ImagePayload> {
    let (header, body) = match data.split_once(',') {
        Some((header, body)) => (header, body),
        None => ("", data),
    };

    let mime_type = if header.contains("image/png") {
        "image/png"
    } else if header.contains("image/gif") {
        "image/gif"
    } else if header.contains("image/webp") {
        "image/webp"
    } else {
        "image/jpeg"
    };

    let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if body.is_empty() {
        return Err(Error::Validation("Image data is empty".to_string()));
    }

    let bytes = BASE64
        .decode(body.as_bytes())
        .map_err(|e| Error::Validation(format!("Invalid base64 image data: {}", e)))?;

    Ok(ImagePayload { bytes, mime_type })
}

/// Encode bytes for a model request
pub(crate) fn encode_image(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_json() {
        let text = "Here is the analysis:\n```json\n{\"issue_type\": \"garbage\", \"severity\": \"HIGH\", \"confidence\": 0.92, \"description\": \"Overflowing bin\"}\n```";
        let result = parse_analysis_response(text);

        assert_eq!(result.issue_type, Some(IssueType::Garbage));
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.description, "Overflowing bin");
        assert!(result.ai_analyzed);
    }

    #[test]
    fn test_parse_normalizes_unknown_labels() {
        let text = r#"{"issue_type": "graffiti", "severity": "catastrophic"}"#;
        let result = parse_analysis_response(text);

        assert_eq!(result.issue_type, Some(IssueType::Other));
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_parse_keeps_none() {
        let result = parse_analysis_response(r#"{"issue_type": "none", "severity": "low"}"#);
        assert_eq!(result.issue_type, None);
        assert_eq!(result.issue_type_or_other(), IssueType::Other);
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        assert_eq!(parse_analysis_response("no json here"), Classification::placeholder());
        assert_eq!(parse_analysis_response("{not json}"), Classification::placeholder());
        assert_eq!(parse_analysis_response("} backwards {"), Classification::placeholder());
    }

    #[test]
    fn test_placeholder_values() {
        let p = Classification::placeholder();
        assert_eq!(p.issue_type, Some(IssueType::Pothole));
        assert_eq!(p.severity, Severity::Medium);
        assert_eq!(p.confidence, 0.8);
        assert!(!p.ai_analyzed);
    }

    #[test]
    fn test_issue_label_serialization() {
        let mut c = Classification::placeholder();
        c.issue_type = None;
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["issue_type"], "none");

        let back: Classification = serde_json::from_value(json).unwrap();
        assert_eq!(back.issue_type, None);
    }

    #[test]
    fn test_decode_data_url() {
        let payload = decode_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.bytes, b"hello");
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_decode_plain_base64_defaults_to_jpeg() {
        let payload = decode_image_payload("aGVs\nbG8=").unwrap();
        assert_eq!(payload.bytes, b"hello");
        assert_eq!(payload.mime_type, "image/jpeg");
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(
            decode_image_payload("data:image/webp;base64,!!!"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(decode_image_payload(""), Err(Error::Validation(_))));
    }

    #[test]
    fn test_get_classifier() {
        let config = ClassifierConfig {
            backend: "placeholder".to_string(),
            model: "gemini-1.5-flash".to_string(),
        };
        assert_eq!(get_classifier(&config, None).unwrap().name(), "placeholder");

        let config = ClassifierConfig {
            backend: "gemini".to_string(),
            ..config
        };
        assert!(matches!(get_classifier(&config, None), Err(Error::Config(_))));
        assert_eq!(get_classifier(&config, Some("key")).unwrap().name(), "gemini");

        let config = ClassifierConfig {
            backend: "oracle".to_string(),
            ..config
        };
        assert!(get_classifier(&config, Some("key")).is_err());
    }

    #[test]
    fn test_available_classifiers() {
        let names: Vec<String> = available_classifiers().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["placeholder", "gemini"]);
    }
}
