//! Placeholder classifier
//!
//! Returns a fixed classification without looking at the image. Used in
//! development and as the fallback when a real model call fails.

use crate::classify::{Classification, Classifier};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct PlaceholderClassifier;

impl PlaceholderClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for PlaceholderClassifier {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn description(&self) -> &'static str {
        "Fixed answer, no model call"
    }

    fn classify(&self, _image: &[u8], _mime_type: &str) -> Result<Classification> {
        Ok(Classification::placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::IssueType;

    #[test]
    fn test_ignores_input() {
        let classifier = PlaceholderClassifier::new();
        let a = classifier.classify(b"", "image/jpeg").unwrap();
        let b = classifier.classify(&[0xff; 64], "image/png").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.issue_type, Some(IssueType::Pothole));
        assert!(!a.ai_analyzed);
    }
}
