use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound on the number of characters a user may submit.
pub const MAX_INPUT_CHARS: usize = 280;

const CONSISTENCY_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Anything other than `"positive"` is read as negative.
    pub fn from_label(label: &str) -> Self {
        if label == "positive" {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("input has {chars} characters, limit is {}", MAX_INPUT_CHARS)]
pub struct InputTooLong {
    pub chars: usize,
}

/// Current text of the input box, never longer than [`MAX_INPUT_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputText(String);

impl InputText {
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Keeps the first [`MAX_INPUT_CHARS`] characters of `text`.
    pub fn truncated(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if let Some((byte_idx, _)) = text.char_indices().nth(MAX_INPUT_CHARS) {
            text.truncate(byte_idx);
        }
        Self(text)
    }

    pub fn try_new(text: impl Into<String>) -> Result<Self, InputTooLong> {
        let text = text.into();
        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(InputTooLong { chars });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl AsRef<str> for InputText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub probability_negative: f64,
    pub probability_positive: f64,
}

impl PredictionResult {
    /// Probabilities sum to one and confidence is the larger of the two.
    pub fn is_consistent(&self) -> bool {
        let sum = self.probability_negative + self.probability_positive;
        let max = self.probability_negative.max(self.probability_positive);
        (sum - 1.0).abs() <= CONSISTENCY_TOLERANCE
            && (self.confidence - max).abs() <= CONSISTENCY_TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordImportance {
    pub word: String,
    /// Signed: negative values pull against the predicted label.
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResult {
    pub sentiment: String,
    pub words: Vec<WordImportance>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_prediction(text: impl Into<String>, result: &PredictionResult) -> Self {
        Self {
            text: text.into(),
            sentiment: result.sentiment,
            confidence: result.confidence,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_INPUT_CHARS + 5);
        let input = InputText::truncated(text);
        assert_eq!(input.char_count(), MAX_INPUT_CHARS);
        assert!(input.as_str().chars().all(|c| c == 'é'));
    }

    #[test]
    fn truncation_keeps_short_text_untouched() {
        let input = InputText::truncated("hello");
        assert_eq!(input.as_str(), "hello");
    }

    #[test]
    fn checked_constructor_rejects_overlong_text() {
        let err = InputText::try_new("a".repeat(MAX_INPUT_CHARS + 1)).expect_err("too long");
        assert_eq!(err.chars, MAX_INPUT_CHARS + 1);
        assert!(InputText::try_new("a".repeat(MAX_INPUT_CHARS)).is_ok());
        assert_eq!(err.to_string(), "input has 281 characters, limit is 280");
    }

    #[test]
    fn only_positive_label_maps_to_positive() {
        assert_eq!(Sentiment::from_label("positive"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("Positive"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label(""), Sentiment::Negative);
    }

    #[test]
    fn consistency_check_tolerates_rounding() {
        let result = PredictionResult {
            sentiment: Sentiment::Positive,
            confidence: 0.93,
            probability_negative: 0.07,
            probability_positive: 0.93,
        };
        assert!(result.is_consistent());

        let skewed = PredictionResult {
            confidence: 0.5,
            ..result
        };
        assert!(!skewed.is_consistent());
    }
}
