//! Wire shapes exchanged with the classification service.

use serde::{Deserialize, Serialize};

use crate::domain::{ExplanationResult, PredictionResult, Sentiment, WordImportance};

pub const PREDICT_PATH: &str = "/predict";
pub const EXPLAIN_PATH: &str = "/explain";

/// Request body shared by `/predict` and `/explain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub sentiment: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub probability_negative: f64,
    #[serde(default)]
    pub probability_positive: f64,
}

impl From<PredictResponse> for PredictionResult {
    fn from(value: PredictResponse) -> Self {
        Self {
            sentiment: Sentiment::from_label(&value.sentiment),
            confidence: value.confidence,
            probability_negative: value.probability_negative,
            probability_positive: value.probability_positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationItem {
    pub word: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub sentiment: String,
    #[serde(default)]
    pub explanation: Vec<ExplanationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_explanation: Option<String>,
}

impl From<ExplainResponse> for ExplanationResult {
    fn from(value: ExplainResponse) -> Self {
        Self {
            sentiment: value.sentiment,
            words: value
                .explanation
                .into_iter()
                .map(|item| WordImportance {
                    word: item.word,
                    importance: item.importance,
                })
                .collect(),
            html: value.html_explanation.filter(|html| !html.is_empty()),
        }
    }
}
