//! Pure mappings from results and history to what the front ends draw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{ExplanationResult, HistoryEntry, PredictionResult, Sentiment};

pub const CHART_TITLE: &str = "Sentiment Probabilities";
pub const CHART_X_LABEL: &str = "Sentiment";
pub const CHART_Y_LABEL: &str = "Probability";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    #[default]
    NewestFirst,
    InsertionOrder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Always `[Negative, Positive]`.
    pub bars: [Bar; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub label: &'static str,
    pub tone: Sentiment,
    pub confidence_text: String,
    pub chart: BarChart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordLine {
    pub word: String,
    pub importance: f64,
    pub importance_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationView {
    pub headline: String,
    pub words: Vec<WordLine>,
    pub raw_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence_text: String,
    pub recorded_at: DateTime<Utc>,
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn render_prediction(result: &PredictionResult) -> PredictionView {
    let label = match result.sentiment {
        Sentiment::Positive => "POSITIVE",
        Sentiment::Negative => "NEGATIVE",
    };
    PredictionView {
        label,
        tone: result.sentiment,
        confidence_text: format_percent(result.confidence),
        chart: BarChart {
            title: CHART_TITLE,
            x_label: CHART_X_LABEL,
            y_label: CHART_Y_LABEL,
            bars: [
                Bar {
                    label: "Negative",
                    value: result.probability_negative,
                },
                Bar {
                    label: "Positive",
                    value: result.probability_positive,
                },
            ],
        },
    }
}

pub fn render_explanation(result: &ExplanationResult) -> ExplanationView {
    ExplanationView {
        headline: format!("Sentiment: {}", capitalize(&result.sentiment)),
        words: result
            .words
            .iter()
            .map(|item| WordLine {
                word: item.word.clone(),
                importance: item.importance,
                importance_text: format!("{:.4}", item.importance),
            })
            .collect(),
        raw_html: result.html.clone().filter(|html| !html.is_empty()),
    }
}

pub fn render_history(entries: &[HistoryEntry], order: HistoryOrder) -> Vec<HistoryItem> {
    let item = |entry: &HistoryEntry| HistoryItem {
        text: entry.text.clone(),
        sentiment: entry.sentiment,
        confidence_text: format_percent(entry.confidence),
        recorded_at: entry.recorded_at,
    };
    match order {
        HistoryOrder::NewestFirst => entries.iter().rev().map(item).collect(),
        HistoryOrder::InsertionOrder => entries.iter().map(item).collect(),
    }
}

/// Horizontal bar for terminals; `value` is clamped to `[0, 1]`.
pub fn ascii_bar(value: f64, width: usize) -> String {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let filled = (value * width as f64).round() as usize;
    let mut bar = "#".repeat(filled);
    bar.push_str(&".".repeat(width - filled));
    bar
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
