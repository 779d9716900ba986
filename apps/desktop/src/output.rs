//! Plain-text rendering of controller outcomes.

use std::io::{self, Write};

use client_core::{
    render::{
        ascii_bar, format_percent, render_explanation, render_history, render_prediction,
        HistoryOrder,
    },
    Notice, NoticeLevel, Outcome,
};
use shared::domain::{HistoryEntry, InputText};

const BAR_WIDTH: usize = 30;

pub fn write_outcome(out: &mut impl Write, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Prediction(result) => {
            let view = render_prediction(result);
            writeln!(out, "{} ({})", view.label, view.confidence_text)?;
            writeln!(out, "{}", view.chart.title)?;
            for bar in view.chart.bars {
                writeln!(
                    out,
                    "  {:<9} {} {:>6}",
                    bar.label,
                    ascii_bar(bar.value, BAR_WIDTH),
                    format_percent(bar.value)
                )?;
            }
        }
        Outcome::Explanation(result) => {
            let view = render_explanation(result);
            writeln!(out, "{}", view.headline)?;
            writeln!(out, "Important words:")?;
            for line in &view.words {
                writeln!(out, "  {}: {}", line.word, line.importance_text)?;
            }
            if let Some(html) = &view.raw_html {
                writeln!(out, "LIME explanation (HTML):")?;
                writeln!(out, "{html}")?;
            }
        }
        Outcome::Notice(notice) => write_notice(out, notice)?,
        Outcome::ClearPending => writeln!(out, "input will be cleared")?,
        Outcome::Unchanged | Outcome::InputChanged => {}
    }
    Ok(())
}

/// Logs a warning on stderr when `text` will not fit the input box.
/// Returns whether it was truncated.
pub fn warn_if_truncated(text: &str) -> bool {
    match InputText::try_new(text) {
        Ok(_) => false,
        Err(err) => {
            tracing::warn!(%err, "text truncated to fit the input box");
            true
        }
    }
}

pub fn write_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    let prefix = match notice.level {
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    writeln!(out, "{prefix}: {}", notice.message)
}

pub fn write_history(
    out: &mut impl Write,
    entries: &[HistoryEntry],
    order: HistoryOrder,
) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "no predictions yet");
    }
    for item in render_history(entries, order) {
        writeln!(
            out,
            "[{}] {} ({}) {}",
            item.recorded_at.format("%H:%M:%S"),
            item.sentiment,
            item.confidence_text,
            item.text
        )?;
    }
    Ok(())
}

pub fn write_examples(out: &mut impl Write, examples: &[String]) -> io::Result<()> {
    for (idx, example) in examples.iter().enumerate() {
        writeln!(out, "{:>2}. {example}", idx + 1)?;
    }
    Ok(())
}
