//! Interactive terminal session.

use std::io::Write;

use anyhow::Result;
use client_core::{
    config::ABOUT_TEXT, Controller, SentimentApi, SessionState, Settings, SubmitAction, UserAction,
};
use shared::domain::MAX_INPUT_CHARS;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;

const HELP: &str = "\
Type a line to set the text (max 280 characters), then:
  /predict      predict the sentiment
  /explain      explain the prediction with LIME
  /clear        clear the text
  /example <n>  use preset example n
  /examples     list preset examples
  /history      show past predictions
  /help         show this help
  /quit         leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Input(String),
    Submit(SubmitAction),
    Clear,
    Example(usize),
    Examples,
    History,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Input(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("predict"), None) => ReplCommand::Submit(SubmitAction::Predict),
        (Some("explain"), None) => ReplCommand::Submit(SubmitAction::Explain),
        (Some("clear"), None) => ReplCommand::Clear,
        (Some("example"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => ReplCommand::Example(n),
            _ => ReplCommand::Unknown(line.to_string()),
        },
        (Some("examples"), None) => ReplCommand::Examples,
        (Some("history"), None) => ReplCommand::History,
        (Some("help"), None) => ReplCommand::Help,
        (Some("quit") | Some("exit"), None) => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    }
}

pub async fn run<A: SentimentApi>(controller: Controller<A>, settings: &Settings) -> Result<()> {
    let mut session = SessionState::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "Sentiment Analyzer")?;
    writeln!(stdout, "{ABOUT_TEXT}")?;
    writeln!(stdout, "{HELP}")?;

    loop {
        controller
            .dispatch(&mut session, UserAction::Refresh)
            .await;
        write!(stdout, "[{}/{MAX_INPUT_CHARS}]> ", session.input().char_count())?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let action = match parse_line(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                writeln!(stdout, "{HELP}")?;
                continue;
            }
            ReplCommand::Examples => {
                output::write_examples(&mut stdout, &settings.examples)?;
                continue;
            }
            ReplCommand::History => {
                if settings.show_history {
                    output::write_history(&mut stdout, session.history(), settings.history_order)?;
                } else {
                    writeln!(stdout, "history display is disabled")?;
                }
                continue;
            }
            ReplCommand::Unknown(raw) => {
                writeln!(stdout, "unknown command: {raw} (try /help)")?;
                continue;
            }
            ReplCommand::Input(text) => {
                output::warn_if_truncated(&text);
                UserAction::EditInput(text)
            }
            ReplCommand::Example(n) => match settings.examples.get(n - 1) {
                Some(example) => {
                    writeln!(stdout, "{example}")?;
                    UserAction::SelectExample(example.clone())
                }
                None => {
                    writeln!(stdout, "no example {n}; there are {}", settings.examples.len())?;
                    continue;
                }
            },
            ReplCommand::Submit(action) => UserAction::Submit(action),
            ReplCommand::Clear => UserAction::Clear,
        };

        let outcome = controller.dispatch(&mut session, action).await;
        output::write_outcome(&mut stdout, &outcome)?;
    }

    tracing::debug!(predictions = session.history().len(), "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_become_input() {
        assert_eq!(
            parse_line("I love this product!\n"),
            ReplCommand::Input("I love this product!".into())
        );
    }

    #[test]
    fn slash_commands_are_recognised() {
        assert_eq!(
            parse_line("/predict"),
            ReplCommand::Submit(SubmitAction::Predict)
        );
        assert_eq!(
            parse_line("/explain"),
            ReplCommand::Submit(SubmitAction::Explain)
        );
        assert_eq!(parse_line("/clear"), ReplCommand::Clear);
        assert_eq!(parse_line("/example 3"), ReplCommand::Example(3));
        assert_eq!(parse_line("/history"), ReplCommand::History);
        assert_eq!(parse_line("/quit"), ReplCommand::Quit);
    }

    #[test]
    fn bad_example_index_is_unknown() {
        assert!(matches!(parse_line("/example 0"), ReplCommand::Unknown(_)));
        assert!(matches!(parse_line("/example two"), ReplCommand::Unknown(_)));
        assert!(matches!(parse_line("/example"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   \n"), ReplCommand::Empty);
    }
}
