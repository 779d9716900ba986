use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::DEFAULT_CONFIG_FILE, load_settings, Controller, HttpSentimentClient, Outcome,
    SentimentApi, SessionState, Settings, SubmitAction, UserAction,
};
use tracing_subscriber::EnvFilter;

mod output;
mod repl;

#[derive(Parser, Debug)]
#[command(name = "sentiment", about = "Sentiment analysis client for a remote classification service")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict the sentiment of TEXT.
    Predict { text: String },
    /// Ask the service which words drove the prediction for TEXT.
    Explain { text: String },
    /// List the preset examples.
    Examples,
    /// Print the effective settings as TOML.
    Config,
    /// Start an interactive session.
    Repl,
}

fn settings_from(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings(&cli.config)
        .with_context(|| format!("failed to load settings from '{}'", cli.config.display()))?;
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    settings.validate()?;
    Ok(settings)
}

/// One-shot commands fail when the session answers with a notice.
fn exit_code_for(outcome: &Outcome) -> ExitCode {
    if is_failure(outcome) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn is_failure(outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Notice(_))
}

async fn submit_once<A: SentimentApi>(
    controller: &Controller<A>,
    action: SubmitAction,
    text: String,
    out: &mut impl Write,
) -> Result<Outcome> {
    output::warn_if_truncated(&text);

    let mut session = SessionState::new();
    controller
        .dispatch(&mut session, UserAction::EditInput(text))
        .await;
    let outcome = controller
        .dispatch(&mut session, UserAction::Submit(action))
        .await;
    output::write_outcome(out, &outcome)?;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = settings_from(&cli)?;

    match cli.command {
        Command::Examples => {
            output::write_examples(&mut std::io::stdout(), &settings.examples)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Config => {
            print!("{}", settings.to_toml()?);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let api = HttpSentimentClient::from_settings(&settings).context("failed to build HTTP client")?;
    tracing::info!(base_url = api.base_url(), "using classification service");
    let controller = Controller::new(api, settings.clear_mode);

    match cli.command {
        Command::Predict { text } => {
            let outcome =
                submit_once(&controller, SubmitAction::Predict, text, &mut std::io::stdout())
                    .await?;
            Ok(exit_code_for(&outcome))
        }
        Command::Explain { text } => {
            let outcome =
                submit_once(&controller, SubmitAction::Explain, text, &mut std::io::stdout())
                    .await?;
            Ok(exit_code_for(&outcome))
        }
        Command::Repl => {
            repl::run(controller, &settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Examples | Command::Config => Ok(ExitCode::SUCCESS),
    }
}
