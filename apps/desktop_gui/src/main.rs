use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::DEFAULT_CONFIG_FILE, load_settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent, ui::SentimentApp};

const APP_TITLE: &str = "Sentiment Analyzer";

#[derive(Parser, Debug)]
#[command(name = "sentiment-gui", about = "Desktop front end for a sentiment classification service")]
struct StartupArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = StartupArgs::parse();
    let mut settings = load_settings(&args.config)
        .with_context(|| format!("failed to load settings from '{}'", args.config.display()))?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
        settings.validate()?;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(SentimentApp::new(settings, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop GUI exited with an error: {err}"))
}
