//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{controller::perform, HttpSentimentClient, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the worker thread. Each submitted call runs as its own task, so
/// results reach the UI in completion order.
pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = match HttpSentimentClient::from_settings(&settings) {
            Ok(api) => Arc::new(api),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build HTTP client: {err}"
                )));
                tracing::error!("failed to build HTTP client: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready; using {}",
                api.base_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit(call) => {
                        let api = Arc::clone(&api);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = perform(&*api, call).await;
                            if ui_tx.send(UiEvent::CallCompleted(outcome)).is_err() {
                                tracing::debug!("ui closed before call completed");
                            }
                        });
                    }
                    BackendCommand::Shutdown => break,
                }
            }
            tracing::debug!("backend worker stopping");
        });
    });
}
