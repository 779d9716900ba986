//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Returns whether the command was queued; otherwise `status` explains why not.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ApiCall, SubmitAction};
    use crossbeam_channel::bounded;

    use super::*;

    fn call() -> BackendCommand {
        BackendCommand::Submit(ApiCall {
            action: SubmitAction::Predict,
            text: "hello".into(),
        })
    }

    #[test]
    fn queues_when_there_is_room() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, call(), &mut status));
        assert!(status.is_empty());
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::Submit(_))));
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, call(), &mut status));
        assert!(!dispatch_backend_command(&tx, call(), &mut status));
        assert!(status.contains("full"));
    }

    #[test]
    fn reports_disconnected_backend() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, call(), &mut status));
        assert!(status.contains("disconnected"));
    }
}
