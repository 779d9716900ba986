use client_core::{
    config::ABOUT_TEXT,
    controller::{self, Step},
    render::{
        render_explanation, render_history, render_prediction, ExplanationView, PredictionView,
    },
    Notice, Outcome, SessionState, Settings, SubmitAction, UserAction,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::MAX_INPUT_CHARS;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
    ui::widgets,
};

enum ResultView {
    Prediction(PredictionView),
    Explanation(ExplanationView),
}

pub struct SentimentApp {
    settings: Settings,
    session: SessionState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    input_buf: String,
    selected_example: Option<usize>,
    result: Option<ResultView>,
    notice: Option<Notice>,
    status: String,
    in_flight: usize,
}

impl SentimentApp {
    pub fn new(settings: Settings, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            settings,
            session: SessionState::new(),
            cmd_tx,
            ui_rx,
            input_buf: String::new(),
            selected_example: None,
            result: None,
            notice: None,
            status: "Starting...".to_string(),
            in_flight: 0,
        }
    }

    fn act(&mut self, action: UserAction) {
        if matches!(action, UserAction::Clear | UserAction::EditInput(_)) {
            self.selected_example = None;
        }
        match controller::handle(&mut self.session, action, self.settings.clear_mode) {
            Step::Done(outcome) => self.apply_outcome(outcome),
            Step::Call(call) => {
                let name = call.action.as_str();
                if dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Submit(call),
                    &mut self.status,
                ) {
                    self.in_flight += 1;
                    self.status = format!("Waiting for {name} ({} in flight)", self.in_flight);
                }
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged => {}
            Outcome::InputChanged => {
                self.input_buf = self.session.input().as_str().to_string();
            }
            Outcome::ClearPending => {
                self.status = "Clearing input...".to_string();
            }
            Outcome::Notice(notice) => {
                self.result = None;
                self.notice = Some(notice);
            }
            Outcome::Prediction(result) => {
                self.notice = None;
                self.result = Some(ResultView::Prediction(render_prediction(&result)));
            }
            Outcome::Explanation(result) => {
                self.notice = None;
                self.result = Some(ResultView::Explanation(render_explanation(&result)));
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendFailed(message) => {
                    self.status = message;
                }
                UiEvent::CallCompleted(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    let outcome = controller::complete(&mut self.session, outcome);
                    self.apply_outcome(outcome);
                    if self.in_flight == 0 {
                        self.status = "Ready".to_string();
                    }
                }
            }
        }
    }

    fn show_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("about_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("About");
                ui.label(ABOUT_TEXT);
                ui.add_space(12.0);
                ui.label(egui::RichText::new("Examples").strong());

                let before = self.selected_example;
                let selected_text = self
                    .selected_example
                    .and_then(|idx| self.settings.examples.get(idx))
                    .map(String::as_str)
                    .unwrap_or("Choose an example");
                egui::ComboBox::from_id_salt("example_picker")
                    .width(ui.available_width())
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.selected_example, None, "");
                        for (idx, example) in self.settings.examples.iter().enumerate() {
                            ui.selectable_value(
                                &mut self.selected_example,
                                Some(idx),
                                example.as_str(),
                            );
                        }
                    });

                if self.selected_example != before {
                    if let Some(example) = self
                        .selected_example
                        .and_then(|idx| self.settings.examples.get(idx))
                        .cloned()
                    {
                        self.act(UserAction::SelectExample(example));
                    }
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.weak(self.status.as_str());
                });
            });
    }

    fn show_history_panel(&mut self, ctx: &egui::Context) {
        if !self.settings.show_history {
            return;
        }
        egui::SidePanel::right("history_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("History");
                ui.add_space(6.0);
                let items = render_history(self.session.history(), self.settings.history_order);
                widgets::history_list(ui, &items);
            });
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Sentiment Analyzer");
            ui.add_space(8.0);
            ui.label(format!("Enter your text (max {MAX_INPUT_CHARS} characters):"));

            let response = ui.add(
                egui::TextEdit::multiline(&mut self.input_buf)
                    .char_limit(MAX_INPUT_CHARS)
                    .hint_text("Type your text here...")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                self.act(UserAction::EditInput(self.input_buf.clone()));
            }
            ui.weak(format!(
                "{}/{MAX_INPUT_CHARS}",
                self.input_buf.chars().count()
            ));

            let mut clicked = None;
            ui.horizontal(|ui| {
                if ui.button("Predict sentiment").clicked() {
                    clicked = Some(UserAction::Submit(SubmitAction::Predict));
                }
                if ui.button("Explain with LIME").clicked() {
                    clicked = Some(UserAction::Submit(SubmitAction::Explain));
                }
                if ui.button("Clear").clicked() {
                    clicked = Some(UserAction::Clear);
                }
                if self.in_flight > 0 {
                    ui.spinner();
                }
            });
            if let Some(action) = clicked {
                self.act(action);
            }

            ui.add_space(10.0);
            if let Some(notice) = &self.notice {
                widgets::notice_banner(ui, notice);
                ui.add_space(8.0);
            }

            egui::ScrollArea::vertical().show(ui, |ui| match &self.result {
                Some(ResultView::Prediction(view)) => widgets::prediction_panel(ui, view),
                Some(ResultView::Explanation(view)) => widgets::explanation_panel(ui, view),
                None => {}
            });
        });
    }
}

impl eframe::App for SentimentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.act(UserAction::Refresh);

        self.show_side_panel(ctx);
        self.show_history_panel(ctx);
        self.show_main(ctx);

        if self.in_flight > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl Drop for SentimentApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ApiCall, CallOutcome, ClearMode, NoticeLevel};
    use crossbeam_channel::bounded;
    use shared::{
        domain::{ExplanationResult, PredictionResult, Sentiment},
        error::ClientError,
    };

    use super::*;

    struct Harness {
        app: SentimentApp,
        cmd_rx: Receiver<BackendCommand>,
        ui_tx: Sender<UiEvent>,
    }

    fn harness(clear_mode: ClearMode) -> Harness {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        let settings = Settings {
            clear_mode,
            ..Settings::default()
        };
        Harness {
            app: SentimentApp::new(settings, cmd_tx, ui_rx),
            cmd_rx,
            ui_tx,
        }
    }

    fn queued_call(rx: &Receiver<BackendCommand>) -> ApiCall {
        match rx.try_recv() {
            Ok(BackendCommand::Submit(call)) => call,
            _ => panic!("expected a queued call"),
        }
    }

    fn positive() -> PredictionResult {
        PredictionResult {
            sentiment: Sentiment::Positive,
            confidence: 0.93,
            probability_negative: 0.07,
            probability_positive: 0.93,
        }
    }

    #[test]
    fn predict_round_trip_updates_history_and_result() {
        let mut h = harness(ClearMode::Immediate);
        h.app.act(UserAction::EditInput("I love this product! It's amazing.".into()));
        h.app.act(UserAction::Submit(SubmitAction::Predict));

        let call = queued_call(&h.cmd_rx);
        assert_eq!(call.text, "I love this product! It's amazing.");
        assert_eq!(h.app.in_flight, 1);

        h.ui_tx
            .send(UiEvent::CallCompleted(CallOutcome::Predicted {
                text: call.text,
                result: Ok(positive()),
            }))
            .expect("send");
        h.app.process_ui_events();

        assert_eq!(h.app.in_flight, 0);
        assert_eq!(h.app.session.history().len(), 1);
        match &h.app.result {
            Some(ResultView::Prediction(view)) => {
                assert_eq!(view.label, "POSITIVE");
                assert_eq!(view.confidence_text, "93.0%");
            }
            _ => panic!("expected prediction view"),
        }
    }

    #[test]
    fn empty_submit_warns_without_queueing() {
        let mut h = harness(ClearMode::Immediate);
        h.app.act(UserAction::Submit(SubmitAction::Explain));

        assert!(h.cmd_rx.try_recv().is_err());
        let notice = h.app.notice.as_ref().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn failed_explain_hides_previous_result() {
        let mut h = harness(ClearMode::Immediate);
        h.app.act(UserAction::EditInput("meh".into()));
        h.app.act(UserAction::Submit(SubmitAction::Predict));
        h.app.act(UserAction::Submit(SubmitAction::Explain));
        let predict = queued_call(&h.cmd_rx);
        let _explain = queued_call(&h.cmd_rx);
        assert_eq!(h.app.in_flight, 2);

        h.ui_tx
            .send(UiEvent::CallCompleted(CallOutcome::Predicted {
                text: predict.text,
                result: Ok(positive()),
            }))
            .expect("send");
        h.ui_tx
            .send(UiEvent::CallCompleted(CallOutcome::Explained(Err(
                ClientError::Api { status: 500 },
            ))))
            .expect("send");
        h.app.process_ui_events();

        assert!(h.app.result.is_none());
        let notice = h.app.notice.as_ref().expect("notice");
        assert!(notice.message.contains("500"));
        assert_eq!(h.app.input_buf, "meh");
        assert_eq!(h.app.session.history().len(), 1);
    }

    #[test]
    fn explanation_completion_shows_explanation() {
        let mut h = harness(ClearMode::Immediate);
        h.ui_tx
            .send(UiEvent::CallCompleted(CallOutcome::Explained(Ok(
                ExplanationResult {
                    sentiment: "positive".into(),
                    words: Vec::new(),
                    html: None,
                },
            ))))
            .expect("send");
        h.app.process_ui_events();
        assert!(matches!(h.app.result, Some(ResultView::Explanation(_))));
        assert!(h.app.session.history().is_empty());
    }

    #[test]
    fn example_selection_fills_input() {
        let mut h = harness(ClearMode::Immediate);
        let example = h.app.settings.examples[1].clone();
        h.app.act(UserAction::SelectExample(example.clone()));
        assert_eq!(h.app.input_buf, example);
    }

    #[test]
    fn editing_after_example_allows_picking_it_again() {
        let mut h = harness(ClearMode::Immediate);
        let example = h.app.settings.examples[0].clone();
        h.app.selected_example = Some(0);
        h.app.act(UserAction::SelectExample(example.clone()));
        assert_eq!(h.app.selected_example, Some(0));

        h.app.act(UserAction::EditInput("my own words".into()));
        assert_eq!(h.app.selected_example, None);

        h.app.selected_example = Some(0);
        h.app.act(UserAction::SelectExample(example.clone()));
        assert_eq!(h.app.input_buf, example);
    }

    #[test]
    fn deferred_clear_lands_on_next_refresh() {
        let mut h = harness(ClearMode::Deferred);
        h.app.act(UserAction::EditInput("draft".into()));
        h.app.act(UserAction::Clear);
        assert_eq!(h.app.input_buf, "draft");

        h.app.act(UserAction::Refresh);
        assert!(h.app.input_buf.is_empty());
        assert!(h.app.session.input().is_empty());
    }

    #[test]
    fn immediate_clear_keeps_history() {
        let mut h = harness(ClearMode::Immediate);
        h.ui_tx
            .send(UiEvent::CallCompleted(CallOutcome::Predicted {
                text: "earlier".into(),
                result: Ok(positive()),
            }))
            .expect("send");
        h.app.process_ui_events();
        h.app.act(UserAction::EditInput("draft".into()));
        h.app.act(UserAction::Clear);

        assert!(h.app.input_buf.is_empty());
        assert_eq!(h.app.session.history().len(), 1);
    }
}
