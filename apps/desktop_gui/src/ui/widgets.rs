//! Small painters for prediction, explanation and history views.

use client_core::{
    render::{BarChart, ExplanationView, HistoryItem, PredictionView},
    Notice, NoticeLevel,
};
use eframe::egui;
use shared::domain::Sentiment;

const CHART_HEIGHT: f32 = 180.0;
const AXIS_MARGIN: f32 = 28.0;

pub fn tone_color(tone: Sentiment) -> egui::Color32 {
    match tone {
        Sentiment::Positive => egui::Color32::from_rgb(67, 160, 71),
        Sentiment::Negative => egui::Color32::from_rgb(229, 57, 53),
    }
}

fn bar_color(label: &str) -> egui::Color32 {
    if label == "Positive" {
        tone_color(Sentiment::Positive)
    } else {
        tone_color(Sentiment::Negative)
    }
}

pub fn notice_banner(ui: &mut egui::Ui, notice: &Notice) {
    let color = match notice.level {
        NoticeLevel::Warning => egui::Color32::from_rgb(240, 180, 40),
        NoticeLevel::Error => egui::Color32::from_rgb(229, 57, 53),
    };
    egui::Frame::NONE
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.colored_label(color, notice.message.as_str());
        });
}

pub fn prediction_panel(ui: &mut egui::Ui, view: &PredictionView) {
    ui.label(
        egui::RichText::new(format!("{} ({})", view.label, view.confidence_text))
            .size(22.0)
            .strong()
            .color(tone_color(view.tone)),
    );
    ui.add_space(8.0);
    probability_chart(ui, &view.chart);
}

/// Two vertical bars on a 0..1 axis, in the order the chart lists them.
pub fn probability_chart(ui: &mut egui::Ui, chart: &BarChart) {
    ui.label(egui::RichText::new(chart.title).strong());
    let width = ui.available_width().min(420.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let axis_color = ui.visuals().widgets.noninteractive.bg_stroke.color;

    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.left() + AXIS_MARGIN, rect.top() + 16.0),
        egui::pos2(rect.right() - 8.0, rect.bottom() - AXIS_MARGIN),
    );
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        egui::Stroke::new(1.0, axis_color),
    );
    painter.line_segment(
        [plot.left_top(), plot.left_bottom()],
        egui::Stroke::new(1.0, axis_color),
    );
    for (tick, label) in [(0.0_f32, "0"), (0.5, "0.5"), (1.0, "1")] {
        let y = plot.bottom() - tick * plot.height();
        painter.text(
            egui::pos2(plot.left() - 4.0, y),
            egui::Align2::RIGHT_CENTER,
            label,
            egui::FontId::proportional(11.0),
            text_color,
        );
    }

    let slot = plot.width() / chart.bars.len() as f32;
    for (idx, bar) in chart.bars.iter().enumerate() {
        let value = bar.value.clamp(0.0, 1.0) as f32;
        let center_x = plot.left() + slot * (idx as f32 + 0.5);
        let half = slot * 0.3;
        let top = plot.bottom() - value * plot.height();
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(center_x - half, top),
            egui::pos2(center_x + half, plot.bottom()),
        );
        painter.rect_filled(bar_rect, egui::CornerRadius::same(3), bar_color(bar.label));
        painter.text(
            egui::pos2(center_x, top - 2.0),
            egui::Align2::CENTER_BOTTOM,
            format!("{:.2}", bar.value),
            egui::FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            egui::pos2(center_x, plot.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            bar.label,
            egui::FontId::proportional(12.0),
            text_color,
        );
    }
    ui.horizontal(|ui| {
        ui.weak(format!("x: {}", chart.x_label));
        ui.weak(format!("y: {}", chart.y_label));
    });
}

pub fn explanation_panel(ui: &mut egui::Ui, view: &ExplanationView) {
    ui.heading(view.headline.as_str());
    ui.add_space(6.0);
    ui.label(egui::RichText::new("Important words:").strong());
    egui::Grid::new("word_importances")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for line in &view.words {
                ui.label(egui::RichText::new(line.word.as_str()).strong());
                let tone = if line.importance >= 0.0 {
                    Sentiment::Positive
                } else {
                    Sentiment::Negative
                };
                ui.colored_label(tone_color(tone), line.importance_text.as_str());
                ui.end_row();
            }
        });

    if let Some(html) = &view.raw_html {
        ui.add_space(8.0);
        egui::CollapsingHeader::new("LIME explanation (HTML)")
            .default_open(false)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(400.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(html.as_str()).monospace());
                    });
            });
    }
}

pub fn history_list(ui: &mut egui::Ui, items: &[HistoryItem]) {
    if items.is_empty() {
        ui.weak("No predictions yet.");
        return;
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        for item in items {
            ui.horizontal(|ui| {
                ui.colored_label(tone_color(item.sentiment), item.sentiment.as_str());
                ui.weak(item.confidence_text.as_str());
                ui.weak(item.recorded_at.format("%H:%M:%S").to_string());
            });
            ui.label(item.text.as_str());
            ui.separator();
        }
    });
}
