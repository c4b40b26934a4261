//! Prompt for the label of a new manual connection.

use thoughtspace::connection::{label_display, KNOWN_LABELS};
use thoughtspace::Color;

pub enum LabelChoice {
    Commit { label: String, color: Color },
    Cancel,
}

pub struct LabelModalState {
    pub label: String,
    pub color: egui::Color32,
}

impl Default for LabelModalState {
    fn default() -> Self {
        Self {
            label: String::new(),
            color: egui::Color32::from(Color::INDIGO),
        }
    }
}

impl LabelModalState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn render_label_modal(ctx: &egui::Context, state: &mut LabelModalState) -> Option<LabelChoice> {
    let mut choice = None;

    egui::Modal::new(egui::Id::new("connection-label")).show(ctx, |ui| {
        ui.heading("Connect thoughts");
        ui.horizontal_wrapped(|ui| {
            for label in KNOWN_LABELS {
                if ui.selectable_label(state.label == label, label_display(label).into_owned()).clicked() {
                    state.label = label.to_string();
                }
            }
        });
        ui.add(egui::TextEdit::singleline(&mut state.label).hint_text("or your own label"));
        ui.horizontal(|ui| {
            ui.label("Color");
            ui.color_edit_button_srgba(&mut state.color);
        });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Connect").clicked() {
                let [r, g, b, a] = state.color.to_srgba_unmultiplied();
                choice = Some(LabelChoice::Commit {
                    label: state.label.clone(),
                    color: Color::rgba(r, g, b, a),
                });
            }
            if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                choice = Some(LabelChoice::Cancel);
            }
        });
    });

    choice
}
