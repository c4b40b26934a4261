//! The floating control panel: thought input, zone picker and canvas controls.

use thoughtspace::collab::ConnectionStatus;
use thoughtspace::zone::ZoneKind;
use thoughtspace::Session;

/// Things the panel asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Add,
    Clear,
    Save,
    Load,
    Export,
    ToggleCollab,
    ToggleInsights,
}

#[derive(Default)]
pub struct ControlPanelState {
    pub text: String,
    pub zone: Option<ZoneKind>,
    /// Move keyboard focus to the text field on the next frame.
    pub focus_input: bool,
}

fn zone_label(zone: Option<ZoneKind>) -> String {
    match zone {
        Some(z) => format!("{} {}", z.icon(), z.name()),
        None => "Floating".to_string(),
    }
}

pub fn render_control_panel(
    ctx: &egui::Context,
    state: &mut ControlPanelState,
    session: &mut Session,
    insights_open: bool,
) -> Vec<ControlAction> {
    let mut actions = Vec::new();

    egui::Window::new("Thoughtspace")
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .resizable(false)
        .collapsible(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("New thought");
            let input = ui.add(
                egui::TextEdit::singleline(&mut state.text)
                    .hint_text("What's on your mind?")
                    .desired_width(f32::INFINITY),
            );
            if state.focus_input {
                input.request_focus();
                state.focus_input = false;
            }
            let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("zone")
                    .selected_text(zone_label(state.zone))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut state.zone, None, zone_label(None));
                        for kind in ZoneKind::ALL {
                            ui.selectable_value(&mut state.zone, Some(kind), zone_label(Some(kind)));
                        }
                    });
                if ui.button("Add").clicked() || submitted {
                    actions.push(ControlAction::Add);
                }
            });

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                let run_label = if session.is_running() { "⏸ Pause" } else { "▶ Run" };
                if ui.button(run_label).clicked() {
                    session.toggle_pause();
                }
                let connect_label = if session.mode.is_active() { "✖ Stop linking" } else { "🔗 Link" };
                if ui.button(connect_label).clicked() {
                    session.toggle_connect_mode();
                }
                let mut shown = session.world.show_connections;
                if ui.checkbox(&mut shown, "Connections").changed() {
                    session.toggle_connections();
                }
                let mut sound = session.sounds.enabled();
                if ui.checkbox(&mut sound, "Sound").changed() {
                    session.set_sound_enabled(sound);
                }
            });
            if session.mode.is_active() {
                ui.label(egui::RichText::new("Click two thoughts to connect them").small().weak());
            }

            ui.horizontal(|ui| {
                ui.label("Zoom");
                if ui.button("−").clicked() {
                    session.world.camera.zoom_out();
                }
                if ui.button(format!("{:.0}%", session.world.camera.zoom() * 100.0)).clicked() {
                    session.world.camera.reset();
                }
                if ui.button("+").clicked() {
                    session.world.camera.zoom_in();
                }
            });

            ui.collapsing("Physics", |ui| {
                let params = &mut session.params;
                ui.add(egui::Slider::new(&mut params.gravity, 0.0..=2.0).text("Gravity"));
                ui.add(egui::Slider::new(&mut params.chaos, 0.0..=1.0).text("Chaos"));
                ui.add(egui::Slider::new(&mut params.friction, 0.8..=0.999).text("Friction"));
                ui.add(egui::Slider::new(&mut params.time_scale, 0.1..=3.0).text("Time scale"));
                if ui.button("Reset").clicked() {
                    *params = Default::default();
                }
            });

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                if ui.button("💾 Save").clicked() {
                    actions.push(ControlAction::Save);
                }
                if ui.button("📂 Load").clicked() {
                    actions.push(ControlAction::Load);
                }
                if ui.button("📷 Export").clicked() {
                    actions.push(ControlAction::Export);
                }
                if ui.button("🗑 Clear").clicked() {
                    actions.push(ControlAction::Clear);
                }
            });

            ui.horizontal(|ui| {
                let collab_label = match session.collab.status() {
                    ConnectionStatus::Disconnected | ConnectionStatus::Error => "Go live",
                    ConnectionStatus::Connecting | ConnectionStatus::Connected => "Leave",
                };
                if ui.button(collab_label).clicked() {
                    actions.push(ControlAction::ToggleCollab);
                }
                let insights_label = if insights_open { "Hide insights" } else { "✨ Insights" };
                if ui.button(insights_label).clicked() {
                    actions.push(ControlAction::ToggleInsights);
                }
            });
        });

    actions
}
