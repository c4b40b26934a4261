//! Suggestions and analytics for the current canvas.

use thoughtspace::session::Insights;
use thoughtspace::zone::ZoneKind;

/// Returns a suggestion the user clicked, if any.
pub fn render_insights_window(ctx: &egui::Context, open: &mut bool, insights: &Insights) -> Option<String> {
    let mut picked = None;
    let analytics = &insights.analytics;

    egui::Window::new("Insights")
        .open(open)
        .default_width(300.0)
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            ui.heading("Try thinking about");
            ui.horizontal_wrapped(|ui| {
                for s in &insights.suggestions {
                    if ui.button(s).clicked() {
                        picked = Some(s.clone());
                    }
                }
            });

            ui.separator();
            ui.heading("Your canvas");
            egui::Grid::new("analytics").num_columns(2).show(ui, |ui| {
                ui.label("Thoughts");
                ui.label(analytics.total_thoughts.to_string());
                ui.end_row();
                ui.label("Per session");
                ui.label(format!("{:.1}", analytics.avg_per_session));
                ui.end_row();
                ui.label("Mood");
                ui.label(format!("{}/100", analytics.average_mood));
                ui.end_row();
                ui.label("Overlaps");
                ui.label(analytics.connection_count.to_string());
                ui.end_row();
            });

            if !analytics.category_breakdown.is_empty() {
                ui.add_space(4.0);
                for (category, count) in &analytics.category_breakdown {
                    let share = *count as f32 / analytics.total_thoughts.max(1) as f32;
                    ui.add(egui::ProgressBar::new(share).text(format!("{category} · {count}")));
                }
            }

            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                let zones = &analytics.zone_distribution;
                for kind in ZoneKind::ALL {
                    ui.label(format!("{} {}", kind.icon(), zones.get(kind)));
                }
                ui.label(format!("☁ {}", zones.floating));
            });

            if !analytics.insights.is_empty() {
                ui.separator();
                for line in &analytics.insights {
                    ui.label(line);
                }
            }
        });

    picked
}
