use thoughtspace::collab::ConnectionStatus;
use thoughtspace::session::Stats;

/// Counters in the top-right corner, plus the latest status message.
pub fn render_stats_overlay(ctx: &egui::Context, stats: &Stats, collab: ConnectionStatus, status: Option<&str>) {
    egui::Area::new(egui::Id::new("stats"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(format!("💭 {} thoughts", stats.thoughts));
                ui.label(format!("✨ {} particles", stats.particles));
                ui.label(format!("🔗 {} connections", stats.connections));
                ui.label(format!("🔍 {:.0}%", stats.zoom * 100.0));
                ui.label(format!("{:.0} fps", stats.fps));
                ui.label(format!("👥 {} · {}", stats.users, collab.label()));
                if !stats.running {
                    ui.label(egui::RichText::new("Paused").strong());
                }
                if let Some(msg) = status {
                    ui.separator();
                    ui.label(egui::RichText::new(msg).italics());
                }
            });
        });
}
