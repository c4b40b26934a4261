//! The eframe application: one session, its canvas and its panels.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use glam::Vec2;
use thoughtspace::collab::{CollabChannel, ConnectionStatus, LocalUser, LoopbackChannel};
use thoughtspace::connect_mode::ClickOutcome;
use thoughtspace::export;
use thoughtspace::input::{CursorHint, InputEffect, KeyCode, Modifiers, MouseButton};
use thoughtspace::insight::Moment;
use thoughtspace::persist::FileStore;
use thoughtspace::render::{render, PainterCanvas};
use thoughtspace::time::unix_millis;
use thoughtspace::{AppConfig, Session};

use crate::ui::{
    render_control_panel, render_insights_window, render_label_modal, render_stats_overlay, ControlAction,
    ControlPanelState, LabelChoice, LabelModalState,
};

const STATUS_TTL: Duration = Duration::from_secs(3);
const PEER_CURSOR_RADIUS: f32 = 6.0;

/// Where the app keeps its files.
pub struct Paths {
    pub snapshots: PathBuf,
    pub exports: PathBuf,
}

pub struct ThoughtApp {
    session: Session,
    config: AppConfig,
    store: FileStore,
    export_dir: PathBuf,
    demo_peers: bool,
    controls: ControlPanelState,
    label: LabelModalState,
    show_insights: bool,
    status: Option<(String, Instant)>,
    /// Canvas rect from the last frame, in points.
    canvas_rect: egui::Rect,
    export_requested: bool,
}

impl ThoughtApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, paths: Paths, demo_peers: bool) -> Self {
        let mut session = Session::new(&config, Vec2::new(1200.0, 800.0));
        session.set_collab(Self::channel(&config, demo_peers));

        let store = FileStore::new(paths.snapshots);
        let mut app = Self {
            session,
            store,
            export_dir: paths.exports,
            demo_peers,
            controls: ControlPanelState::default(),
            label: LabelModalState::default(),
            show_insights: false,
            status: None,
            canvas_rect: egui::Rect::NOTHING,
            export_requested: false,
            config,
        };
        app.load();
        app.session.begin_session();
        app
    }

    fn channel(config: &AppConfig, demo_peers: bool) -> Box<dyn CollabChannel> {
        let user = LocalUser {
            name: config.user_name.clone(),
            ..Default::default()
        };
        let channel = LoopbackChannel::new(user);
        if demo_peers {
            Box::new(channel.with_demo_peers(unix_millis()))
        } else {
            Box::new(channel)
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), Instant::now()));
    }

    fn save(&mut self) {
        match self.session.save(&mut self.store, &self.config.storage_key) {
            Ok(()) => self.show_status("Saved"),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.show_status(format!("Save failed: {e}"));
            }
        }
    }

    fn load(&mut self) {
        match self.session.load(&self.store, &self.config.storage_key) {
            Ok(true) => self.show_status(format!("Loaded {} thoughts", self.session.world.thoughts.len())),
            Ok(false) => self.show_status("Nothing saved yet"),
            Err(e) => {
                tracing::warn!(error = %e, "load failed");
                self.show_status(format!("Load failed: {e}"));
            }
        }
    }

    fn toggle_collab(&mut self, now: u64) {
        if matches!(
            self.session.collab.status(),
            ConnectionStatus::Disconnected | ConnectionStatus::Error
        ) {
            self.session.collab.connect(now);
        } else {
            self.session.collab.disconnect();
            self.session.set_collab(Self::channel(&self.config, self.demo_peers));
        }
    }

    fn add_from_input(&mut self, now: u64) {
        let text = std::mem::take(&mut self.controls.text);
        if self.session.add_thought(&text, self.controls.zone, now).is_none() {
            self.controls.text = text;
        }
    }

    fn handle_effects(&mut self, effects: Vec<InputEffect>) {
        for effect in effects {
            match effect {
                InputEffect::Save => self.save(),
                InputEffect::Focus(id) => {
                    if let Some(t) = self.session.world.thought(id) {
                        self.controls.text = t.text.clone();
                        self.controls.focus_input = true;
                    }
                }
                InputEffect::Connect(ClickOutcome::OpenLabel { .. }) => self.label.reset(),
                InputEffect::Connect(ClickOutcome::AlreadyConnected) => self.show_status("Already connected"),
                InputEffect::ConnectionDeleted(_) => self.show_status("Connection removed"),
                InputEffect::ExitConnectMode => self.show_status("Connection mode off"),
                InputEffect::Tap(id) => tracing::debug!(%id, "tap"),
                _ => {}
            }
        }
    }

    /// Route this frame's raw input into the session.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response, now: u64) {
        let origin = response.rect.min;
        let local = |p: egui::Pos2| Vec2::new(p.x - origin.x, p.y - origin.y);
        let modal_open = self.session.mode.is_awaiting_label();
        let text_focus = ctx.wants_keyboard_input();

        let (events, touching, scroll) = ctx.input(|i| (i.raw.events.clone(), i.any_touches(), i.raw_scroll_delta));
        let mut effects = Vec::new();

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) if !touching => self.session.pointer_move(local(pos)),
                egui::Event::PointerButton {
                    pos, button, pressed, ..
                } if !touching && !modal_open => {
                    if pressed && response.rect.contains(pos) && response.hovered() {
                        effects.extend(self.session.pointer_down(MouseButton::from(button), local(pos), now));
                    } else if !pressed {
                        effects.extend(self.session.pointer_up(now));
                    }
                }
                egui::Event::Touch { id, phase, pos, .. } if !modal_open => match phase {
                    egui::TouchPhase::Start if response.rect.contains(pos) => {
                        effects.extend(self.session.touch_start(id.0, local(pos), now));
                    }
                    egui::TouchPhase::Move => effects.extend(self.session.touch_move(id.0, local(pos))),
                    egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                        effects.extend(self.session.touch_end(id.0, now));
                    }
                    _ => {}
                },
                egui::Event::Key {
                    key,
                    pressed,
                    repeat: false,
                    modifiers,
                    ..
                } => {
                    let key = KeyCode::from(key);
                    if pressed {
                        effects.extend(self.session.key_down(key, Modifiers::from(modifiers), text_focus, now));
                    } else {
                        self.session.key_up(key);
                    }
                }
                egui::Event::WindowFocused(false) => self.session.input.clear_keys(),
                _ => {}
            }
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                effects.extend(self.session.double_click(local(pos)));
            }
        }
        if response.hovered() && scroll.y != 0.0 {
            // egui scrolls up with positive y; wheel-up zooms in
            effects.extend(self.session.wheel(-scroll.y));
        }

        ctx.set_cursor_icon(match self.session.input.cursor() {
            CursorHint::Default => egui::CursorIcon::Default,
            CursorHint::Grab => egui::CursorIcon::Grab,
            CursorHint::Grabbing => egui::CursorIcon::Grabbing,
        });

        self.handle_effects(effects);
    }

    fn draw_peers(&self, painter: &egui::Painter, origin: egui::Pos2, extents: Vec2) {
        if !self.session.collab.is_connected() {
            return;
        }
        let camera = &self.session.world.camera;
        for peer in self.session.collab.peers() {
            let p = camera.world_to_screen(peer.cursor, extents);
            let pos = origin + egui::vec2(p.x, p.y);
            let color = egui::Color32::from(peer.color);
            painter.circle_filled(pos, PEER_CURSOR_RADIUS, color);
            painter.text(
                pos + egui::vec2(PEER_CURSOR_RADIUS + 4.0, 0.0),
                egui::Align2::LEFT_CENTER,
                &peer.name,
                egui::FontId::proportional(12.0),
                color,
            );
        }
    }

    fn take_screenshot(&mut self, ctx: &egui::Context, now: u64) {
        let shot = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = shot else {
            return;
        };
        let region = image.region(&self.canvas_rect, Some(ctx.pixels_per_point()));
        let frame = export::Frame {
            width: region.size[0] as u32,
            height: region.size[1] as u32,
            rgba: region.pixels.iter().flat_map(|c| c.to_srgba_unmultiplied()).collect(),
        };
        match export::export_png(&self.export_dir, frame, now) {
            Ok(path) => self.show_status(format!("Exported {}", path.display())),
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.show_status(format!("Export failed: {e}"));
            }
        }
    }
}

impl eframe::App for ThoughtApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = unix_millis();

        if self.export_requested {
            self.take_screenshot(ctx, now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                self.canvas_rect = response.rect;
                let extents = Vec2::new(response.rect.width(), response.rect.height());
                if extents != self.session.world.bounds() && extents.min_element() > 0.0 {
                    self.session.resize(extents);
                }

                self.handle_canvas_input(ctx, &response, now);
                self.session.frame(now);

                let mut canvas = PainterCanvas::new(&painter, response.rect.min);
                render(&mut canvas, extents, &self.session.world, &self.session.mode, now);
                self.draw_peers(&painter, response.rect.min, extents);
            });

        let stats = self.session.stats();
        let status = self.status.as_ref().filter(|(_, at)| at.elapsed() < STATUS_TTL).map(|(m, _)| m.as_str());
        render_stats_overlay(ctx, &stats, self.session.collab.status(), status);

        for action in render_control_panel(ctx, &mut self.controls, &mut self.session, self.show_insights) {
            match action {
                ControlAction::Add => self.add_from_input(now),
                ControlAction::Clear => {
                    self.session.clear();
                    self.show_status("Canvas cleared");
                }
                ControlAction::Save => self.save(),
                ControlAction::Load => self.load(),
                ControlAction::Export => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                    self.export_requested = true;
                }
                ControlAction::ToggleCollab => self.toggle_collab(now),
                ControlAction::ToggleInsights => self.show_insights = !self.show_insights,
            }
        }

        if self.show_insights {
            let insights = self.session.insights(Moment::now());
            if let Some(picked) = render_insights_window(ctx, &mut self.show_insights, insights) {
                self.controls.text = picked;
                self.controls.focus_input = true;
            }
        }

        if self.session.mode.is_awaiting_label() {
            match render_label_modal(ctx, &mut self.label) {
                Some(LabelChoice::Commit { label, color }) => {
                    if self.session.complete_connection(&label, Some(color), now).is_none() {
                        self.show_status("Those thoughts are already connected");
                    }
                }
                Some(LabelChoice::Cancel) => self.session.cancel_connection(),
                None => {}
            }
        }

        // screenshot events arrive on a later frame
        if self.export_requested && ctx.input(|i| i.raw.events.iter().any(|e| matches!(e, egui::Event::Screenshot { .. }))) {
            self.export_requested = false;
        }

        ctx.request_repaint();
    }
}
