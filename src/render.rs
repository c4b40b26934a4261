//! Drawing the sandbox.
//!
//! [`render`] is a pure function of the world, the connection mode and a
//! wall-clock timestamp. It issues screen-space primitives against a
//! [`Canvas`]; animation phases (star twinkle, zone pulse, dash offsets) come
//! from `time_ms` and are never stored.
//!
//! Draw order, back to front:
//!
//! 1. background gradient and starfield (screen space)
//! 2. energy waves
//! 3. zones
//! 4. connections, then the connection-mode preview line
//! 5. particles
//! 6. thoughts
//!
//! Everything from step 2 on goes through the camera.

use std::f64::consts::TAU;

use glam::Vec2;

use crate::camera::Camera;
use crate::color::Color;
use crate::connect_mode::ConnectMode;
use crate::connection::{label_display, label_icon, Connection};
use crate::thought::{Thought, ThoughtId};
use crate::world::World;

const STAR_COUNT: usize = 150;
/// Rings per energy wave.
const WAVE_RINGS: usize = 3;
const BLUR_STEPS: usize = 5;
/// Segments used to approximate a radial gradient.
const GRADIENT_STEPS: usize = 12;

/// A screen-space drawing surface.
///
/// Coordinates are pixels from the top-left of the canvas. Text is centered
/// on its position.
pub trait Canvas {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// A dashed segment. `offset` shifts the dash pattern along the line.
    fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: f32, gap: f32, offset: f32);

    fn dashed_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color, dash: f32, gap: f32);

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, radius: f32, color: Color);

    fn stroke_rounded_rect(&mut self, min: Vec2, size: Vec2, radius: f32, width: f32, color: Color);

    fn text(&mut self, pos: Vec2, text: &str, size: f32, bold: bool, color: Color);

    /// Width of `text` in pixels at `size`.
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.6
    }

    /// Radial gradient from `stops[0]` at the center to the last stop at
    /// `radius`. Stops are `(t, color)` with `t` ascending in `[0, 1]`.
    ///
    /// The default draws concentric filled circles from the outside in.
    fn radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[(f32, Color)]) {
        if stops.is_empty() || radius <= 0.0 {
            return;
        }
        for step in (0..GRADIENT_STEPS).rev() {
            let t = (step + 1) as f32 / GRADIENT_STEPS as f32;
            self.fill_circle(center, radius * t, sample(stops, t));
        }
    }
}

/// Color at `t` along a gradient.
pub fn sample(stops: &[(f32, Color)], t: f32) -> Color {
    let Some(&(first_t, first)) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first_t {
        return first;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            let f = if span > 0.0 { (t - t0) / span } else { 1.0 };
            return c0.lerp(c1, f);
        }
    }
    stops[stops.len() - 1].1
}

/// Camera plus canvas extents.
#[derive(Clone, Copy)]
struct View {
    camera: Camera,
    extents: Vec2,
}

impl View {
    fn point(&self, world: Vec2) -> Vec2 {
        self.camera.world_to_screen(world, self.extents)
    }

    fn len(&self, world_len: f32) -> f32 {
        self.camera.scale(world_len)
    }
}

/// `time_ms * rate` wrapped into `[0, period)`.
///
/// Wall-clock milliseconds are far past f32 precision, so the product is
/// taken in f64 and only the wrapped phase is narrowed.
fn cycle(time_ms: u64, rate: f64, period: f64) -> f32 {
    ((time_ms as f64 * rate) % period) as f32
}

fn pulse(time_ms: u64, rate: f64, phase: f32) -> f32 {
    (cycle(time_ms, rate, TAU) + phase).sin() * 0.3 + 0.7
}

/// Draw one frame.
pub fn render<C: Canvas + ?Sized>(canvas: &mut C, extents: Vec2, world: &World, mode: &ConnectMode, time_ms: u64) {
    draw_background(canvas, extents);
    draw_stars(canvas, extents, time_ms);

    let view = View {
        camera: world.camera,
        extents,
    };
    let pending = match *mode {
        ConnectMode::PendingSecond { first } => Some(first),
        _ => None,
    };

    draw_waves(canvas, &view, world);
    draw_zones(canvas, &view, world, time_ms);
    if world.show_connections {
        draw_connections(canvas, &view, world, pending, time_ms);
    }
    if let Some(first) = pending {
        if let Some(t) = world.thought(first) {
            draw_preview(canvas, &view, t, world.mouse, time_ms);
        }
    }
    draw_particles(canvas, &view, world);
    for t in &world.thoughts {
        draw_thought(canvas, &view, t, pending == Some(t.id), time_ms);
    }
}

fn draw_background<C: Canvas + ?Sized>(canvas: &mut C, extents: Vec2) {
    canvas.fill_rect(Vec2::ZERO, extents, Color::SPACE_EDGE);
    canvas.radial_gradient(
        extents * 0.5,
        extents.x * 0.5,
        &[(0.0, Color::SPACE_CENTER), (1.0, Color::SPACE_EDGE)],
    );
}

/// Positions are a pure function of the star index.
fn draw_stars<C: Canvas + ?Sized>(canvas: &mut C, extents: Vec2, time_ms: u64) {
    if extents.x <= 0.0 || extents.y <= 0.0 {
        return;
    }
    let t = cycle(time_ms, 0.0001, TAU);
    for i in 0..STAR_COUNT {
        let f = i as f32;
        let pos = Vec2::new((f * 157.3) % extents.x, (f * 211.7) % extents.y);
        let size = (i % 3) as f32 * 0.5 + 0.5;
        let twinkle = (t + f * 0.5).sin() * 0.3 + 0.7;
        canvas.fill_circle(pos, size, Color::WHITE.with_alpha(0.5 * twinkle));
    }
}

fn draw_waves<C: Canvas + ?Sized>(canvas: &mut C, view: &View, world: &World) {
    for wave in &world.waves {
        let center = view.point(wave.origin);
        for ring in 0..WAVE_RINGS {
            let i = ring as f32;
            canvas.stroke_circle(
                center,
                view.len(wave.radius + 5.0 * i),
                view.len(4.0 - i),
                wave.color.with_alpha(wave.alpha * (0.6 - 0.15 * i)),
            );
        }
    }
}

fn draw_zones<C: Canvas + ?Sized>(canvas: &mut C, view: &View, world: &World, time_ms: u64) {
    for zone in &world.zones {
        let color = zone.color();
        let center = view.point(zone.center);
        let r = zone.radius;
        // offset by x so zones pulse out of step
        let pulse = pulse(time_ms, 0.001, zone.center.x);

        canvas.radial_gradient(
            center,
            view.len(r * 1.3),
            &[
                (0.0, color.with_alpha(0x40 as f32 / 255.0)),
                (0.5, color.with_alpha(0x20 as f32 / 255.0)),
                (1.0, color.with_alpha(0.0)),
            ],
        );
        canvas.stroke_circle(center, view.len(r + 8.0), view.len(6.0), color.with_alpha(pulse * 0.8));
        canvas.dashed_circle(center, view.len(r), view.len(5.0), color.with_alpha(pulse), view.len(10.0), view.len(10.0));
        canvas.stroke_circle(center, view.len(r - 8.0), view.len(4.0), color.with_alpha(pulse * 0.9));

        canvas.text(center, zone.kind.icon(), view.len(48.0), false, Color::WHITE.with_alpha(0.9));
        canvas.text(
            view.point(zone.center + Vec2::new(0.0, r + 30.0)),
            zone.kind.name(),
            view.len(18.0),
            true,
            Color::WHITE.with_alpha(0.9),
        );
    }
}

fn draw_connections<C: Canvas + ?Sized>(
    canvas: &mut C,
    view: &View,
    world: &World,
    pending: Option<ThoughtId>,
    time_ms: u64,
) {
    let index = world.index();
    for connection in &world.connections {
        let Some((a, b)) = connection.endpoints(&world.thoughts, &index) else {
            continue;
        };
        let highlighted = pending.is_some_and(|id| connection.touches(id));
        draw_connection(canvas, view, connection, a, b, highlighted, time_ms);
    }
}

fn draw_connection<C: Canvas + ?Sized>(
    canvas: &mut C,
    view: &View,
    connection: &Connection,
    a: Vec2,
    b: Vec2,
    highlighted: bool,
    time_ms: u64,
) {
    let color = connection.display_color();
    let (sa, sb) = (view.point(a), view.point(b));
    let mid_world = (a + b) * 0.5;
    let mid = view.point(mid_world);

    if connection.is_manual() {
        let width = if highlighted { 3.0 } else { 2.0 };
        canvas.line(sa, sb, view.len(width * 3.0), color.fade(0.25));
        canvas.line(sa, sb, view.len(width), color);
        canvas.fill_circle(mid, view.len(5.0), color);

        if !connection.label.is_empty() {
            let text = label_display(&connection.label);
            let font = view.len(11.0);
            let width = canvas.measure_text(&text, font) + view.len(16.0);
            let height = view.len(20.0);
            let top_left = view.point(mid_world + Vec2::new(0.0, 10.0)) - Vec2::new(width * 0.5, 0.0);
            let size = Vec2::new(width, height);
            canvas.fill_rounded_rect(top_left, size, view.len(10.0), Color::BLACK.with_alpha(0.7));
            canvas.stroke_rounded_rect(top_left, size, view.len(10.0), view.len(1.0), color);
            canvas.text(view.point(mid_world + Vec2::new(0.0, 20.0)), &text, font, false, Color::WHITE);
        }
        if let Some(icon) = label_icon(&connection.label) {
            canvas.text(view.point(mid_world - Vec2::new(0.0, 20.0)), icon, view.len(14.0), false, Color::WHITE);
        }
    } else {
        let width = if highlighted { 3.0 } else { 1.5 };
        let offset = cycle(time_ms, 0.02, 10.0);
        canvas.dashed_line(sa, sb, view.len(width), color, view.len(5.0), view.len(5.0), view.len(offset));
        canvas.fill_circle(mid, view.len(3.0), color);
    }
}

fn draw_preview<C: Canvas + ?Sized>(canvas: &mut C, view: &View, from: &Thought, mouse: Vec2, time_ms: u64) {
    let offset = -cycle(time_ms, 0.05, 16.0);
    let start = view.point(from.pos);
    let end = view.point(mouse);
    canvas.dashed_line(
        start,
        end,
        view.len(2.0),
        Color::ACCENT.with_alpha(0.6),
        view.len(8.0),
        view.len(8.0),
        view.len(offset),
    );
    canvas.fill_circle(end, view.len(10.0), Color::ACCENT.with_alpha(0.4));
    canvas.stroke_circle(
        start,
        view.len(from.size + 10.0),
        view.len(3.0),
        Color::ACCENT.with_alpha(pulse(time_ms, 0.005, 0.0)),
    );
}

fn draw_particles<C: Canvas + ?Sized>(canvas: &mut C, view: &View, world: &World) {
    for p in &world.particles {
        let center = view.point(p.pos);
        canvas.fill_circle(center, view.len(p.size), p.color.with_alpha(p.life * 0.9));
        canvas.fill_circle(center, view.len(p.size * 0.4), Color::WHITE.with_alpha(0.6 * p.life));
    }
}

fn draw_thought<C: Canvas + ?Sized>(canvas: &mut C, view: &View, t: &Thought, pending: bool, time_ms: u64) {
    let speed = t.speed();
    let center = view.point(t.pos);
    let size = t.size;

    if speed > 1.0 {
        for i in 1..=BLUR_STEPS {
            let ghost = t.pos - t.vel * (i as f32 * 3.0);
            canvas.fill_circle(view.point(ghost), view.len(size * 0.85), t.color.with_alpha(0.2));
        }
    }

    if t.glow > 0.0 || speed > 1.0 {
        let strength = t.glow.max((speed * 0.4).min(0.7));
        canvas.radial_gradient(
            center,
            view.len(size * 2.0),
            &[(0.0, t.color.with_alpha(strength)), (1.0, t.color.with_alpha(0.0))],
        );
    }

    let highlight_pulse = pulse(time_ms, 0.005, 0.0);
    if pending {
        canvas.fill_circle(center, view.len(size + 5.0), Color::ACCENT.with_alpha(highlight_pulse * 0.3));
    }

    canvas.radial_gradient(
        center,
        view.len(size),
        &[
            (0.0, t.color.lerp(Color::WHITE, 0.3).with_alpha(0.95)),
            (1.0, t.color.with_alpha(0.95)),
        ],
    );
    canvas.fill_circle(
        view.point(t.pos + Vec2::splat(-0.3 * size)),
        view.len(0.35 * size),
        Color::WHITE.with_alpha(0.4),
    );
    canvas.stroke_circle(center, view.len(size), view.len(2.0), Color::WHITE.with_alpha(0.3));

    if pending {
        canvas.stroke_circle(center, view.len(size + 8.0), view.len(4.0), Color::ACCENT.with_alpha(highlight_pulse));
    }

    canvas.text(center, &t.display_text(), view.len((size / 3.0).max(14.0)), true, Color::WHITE);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect { min: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, radius: f32, width: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Dashed { from: Vec2, to: Vec2, width: f32, color: Color },
    DashedRing { center: Vec2, radius: f32, color: Color },
    RoundedRect { min: Vec2, size: Vec2, filled: bool, color: Color },
    Text { pos: Vec2, text: String, size: f32, color: Color },
}

/// A canvas that records calls instead of drawing. Useful for checking
/// what a frame contains without a GPU.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text draw calls, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of the first op drawing `text`.
    pub fn position_of_text(&self, needle: &str) -> Option<usize> {
        self.ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.ops.push(DrawOp::Rect { min, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.ops.push(DrawOp::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }

    fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, _dash: f32, _gap: f32, _offset: f32) {
        self.ops.push(DrawOp::Dashed { from, to, width, color });
    }

    fn dashed_circle(&mut self, center: Vec2, radius: f32, _width: f32, color: Color, _dash: f32, _gap: f32) {
        self.ops.push(DrawOp::DashedRing { center, radius, color });
    }

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, _radius: f32, color: Color) {
        self.ops.push(DrawOp::RoundedRect {
            min,
            size,
            filled: true,
            color,
        });
    }

    fn stroke_rounded_rect(&mut self, min: Vec2, size: Vec2, _radius: f32, _width: f32, color: Color) {
        self.ops.push(DrawOp::RoundedRect {
            min,
            size,
            filled: false,
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, _bold: bool, color: Color) {
        self.ops.push(DrawOp::Text {
            pos,
            text: text.to_string(),
            size,
            color,
        });
    }
}

#[cfg(feature = "egui")]
pub use painter::PainterCanvas;

#[cfg(feature = "egui")]
mod painter {
    use egui::{Align2, Color32, FontFamily, FontId, Pos2, Shape, Stroke, StrokeKind};
    use glam::Vec2;

    use super::Canvas;
    use crate::color::Color;

    const CIRCLE_SEGMENTS: usize = 64;

    /// Draws onto an [`egui::Painter`], offset by the canvas rect origin.
    pub struct PainterCanvas<'a> {
        painter: &'a egui::Painter,
        origin: Pos2,
    }

    impl<'a> PainterCanvas<'a> {
        pub fn new(painter: &'a egui::Painter, origin: Pos2) -> Self {
            Self { painter, origin }
        }

        fn pos(&self, p: Vec2) -> Pos2 {
            self.origin + egui::vec2(p.x, p.y)
        }

        fn rect(&self, min: Vec2, size: Vec2) -> egui::Rect {
            egui::Rect::from_min_size(self.pos(min), egui::vec2(size.x, size.y))
        }

        fn font(size: f32, bold: bool) -> FontId {
            // the default font set has no bold face; bold text renders one size up
            let size = if bold { size + 1.0 } else { size };
            FontId::new(size.max(1.0), FontFamily::Proportional)
        }
    }

    impl Canvas for PainterCanvas<'_> {
        fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
            self.painter.rect_filled(self.rect(min, size), 0.0, Color32::from(color));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.painter.circle_filled(self.pos(center), radius, Color32::from(color));
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
            self.painter
                .circle_stroke(self.pos(center), radius, Stroke::new(width, Color32::from(color)));
        }

        fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
            self.painter.line_segment(
                [self.pos(from), self.pos(to)],
                Stroke::new(width, Color32::from(color)),
            );
        }

        fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: f32, gap: f32, offset: f32) {
            let shapes = Shape::dashed_line_with_offset(
                &[self.pos(from), self.pos(to)],
                Stroke::new(width, Color32::from(color)),
                &[dash.max(0.5)],
                &[gap.max(0.5)],
                offset.rem_euclid(dash + gap),
            );
            self.painter.extend(shapes);
        }

        fn dashed_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color, dash: f32, gap: f32) {
            let c = self.pos(center);
            let points: Vec<Pos2> = (0..=CIRCLE_SEGMENTS)
                .map(|i| {
                    let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    c + egui::vec2(angle.cos(), angle.sin()) * radius
                })
                .collect();
            let shapes = Shape::dashed_line(
                &points,
                Stroke::new(width, Color32::from(color)),
                dash.max(0.5),
                gap.max(0.5),
            );
            self.painter.extend(shapes);
        }

        fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, radius: f32, color: Color) {
            self.painter.rect_filled(self.rect(min, size), radius, Color32::from(color));
        }

        fn stroke_rounded_rect(&mut self, min: Vec2, size: Vec2, radius: f32, width: f32, color: Color) {
            self.painter.rect_stroke(
                self.rect(min, size),
                radius,
                Stroke::new(width, Color32::from(color)),
                StrokeKind::Middle,
            );
        }

        fn text(&mut self, pos: Vec2, text: &str, size: f32, bold: bool, color: Color) {
            self.painter.text(
                self.pos(pos),
                Align2::CENTER_CENTER,
                text,
                Self::font(size, bold),
                Color32::from(color),
            );
        }

        fn measure_text(&self, text: &str, size: f32) -> f32 {
            self.painter
                .layout_no_wrap(text.to_owned(), Self::font(size, false), Color32::WHITE)
                .size()
                .x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionKind;
    use crate::zone::LayoutConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> (World, StdRng) {
        (
            World::new(Vec2::new(1200.0, 800.0), LayoutConfig::default()),
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn test_render_does_not_mutate_world() {
        let (mut w, mut rng) = world();
        w.add_thought(&mut rng, "hello", None, 0);
        let before = format!("{w:?}");
        let mut canvas = RecordingCanvas::new();
        render(&mut canvas, w.bounds(), &w, &ConnectMode::default(), 1234);
        assert_eq!(format!("{w:?}"), before);
        assert!(!canvas.ops.is_empty());
    }

    #[test]
    fn test_layers_back_to_front() {
        let (mut w, mut rng) = world();
        w.add_thought(&mut rng, "topmost", None, 0);
        let mut canvas = RecordingCanvas::new();
        render(&mut canvas, w.bounds(), &w, &ConnectMode::default(), 0);

        assert!(matches!(canvas.ops[0], DrawOp::Rect { .. }));
        let zone_label = canvas.position_of_text("Creative").unwrap();
        let thought_label = canvas.position_of_text("topmost").unwrap();
        assert!(zone_label < thought_label);
        assert_eq!(canvas.texts().last(), Some(&"topmost"));
    }

    #[test]
    fn test_stars_are_stable() {
        let (w, _) = world();
        let mut a = RecordingCanvas::new();
        let mut b = RecordingCanvas::new();
        render(&mut a, w.bounds(), &w, &ConnectMode::default(), 0);
        render(&mut b, w.bounds(), &w, &ConnectMode::default(), 0);
        assert_eq!(a.ops, b.ops);
    }

    #[test]
    fn test_zones_pulse_at_wall_clock_time() {
        let (w, _) = world();
        let zone_rings = |time_ms: u64| {
            let mut canvas = RecordingCanvas::new();
            render(&mut canvas, w.bounds(), &w, &ConnectMode::default(), time_ms);
            canvas
                .ops
                .into_iter()
                .filter_map(|op| match op {
                    DrawOp::DashedRing { color, .. } => Some(color),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };

        // a unix-millis timestamp in late 2026
        let now = 1_790_000_000_000;
        let first = zone_rings(now);
        assert_eq!(first.len(), 4);
        assert_ne!(first, zone_rings(now + 300));
        assert_ne!(zone_rings(now + 300), zone_rings(now + 600));
    }

    #[test]
    fn test_wrapped_phase_matches_small_timestamps() {
        assert!((cycle(1_500, 0.001, TAU) - 1.5).abs() < 1e-6);
        assert!((cycle(1_790_000_000_250, 0.02, 10.0) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_connections_are_skipped() {
        let (mut w, mut rng) = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        let b = w.add_thought(&mut rng, "b", None, 0).unwrap();
        w.thought_mut(b).unwrap().pos.x += 100.0;
        w.connections.add(Connection::new(a, b, ConnectionKind::Antonym, 0));

        let count_dashed = |w: &World| {
            let mut canvas = RecordingCanvas::new();
            render(&mut canvas, w.bounds(), w, &ConnectMode::default(), 0);
            canvas.ops.iter().filter(|op| matches!(op, DrawOp::Dashed { .. })).count()
        };
        assert_eq!(count_dashed(&w), 1);
        w.show_connections = false;
        assert_eq!(count_dashed(&w), 0);
    }

    #[test]
    fn test_preview_line_follows_pointer() {
        let (mut w, mut rng) = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        w.mouse = Vec2::new(100.0, 100.0);
        let mut canvas = RecordingCanvas::new();
        render(&mut canvas, w.bounds(), &w, &ConnectMode::PendingSecond { first: a }, 0);

        let preview = canvas.ops.iter().find_map(|op| match op {
            DrawOp::Dashed { to, color, .. } if color.r == Color::ACCENT.r => Some(*to),
            _ => None,
        });
        assert_eq!(preview, Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_manual_label_pill() {
        let (mut w, mut rng) = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        let b = w.add_thought(&mut rng, "b", None, 0).unwrap();
        let mut c = Connection::new(a, b, ConnectionKind::Manual, 0);
        c.label = "causes".into();
        w.connections.add(c);

        let mut canvas = RecordingCanvas::new();
        render(&mut canvas, w.bounds(), &w, &ConnectMode::default(), 0);
        assert!(canvas.texts().contains(&"Causes →"));
        assert!(canvas.texts().contains(&"➡"));
        assert!(canvas
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::RoundedRect { filled: true, .. })));
    }

    #[test]
    fn test_gradient_sample() {
        let stops = [(0.0, Color::BLACK), (1.0, Color::WHITE)];
        assert_eq!(sample(&stops, 0.0), Color::BLACK);
        assert_eq!(sample(&stops, 2.0), Color::WHITE);
        assert_eq!(sample(&[], 0.5), Color::TRANSPARENT);
    }
}
