//! Pointer, touch and keyboard handling.
//!
//! [`Input`] turns raw events into world mutations (drag, hover glow, zoom)
//! and reports everything the host should react to as [`InputEffect`]s:
//! sound cues, pause toggles, save requests, deletions. Positions arrive in
//! screen pixels and are mapped through the camera before touching the
//! world.
//!
//! # Usage
//!
//! ```ignore
//! let effects = input.pointer_down(&mut world, &mut mode, MouseButton::Left, pos, now_ms, &mut rng);
//! for effect in effects {
//!     match effect {
//!         InputEffect::Cue(cue) => sounds.emit(cue, now_ms),
//!         InputEffect::TogglePause => clock.toggle_pause(),
//!         _ => {}
//!     }
//! }
//! ```

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use crate::connect_mode::{ClickOutcome, ConnectMode};
use crate::effects::Emitter;
use crate::sound::SoundCue;
use crate::thought::{Motion, ThoughtId};
use crate::world::World;

/// Mouse drag speed (px per move) that breaks semantic bonds.
const MOUSE_BREAK_SPEED: f32 = 5.0;
/// Touch drag speed that breaks semantic bonds.
const TOUCH_BREAK_SPEED: f32 = 10.0;
/// Ticks of suppressed semantic forces after a fast drag.
const BREAK_BOND_TICKS: u32 = 10;
const TRAIL_CHANCE: f64 = 0.3;
const GRAB_PARTICLES: usize = 8;
const GRAB_GLOW: f32 = 1.0;
const HOVER_GLOW: f32 = 0.5;
const RELEASE_GLOW: f32 = 0.3;
/// Release momentum relative to the last pointer delta.
const RELEASE_BOOST: f32 = 2.0;
/// Touch drags carry only part of the finger delta.
const TOUCH_VELOCITY_SCALE: f32 = 0.5;
/// Touch hit targets are larger than the bubble.
const TOUCH_HIT_SCALE: f32 = 1.2;
/// Touches shorter than this are taps.
const TAP_MS: u64 = 200;
const WHEEL_ZOOM_OUT: f32 = 0.9;
const WHEEL_ZOOM_IN: f32 = 1.1;

/// Shortest and longest delay before a released thought heads home.
pub const MIN_RETURN_DELAY: f32 = 5.0;
pub const MAX_RETURN_DELAY: f32 = 10.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// The keys the sandbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Escape,
    Delete,
    Backspace,
    Enter,
    S,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS, Ctrl elsewhere.
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    fn save_chord(&self) -> bool {
        self.ctrl || self.command
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Something the host should act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEffect {
    Cue(SoundCue),
    /// A click went to connection mode.
    Connect(ClickOutcome),
    TogglePause,
    Save,
    /// Delete this (selected) thought.
    Delete(ThoughtId),
    /// A thought was double-clicked for editing.
    Focus(ThoughtId),
    /// A quick touch on a thought.
    Tap(ThoughtId),
    ConnectionDeleted(usize),
    ExitConnectMode,
    ZoomChanged(f32),
}

/// Seconds a released thought waits before returning home, from 5 when
/// released on the zone center up to 10 at `max(width, height)` away.
pub fn return_delay(distance: f32, bounds: Vec2) -> f32 {
    let reach = bounds.x.max(bounds.y);
    let t = if reach > 0.0 {
        (distance / reach).clamp(0.0, 1.0)
    } else {
        1.0
    };
    MIN_RETURN_DELAY + t * (MAX_RETURN_DELAY - MIN_RETURN_DELAY)
}

/// Take exclusive control of a thought.
fn grab<R: Rng + ?Sized>(world: &mut World, id: ThoughtId, rng: &mut R) -> bool {
    if world.dragged.is_some() {
        return false;
    }
    let Some(t) = world.thought_mut(id) else {
        return false;
    };
    t.glow = GRAB_GLOW;
    t.motion = t.motion.settle();
    let (pos, color) = (t.pos, t.color);
    Emitter::Scatter {
        position: pos,
        count: GRAB_PARTICLES,
        color: Some(color),
    }
    .emit_into(rng, &mut world.particles);
    world.dragged = Some(id);
    true
}

/// Let go of the dragged thought. Zone thoughts start their return delay.
fn release(world: &mut World, velocity: Option<Vec2>, now_ms: u64) -> Option<ThoughtId> {
    let id = world.dragged.take()?;
    let bounds = world.bounds();
    let home = world
        .thought(id)
        .and_then(|t| t.zone())
        .and_then(|k| world.zone(k))
        .copied();
    let t = world.thought_mut(id)?;

    t.glow = RELEASE_GLOW;
    if let Some(v) = velocity {
        t.vel = v;
    }
    if let Some(home) = home {
        let delay = return_delay(t.pos.distance(home.center), bounds);
        t.motion = Motion::ReturningWithDelay {
            zone: home.kind,
            delay,
            since: now_ms,
        };
    }
    Some(id)
}

/// Keyboard and mouse state.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    /// Last two pointer samples in world coordinates, newest first.
    last: Vec2,
    prev: Vec2,
    cursor: CursorHint,
    pub touch: TouchGestures,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    fn sample(&mut self, pos: Vec2) {
        self.prev = self.last;
        self.last = pos;
    }

    pub fn pointer_down<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        mode: &mut ConnectMode,
        button: MouseButton,
        screen: Vec2,
        rng: &mut R,
    ) -> Vec<InputEffect> {
        let pos = world.camera.screen_to_world(screen, world.bounds());
        world.mouse = pos;
        self.last = pos;
        self.prev = pos;
        let hit = world.thought_at(pos, 1.0);

        match button {
            MouseButton::Right => {
                let index = world.index();
                match world.connections.hit_test(pos, &world.thoughts, &index) {
                    Some(i) if world.show_connections => {
                        world.connections.remove(i);
                        vec![InputEffect::ConnectionDeleted(i)]
                    }
                    _ => Vec::new(),
                }
            }
            MouseButton::Middle => Vec::new(),
            MouseButton::Left => {
                world.selected = hit;
                let Some(id) = hit else {
                    return Vec::new();
                };

                if mode.is_active() {
                    let outcome = mode.click(id, &world.connections);
                    let mut effects = vec![InputEffect::Connect(outcome)];
                    if let ClickOutcome::Select(_) = outcome {
                        effects.push(InputEffect::Cue(SoundCue::Grabbed));
                    }
                    return effects;
                }

                if grab(world, id, rng) {
                    self.cursor = CursorHint::Grabbing;
                    vec![InputEffect::Cue(SoundCue::Grabbed)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn pointer_move<R: Rng + ?Sized>(&mut self, world: &mut World, screen: Vec2, rng: &mut R) {
        let pos = world.camera.screen_to_world(screen, world.bounds());
        world.mouse = pos;

        let mut hovering = false;
        for t in world.thoughts.iter_mut() {
            if t.pos.distance(pos) <= t.size {
                hovering = true;
                t.glow = t.glow.max(HOVER_GLOW);
            }
        }

        if let Some(id) = world.dragged {
            let delta = pos - self.last;
            if let Some(t) = world.thought_mut(id) {
                t.pos = pos;
                t.vel = delta;
                if delta.length() > MOUSE_BREAK_SPEED {
                    t.break_bond = BREAK_BOND_TICKS;
                }
                let color = t.color;
                if rng.gen_bool(TRAIL_CHANCE) {
                    Emitter::Scatter {
                        position: pos,
                        count: 1,
                        color: Some(color),
                    }
                    .emit_into(rng, &mut world.particles);
                }
            }
            self.cursor = CursorHint::Grabbing;
        } else {
            self.cursor = if hovering {
                CursorHint::Grab
            } else {
                CursorHint::Default
            };
        }

        self.sample(pos);
    }

    pub fn pointer_up(&mut self, world: &mut World, now_ms: u64) -> Vec<InputEffect> {
        let momentum = (self.last - self.prev) * RELEASE_BOOST;
        self.cursor = CursorHint::Default;
        match release(world, Some(momentum), now_ms) {
            Some(_) => vec![InputEffect::Cue(SoundCue::Released)],
            None => Vec::new(),
        }
    }

    pub fn double_click(&mut self, world: &mut World, screen: Vec2) -> Vec<InputEffect> {
        let pos = world.camera.screen_to_world(screen, world.bounds());
        match world.thought_at(pos, 1.0) {
            Some(id) => {
                world.selected = Some(id);
                vec![InputEffect::Focus(id)]
            }
            None => Vec::new(),
        }
    }

    /// Scroll wheel: any downward scroll zooms out, upward zooms in.
    pub fn wheel(&mut self, world: &mut World, delta_y: f32) -> Vec<InputEffect> {
        if delta_y == 0.0 {
            return Vec::new();
        }
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        vec![InputEffect::ZoomChanged(world.camera.zoom_by(factor))]
    }

    /// A key went down. `text_focus` is set while a text field has focus.
    pub fn key_down(
        &mut self,
        world: &World,
        mode: &mut ConnectMode,
        key: KeyCode,
        modifiers: Modifiers,
        text_focus: bool,
    ) -> Vec<InputEffect> {
        // no auto-repeat
        if !self.keys_held.insert(key) {
            return Vec::new();
        }

        match key {
            KeyCode::Space if !text_focus => vec![InputEffect::TogglePause],
            KeyCode::Delete | KeyCode::Backspace if !text_focus => world
                .selected
                .map(InputEffect::Delete)
                .into_iter()
                .collect(),
            KeyCode::S if modifiers.save_chord() => vec![InputEffect::Save],
            KeyCode::Escape if mode.escape() => vec![InputEffect::ExitConnectMode],
            _ => Vec::new(),
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn clear_keys(&mut self) {
        self.keys_held.clear();
    }
}

/// Touch state: single-finger drag, two-finger pinch, tap detection.
#[derive(Debug, Default)]
pub struct TouchGestures {
    /// Active touches by id, in screen coordinates.
    touches: Vec<(u64, Vec2)>,
    start_distance: f32,
    initial_zoom: f32,
    started_ms: u64,
    /// Last single-finger position in world coordinates.
    last: Vec2,
}

impl TouchGestures {
    pub fn active(&self) -> usize {
        self.touches.len()
    }

    fn pinch_distance(&self) -> Option<f32> {
        match self.touches.as_slice() {
            [(_, a), (_, b), ..] => Some(a.distance(*b)),
            _ => None,
        }
    }

    pub fn start<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        mode: &mut ConnectMode,
        id: u64,
        screen: Vec2,
        now_ms: u64,
        rng: &mut R,
    ) -> Vec<InputEffect> {
        self.touches.retain(|(t, _)| *t != id);
        self.touches.push((id, screen));
        self.started_ms = now_ms;

        match self.touches.len() {
            1 => {
                let pos = world.camera.screen_to_world(screen, world.bounds());
                self.last = pos;
                world.mouse = pos;
                let Some(hit) = world.thought_at(pos, TOUCH_HIT_SCALE) else {
                    return Vec::new();
                };
                if mode.is_active() {
                    return vec![InputEffect::Connect(mode.click(hit, &world.connections))];
                }
                if grab(world, hit, rng) {
                    vec![InputEffect::Cue(SoundCue::Grabbed)]
                } else {
                    Vec::new()
                }
            }
            2 => {
                self.start_distance = self.pinch_distance().unwrap_or(0.0);
                self.initial_zoom = world.camera.zoom();
                if let Some(id) = world.dragged.take() {
                    if let Some(t) = world.thought_mut(id) {
                        t.glow = RELEASE_GLOW;
                    }
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn moved(&mut self, world: &mut World, id: u64, screen: Vec2) -> Vec<InputEffect> {
        if let Some(entry) = self.touches.iter_mut().find(|(t, _)| *t == id) {
            entry.1 = screen;
        } else {
            return Vec::new();
        }

        match self.touches.len() {
            1 => {
                let pos = world.camera.screen_to_world(screen, world.bounds());
                world.mouse = pos;
                if let Some(dragged) = world.dragged {
                    let delta = pos - self.last;
                    if let Some(t) = world.thought_mut(dragged) {
                        t.pos = pos;
                        t.vel = delta * TOUCH_VELOCITY_SCALE;
                        if delta.length() > TOUCH_BREAK_SPEED {
                            t.break_bond = BREAK_BOND_TICKS;
                        }
                    }
                }
                self.last = pos;
                Vec::new()
            }
            2 if self.start_distance > 0.0 => {
                let current = self.pinch_distance().unwrap_or(self.start_distance);
                let zoom = world
                    .camera
                    .set_zoom(self.initial_zoom * current / self.start_distance);
                vec![InputEffect::ZoomChanged(zoom)]
            }
            _ => Vec::new(),
        }
    }

    /// A touch ended or was cancelled.
    pub fn end(&mut self, world: &mut World, id: u64, now_ms: u64) -> Vec<InputEffect> {
        self.touches.retain(|(t, _)| *t != id);
        let mut effects = Vec::new();

        match self.touches.as_slice() {
            [] => {
                // momentum was already set while moving
                if let Some(thought) = release(world, None, now_ms) {
                    effects.push(InputEffect::Cue(SoundCue::Released));
                    if now_ms.saturating_sub(self.started_ms) < TAP_MS {
                        world.selected = Some(thought);
                        effects.push(InputEffect::Tap(thought));
                    }
                }
            }
            [(_, remaining)] => {
                let pos = world.camera.screen_to_world(*remaining, world.bounds());
                self.last = pos;
                world.mouse = pos;
            }
            _ => {}
        }
        effects
    }
}

#[cfg(feature = "egui")]
impl From<egui::Key> for KeyCode {
    fn from(key: egui::Key) -> Self {
        match key {
            egui::Key::Space => KeyCode::Space,
            egui::Key::Escape => KeyCode::Escape,
            egui::Key::Delete => KeyCode::Delete,
            egui::Key::Backspace => KeyCode::Backspace,
            egui::Key::Enter => KeyCode::Enter,
            egui::Key::S => KeyCode::S,
            _ => KeyCode::Other,
        }
    }
}

#[cfg(feature = "egui")]
impl From<egui::PointerButton> for MouseButton {
    fn from(btn: egui::PointerButton) -> Self {
        match btn {
            egui::PointerButton::Secondary => MouseButton::Right,
            egui::PointerButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

#[cfg(feature = "egui")]
impl From<egui::Modifiers> for Modifiers {
    fn from(m: egui::Modifiers) -> Self {
        Modifiers {
            ctrl: m.ctrl,
            command: m.command,
            shift: m.shift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{LayoutConfig, ZoneKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (World, ConnectMode, Input, StdRng) {
        let world = World::new(Vec2::new(1200.0, 800.0), LayoutConfig::default());
        (world, ConnectMode::default(), Input::new(), StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_return_delay_interpolates() {
        let bounds = Vec2::new(1000.0, 800.0);
        assert_eq!(return_delay(0.0, bounds), 5.0);
        assert_eq!(return_delay(1000.0, bounds), 10.0);
        assert_eq!(return_delay(5000.0, bounds), 10.0);
        assert!((return_delay(500.0, bounds) - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_drag_and_release_into_zone_return() {
        let (mut world, mut mode, mut input, mut rng) = setup();
        let id = world.add_thought(&mut rng, "plan", Some(ZoneKind::Focus), 0).unwrap();
        let start = world.thought(id).unwrap().pos;

        let effects = input.pointer_down(&mut world, &mut mode, MouseButton::Left, start, &mut rng);
        assert_eq!(effects, vec![InputEffect::Cue(SoundCue::Grabbed)]);
        assert_eq!(world.dragged, Some(id));
        assert_eq!(input.cursor(), CursorHint::Grabbing);

        input.pointer_move(&mut world, start + Vec2::new(3.0, 0.0), &mut rng);
        input.pointer_move(&mut world, start + Vec2::new(10.0, 0.0), &mut rng);
        assert_eq!(world.thought(id).unwrap().break_bond, BREAK_BOND_TICKS);

        let effects = input.pointer_up(&mut world, 1_000);
        assert_eq!(effects, vec![InputEffect::Cue(SoundCue::Released)]);
        assert!(world.dragged.is_none());

        let t = world.thought(id).unwrap();
        assert_eq!(t.vel, Vec2::new(14.0, 0.0));
        match t.motion {
            Motion::ReturningWithDelay { zone, delay, since } => {
                assert_eq!(zone, ZoneKind::Focus);
                assert_eq!(since, 1_000);
                assert!((MIN_RETURN_DELAY..=MAX_RETURN_DELAY).contains(&delay));
            }
            other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn test_connect_mode_routes_clicks() {
        let (mut world, mut mode, mut input, mut rng) = setup();
        let id = world.add_thought(&mut rng, "a", None, 0).unwrap();
        let pos = world.thought(id).unwrap().pos;
        mode.toggle();

        let effects = input.pointer_down(&mut world, &mut mode, MouseButton::Left, pos, &mut rng);
        assert_eq!(effects[0], InputEffect::Connect(ClickOutcome::Select(id)));
        assert!(world.dragged.is_none());
    }

    #[test]
    fn test_wheel_zoom_bounded() {
        let (mut world, _, mut input, _) = setup();
        for _ in 0..30 {
            input.wheel(&mut world, -1.0);
        }
        assert_eq!(world.camera.zoom(), 1.3);
        for _ in 0..30 {
            input.wheel(&mut world, 3.0);
        }
        assert_eq!(world.camera.zoom(), 0.5);
        assert!(input.wheel(&mut world, 0.0).is_empty());
    }

    #[test]
    fn test_keys() {
        let (mut world, mut mode, mut input, _) = setup();
        let none = Modifiers::default();

        assert_eq!(input.key_down(&world, &mut mode, KeyCode::Space, none, false), vec![InputEffect::TogglePause]);
        // held key does not repeat
        assert!(input.key_down(&world, &mut mode, KeyCode::Space, none, false).is_empty());
        input.key_up(KeyCode::Space);
        assert!(input.key_down(&world, &mut mode, KeyCode::Space, none, true).is_empty());
        input.key_up(KeyCode::Space);

        assert!(input.key_down(&world, &mut mode, KeyCode::Delete, none, false).is_empty());
        input.key_up(KeyCode::Delete);
        world.selected = Some(ThoughtId(4));
        assert_eq!(
            input.key_down(&world, &mut mode, KeyCode::Delete, none, false),
            vec![InputEffect::Delete(ThoughtId(4))]
        );

        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(input.key_down(&world, &mut mode, KeyCode::S, ctrl, true), vec![InputEffect::Save]);

        mode.toggle();
        assert_eq!(
            input.key_down(&world, &mut mode, KeyCode::Escape, none, false),
            vec![InputEffect::ExitConnectMode]
        );
        assert!(!mode.is_active());
    }

    #[test]
    fn test_pinch_zoom_bounded() {
        let (mut world, mut mode, _, mut rng) = setup();
        let mut touch = TouchGestures::default();
        touch.start(&mut world, &mut mode, 1, Vec2::new(100.0, 100.0), 0, &mut rng);
        touch.start(&mut world, &mut mode, 2, Vec2::new(200.0, 100.0), 0, &mut rng);

        let effects = touch.moved(&mut world, 2, Vec2::new(1000.0, 100.0));
        assert_eq!(effects, vec![InputEffect::ZoomChanged(1.3)]);
        touch.moved(&mut world, 2, Vec2::new(110.0, 100.0));
        assert_eq!(world.camera.zoom(), 0.5);
        touch.moved(&mut world, 2, Vec2::new(210.0, 100.0));
        assert!((world.camera.zoom() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_quick_touch_is_a_tap() {
        let (mut world, mut mode, _, mut rng) = setup();
        let id = world.add_thought(&mut rng, "a", None, 0).unwrap();
        let pos = world.thought(id).unwrap().pos;
        let mut touch = TouchGestures::default();

        touch.start(&mut world, &mut mode, 7, pos, 1_000, &mut rng);
        assert_eq!(world.dragged, Some(id));
        let effects = touch.end(&mut world, 7, 1_150);
        assert!(effects.contains(&InputEffect::Tap(id)));
        assert_eq!(world.selected, Some(id));

        touch.start(&mut world, &mut mode, 8, pos, 2_000, &mut rng);
        let effects = touch.end(&mut world, 8, 2_500);
        assert!(!effects.iter().any(|e| matches!(e, InputEffect::Tap(_))));
    }
}
