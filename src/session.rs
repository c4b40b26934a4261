//! One canvas session.
//!
//! [`Session`] owns the world and everything that drives it: the input
//! layer, the connection-mode machine, the frame clock, the sound filter and
//! the collaboration channel. A host feeds it events, calls
//! [`Session::frame`] once per display refresh, then renders.
//!
//! Frame order:
//!
//! 1. input handlers (called by the host before `frame`)
//! 2. physics step, if running
//! 3. sound cues for the step's events
//! 4. ambient effect ticks (also while paused)
//! 5. collaboration poll, inbound thoughts materialize
//! 6. related-link discovery and insight refresh when the thought count
//!    changed

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collab::{CollabChannel, CollabEvent, LoopbackChannel};
use crate::color::Color;
use crate::config::AppConfig;
use crate::connect_mode::ConnectMode;
use crate::connection::Connection;
use crate::effects::{ambient_tick, AmbientConfig};
use crate::error::StoreError;
use crate::input::{Input, InputEffect, KeyCode, Modifiers, MouseButton};
use crate::insight::{self, Analytics, Moment, SuggestionConfig};
use crate::persist::{self, KeyValueStore, LoadOutcome, Snapshot};
use crate::physics::{self, PhysicsParams, SimEvent};
use crate::sound::{CueFilter, SoundCue, SoundSink, TracingSink};
use crate::thought::ThoughtId;
use crate::time::Clock;
use crate::world::World;
use crate::zone::ZoneKind;

/// What happened during one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    pub stepped: bool,
    pub events: Vec<SimEvent>,
    pub collab: Vec<CollabEvent>,
    /// Related links discovered this frame.
    pub links_added: usize,
}

/// Numbers for the stats overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub thoughts: usize,
    pub particles: usize,
    pub waves: usize,
    pub connections: usize,
    pub zoom: f32,
    pub fps: f32,
    pub users: usize,
    pub running: bool,
}

/// Suggestions and analytics, recomputed when their inputs change.
#[derive(Debug, Clone)]
pub struct Insights {
    pub suggestions: Vec<String>,
    pub analytics: Analytics,
}

pub struct Session<S: SoundSink = TracingSink> {
    pub world: World,
    pub mode: ConnectMode,
    pub input: Input,
    pub clock: Clock,
    pub sounds: CueFilter<S>,
    pub collab: Box<dyn CollabChannel>,
    pub params: PhysicsParams,
    pub ambient: AmbientConfig,
    pub suggestion_config: SuggestionConfig,
    session_count: u32,
    rng: StdRng,
    /// Thought count the related links were last discovered for.
    linked_count: usize,
    insights: Insights,
    insight_key: Option<(usize, u32)>,
}

impl Session<TracingSink> {
    pub fn new(config: &AppConfig, bounds: Vec2) -> Self {
        Self::with_sink(config, bounds, TracingSink, StdRng::from_entropy())
    }
}

impl<S: SoundSink> Session<S> {
    pub fn with_sink(config: &AppConfig, bounds: Vec2, sink: S, rng: StdRng) -> Self {
        let mut world = World::new(bounds, config.layout);
        world.show_connections = config.show_connections;
        let user = crate::collab::LocalUser {
            name: config.user_name.clone(),
            ..Default::default()
        };
        Self {
            world,
            mode: ConnectMode::default(),
            input: Input::new(),
            clock: Clock::new(config.ambient.interval_ms),
            sounds: CueFilter::new(sink, config.sound_enabled),
            collab: Box::new(LoopbackChannel::new(user)),
            params: config.physics,
            ambient: config.ambient,
            suggestion_config: config.suggestions,
            session_count: 1,
            rng,
            linked_count: 0,
            insights: Insights {
                suggestions: Vec::new(),
                analytics: insight::analyze(&[], 1),
            },
            insight_key: None,
        }
    }

    /// Swap the collaboration channel.
    pub fn set_collab(&mut self, channel: Box<dyn CollabChannel>) {
        self.collab = channel;
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    /// Count a new session on top of whatever was restored.
    pub fn begin_session(&mut self) -> u32 {
        self.session_count += 1;
        self.session_count
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle_pause()
    }

    pub fn frame(&mut self, now_ms: u64) -> FrameReport {
        let frame = self.clock.advance(now_ms);
        let mut report = FrameReport::default();

        if frame.step_physics {
            let events = physics::step(&mut self.world, &self.params, now_ms, &mut self.rng);
            self.sounds.emit_events(&events, now_ms);
            report.events = events;
            report.stepped = true;
        }

        for _ in 0..frame.ambient_ticks {
            let bounds = self.world.bounds();
            ambient_tick(
                &mut self.rng,
                &self.ambient,
                bounds,
                &mut self.world.particles,
                &mut self.world.waves,
            );
        }

        report.collab = self.poll_collab(now_ms);
        report.links_added = self.discover_links(now_ms);
        report
    }

    fn poll_collab(&mut self, now_ms: u64) -> Vec<CollabEvent> {
        let events = self.collab.poll(now_ms);
        for event in &events {
            match event {
                CollabEvent::ThoughtReceived(shared) => {
                    self.world
                        .receive_shared(&mut self.rng, &shared.text, &shared.shared_by, now_ms);
                }
                CollabEvent::PeerJoined(name) => {
                    tracing::debug!(%name, "peer joined");
                    self.sounds.emit(SoundCue::ZoneEntered(ZoneKind::Focus), now_ms);
                }
                CollabEvent::PeerLeft(name) => tracing::debug!(%name, "peer left"),
                CollabEvent::StatusChanged(status) => tracing::debug!(?status, "collaboration status"),
            }
        }
        if self.collab.is_connected() {
            self.collab.broadcast_cursor(self.world.mouse);
        }
        events
    }

    fn discover_links(&mut self, now_ms: u64) -> usize {
        let count = self.world.thoughts.len();
        if count == self.linked_count {
            return 0;
        }
        self.linked_count = count;
        if count < 2 {
            return 0;
        }
        let added = insight::related_links(&self.world.thoughts, now_ms)
            .into_iter()
            .filter(|link| self.world.connections.add(link.clone()))
            .count();
        if added > 0 {
            tracing::debug!(added, "related links discovered");
        }
        added
    }

    /// Cached suggestions and analytics, recomputed when the thought count
    /// or session count changed.
    pub fn insights(&mut self, moment: Moment) -> &Insights {
        let key = (self.world.thoughts.len(), self.session_count);
        if self.insight_key != Some(key) {
            self.insight_key = Some(key);
            self.insights = Insights {
                suggestions: insight::suggestions(
                    &self.world.thoughts,
                    &self.suggestion_config,
                    moment,
                    &mut self.rng,
                ),
                analytics: insight::analyze(&self.world.thoughts, self.session_count),
            };
        }
        &self.insights
    }

    pub fn stats(&self) -> Stats {
        Stats {
            thoughts: self.world.thoughts.len(),
            particles: self.world.particles.len(),
            waves: self.world.waves.len(),
            connections: self.world.connections.len(),
            zoom: self.world.camera.zoom(),
            fps: self.clock.fps(),
            users: self.collab.user_count(),
            running: self.clock.is_running(),
        }
    }

    pub fn add_thought(&mut self, text: &str, zone: Option<ZoneKind>, now_ms: u64) -> Option<ThoughtId> {
        let id = self.world.add_thought(&mut self.rng, text, zone, now_ms)?;
        self.sounds.emit(SoundCue::Added, now_ms);
        if let Some(thought) = self.world.thought(id) {
            self.collab.broadcast_thought(thought, now_ms);
        }
        Some(id)
    }

    pub fn delete_thought(&mut self, id: ThoughtId) -> bool {
        let removed = self.world.delete_thought(&mut self.rng, id).is_some();
        if removed {
            self.mode.forget_missing(&self.world.index());
        }
        removed
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.mode.forget_missing(&self.world.index());
    }

    pub fn toggle_connect_mode(&mut self) -> bool {
        self.mode.toggle()
    }

    /// Commit the pending manual connection with a label.
    pub fn complete_connection(&mut self, label: &str, color: Option<Color>, now_ms: u64) -> Option<Connection> {
        let committed = self.mode.complete(label, color, &mut self.world.connections, now_ms)?;
        self.sounds.emit(SoundCue::ConnectionMade, now_ms);
        Some(committed)
    }

    pub fn cancel_connection(&mut self) {
        self.mode.cancel_label();
    }

    pub fn toggle_connections(&mut self) -> bool {
        self.world.show_connections = !self.world.show_connections;
        self.world.show_connections
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sounds.set_enabled(enabled);
    }

    pub fn resize(&mut self, bounds: Vec2) {
        self.world.resize(bounds);
    }

    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K, key: &str) -> Result<(), StoreError> {
        persist::save(store, key, &Snapshot::capture(&self.world, self.session_count))
    }

    /// Restore a saved snapshot. Returns `false` when nothing was saved.
    pub fn load<K: KeyValueStore + ?Sized>(&mut self, store: &K, key: &str) -> Result<bool, StoreError> {
        match persist::load(store, key)? {
            LoadOutcome::Restored(snapshot) => {
                let count = snapshot.apply(&mut self.world);
                self.session_count = count.max(1);
                self.mode.forget_missing(&self.world.index());
                Ok(true)
            }
            LoadOutcome::NothingSaved => Ok(false),
        }
    }

    // Input. Each handler applies what it can and hands every effect back
    // for the host (save requests, label prompts, edit focus).

    fn apply(&mut self, effects: Vec<InputEffect>, now_ms: u64) -> Vec<InputEffect> {
        for effect in &effects {
            match *effect {
                InputEffect::Cue(cue) => {
                    self.sounds.emit(cue, now_ms);
                }
                InputEffect::TogglePause => {
                    self.clock.toggle_pause();
                }
                InputEffect::Delete(id) => {
                    self.delete_thought(id);
                }
                _ => {}
            }
        }
        effects
    }

    pub fn pointer_down(&mut self, button: MouseButton, screen: Vec2, now_ms: u64) -> Vec<InputEffect> {
        let effects = self
            .input
            .pointer_down(&mut self.world, &mut self.mode, button, screen, &mut self.rng);
        self.apply(effects, now_ms)
    }

    pub fn pointer_move(&mut self, screen: Vec2) {
        self.input.pointer_move(&mut self.world, screen, &mut self.rng);
    }

    pub fn pointer_up(&mut self, now_ms: u64) -> Vec<InputEffect> {
        let effects = self.input.pointer_up(&mut self.world, now_ms);
        self.apply(effects, now_ms)
    }

    pub fn double_click(&mut self, screen: Vec2) -> Vec<InputEffect> {
        self.input.double_click(&mut self.world, screen)
    }

    pub fn wheel(&mut self, delta_y: f32) -> Vec<InputEffect> {
        self.input.wheel(&mut self.world, delta_y)
    }

    pub fn key_down(&mut self, key: KeyCode, modifiers: Modifiers, text_focus: bool, now_ms: u64) -> Vec<InputEffect> {
        let effects = self
            .input
            .key_down(&self.world, &mut self.mode, key, modifiers, text_focus);
        self.apply(effects, now_ms)
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.input.key_up(key);
    }

    pub fn touch_start(&mut self, id: u64, screen: Vec2, now_ms: u64) -> Vec<InputEffect> {
        let effects = self
            .input
            .touch
            .start(&mut self.world, &mut self.mode, id, screen, now_ms, &mut self.rng);
        self.apply(effects, now_ms)
    }

    pub fn touch_move(&mut self, id: u64, screen: Vec2) -> Vec<InputEffect> {
        self.input.touch.moved(&mut self.world, id, screen)
    }

    pub fn touch_end(&mut self, id: u64, now_ms: u64) -> Vec<InputEffect> {
        let effects = self.input.touch.end(&mut self.world, id, now_ms);
        self.apply(effects, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{ConnectionStatus, SharedThought, CONNECT_DELAY_MS};
    use crate::connect_mode::ClickOutcome;
    use crate::error::SoundError;
    use crate::persist::MemoryStore;
    use chrono::Weekday;

    #[derive(Default)]
    struct Recorder(Vec<SoundCue>);

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
            self.0.push(cue);
            Ok(())
        }
    }

    fn session() -> Session<Recorder> {
        Session::with_sink(
            &AppConfig::default(),
            Vec2::new(1200.0, 800.0),
            Recorder::default(),
            StdRng::seed_from_u64(11),
        )
    }

    const NOON: Moment = Moment {
        hour: 12,
        weekday: Weekday::Tue,
    };

    #[test]
    fn test_pause_freezes_thoughts_not_effects() {
        let mut s = session();
        let id = s.add_thought("idea", None, 0).unwrap();
        s.frame(0);
        s.toggle_pause();
        let pos = s.world.thought(id).unwrap().pos;
        let particles = s.world.particles.clone();

        let report = s.frame(100);
        assert!(!report.stepped);
        assert_eq!(s.world.thought(id).unwrap().pos, pos);
        assert_ne!(s.world.particles, particles);

        // toggling twice is a no-op
        s.toggle_pause();
        s.toggle_pause();
        assert!(!s.is_running());
    }

    #[test]
    fn test_add_thought_plays_cue() {
        let mut s = session();
        s.add_thought("hello", Some(ZoneKind::Creative), 0).unwrap();
        assert_eq!(s.sounds.sink().0, vec![SoundCue::Added]);
        assert!(s.add_thought("   ", None, 0).is_none());
    }

    #[test]
    fn test_space_key_toggles_run_state() {
        let mut s = session();
        s.key_down(KeyCode::Space, Modifiers::default(), false, 0);
        assert!(!s.is_running());
        s.key_up(KeyCode::Space);
        s.key_down(KeyCode::Space, Modifiers::default(), false, 0);
        assert!(s.is_running());
    }

    #[test]
    fn test_delete_key_removes_selected() {
        let mut s = session();
        let id = s.add_thought("gone", None, 0).unwrap();
        s.world.selected = Some(id);
        s.key_down(KeyCode::Delete, Modifiers::default(), false, 0);
        assert!(s.world.thought(id).is_none());
        assert!(s.world.selected.is_none());
    }

    #[test]
    fn test_manual_connection_flow() {
        let mut s = session();
        let a = s.add_thought("a", None, 0).unwrap();
        let b = s.add_thought("b", None, 0).unwrap();
        s.world.thought_mut(b).unwrap().pos.x -= 300.0;
        let (pa, pb) = (s.world.thought(a).unwrap().pos, s.world.thought(b).unwrap().pos);

        s.toggle_connect_mode();
        s.pointer_down(MouseButton::Left, pa, 0);
        let effects = s.pointer_down(MouseButton::Left, pb, 0);
        assert!(effects.contains(&InputEffect::Connect(ClickOutcome::OpenLabel { from: a, to: b })));

        let c = s.complete_connection("supports", None, 0).unwrap();
        assert!(c.is_manual());
        assert!(s.sounds.sink().0.contains(&SoundCue::ConnectionMade));
    }

    #[test]
    fn test_related_links_follow_thought_count() {
        let mut s = session();
        s.add_thought("project plan", None, 0);
        s.add_thought("team meeting", None, 0);
        let report = s.frame(0);
        assert_eq!(report.links_added, 1);
        assert_eq!(s.frame(16).links_added, 0);
    }

    #[test]
    fn test_inbound_shared_thought() {
        let mut s = session();
        let mut channel = LoopbackChannel::default();
        channel.connect(0);
        channel.inject(SharedThought {
            text: "from afar".into(),
            shared_by: "Alex".into(),
            shared_at: 0,
        });
        s.set_collab(Box::new(channel));

        s.frame(CONNECT_DELAY_MS);
        assert_eq!(s.collab.status(), ConnectionStatus::Connected);
        let t = s.world.thoughts.iter().find(|t| t.text == "from afar").unwrap();
        assert_eq!(t.shared_by.as_deref(), Some("Alex"));
        let center = s.world.bounds() * 0.5;
        assert!((t.pos - center).abs().max_element() <= 100.0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut s = session();
        s.add_thought("keep me", Some(ZoneKind::Focus), 5);
        s.begin_session();
        let mut store = MemoryStore::new();
        s.save(&mut store, "k").unwrap();

        let mut other = session();
        assert!(!other.load(&store, "missing").unwrap());
        assert!(other.load(&store, "k").unwrap());
        assert_eq!(other.world.thoughts, s.world.thoughts);
        assert_eq!(other.session_count(), 2);
    }

    #[test]
    fn test_insights_cache() {
        let mut s = session();
        assert_eq!(s.insights(NOON).analytics.total_thoughts, 0);
        s.add_thought("grateful", None, 0);
        assert_eq!(s.insights(NOON).analytics.total_thoughts, 1);
        assert!(s.insights(NOON).suggestions.len() <= 5);
    }

    #[test]
    fn test_stats() {
        let mut s = session();
        s.add_thought("x", None, 0);
        let stats = s.stats();
        assert_eq!(stats.thoughts, 1);
        assert_eq!(stats.users, 1);
        assert_eq!(stats.zoom, 1.0);
        assert!(stats.running);
    }
}
