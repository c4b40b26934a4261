//! End-to-end flows through a [`Session`]: dragging, zone return, pause,
//! zoom and persistence.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thoughtspace::camera::{MAX_ZOOM, MIN_ZOOM};
use thoughtspace::error::SoundError;
use thoughtspace::prelude::*;
use thoughtspace::thought::Motion;

const BOUNDS: Vec2 = Vec2::new(1200.0, 800.0);

#[derive(Default)]
struct Silent(Vec<SoundCue>);

impl SoundSink for Silent {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        self.0.push(cue);
        Ok(())
    }
}

fn session() -> Session<Silent> {
    let mut config = AppConfig::default();
    config.physics.chaos = 0.0;
    Session::with_sink(&config, BOUNDS, Silent::default(), StdRng::seed_from_u64(2024))
}

#[test]
fn test_dragged_zone_thought_waits_then_returns_home() {
    let mut s = session();
    let id = s.add_thought("deep work", Some(ZoneKind::Focus), 0).unwrap();
    let home = *s.world.zone(ZoneKind::Focus).unwrap();
    let start = s.world.thought(id).unwrap().pos;

    s.pointer_down(MouseButton::Left, start, 0);
    assert_eq!(s.world.dragged, Some(id));
    let away = Vec2::new(120.0, 680.0);
    s.pointer_move(away);
    s.pointer_move(away);
    s.pointer_up(0);
    assert_eq!(s.world.dragged, None);

    let Motion::ReturningWithDelay { delay, .. } = s.world.thought(id).unwrap().motion else {
        panic!("released zone thought should wait before returning");
    };
    assert!((5.0..=10.0).contains(&delay));

    let mut now = 0;
    while (now as f32) < delay * 1000.0 - 100.0 {
        now += 16;
        s.frame(now);
    }
    assert!(matches!(s.world.thought(id).unwrap().motion, Motion::ReturningWithDelay { .. }));

    for _ in 0..2500 {
        now += 16;
        s.frame(now);
        if matches!(s.world.thought(id).unwrap().motion, Motion::ZoneBound { .. }) {
            break;
        }
    }
    let t = s.world.thought(id).unwrap();
    assert_eq!(t.motion, Motion::ZoneBound { zone: ZoneKind::Focus });
    assert!(t.pos.distance(home.center) < home.radius);
    assert!(s.sounds.sink().0.contains(&SoundCue::ZoneEntered(ZoneKind::Focus)));
}

#[test]
fn test_pause_is_idempotent_and_freezes_bodies() {
    let mut s = session();
    s.add_thought("sad", None, 0);
    s.add_thought("happy", None, 0);
    s.frame(0);

    s.toggle_pause();
    let frozen: Vec<Vec2> = s.world.thoughts.iter().map(|t| t.pos).collect();
    for i in 1..=20 {
        s.frame(i * 16);
    }
    s.toggle_pause();
    s.toggle_pause();
    s.frame(400);

    assert!(!s.is_running());
    let after: Vec<Vec2> = s.world.thoughts.iter().map(|t| t.pos).collect();
    assert_eq!(frozen, after);
}

#[test]
fn test_zoom_never_leaves_bounds() {
    let mut s = session();
    for _ in 0..50 {
        s.wheel(-120.0);
        assert!(s.world.camera.zoom() <= MAX_ZOOM);
    }
    assert_eq!(s.world.camera.zoom(), MAX_ZOOM);
    for _ in 0..50 {
        s.wheel(120.0);
        assert!(s.world.camera.zoom() >= MIN_ZOOM);
    }
    assert_eq!(s.world.camera.zoom(), MIN_ZOOM);

    for _ in 0..20 {
        s.world.camera.zoom_in();
    }
    assert_eq!(s.world.camera.zoom(), MAX_ZOOM);

    // spread two fingers far apart on empty canvas
    s.touch_start(1, Vec2::new(590.0, 100.0), 0);
    s.touch_start(2, Vec2::new(610.0, 100.0), 0);
    s.touch_move(2, Vec2::new(1190.0, 100.0));
    assert!(s.world.camera.zoom() <= MAX_ZOOM);
    s.touch_move(2, Vec2::new(591.0, 100.0));
    assert!(s.world.camera.zoom() >= MIN_ZOOM);
}

#[test]
fn test_snapshot_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());

    let mut s = session();
    let a = s.add_thought("love", Some(ZoneKind::Relax), 1).unwrap();
    let b = s.add_thought("hate", Some(ZoneKind::Creative), 2).unwrap();
    s.toggle_connect_mode();
    s.mode.click(a, &s.world.connections);
    s.mode.click(b, &s.world.connections);
    s.complete_connection("contradicts", None, 3).unwrap();
    for i in 0..10 {
        s.frame(i * 16);
    }
    s.save(&mut store, "thoughtspace.state").unwrap();

    let mut restored = session();
    assert!(restored.load(&store, "thoughtspace.state").unwrap());
    assert_eq!(restored.world.thoughts, s.world.thoughts);
    assert_eq!(restored.world.connections, s.world.connections);
    let manual = restored.world.connections.iter().find(|c| c.is_manual()).unwrap();
    assert_eq!(manual.label, "contradicts");
}

#[test]
fn test_loading_nothing_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let mut s = session();
    s.add_thought("still here", None, 0);

    assert!(!s.load(&store, "thoughtspace.state").unwrap());
    assert_eq!(s.world.thoughts.len(), 1);
}
