//! The simulation state container.
//!
//! One [`World`] per canvas session. It owns every live collection and is
//! passed by reference into the physics step, the input layer and the
//! renderer; nothing in the crate keeps global state.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::camera::Camera;
use crate::connection::{index_thoughts, Connections, ThoughtIndex};
use crate::effects::{Emitter, EnergyWave, Particle};
use crate::thought::{Thought, ThoughtId};
use crate::zone::{self, LayoutConfig, Zone, ZoneKind};

/// Particles spawned when a thought is added.
const CELEBRATION_PARTICLES: usize = 40;
/// Particles in the ring spawned when a thought is deleted.
const EXPLOSION_PARTICLES: usize = 20;
/// Half-width of the scatter box for thoughts received from collaborators.
const SHARED_SCATTER: f32 = 100.0;
/// Keep-out margin from a zone edge when placing new thoughts.
const ZONE_PLACEMENT_MARGIN: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct World {
    pub thoughts: Vec<Thought>,
    pub particles: Vec<Particle>,
    pub waves: Vec<EnergyWave>,
    pub connections: Connections,
    pub zones: Vec<Zone>,
    /// Pointer position in world coordinates.
    pub mouse: Vec2,
    pub camera: Camera,
    /// The one thought under pointer control, if any.
    pub dragged: Option<ThoughtId>,
    pub selected: Option<ThoughtId>,
    pub show_connections: bool,
    bounds: Vec2,
    layout: LayoutConfig,
    next_id: u64,
}

impl World {
    pub fn new(bounds: Vec2, layout: LayoutConfig) -> Self {
        Self {
            thoughts: Vec::new(),
            particles: Vec::new(),
            waves: Vec::new(),
            connections: Connections::new(),
            zones: zone::layout(bounds, &layout),
            mouse: bounds * 0.5,
            camera: Camera::default(),
            dragged: None,
            selected: None,
            show_connections: true,
            bounds,
            layout,
            next_id: 1,
        }
    }

    /// Canvas extents in world units.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Recompute zone geometry for a new canvas size. Thought positions are
    /// left untouched, including a thought that is mid-drag.
    pub fn resize(&mut self, bounds: Vec2) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.zones = zone::layout(bounds, &self.layout);
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.zones = zone::layout(self.bounds, &self.layout);
    }

    pub fn zone(&self, kind: ZoneKind) -> Option<&Zone> {
        zone::find(&self.zones, kind)
    }

    pub fn index(&self) -> ThoughtIndex {
        index_thoughts(&self.thoughts)
    }

    pub fn thought(&self, id: ThoughtId) -> Option<&Thought> {
        self.thoughts.iter().find(|t| t.id == id)
    }

    pub fn thought_mut(&mut self, id: ThoughtId) -> Option<&mut Thought> {
        self.thoughts.iter_mut().find(|t| t.id == id)
    }

    /// Topmost thought within `scale` times its size of `point`.
    pub fn thought_at(&self, point: Vec2, scale: f32) -> Option<ThoughtId> {
        self.thoughts
            .iter()
            .rev()
            .find(|t| t.hit(point, scale))
            .map(|t| t.id)
    }

    fn alloc_id(&mut self) -> ThoughtId {
        let id = ThoughtId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Where a new thought lands: somewhere inside its zone, or right of
    /// center when free.
    fn placement<R: Rng + ?Sized>(&self, rng: &mut R, zone: Option<ZoneKind>) -> Vec2 {
        match zone.and_then(|k| self.zone(k)) {
            Some(z) => {
                let reach = (z.radius - ZONE_PLACEMENT_MARGIN).max(0.0);
                let angle = rng.gen_range(0.0..TAU);
                let dist = if reach > 0.0 { rng.gen_range(0.0..reach) } else { 0.0 };
                z.center + Vec2::from_angle(angle) * dist
            }
            None => Vec2::new(self.bounds.x * 0.65, self.bounds.y * 0.5),
        }
    }

    /// Add a thought from user input. Blank text is ignored.
    pub fn add_thought<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        text: &str,
        zone: Option<ZoneKind>,
        now_ms: u64,
    ) -> Option<ThoughtId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let pos = self.placement(rng, zone);
        let id = self.alloc_id();
        let thought = Thought::spawn(rng, id, text, pos, zone, now_ms);

        Emitter::Celebration {
            position: pos,
            count: CELEBRATION_PARTICLES,
            color: thought.color,
        }
        .emit_into(rng, &mut self.particles);
        self.waves.push(EnergyWave::announce(pos, thought.color));

        tracing::debug!(%id, text, zone = ?zone, "thought added");
        self.thoughts.push(thought);
        Some(id)
    }

    /// Materialize a thought shared by a collaborator near the canvas center.
    pub fn receive_shared<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        text: &str,
        shared_by: &str,
        now_ms: u64,
    ) -> ThoughtId {
        let offset = Vec2::new(
            rng.gen_range(-SHARED_SCATTER..SHARED_SCATTER),
            rng.gen_range(-SHARED_SCATTER..SHARED_SCATTER),
        );
        let pos = self.bounds * 0.5 + offset;
        let id = self.alloc_id();
        let mut thought = Thought::spawn(rng, id, text, pos, None, now_ms);
        thought.shared_by = Some(shared_by.to_string());

        tracing::debug!(%id, text, shared_by, "shared thought received");
        self.thoughts.push(thought);
        id
    }

    /// Remove a thought, with a burst where it stood. Edges that touched it
    /// are pruned immediately.
    pub fn delete_thought<R: Rng + ?Sized>(&mut self, rng: &mut R, id: ThoughtId) -> Option<Thought> {
        let pos = self.thoughts.iter().position(|t| t.id == id)?;
        let removed = self.thoughts.remove(pos);

        Emitter::Explosion {
            position: removed.pos,
            count: EXPLOSION_PARTICLES,
            color: Some(removed.color),
        }
        .emit_into(rng, &mut self.particles);

        if self.dragged == Some(id) {
            self.dragged = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        let index = self.index();
        self.connections.prune(&self.thoughts, &index);

        tracing::debug!(%id, text = %removed.text, "thought deleted");
        Some(removed)
    }

    /// Empty every live collection.
    pub fn clear(&mut self) {
        self.thoughts.clear();
        self.particles.clear();
        self.waves.clear();
        self.connections.clear();
        self.dragged = None;
        self.selected = None;
        tracing::debug!("world cleared");
    }

    /// Replace thoughts and connections with restored ones. Effects keep
    /// running; drag and selection are dropped.
    pub fn restore(&mut self, thoughts: Vec<Thought>, connections: Connections) {
        self.next_id = thoughts.iter().map(|t| t.id.0).max().map_or(1, |max| max + 1);
        self.thoughts = thoughts;
        self.connections = connections;
        self.dragged = None;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, ConnectionKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        World::new(Vec2::new(1400.0, 900.0), LayoutConfig::default())
    }

    #[test]
    fn test_add_free_thought() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut w = world();
        let id = w.add_thought(&mut rng, "  hello  ", None, 5).unwrap();
        let t = w.thought(id).unwrap();
        assert_eq!(t.text, "hello");
        assert!(t.pos.distance(Vec2::new(910.0, 450.0)) < 1e-3);
        assert_eq!(w.particles.len(), CELEBRATION_PARTICLES);
        assert_eq!(w.waves.len(), 1);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut w = world();
        assert!(w.add_thought(&mut rng, "   ", None, 0).is_none());
        assert!(w.thoughts.is_empty());
    }

    #[test]
    fn test_zone_placement_stays_inside() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut w = world();
        for _ in 0..20 {
            let id = w.add_thought(&mut rng, "focus", Some(ZoneKind::Focus), 0).unwrap();
            let z = *w.zone(ZoneKind::Focus).unwrap();
            let t = w.thought(id).unwrap();
            assert!(t.pos.distance(z.center) < z.radius - ZONE_PLACEMENT_MARGIN + 1e-3);
        }
    }

    #[test]
    fn test_ids_are_unique_and_restore_continues() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut w = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        let b = w.add_thought(&mut rng, "b", None, 0).unwrap();
        assert_ne!(a, b);

        let saved = w.thoughts.clone();
        w.clear();
        w.restore(saved, Connections::new());
        let c = w.add_thought(&mut rng, "c", None, 0).unwrap();
        assert!(c.0 > b.0);
    }

    #[test]
    fn test_delete_clears_references() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut w = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        let b = w.add_thought(&mut rng, "b", None, 0).unwrap();
        w.connections.add(Connection::new(a, b, ConnectionKind::Manual, 0));
        w.selected = Some(a);
        w.dragged = Some(a);

        assert!(w.delete_thought(&mut rng, a).is_some());
        assert!(w.selected.is_none());
        assert!(w.dragged.is_none());
        assert!(w.connections.is_empty());
        assert!(w.delete_thought(&mut rng, a).is_none());
    }

    #[test]
    fn test_receive_shared_near_center() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut w = world();
        let id = w.receive_shared(&mut rng, "hi", "Alex", 0);
        let t = w.thought(id).unwrap();
        assert_eq!(t.shared_by.as_deref(), Some("Alex"));
        let off = t.pos - w.bounds() * 0.5;
        assert!(off.x.abs() <= SHARED_SCATTER && off.y.abs() <= SHARED_SCATTER);
    }

    #[test]
    fn test_thought_at_prefers_topmost() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut w = world();
        let a = w.add_thought(&mut rng, "a", None, 0).unwrap();
        let b = w.add_thought(&mut rng, "b", None, 0).unwrap();
        let p = w.thought(a).unwrap().pos;
        assert_eq!(w.thought_at(p, 1.0), Some(b));
        assert_eq!(w.thought_at(Vec2::new(-500.0, -500.0), 1.0), None);
    }
}
