//! The thought physics step.
//!
//! One call to [`step`] advances every thought by one implicit tick. The
//! caller fixes the tick rate; there is no `dt`. Each tick runs, in order:
//!
//! 1. per-thought forces (target attraction, antonym pull, synonym push,
//!    chaos jitter, friction), integration, zone return and glow decay
//! 2. pairwise collision resolution ([`resolve_collisions`])
//! 3. canvas boundary clamping ([`clamp_to_bounds`])
//! 4. connection pruning
//!
//! Semantic forces read a snapshot of positions and `break_bond` counters
//! taken at the start of the tick, so the outcome does not depend on the
//! order of the thought list.
//!
//! Side effects that belong to presentation (sounds) are returned as
//! [`SimEvent`]s rather than performed here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::connection::{index_thoughts, Connection, ConnectionKind};
use crate::effects::{Emitter, Particle};
use crate::relations::{relation_lower, Relation};
use crate::thought::{Motion, Thought, ThoughtId};
use crate::vector;
use crate::world::World;
use crate::zone::{self, ZoneKind};

/// No target pull inside this distance.
const TARGET_DEAD_ZONE: f32 = 10.0;
const TARGET_STRENGTH: f32 = 0.1;
const RETURN_TARGET_STRENGTH: f32 = 0.05;
/// Gravity used while a released thought lingers before returning.
const LINGER_GRAVITY: f32 = 0.2;
const LINGER_CHAOS_FACTOR: f32 = 1.5;
const RETURN_GRAVITY_FACTOR: f32 = 0.3;
const RETURN_FRICTION: f32 = 0.99;

const ANTONYM_MIN_DISTANCE: f32 = 60.0;
const ANTONYM_MAX_DISTANCE: f32 = 300.0;
const ANTONYM_STRENGTH: f32 = 0.5;
/// Antonyms closer than this get an edge.
const ANTONYM_LINK_DISTANCE: f32 = 150.0;
const ANTONYM_GLOW: f32 = 0.6;
/// Extra damping on a returning thought that feels an antonym.
const ANTONYM_RETURN_DAMPING: f32 = 0.95;

const SYNONYM_MAX_DISTANCE: f32 = 200.0;
const SYNONYM_STRENGTH: f32 = 0.5;

const GLOW_DECAY: f32 = 0.02;

const BOUNCE: f32 = 0.8;
const RETURN_BOUNCE: f32 = 0.6;
const COLLISION_GLOW: f32 = 0.5;
const COLLISION_PARTICLES: usize = 5;
/// Relative speed after a bounce above which a collision is audible.
const COLLISION_SOUND_SPEED: f32 = 1.0;
/// Relative speed that maps to full collision intensity.
const COLLISION_FULL_SPEED: f32 = 10.0;

const WALL_DAMPING: f32 = 0.7;
const WALL_GLOW: f32 = 0.3;
/// Post-clamp speed above which a wall hit is reported.
const WALL_SOUND_SPEED: f32 = 2.0;

const ZONE_WALL_DAMPING: f32 = 0.5;

/// Global tunables for the step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Pull of free thoughts towards the pointer.
    pub gravity: f32,
    /// Jitter injected into free thoughts.
    pub chaos: f32,
    /// Per-tick velocity retention in `(0, 1)`.
    pub friction: f32,
    /// Multiplier on integration.
    pub time_scale: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            chaos: 0.1,
            friction: 0.98,
            time_scale: 1.0,
        }
    }
}

/// Something happened during a tick that a listener may care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Two thoughts bounced off each other.
    Collision {
        a: ThoughtId,
        b: ThoughtId,
        at: Vec2,
        /// Relative speed after the bounce mapped to `[0, 1]`.
        intensity: f32,
    },
    /// A new antonym edge formed.
    Attraction { a: ThoughtId, b: ThoughtId },
    /// A thought hit the canvas edge hard.
    Boundary { id: ThoughtId, speed: f32 },
    /// A returning thought arrived home.
    ZoneReached { id: ThoughtId, zone: ZoneKind },
}

/// Target, gravity, chaos and whether the thought is gliding home.
struct Drive {
    target: Vec2,
    gravity: f32,
    chaos: f32,
    returning: bool,
}

fn drive_for(thought: &mut Thought, world_zones: &[zone::Zone], mouse: Vec2, params: &PhysicsParams, now_ms: u64) -> Drive {
    let home = thought.motion.zone().and_then(|k| zone::find(world_zones, k)).copied();
    let free = Drive {
        target: mouse,
        gravity: params.gravity,
        chaos: params.chaos,
        returning: false,
    };
    let Some(home) = home else {
        return free;
    };

    match thought.motion {
        Motion::ReturningWithDelay { zone, delay, since } => {
            let elapsed = now_ms.saturating_sub(since) as f32 / 1000.0;
            if elapsed >= delay {
                thought.motion = Motion::Returning { zone };
                Drive {
                    target: home.center,
                    gravity: home.gravity() * RETURN_GRAVITY_FACTOR,
                    chaos: home.chaos(),
                    returning: true,
                }
            } else {
                Drive {
                    target: thought.pos,
                    gravity: LINGER_GRAVITY,
                    chaos: home.chaos() * LINGER_CHAOS_FACTOR,
                    returning: false,
                }
            }
        }
        Motion::Returning { .. } => Drive {
            target: home.center,
            gravity: home.gravity() * RETURN_GRAVITY_FACTOR,
            chaos: home.chaos(),
            returning: true,
        },
        Motion::ZoneBound { .. } => Drive {
            target: home.center,
            gravity: home.gravity(),
            chaos: home.chaos(),
            returning: false,
        },
        Motion::Free => free,
    }
}

/// Advance the world by one tick.
pub fn step<R: Rng + ?Sized>(world: &mut World, params: &PhysicsParams, now_ms: u64, rng: &mut R) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let n = world.thoughts.len();

    let positions: Vec<Vec2> = world.thoughts.iter().map(|t| t.pos).collect();
    let bonds: Vec<u32> = world.thoughts.iter().map(|t| t.break_bond).collect();
    let texts: Vec<String> = world.thoughts.iter().map(|t| t.text.to_lowercase()).collect();
    let ids: Vec<ThoughtId> = world.thoughts.iter().map(|t| t.id).collect();
    let mut lit = vec![false; n];
    let mut links: Vec<Connection> = Vec::new();

    for i in 0..n {
        let thought = &mut world.thoughts[i];

        if world.dragged == Some(thought.id) {
            thought.break_bond = thought.break_bond.saturating_sub(1);
            continue;
        }

        let drive = drive_for(thought, &world.zones, world.mouse, params, now_ms);

        let to_target = vector::between(thought.pos, drive.target);
        if to_target.length() > TARGET_DEAD_ZONE {
            let strength = if drive.returning {
                RETURN_TARGET_STRENGTH
            } else {
                TARGET_STRENGTH
            };
            thought.vel += vector::normalize(to_target) * drive.gravity * strength;
        }

        if bonds[i] == 0 {
            for j in 0..n {
                if j == i || bonds[j] > 0 {
                    continue;
                }
                let Some(relation) = relation_lower(&texts[i], &texts[j]) else {
                    continue;
                };
                let d = vector::distance(positions[i], positions[j]);

                match relation {
                    Relation::Antonym if d > ANTONYM_MIN_DISTANCE && d < ANTONYM_MAX_DISTANCE => {
                        let pull = ANTONYM_STRENGTH * (1.0 - d / ANTONYM_MAX_DISTANCE);
                        thought.vel += vector::direction(positions[i], positions[j]) * pull;
                        lit[i] = true;
                        lit[j] = true;
                        if drive.returning {
                            thought.vel *= ANTONYM_RETURN_DAMPING;
                        }

                        let other = ids[j];
                        if d < ANTONYM_LINK_DISTANCE
                            && !world.connections.contains_pair(thought.id, other)
                            && !links.iter().any(|c| c.joins(thought.id, other))
                        {
                            let mut link = Connection::new(thought.id, other, ConnectionKind::Antonym, now_ms);
                            link.strength = 1.0 - d / ANTONYM_MAX_DISTANCE;
                            links.push(link);
                            events.push(SimEvent::Attraction { a: thought.id, b: other });
                        }
                    }
                    Relation::Synonym if d > 0.0 && d < SYNONYM_MAX_DISTANCE => {
                        let push = SYNONYM_STRENGTH * (1.0 - d / SYNONYM_MAX_DISTANCE);
                        thought.vel += vector::direction(positions[j], positions[i]) * push;
                    }
                    _ => {}
                }
            }
        } else {
            thought.break_bond -= 1;
        }

        thought.vel += vector::jitter(rng, drive.chaos * 0.5);

        let friction = if drive.returning {
            RETURN_FRICTION
        } else {
            params.friction
        };
        thought.vel *= friction;

        thought.pos += thought.vel * params.time_scale;

        if let Motion::Returning { zone: kind } = thought.motion {
            if let Some(home) = zone::find(&world.zones, kind) {
                let d = vector::distance(thought.pos, home.center);
                if d < home.radius * 0.5 {
                    thought.motion = Motion::ZoneBound { zone: kind };
                    events.push(SimEvent::ZoneReached { id: thought.id, zone: kind });
                } else {
                    let wall = (home.radius - thought.size).max(0.0);
                    if d > wall {
                        let inward = vector::direction(thought.pos, home.center);
                        thought.pos = home.center - inward * wall;
                        thought.vel *= -ZONE_WALL_DAMPING;
                    }
                }
            }
        }

        if thought.glow > 0.0 {
            thought.glow = (thought.glow - GLOW_DECAY).max(0.0);
        }
    }

    for (thought, lit) in world.thoughts.iter_mut().zip(&lit) {
        if *lit {
            thought.glow = ANTONYM_GLOW;
        }
    }

    for link in links {
        if world.connections.add(link.clone()) {
            tracing::debug!(from = %link.from, to = %link.to, "antonym connection formed");
        }
    }

    let bounds = world.bounds();
    events.extend(resolve_collisions(&mut world.thoughts, &mut world.particles, rng));
    events.extend(clamp_to_bounds(&mut world.thoughts, bounds));

    let index = index_thoughts(&world.thoughts);
    world.connections.prune(&world.thoughts, &index);

    events
}

/// Push overlapping thoughts apart and exchange their velocities.
pub fn resolve_collisions<R: Rng + ?Sized>(
    thoughts: &mut [Thought],
    particles: &mut Vec<Particle>,
    rng: &mut R,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let n = thoughts.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = thoughts.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let d = vector::distance(a.pos, b.pos);
            let reach = a.size + b.size;
            if d >= reach || d <= 0.0 {
                continue;
            }

            let half = (reach - d) * 0.5;
            let axis = vector::direction(b.pos, a.pos);
            a.pos += axis * half;
            b.pos -= axis * half;

            let bounce = if a.motion.is_returning() || b.motion.is_returning() {
                RETURN_BOUNCE
            } else {
                BOUNCE
            };
            let va = a.vel;
            a.vel = b.vel * bounce;
            b.vel = va * bounce;

            a.glow = COLLISION_GLOW;
            b.glow = COLLISION_GLOW;

            let contact = (a.pos + b.pos) * 0.5;
            Emitter::Scatter {
                position: contact,
                count: COLLISION_PARTICLES,
                color: Some(a.color),
            }
            .emit_into(rng, particles);

            let relative = (a.vel - b.vel).length();
            if relative > COLLISION_SOUND_SPEED {
                events.push(SimEvent::Collision {
                    a: a.id,
                    b: b.id,
                    at: contact,
                    intensity: (relative / COLLISION_FULL_SPEED).min(1.0),
                });
            }
        }
    }

    events
}

/// Keep every thought fully inside the canvas, bouncing off the edges.
pub fn clamp_to_bounds(thoughts: &mut [Thought], bounds: Vec2) -> Vec<SimEvent> {
    let mut events = Vec::new();

    for t in thoughts.iter_mut() {
        let mut hit = false;

        if t.pos.x - t.size < 0.0 {
            t.pos.x = t.size;
            t.vel.x *= -WALL_DAMPING;
            hit = true;
        }
        if t.pos.x + t.size > bounds.x {
            t.pos.x = bounds.x - t.size;
            t.vel.x *= -WALL_DAMPING;
            hit = true;
        }
        if t.pos.y - t.size < 0.0 {
            t.pos.y = t.size;
            t.vel.y *= -WALL_DAMPING;
            hit = true;
        }
        if t.pos.y + t.size > bounds.y {
            t.pos.y = bounds.y - t.size;
            t.vel.y *= -WALL_DAMPING;
            hit = true;
        }

        if hit {
            t.glow = WALL_GLOW;
            let speed = t.speed();
            if speed > WALL_SOUND_SPEED {
                events.push(SimEvent::Boundary { id: t.id, speed });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::zone::LayoutConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calm() -> PhysicsParams {
        PhysicsParams {
            gravity: 0.0,
            chaos: 0.0,
            ..Default::default()
        }
    }

    fn body(id: u64, text: &str, pos: Vec2) -> Thought {
        Thought {
            id: ThoughtId(id),
            pos,
            vel: Vec2::ZERO,
            text: text.into(),
            size: 30.0,
            color: Color::WHITE,
            motion: Motion::Free,
            glow: 0.0,
            break_bond: 0,
            created_at: 0,
            shared_by: None,
        }
    }

    fn world_with(thoughts: Vec<Thought>) -> World {
        let mut w = World::new(Vec2::new(1600.0, 1000.0), LayoutConfig::default());
        w.thoughts = thoughts;
        w
    }

    #[test]
    fn test_target_dead_zone() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut w = world_with(vec![body(1, "x", Vec2::new(500.0, 500.0))]);
        w.mouse = Vec2::new(505.0, 500.0);
        let params = PhysicsParams {
            chaos: 0.0,
            ..Default::default()
        };
        step(&mut w, &params, 0, &mut rng);
        assert_eq!(w.thoughts[0].vel, Vec2::ZERO);

        w.mouse = Vec2::new(600.0, 500.0);
        step(&mut w, &params, 0, &mut rng);
        assert!(w.thoughts[0].vel.x > 0.0);
    }

    #[test]
    fn test_antonyms_link_when_close() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut w = world_with(vec![
            body(1, "sad", Vec2::new(500.0, 500.0)),
            body(2, "happy", Vec2::new(620.0, 500.0)),
        ]);
        let events = step(&mut w, &calm(), 0, &mut rng);
        assert_eq!(w.connections.len(), 1);
        assert_eq!(w.connections.as_slice()[0].kind, ConnectionKind::Antonym);
        assert_eq!(
            events.iter().filter(|e| matches!(e, SimEvent::Attraction { .. })).count(),
            1
        );
        assert!((w.thoughts[0].glow - ANTONYM_GLOW).abs() < 1e-6);

        // no duplicate on the next tick
        step(&mut w, &calm(), 0, &mut rng);
        assert_eq!(w.connections.len(), 1);
    }

    #[test]
    fn test_antonyms_ignore_each_other_when_too_close() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = body(1, "dark", Vec2::new(500.0, 500.0));
        let mut b = body(2, "light", Vec2::new(550.0, 500.0));
        a.size = 10.0;
        b.size = 10.0;
        let mut w = world_with(vec![a, b]);
        step(&mut w, &calm(), 0, &mut rng);
        assert_eq!(w.thoughts[0].vel, Vec2::ZERO);
        assert!(w.connections.is_empty());
    }

    #[test]
    fn test_dragged_thought_only_decrements_bond() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = body(1, "sad", Vec2::new(500.0, 500.0));
        t.break_bond = 3;
        t.glow = 1.0;
        let mut w = world_with(vec![t, body(2, "happy", Vec2::new(600.0, 500.0))]);
        w.dragged = Some(ThoughtId(1));
        step(&mut w, &calm(), 0, &mut rng);
        assert_eq!(w.thoughts[0].break_bond, 2);
        assert_eq!(w.thoughts[0].pos, Vec2::new(500.0, 500.0));
        assert_eq!(w.thoughts[0].glow, 1.0);
    }

    #[test]
    fn test_delay_then_return_then_home() {
        let mut rng = StdRng::seed_from_u64(0);
        let w0 = world_with(vec![]);
        let home = *w0.zone(ZoneKind::Relax).unwrap();

        let mut t = body(1, "rest", home.center + Vec2::new(home.radius * 0.4, 0.0));
        t.motion = Motion::ReturningWithDelay {
            zone: ZoneKind::Relax,
            delay: 5.0,
            since: 1_000,
        };
        let mut w = world_with(vec![t]);
        let params = calm();

        step(&mut w, &params, 5_999, &mut rng);
        assert!(matches!(w.thoughts[0].motion, Motion::ReturningWithDelay { .. }));

        let events = step(&mut w, &params, 6_000, &mut rng);
        assert_eq!(w.thoughts[0].motion, Motion::ZoneBound { zone: ZoneKind::Relax });
        assert!(events.contains(&SimEvent::ZoneReached {
            id: ThoughtId(1),
            zone: ZoneKind::Relax
        }));
    }

    #[test]
    fn test_returning_bounces_off_zone_wall_from_inside() {
        let mut rng = StdRng::seed_from_u64(0);
        let w0 = world_with(vec![]);
        let home = *w0.zone(ZoneKind::Creative).unwrap();
        let wall = home.radius - 30.0;

        let mut t = body(1, "x", home.center + Vec2::new(wall - 1.0, 0.0));
        t.vel = Vec2::new(20.0, 0.0);
        t.motion = Motion::Returning { zone: ZoneKind::Creative };
        let mut w = world_with(vec![t]);
        step(&mut w, &calm(), 0, &mut rng);

        let t = &w.thoughts[0];
        assert!((t.pos.distance(home.center) - wall).abs() < 1e-3);
        assert!(t.vel.x < 0.0);
    }

    #[test]
    fn test_returning_from_far_away_snaps_onto_zone_wall() {
        let mut rng = StdRng::seed_from_u64(0);
        let w0 = world_with(vec![]);
        let home = *w0.zone(ZoneKind::Creative).unwrap();

        let mut t = body(1, "x", home.center + Vec2::new(home.radius + 100.0, 0.0));
        t.size = 40.0;
        t.motion = Motion::Returning { zone: ZoneKind::Creative };
        let mut w = world_with(vec![t]);
        step(&mut w, &calm(), 0, &mut rng);

        let t = &w.thoughts[0];
        let wall = home.radius - 40.0;
        assert!((t.pos.distance(home.center) - wall).abs() < 1e-3);
        assert_eq!(t.motion, Motion::Returning { zone: ZoneKind::Creative });
    }

    #[test]
    fn test_collision_swaps_and_damps_velocity() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = body(1, "a", Vec2::new(100.0, 100.0));
        let mut b = body(2, "b", Vec2::new(150.0, 100.0));
        a.vel = Vec2::new(5.0, 0.0);
        b.vel = Vec2::new(-1.0, 0.0);
        let mut thoughts = vec![a, b];
        let mut particles = Vec::new();
        let events = resolve_collisions(&mut thoughts, &mut particles, &mut rng);

        assert_eq!(thoughts[0].vel, Vec2::new(-0.8, 0.0));
        assert_eq!(thoughts[1].vel, Vec2::new(4.0, 0.0));
        assert_eq!(particles.len(), COLLISION_PARTICLES);
        assert_eq!(thoughts[0].glow, COLLISION_GLOW);
        assert!(matches!(events[0], SimEvent::Collision { .. }));
    }

    #[test]
    fn test_coincident_centers_are_left_alone() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut thoughts = vec![body(1, "a", Vec2::splat(100.0)), body(2, "b", Vec2::splat(100.0))];
        let mut particles = Vec::new();
        resolve_collisions(&mut thoughts, &mut particles, &mut rng);
        assert!(thoughts[0].pos.is_finite());
        assert_eq!(thoughts[0].pos, thoughts[1].pos);
    }

    #[test]
    fn test_clamp_reports_fast_hits() {
        let mut t = body(1, "a", Vec2::new(-5.0, 50.0));
        t.vel = Vec2::new(-10.0, 0.0);
        let mut thoughts = vec![t];
        let events = clamp_to_bounds(&mut thoughts, Vec2::new(200.0, 200.0));
        assert_eq!(thoughts[0].pos.x, 30.0);
        assert_eq!(thoughts[0].vel.x, 7.0);
        assert_eq!(thoughts[0].glow, WALL_GLOW);
        assert!(matches!(events[0], SimEvent::Boundary { .. }));

        thoughts[0].vel = Vec2::new(-1.0, 0.0);
        thoughts[0].pos.x = 10.0;
        assert!(clamp_to_bounds(&mut thoughts, Vec2::new(200.0, 200.0)).is_empty());
    }
}
