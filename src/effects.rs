//! Decorative particles and energy waves.
//!
//! Effects never influence thoughts. They are spawned by [`Emitter`]s at
//! interesting moments (collisions, grabs, drags, new thoughts, deletes) and
//! by the ambient ticker, then advanced and culled by [`step_effects`].
//!
//! | Emitter | Used for |
//! |---------|----------|
//! | [`Emitter::Scatter`] | collision sparks, drag trails, grab feedback |
//! | [`Emitter::Explosion`] | deleting a thought |
//! | [`Emitter::Celebration`] | adding a thought |
//! | [`Emitter::Ambient`] | background dust |

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::vector;

/// Downward drift applied to particles each tick.
const PARTICLE_GRAVITY: f32 = 0.03;
/// Per-tick particle velocity damping.
const PARTICLE_FRICTION: f32 = 0.99;
/// Life lost per tick.
const PARTICLE_FADE: f32 = 0.015;

/// Short-lived visual decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in `[0, 1]`; removed once it reaches zero.
    pub life: f32,
    pub size: f32,
    pub color: Color,
    pub glow: f32,
}

impl Particle {
    /// Advance one tick. Returns `false` once the particle has died.
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.vel *= PARTICLE_FRICTION;
        self.life -= PARTICLE_FADE;
        self.glow = self.life.max(0.0);
        self.life > 0.0
    }
}

/// An expanding ring.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyWave {
    pub origin: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub speed: f32,
    pub alpha: f32,
    pub color: Color,
}

impl EnergyWave {
    /// Ring spawned when a thought is added.
    pub fn announce(origin: Vec2, color: Color) -> Self {
        Self {
            origin,
            radius: 20.0,
            max_radius: 400.0,
            speed: 4.0,
            alpha: 1.0,
            color,
        }
    }

    /// Ambient ring at a random spot in the canvas.
    pub fn ambient<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> Self {
        Self {
            origin: random_point(rng, bounds),
            radius: 10.0,
            max_radius: rng.gen_range(150.0..350.0),
            speed: rng.gen_range(1.0..3.0),
            alpha: 0.6,
            color: Color::random_hue(rng, 0.7, 0.6),
        }
    }

    /// Advance one tick. Returns `false` once fully expanded.
    pub fn update(&mut self) -> bool {
        self.radius += self.speed;
        self.alpha = (1.0 - self.radius / self.max_radius).max(0.0);
        self.radius < self.max_radius
    }
}

fn random_point<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..bounds.x.max(1.0)),
        rng.gen_range(0.0..bounds.y.max(1.0)),
    )
}

/// Particle spawn patterns.
#[derive(Debug, Clone, PartialEq)]
pub enum Emitter {
    /// Random spray around a point.
    Scatter {
        position: Vec2,
        count: usize,
        /// Particle color; a random cool blue when `None`.
        color: Option<Color>,
    },
    /// Evenly spaced ring of fast particles.
    Explosion {
        position: Vec2,
        count: usize,
        color: Option<Color>,
    },
    /// Large, fast spray in a single color.
    Celebration {
        position: Vec2,
        count: usize,
        color: Color,
    },
    /// Faint dust anywhere in the canvas.
    Ambient { bounds: Vec2, count: usize },
}

impl Emitter {
    /// Spawn this emitter's particles into `out`.
    pub fn emit_into<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<Particle>) {
        match *self {
            Emitter::Scatter { position, count, color } => {
                out.extend((0..count).map(|_| Particle {
                    pos: position,
                    vel: vector::jitter(rng, 2.0),
                    life: 1.0,
                    size: rng.gen_range(3.0..9.0),
                    color: color.unwrap_or_else(|| Color::hsl(rng.gen_range(200.0..260.0), 0.8, 0.65)),
                    glow: rng.gen_range(0.5..1.3),
                }));
            }
            Emitter::Explosion { position, count, color } => {
                let n = count.max(1) as f32;
                out.extend((0..count).map(|i| {
                    let angle = TAU * i as f32 / n;
                    let speed = rng.gen_range(3.0..8.0);
                    Particle {
                        pos: position,
                        vel: Vec2::from_angle(angle) * speed,
                        life: 1.0,
                        size: rng.gen_range(3.0..9.0),
                        color: color.unwrap_or_else(|| Color::random_hue(rng, 0.8, 0.65)),
                        glow: 1.0,
                    }
                }));
            }
            Emitter::Celebration { position, count, color } => {
                out.extend((0..count).map(|_| Particle {
                    pos: position,
                    vel: vector::jitter(rng, 5.0),
                    life: 1.0,
                    size: rng.gen_range(4.0..12.0),
                    color,
                    glow: 1.0,
                }));
            }
            Emitter::Ambient { bounds, count } => {
                out.extend((0..count).map(|_| Particle {
                    pos: random_point(rng, bounds),
                    vel: vector::jitter(rng, 0.25),
                    life: rng.gen_range(0.4..1.2),
                    size: rng.gen_range(2.0..6.0),
                    color: Color::WHITE.with_alpha(rng.gen_range(0.3..1.0)),
                    glow: 0.5,
                }));
            }
        }
    }

    pub fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        let mut out = Vec::new();
        self.emit_into(rng, &mut out);
        out
    }
}

/// Ambient ticker settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Ticker period in milliseconds.
    pub interval_ms: u64,
    /// Chance per tick of one ambient particle.
    pub particle_chance: f64,
    /// Chance per tick of one ambient wave.
    pub wave_chance: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            interval_ms: 33,
            particle_chance: 0.5,
            wave_chance: 0.1,
        }
    }
}

/// Advance every particle and wave by one tick, dropping the finished ones.
pub fn step_effects(particles: &mut Vec<Particle>, waves: &mut Vec<EnergyWave>) {
    particles.retain_mut(Particle::update);
    waves.retain_mut(EnergyWave::update);
}

/// One ambient tick: advance effects, then maybe spawn new dust and a wave.
pub fn ambient_tick<R: Rng + ?Sized>(
    rng: &mut R,
    config: &AmbientConfig,
    bounds: Vec2,
    particles: &mut Vec<Particle>,
    waves: &mut Vec<EnergyWave>,
) {
    step_effects(particles, waves);

    if rng.gen_bool(config.particle_chance.clamp(0.0, 1.0)) {
        Emitter::Ambient { bounds, count: 1 }.emit_into(rng, particles);
    }
    if rng.gen_bool(config.wave_chance.clamp(0.0, 1.0)) {
        waves.push(EnergyWave::ambient(rng, bounds));
    }
}
