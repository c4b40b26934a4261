//! Thoughts: the text bodies that take part in the simulation.
//!
//! A thought never holds a reference to its zone. It stores the zone's
//! [`ZoneKind`] inside its [`Motion`] and the physics step looks the
//! current geometry up each tick, so resizing the canvas never invalidates
//! anything.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::vector;
use crate::zone::ZoneKind;

/// Minimum randomized thought size.
pub const MIN_SIZE: f32 = 40.0;
/// Maximum randomized thought size.
pub const MAX_SIZE: f32 = 70.0;

/// Stable handle for a thought, unique within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThoughtId(pub u64);

impl std::fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a thought relates to its home zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Motion {
    /// No home zone; drifts towards the pointer.
    Free,
    /// Held by its zone and never dragged away (or already back home).
    ZoneBound { zone: ZoneKind },
    /// Released away from home; lingers until `delay` seconds after `since`.
    ReturningWithDelay {
        zone: ZoneKind,
        delay: f32,
        since: u64,
    },
    /// Gliding back to the zone center.
    Returning { zone: ZoneKind },
}

impl Motion {
    pub fn for_zone(zone: Option<ZoneKind>) -> Self {
        match zone {
            Some(zone) => Motion::ZoneBound { zone },
            None => Motion::Free,
        }
    }

    /// Home zone, if any.
    pub fn zone(&self) -> Option<ZoneKind> {
        match *self {
            Motion::Free => None,
            Motion::ZoneBound { zone }
            | Motion::ReturningWithDelay { zone, .. }
            | Motion::Returning { zone } => Some(zone),
        }
    }

    pub fn is_returning(&self) -> bool {
        matches!(self, Motion::Returning { .. })
    }

    /// Drop any pending return, keeping the home zone.
    pub fn settle(self) -> Self {
        Motion::for_zone(self.zone())
    }
}

/// A text body in the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub motion: Motion,
    #[serde(default)]
    pub glow: f32,
    /// Ticks left during which semantic forces are suppressed.
    #[serde(default)]
    pub break_bond: u32,
    /// Creation time in unix milliseconds.
    #[serde(default)]
    pub created_at: u64,
    /// Name of the collaborator who shared this thought.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_by: Option<String>,
}

impl Thought {
    /// Create a thought with randomized size and drift.
    ///
    /// The color comes from the home zone, or a random hue for free thoughts.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        id: ThoughtId,
        text: impl Into<String>,
        pos: Vec2,
        zone: Option<ZoneKind>,
        now_ms: u64,
    ) -> Self {
        let color = match zone {
            Some(kind) => kind.color(),
            None => Color::random_hue(rng, 0.7, 0.6),
        };
        Self {
            id,
            pos,
            vel: vector::jitter(rng, 1.0),
            text: text.into(),
            size: rng.gen_range(MIN_SIZE..MAX_SIZE),
            color,
            motion: Motion::for_zone(zone),
            glow: 0.0,
            break_bond: 0,
            created_at: now_ms,
            shared_by: None,
        }
    }

    pub fn zone(&self) -> Option<ZoneKind> {
        self.motion.zone()
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Whether `point` lies within `scale` times the thought's size.
    pub fn hit(&self, point: Vec2, scale: f32) -> bool {
        self.pos.distance(point) < self.size * scale
    }

    /// Text clipped to fit the bubble (about one character per 5 units).
    pub fn display_text(&self) -> String {
        let max_chars = (self.size / 5.0).floor().max(0.0) as usize;
        if self.text.chars().count() > max_chars {
            let clipped: String = self.text.chars().take(max_chars).collect();
            format!("{clipped}...")
        } else {
            self.text.clone()
        }
    }
}
