//! # Thoughtspace
//!
//! A 2D physics sandbox for short pieces of text. Each thought is a glowing
//! body that drifts, collides, gets pulled toward its opposite and pushed
//! away from its synonyms, and glides back to its zone after being dragged.
//!
//! ## Quick Start
//!
//! ```ignore
//! use thoughtspace::prelude::*;
//!
//! let mut session = Session::new(&AppConfig::default(), Vec2::new(1200.0, 800.0));
//! session.add_thought("calm", Some(ZoneKind::Relax), unix_millis());
//!
//! loop {
//!     session.frame(unix_millis());
//!     render(&mut canvas, extents, &session.world, &session.mode, unix_millis());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### World
//!
//! [`World`] is the whole canvas state: thoughts, connections, zones,
//! particles, energy waves and the camera. Thoughts are addressed by a
//! stable [`ThoughtId`]; connections store ids, never positions.
//!
//! ### Physics
//!
//! [`physics::step`] advances every thought by one tick. Forces read a
//! snapshot taken at the start of the tick, so the result does not depend
//! on list order. The step reports [`SimEvent`]s which the
//! [`sound::CueFilter`] turns into rate-limited cues.
//!
//! ### Zones
//!
//! Four circular regions (creative, focus, organize, relax) each with their
//! own gravity and chaos. A zoned thought that is dragged out waits a few
//! seconds, then glides home.
//!
//! ### Connections
//!
//! Antonym links form automatically when opposites come close. Related
//! links come from shared categories. Manual links are drawn in connection
//! mode and carry a label.
//!
//! ## Rendering
//!
//! [`render::render`] draws a [`World`] onto any [`render::Canvas`]. With the
//! `egui` feature a painter-backed canvas is provided.

pub mod camera;
pub mod collab;
pub mod color;
pub mod config;
pub mod connect_mode;
pub mod connection;
pub mod effects;
pub mod error;
pub mod export;
pub mod input;
pub mod insight;
pub mod persist;
pub mod physics;
pub mod relations;
pub mod render;
pub mod session;
pub mod sound;
pub mod thought;
pub mod time;
pub mod vector;
pub mod world;
pub mod zone;

pub use camera::Camera;
pub use color::Color;
pub use config::AppConfig;
pub use connect_mode::{ClickOutcome, ConnectMode};
pub use connection::{Connection, ConnectionKind, Connections};
pub use glam::Vec2;
pub use physics::{PhysicsParams, SimEvent};
pub use session::Session;
pub use thought::{Thought, ThoughtId};
pub use world::World;
pub use zone::{Zone, ZoneKind};

/// Everything a host needs in one import.
pub mod prelude {
    pub use crate::collab::{CollabChannel, CollabEvent, ConnectionStatus, LoopbackChannel};
    pub use crate::config::AppConfig;
    pub use crate::connect_mode::{ClickOutcome, ConnectMode};
    pub use crate::connection::{Connection, ConnectionKind, KNOWN_LABELS};
    pub use crate::input::{InputEffect, KeyCode, Modifiers, MouseButton};
    pub use crate::persist::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::render::{render, Canvas};
    pub use crate::session::{Session, Stats};
    pub use crate::sound::{SoundCue, SoundSink};
    pub use crate::thought::{Thought, ThoughtId};
    pub use crate::time::unix_millis;
    pub use crate::world::World;
    pub use crate::zone::ZoneKind;
    pub use glam::Vec2;
}
