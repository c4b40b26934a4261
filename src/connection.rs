//! Edges between thoughts.
//!
//! Connections refer to their endpoints by [`ThoughtId`] and are resolved
//! through a [`ThoughtIndex`] built once per tick. An endpoint that no longer
//! resolves means the thought was deleted, and the edge is pruned; nothing
//! else ever observes a dangling connection.

use std::borrow::Cow;
use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::thought::{Thought, ThoughtId};
use crate::vector;

/// Non-manual edges are dropped once their endpoints drift this far apart.
pub const PRUNE_DISTANCE: f32 = 200.0;
/// Pointer distance from an edge that still counts as a hit.
pub const HIT_THRESHOLD: f32 = 15.0;

/// Id to position in the live thought list.
pub type ThoughtIndex = HashMap<ThoughtId, usize>;

/// Build the id lookup for the current thought list.
pub fn index_thoughts(thoughts: &[Thought]) -> ThoughtIndex {
    thoughts
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Discovered by the physics step between opposite thoughts.
    Antonym,
    /// Drawn by the user; survives any distance.
    Manual,
    /// Discovered by shared category or balance words.
    Related,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: ThoughtId,
    pub to: ThoughtId,
    pub kind: ConnectionKind,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default = "default_strength")]
    pub strength: f32,
    #[serde(default)]
    pub created_at: u64,
    /// Why a discovered link exists, e.g. "shared category: work".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn default_strength() -> f32 {
    1.0
}

impl Connection {
    pub fn new(from: ThoughtId, to: ThoughtId, kind: ConnectionKind, now_ms: u64) -> Self {
        Self {
            from,
            to,
            kind,
            label: String::new(),
            color: None,
            strength: default_strength(),
            created_at: now_ms,
            reason: None,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.kind == ConnectionKind::Manual
    }

    /// Whether this edge joins `a` and `b` in either direction.
    pub fn joins(&self, a: ThoughtId, b: ThoughtId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn touches(&self, id: ThoughtId) -> bool {
        self.from == id || self.to == id
    }

    /// Stroke color by kind.
    pub fn display_color(&self) -> Color {
        match self.kind {
            ConnectionKind::Manual => self.color.unwrap_or(Color::INDIGO),
            ConnectionKind::Antonym => Color::ANTONYM,
            ConnectionKind::Related => Color::LINK,
        }
    }

    /// Endpoint positions, if both endpoints are live.
    pub fn endpoints(&self, thoughts: &[Thought], index: &ThoughtIndex) -> Option<(Vec2, Vec2)> {
        let a = thoughts.get(*index.get(&self.from)?)?;
        let b = thoughts.get(*index.get(&self.to)?)?;
        Some((a.pos, b.pos))
    }
}

/// Human-readable form of a manual connection label.
pub fn label_display(label: &str) -> Cow<'_, str> {
    match label {
        "related" => Cow::Borrowed("Related"),
        "causes" => Cow::Borrowed("Causes →"),
        "contradicts" => Cow::Borrowed("Contradicts"),
        "supports" => Cow::Borrowed("Supports"),
        "reminds" => Cow::Borrowed("Reminds of"),
        other => Cow::Borrowed(other),
    }
}

/// Icon drawn above a manual connection with a known label.
pub fn label_icon(label: &str) -> Option<&'static str> {
    match label {
        "related" => Some("🔗"),
        "causes" => Some("➡"),
        "contradicts" => Some("⚡"),
        "supports" => Some("💪"),
        "reminds" => Some("💭"),
        _ => None,
    }
}

/// Labels offered by the label picker.
pub const KNOWN_LABELS: [&str; 5] = ["related", "causes", "contradicts", "supports", "reminds"];

/// The live connection list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connections(Vec<Connection>);

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(list: Vec<Connection>) -> Self {
        let mut out = Self::new();
        for c in list {
            out.add(c);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Connection] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Connection> {
        self.0.get(index)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether an edge joins `a` and `b` in either direction.
    pub fn contains_pair(&self, a: ThoughtId, b: ThoughtId) -> bool {
        self.0.iter().any(|c| c.joins(a, b))
    }

    /// Add an edge. Self-loops and duplicates of an existing unordered pair
    /// are rejected; returns whether the edge was added.
    pub fn add(&mut self, connection: Connection) -> bool {
        if connection.from == connection.to || self.contains_pair(connection.from, connection.to) {
            return false;
        }
        self.0.push(connection);
        true
    }

    /// Remove the edge at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Connection> {
        if index < self.0.len() {
            let removed = self.0.remove(index);
            tracing::debug!(from = %removed.from, to = %removed.to, "connection deleted");
            Some(removed)
        } else {
            None
        }
    }

    /// Drop edges with an unresolvable endpoint and non-manual edges whose
    /// endpoints are more than [`PRUNE_DISTANCE`] apart. Returns how many
    /// were dropped.
    pub fn prune(&mut self, thoughts: &[Thought], index: &ThoughtIndex) -> usize {
        let before = self.0.len();
        self.0.retain(|c| match c.endpoints(thoughts, index) {
            None => false,
            Some((a, b)) => c.is_manual() || vector::distance(a, b) <= PRUNE_DISTANCE,
        });
        let dropped = before - self.0.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = self.0.len(), "connections pruned");
        }
        dropped
    }

    /// Topmost edge within [`HIT_THRESHOLD`] of `point`.
    pub fn hit_test(&self, point: Vec2, thoughts: &[Thought], index: &ThoughtIndex) -> Option<usize> {
        self.0.iter().enumerate().rev().find_map(|(i, c)| {
            let (a, b) = c.endpoints(thoughts, index)?;
            (vector::distance_to_segment(point, a, b) < HIT_THRESHOLD).then_some(i)
        })
    }
}

impl<'a> IntoIterator for &'a Connections {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
