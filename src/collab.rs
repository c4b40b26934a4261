//! Collaboration channel.
//!
//! The session talks to other canvases only through [`CollabChannel`]. The
//! bundled [`LoopbackChannel`] has no network: it walks through the
//! connection lifecycle on a timer, records outgoing thoughts, delivers
//! thoughts queued with [`LoopbackChannel::inject`], and can optionally
//! simulate a few wandering peers.
//!
//! Status lifecycle: `Disconnected -> Connecting -> Connected | Error`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::thought::Thought;

/// Delay between `connect` and the channel reporting `Connected`.
pub const CONNECT_DELAY_MS: u64 = 500;
const CURSOR_INTERVAL_MS: u64 = 100;
const ROSTER_INTERVAL_MS: u64 = 5_000;
const ROSTER_CHANGE_CHANCE: f64 = 0.1;
const MAX_PEERS: usize = 4;
const CURSOR_JITTER: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalUser {
    pub id: String,
    pub name: String,
    pub color: Color,
}

impl Default for LocalUser {
    fn default() -> Self {
        Self {
            id: "current-user".to_string(),
            name: "You".to_string(),
            color: Color::rgb(0x9b, 0x59, 0xb6),
        }
    }
}

/// Another participant and their last known cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub color: Color,
    pub cursor: Vec2,
}

/// A thought as it travels between canvases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedThought {
    pub text: String,
    pub shared_by: String,
    pub shared_at: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollabEvent {
    StatusChanged(ConnectionStatus),
    PeerJoined(String),
    PeerLeft(String),
    ThoughtReceived(SharedThought),
}

pub trait CollabChannel {
    fn status(&self) -> ConnectionStatus;

    fn connect(&mut self, now_ms: u64);

    fn disconnect(&mut self);

    /// Share a thought. Only succeeds while connected.
    fn broadcast_thought(&mut self, thought: &Thought, now_ms: u64) -> Option<SharedThought>;

    fn broadcast_cursor(&mut self, pos: Vec2);

    fn user(&self) -> &LocalUser;

    fn peers(&self) -> &[Peer];

    /// Advance the channel and drain what happened since the last poll.
    fn poll(&mut self, now_ms: u64) -> Vec<CollabEvent>;

    fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Peers plus the local user.
    fn user_count(&self) -> usize {
        self.peers().len() + 1
    }
}

fn demo_roster() -> Vec<(&'static str, &'static str, Color)> {
    vec![
        ("user1", "Alex", Color::rgb(0xff, 0x6b, 0x9d)),
        ("user2", "Jordan", Color::rgb(0x4e, 0xcd, 0xc4)),
        ("user3", "Sam", Color::rgb(0xf7, 0xdc, 0x6f)),
    ]
}

#[derive(Debug)]
pub struct LoopbackChannel {
    status: ConnectionStatus,
    connect_at: Option<u64>,
    user: LocalUser,
    peers: Vec<Peer>,
    cursor: Vec2,
    sent: Vec<SharedThought>,
    inbox: VecDeque<SharedThought>,
    pending: Vec<CollabEvent>,
    demo: Option<StdRng>,
    last_cursor_ms: u64,
    last_roster_ms: u64,
}

impl LoopbackChannel {
    pub fn new(user: LocalUser) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            connect_at: None,
            user,
            peers: Vec::new(),
            cursor: Vec2::ZERO,
            sent: Vec::new(),
            inbox: VecDeque::new(),
            pending: Vec::new(),
            demo: None,
            last_cursor_ms: 0,
            last_roster_ms: 0,
        }
    }

    /// Simulate peers that join, leave and move their cursors.
    pub fn with_demo_peers(mut self, seed: u64) -> Self {
        self.demo = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Thoughts broadcast so far.
    pub fn sent(&self) -> &[SharedThought] {
        &self.sent
    }

    /// Our last broadcast cursor.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Queue an inbound thought; delivered by the next poll while connected.
    pub fn inject(&mut self, thought: SharedThought) {
        self.inbox.push_back(thought);
    }

    /// Move to the error state.
    pub fn fail(&mut self, reason: &str) {
        tracing::warn!(reason, "collaboration channel failed");
        self.set_status(ConnectionStatus::Error);
        self.connect_at = None;
        self.peers.clear();
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            self.status = status;
            self.pending.push(CollabEvent::StatusChanged(status));
        }
    }

    fn spawn_peer(rng: &mut StdRng, id: &str, name: &str, color: Color) -> Peer {
        Peer {
            id: id.to_string(),
            name: name.to_string(),
            color,
            cursor: Vec2::new(rng.gen_range(300.0..700.0), rng.gen_range(200.0..500.0)),
        }
    }

    fn tick_demo(&mut self, now_ms: u64) {
        let Some(rng) = self.demo.as_mut() else {
            return;
        };

        if now_ms.saturating_sub(self.last_cursor_ms) >= CURSOR_INTERVAL_MS {
            self.last_cursor_ms = now_ms;
            for peer in &mut self.peers {
                peer.cursor += Vec2::new(
                    rng.gen_range(-CURSOR_JITTER..CURSOR_JITTER),
                    rng.gen_range(-CURSOR_JITTER..CURSOR_JITTER),
                );
            }
        }

        if now_ms.saturating_sub(self.last_roster_ms) < ROSTER_INTERVAL_MS {
            return;
        }
        self.last_roster_ms = now_ms;
        if !rng.gen_bool(ROSTER_CHANGE_CHANCE) {
            return;
        }

        let absent: Vec<_> = demo_roster()
            .into_iter()
            .filter(|(id, _, _)| !self.peers.iter().any(|p| p.id == *id))
            .collect();
        if self.peers.len() < MAX_PEERS && rng.gen_bool(0.5) {
            if let Some((id, name, color)) = absent.choose(rng).copied() {
                let peer = Self::spawn_peer(rng, id, name, color);
                self.pending.push(CollabEvent::PeerJoined(peer.name.clone()));
                self.peers.push(peer);
            }
        } else if self.peers.len() > 1 {
            let i = rng.gen_range(0..self.peers.len());
            let peer = self.peers.remove(i);
            self.pending.push(CollabEvent::PeerLeft(peer.name));
        }
    }
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new(LocalUser::default())
    }
}

impl CollabChannel for LoopbackChannel {
    fn status(&self) -> ConnectionStatus {
        self.status
    }

    fn connect(&mut self, now_ms: u64) {
        if matches!(self.status, ConnectionStatus::Connecting | ConnectionStatus::Connected) {
            return;
        }
        self.set_status(ConnectionStatus::Connecting);
        self.connect_at = Some(now_ms + CONNECT_DELAY_MS);
    }

    fn disconnect(&mut self) {
        self.connect_at = None;
        self.peers.clear();
        self.set_status(ConnectionStatus::Disconnected);
    }

    fn broadcast_thought(&mut self, thought: &Thought, now_ms: u64) -> Option<SharedThought> {
        if !self.is_connected() {
            return None;
        }
        let shared = SharedThought {
            text: thought.text.clone(),
            shared_by: self.user.name.clone(),
            shared_at: now_ms,
        };
        tracing::debug!(id = %thought.id, "thought broadcast");
        self.sent.push(shared.clone());
        Some(shared)
    }

    fn broadcast_cursor(&mut self, pos: Vec2) {
        if self.is_connected() {
            self.cursor = pos;
        }
    }

    fn user(&self) -> &LocalUser {
        &self.user
    }

    fn peers(&self) -> &[Peer] {
        &self.peers
    }

    fn poll(&mut self, now_ms: u64) -> Vec<CollabEvent> {
        if let Some(at) = self.connect_at {
            if now_ms >= at {
                self.connect_at = None;
                self.set_status(ConnectionStatus::Connected);
                self.last_cursor_ms = now_ms;
                self.last_roster_ms = now_ms;
                if let Some(rng) = self.demo.as_mut() {
                    let count = rng.gen_range(1..=3);
                    let joined: Vec<Peer> = demo_roster()
                        .into_iter()
                        .take(count)
                        .map(|(id, name, color)| Self::spawn_peer(rng, id, name, color))
                        .collect();
                    self.peers = joined;
                }
            }
        }

        if self.is_connected() {
            self.tick_demo(now_ms);
            while let Some(shared) = self.inbox.pop_front() {
                self.pending.push(CollabEvent::ThoughtReceived(shared));
            }
        }

        std::mem::take(&mut self.pending)
    }
}
