//! Manual connection drawing.
//!
//! ```text
//!            toggle                click A                click B (new pair)
//! Inactive ─────────▶ AwaitingFirst ──────▶ PendingSecond{A} ──────────────▶ AwaitingLabel{A,B}
//!    ▲  ◀──── toggle / escape ────┘ ▲  ◀── click A again / pair exists ──┘       │
//!    │                              └──────────── complete / cancel_label ───────┘
//!    └──────────────────────── toggle / escape from any active state
//! ```
//!
//! The label step is the only way a manual edge gets committed, and at most
//! one candidate edge exists at a time.

use crate::color::Color;
use crate::connection::{Connection, ConnectionKind, Connections, ThoughtIndex};
use crate::thought::ThoughtId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    #[default]
    Inactive,
    AwaitingFirst,
    PendingSecond {
        first: ThoughtId,
    },
    AwaitingLabel {
        from: ThoughtId,
        to: ThoughtId,
    },
}

/// What a click on a thought did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Mode is off or waiting on the label; the click is not for us.
    Ignored,
    /// First endpoint chosen.
    Select(ThoughtId),
    /// Same thought clicked twice.
    Deselect,
    /// The pair is already connected.
    AlreadyConnected,
    /// Both endpoints chosen; ask for a label.
    OpenLabel { from: ThoughtId, to: ThoughtId },
}

impl ConnectMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectMode::Inactive)
    }

    /// Flip between off and awaiting a first endpoint. Turning off drops any
    /// pending selection. Returns whether the mode is now active.
    pub fn toggle(&mut self) -> bool {
        *self = if self.is_active() {
            ConnectMode::Inactive
        } else {
            ConnectMode::AwaitingFirst
        };
        tracing::debug!(active = self.is_active(), "connection mode toggled");
        self.is_active()
    }

    /// Escape leaves connection mode from any active state.
    pub fn escape(&mut self) -> bool {
        if self.is_active() {
            self.toggle();
            true
        } else {
            false
        }
    }

    pub fn click(&mut self, id: ThoughtId, connections: &Connections) -> ClickOutcome {
        match *self {
            ConnectMode::Inactive | ConnectMode::AwaitingLabel { .. } => ClickOutcome::Ignored,
            ConnectMode::AwaitingFirst => {
                *self = ConnectMode::PendingSecond { first: id };
                ClickOutcome::Select(id)
            }
            ConnectMode::PendingSecond { first } if first == id => {
                *self = ConnectMode::AwaitingFirst;
                ClickOutcome::Deselect
            }
            ConnectMode::PendingSecond { first } if connections.contains_pair(first, id) => {
                *self = ConnectMode::AwaitingFirst;
                ClickOutcome::AlreadyConnected
            }
            ConnectMode::PendingSecond { first } => {
                *self = ConnectMode::AwaitingLabel { from: first, to: id };
                ClickOutcome::OpenLabel { from: first, to: id }
            }
        }
    }

    /// Commit the candidate edge as a manual connection.
    ///
    /// An empty label is kept as empty; a missing color becomes indigo.
    /// Returns the committed edge, or `None` when there was no candidate or
    /// the pair got connected in the meantime.
    pub fn complete(
        &mut self,
        label: &str,
        color: Option<Color>,
        connections: &mut Connections,
        now_ms: u64,
    ) -> Option<Connection> {
        let ConnectMode::AwaitingLabel { from, to } = *self else {
            return None;
        };
        *self = ConnectMode::AwaitingFirst;

        let mut connection = Connection::new(from, to, ConnectionKind::Manual, now_ms);
        connection.label = label.trim().to_string();
        connection.color = Some(color.unwrap_or(Color::INDIGO));

        if connections.add(connection.clone()) {
            tracing::debug!(%from, %to, label = %connection.label, "manual connection committed");
            Some(connection)
        } else {
            None
        }
    }

    /// Discard the candidate edge.
    pub fn cancel_label(&mut self) {
        if matches!(self, ConnectMode::AwaitingLabel { .. }) {
            *self = ConnectMode::AwaitingFirst;
        }
    }

    /// The first endpoint, while one is chosen.
    pub fn pending(&self) -> Option<ThoughtId> {
        match *self {
            ConnectMode::PendingSecond { first } => Some(first),
            ConnectMode::AwaitingLabel { from, .. } => Some(from),
            _ => None,
        }
    }

    /// The edge waiting for a label.
    pub fn candidate(&self) -> Option<(ThoughtId, ThoughtId)> {
        match *self {
            ConnectMode::AwaitingLabel { from, to } => Some((from, to)),
            _ => None,
        }
    }

    pub fn is_awaiting_label(&self) -> bool {
        matches!(self, ConnectMode::AwaitingLabel { .. })
    }

    /// Drop a selection whose thought has been deleted.
    pub fn forget_missing(&mut self, index: &ThoughtIndex) {
        let stale = match *self {
            ConnectMode::PendingSecond { first } => !index.contains_key(&first),
            ConnectMode::AwaitingLabel { from, to } => {
                !index.contains_key(&from) || !index.contains_key(&to)
            }
            _ => false,
        };
        if stale {
            *self = ConnectMode::AwaitingFirst;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ThoughtId = ThoughtId(1);
    const B: ThoughtId = ThoughtId(2);

    #[test]
    fn test_full_flow() {
        let mut mode = ConnectMode::default();
        let mut connections = Connections::new();

        assert_eq!(mode.click(A, &connections), ClickOutcome::Ignored);
        assert!(mode.toggle());
        assert_eq!(mode.click(A, &connections), ClickOutcome::Select(A));
        assert_eq!(mode.pending(), Some(A));
        assert_eq!(mode.click(B, &connections), ClickOutcome::OpenLabel { from: A, to: B });
        assert_eq!(mode.candidate(), Some((A, B)));

        // clicks while the label is pending do nothing
        assert_eq!(mode.click(A, &connections), ClickOutcome::Ignored);

        let committed = mode.complete("", None, &mut connections, 42).unwrap();
        assert_eq!(committed.kind, ConnectionKind::Manual);
        assert_eq!(committed.color, Some(Color::INDIGO));
        assert_eq!(committed.label, "");
        assert_eq!(mode, ConnectMode::AwaitingFirst);
        assert_eq!(connections.len(), 1);
    }

    #[test]
    fn test_same_thought_deselects() {
        let mut mode = ConnectMode::AwaitingFirst;
        let connections = Connections::new();
        mode.click(A, &connections);
        assert_eq!(mode.click(A, &connections), ClickOutcome::Deselect);
        assert_eq!(mode, ConnectMode::AwaitingFirst);
    }

    #[test]
    fn test_existing_pair_cancels() {
        let mut mode = ConnectMode::AwaitingFirst;
        let mut connections = Connections::new();
        connections.add(Connection::new(B, A, ConnectionKind::Antonym, 0));
        mode.click(A, &connections);
        assert_eq!(mode.click(B, &connections), ClickOutcome::AlreadyConnected);
        assert_eq!(mode, ConnectMode::AwaitingFirst);
    }

    #[test]
    fn test_cancel_label_creates_nothing() {
        let mut mode = ConnectMode::AwaitingLabel { from: A, to: B };
        let mut connections = Connections::new();
        mode.cancel_label();
        assert_eq!(mode, ConnectMode::AwaitingFirst);
        assert!(mode.complete("x", None, &mut connections, 0).is_none());
        assert!(connections.is_empty());
    }

    #[test]
    fn test_toggle_off_and_escape_clear_selection() {
        let mut mode = ConnectMode::PendingSecond { first: A };
        assert!(!mode.toggle());
        assert_eq!(mode.pending(), None);

        let mut mode = ConnectMode::AwaitingLabel { from: A, to: B };
        assert!(mode.escape());
        assert_eq!(mode, ConnectMode::Inactive);
        assert!(!mode.escape());
    }

    #[test]
    fn test_forget_missing() {
        let mut mode = ConnectMode::PendingSecond { first: A };
        let index = ThoughtIndex::new();
        mode.forget_missing(&index);
        assert_eq!(mode, ConnectMode::AwaitingFirst);
    }
}
