//! Change notifications emitted by a [`Session`](crate::session::Session).
//!
//! Listeners are plain closures called synchronously, in registration order,
//! from inside the mutating call that produced the event. There is no
//! buffering and no deferred delivery: when `activate` returns, every
//! listener has already seen the change.
//!
//! A listener cannot call back into the session that notified it: the
//! session is mutably borrowed for the whole delivery.

use crate::id::{ListenerId, NodeIdx};

/// Something about the session changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A node was unlocked and its cost deducted.
    NodeActivated {
        node: NodeIdx,
        cost: u32,
        balance: u32,
    },

    /// Skill points were granted. Modifiers are unchanged.
    PointsGranted { amount: u32, balance: u32 },

    /// The active set was replaced wholesale by an imported build.
    BuildLoaded { active_count: usize },

    /// The session returned to its initial state.
    SessionReset { balance: u32 },
}

/// Discriminant tag for session events, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    NodeActivated,
    PointsGranted,
    BuildLoaded,
    SessionReset,
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::NodeActivated { .. } => SessionEventKind::NodeActivated,
            SessionEvent::PointsGranted { .. } => SessionEventKind::PointsGranted,
            SessionEvent::BuildLoaded { .. } => SessionEventKind::BuildLoaded,
            SessionEvent::SessionReset { .. } => SessionEventKind::SessionReset,
        }
    }

    /// Whether this event implies a new [`ComputedModifiers`] snapshot.
    ///
    /// [`ComputedModifiers`]: crate::compose::ComputedModifiers
    pub fn changes_modifiers(&self) -> bool {
        !matches!(self, SessionEvent::PointsGranted { .. })
    }
}

/// A read-only listener.
pub type SessionListener = Box<dyn FnMut(&SessionEvent)>;

/// Ordered listener registry.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, SessionListener)>,
    next_id: u64,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It runs after every listener registered before it.
    pub fn subscribe(&mut self, listener: SessionListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `event` to every listener in registration order.
    pub fn notify(&mut self, event: &SessionEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}
