//! The activation engine: one player's unlock state for one play session.
//!
//! A [`Session`] owns the active node set and the skill-point balance, and
//! keeps a [`ComputedModifiers`] snapshot in step with the active set. Game
//! code holds the session explicitly; nothing here is global, so tests and
//! replays can run as many independent sessions as they like over one shared
//! [`Catalog`].
//!
//! # Invariants
//!
//! - The root is always active, and every active node is connected to it
//!   through other active nodes.
//! - Outside of [`Session::load_build`], the active set only grows, and only
//!   through [`Session::activate`], which is the sole place points are spent.
//! - The balance never goes negative (it is unsigned and `activate` refuses
//!   any node the balance cannot cover).
//! - `modifiers()` always equals `compose(active)`.
//!
//! Expected failures are not errors: `activate` returns `false` and leaves
//! the session untouched, and unknown node keys behave like locked nodes.

use std::sync::Arc;

use tracing::{debug, info};

use crate::active::ActiveSet;
use crate::adjacency::AdjacencyIndex;
use crate::build_code;
use crate::catalog::Catalog;
use crate::compose::{ComputedModifiers, compose};
use crate::config::SessionConfig;
use crate::event::{Listeners, SessionEvent, SessionListener};
use crate::id::{ListenerId, NodeIdx};

/// How a node should be presented, derived from the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Unlocked.
    Active,
    /// Adjacent to an active node and affordable: `activate` would succeed.
    Available,
    /// Adjacent to an active node but the balance is short.
    Unaffordable,
    /// Not adjacent to any active node, or not in the catalog.
    Locked,
}

/// Mutable progression state over an immutable catalog.
#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    adjacency: AdjacencyIndex,
    config: SessionConfig,
    active: ActiveSet,
    balance: u32,
    modifiers: ComputedModifiers,
    listeners: Listeners,
}

impl Session {
    /// A fresh session: only the root active, `config.starting_points` to spend.
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        let adjacency = AdjacencyIndex::build(&catalog);
        let active = ActiveSet::with_root(&catalog);
        let modifiers = compose(&catalog, active.iter());
        Self {
            balance: config.starting_points,
            catalog,
            adjacency,
            config,
            active,
            modifiers,
            listeners: Listeners::new(),
        }
    }

    // -- Accessors --

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// Unspent skill points.
    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// The current modifier snapshot. Combat systems poll this once per tick.
    pub fn modifiers(&self) -> &ComputedModifiers {
        &self.modifiers
    }

    /// Points tied up in active nodes.
    pub fn points_spent(&self) -> u32 {
        self.catalog.cost_of(&self.active)
    }

    // -- Queries --

    pub fn is_active(&self, key: &str) -> bool {
        self.catalog
            .index_of(key)
            .is_some_and(|idx| self.active.contains(idx))
    }

    /// Not yet active and adjacent to an active node. Ignores cost.
    pub fn is_reachable(&self, key: &str) -> bool {
        self.catalog
            .index_of(key)
            .is_some_and(|idx| self.reachable(idx))
    }

    /// Reachable and affordable.
    pub fn can_activate(&self, key: &str) -> bool {
        self.catalog
            .index_of(key)
            .is_some_and(|idx| self.activatable(idx))
    }

    pub fn node_state(&self, key: &str) -> NodeState {
        match self.catalog.index_of(key) {
            Some(idx) => self.state_of(idx),
            None => NodeState::Locked,
        }
    }

    /// Presentation state by index. Indices outside the catalog are locked.
    pub fn state_of(&self, idx: NodeIdx) -> NodeState {
        if self.active.contains(idx) {
            NodeState::Active
        } else if !self.reachable(idx) {
            NodeState::Locked
        } else if self.affordable(idx) {
            NodeState::Available
        } else {
            NodeState::Unaffordable
        }
    }

    /// Keys of every node `activate` would currently accept, in catalog order.
    pub fn available(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|(idx, _)| self.activatable(*idx))
            .map(|(_, node)| node.key.as_str())
            .collect()
    }

    /// Keys of every reachable node regardless of cost, in catalog order.
    pub fn frontier(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|(idx, _)| self.reachable(*idx))
            .map(|(_, node)| node.key.as_str())
            .collect()
    }

    fn reachable(&self, idx: NodeIdx) -> bool {
        self.catalog.contains(idx)
            && !self.active.contains(idx)
            && self.adjacency.touches(idx, &self.active)
    }

    fn affordable(&self, idx: NodeIdx) -> bool {
        self.catalog
            .get(idx)
            .is_some_and(|node| self.balance >= node.cost)
    }

    fn activatable(&self, idx: NodeIdx) -> bool {
        self.reachable(idx) && self.affordable(idx)
    }

    // -- Mutations --

    /// Unlock a node, spending its cost. Returns `false` and changes nothing
    /// if the node is unknown, already active, unreachable or unaffordable.
    pub fn activate(&mut self, key: &str) -> bool {
        let Some(idx) = self.catalog.index_of(key) else {
            debug!(node = key, "activation refused: unknown node");
            return false;
        };

        match self.state_of(idx) {
            NodeState::Available => {}
            state => {
                debug!(node = key, ?state, balance = self.balance, "activation refused");
                return false;
            }
        }

        let cost = self.catalog.get(idx).map_or(0, |node| node.cost);
        self.active.insert(idx);
        self.balance -= cost;
        self.recompute();

        debug!(node = key, cost, balance = self.balance, "node activated");
        self.listeners.notify(&SessionEvent::NodeActivated {
            node: idx,
            cost,
            balance: self.balance,
        });
        true
    }

    /// Grant skill points. Modifiers are not recomputed: the balance never
    /// feeds into them.
    pub fn add_skill_points(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
        debug!(amount, balance = self.balance, "skill points granted");
        self.listeners.notify(&SessionEvent::PointsGranted {
            amount,
            balance: self.balance,
        });
    }

    /// Replace the active set wholesale, as for an imported build.
    ///
    /// The balance is zeroed: an imported build is a finished allocation,
    /// not a claim on the importer's unspent points. The root is re-added,
    /// indices outside the catalog are dropped, and so is every node with no
    /// path to the root through other members of the set.
    pub fn load_build(&mut self, mut active: ActiveSet) {
        active.retain_known(&self.catalog);
        active.insert(self.catalog.root());

        self.adjacency = AdjacencyIndex::build(&self.catalog);
        let connected = self.adjacency.connected_within(self.catalog.root(), &active);
        if connected.len() != active.len() {
            debug!(
                dropped = active.len() - connected.len(),
                "dropped nodes disconnected from the root"
            );
        }

        self.active = connected;
        self.balance = 0;
        self.recompute();

        info!(active = self.active.len(), "build loaded");
        self.listeners.notify(&SessionEvent::BuildLoaded {
            active_count: self.active.len(),
        });
    }

    /// Return to the initial state: only the root, starting points.
    pub fn reset(&mut self) {
        self.adjacency = AdjacencyIndex::build(&self.catalog);
        self.active = ActiveSet::with_root(&self.catalog);
        self.balance = self.config.starting_points;
        self.recompute();

        info!(balance = self.balance, "session reset");
        self.listeners.notify(&SessionEvent::SessionReset {
            balance: self.balance,
        });
    }

    fn recompute(&mut self) {
        self.modifiers = compose(&self.catalog, self.active.iter());
    }

    // -- Build codes --

    /// The build code of the current active set.
    pub fn export_code(&self) -> String {
        build_code::encode(&self.catalog, &self.active)
    }

    /// Decode `code` and load it. On any decode failure the session is left
    /// exactly as it was and `false` is returned.
    pub fn import_code(&mut self, code: &str) -> bool {
        match build_code::decode(&self.catalog, &self.adjacency, code) {
            Some(active) => {
                self.load_build(active);
                true
            }
            None => false,
        }
    }

    // -- Listeners --

    /// Register a change listener. Listeners run synchronously, in
    /// registration order, inside the mutating call.
    pub fn subscribe(&mut self, listener: SessionListener) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
