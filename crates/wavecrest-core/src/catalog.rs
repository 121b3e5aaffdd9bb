//! The node catalog: static description of every node in the skill graph.
//!
//! A catalog is assembled once through [`CatalogBuilder`] and is immutable
//! afterwards. [`CatalogBuilder::build`] enforces the structural rules every
//! other module relies on:
//!
//! - node keys are unique and every declared connection names a known node,
//! - exactly one node has tier [`Tier::Start`], and it costs nothing,
//! - every node is reachable from that root over undirected connections,
//! - no multiplicative effect can zero out its stat.
//!
//! Catalog order is significant: a node's position is its [`NodeIdx`] and its
//! bit in build codes, so reordering nodes invalidates every issued code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::active::ActiveSet;
use crate::adjacency::AdjacencyIndex;
use crate::behavior::{Behavior, BehaviorSet};
use crate::fixed::{Fixed64, checked_f64_to_fixed64};
use crate::id::NodeIdx;
use crate::stat::{Stat, StatKind};

// ---------------------------------------------------------------------------
// Node definition
// ---------------------------------------------------------------------------

/// Size class of a node. Only [`Tier::Start`] carries logic (it marks the
/// root); the rest are presentation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Start,
    Small,
    Notable,
    Keystone,
}

/// One (stat, value) contribution of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub stat: Stat,
    pub value: Fixed64,
}

/// A node in the skill graph. Registered at startup; immutable after the
/// catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
    /// Unique key, stable across catalog versions.
    pub key: String,

    /// Human-readable name.
    pub name: String,

    pub tier: Tier,

    /// Cosmetic grouping tag. Not used by any rule.
    pub branch: String,

    /// Skill points spent to activate this node.
    pub cost: u32,

    /// Stat contributions, in authored order.
    pub effects: Vec<Effect>,

    pub behaviors: BehaviorSet,

    /// Declared neighbor keys. May be one-directional; the adjacency index
    /// makes every edge symmetric.
    pub connections: Vec<String>,
}

impl NodeDef {
    /// A node with no effects, behaviors or connections. The name defaults
    /// to the key.
    pub fn new(key: impl Into<String>, tier: Tier, cost: u32) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            tier,
            branch: String::new(),
            cost,
            effects: Vec::new(),
            behaviors: BehaviorSet::empty(),
            connections: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Append an effect. `value` is converted to fixed-point here, once.
    ///
    /// # Panics
    ///
    /// Panics if `value` is NaN, infinite or outside the Q32.32 range. Use
    /// [`NodeDef::try_effect`] for values read from outside the program.
    pub fn effect(self, stat: Stat, value: f64) -> Self {
        match self.try_effect(stat, value) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Append an effect, rejecting values with no fixed-point representation.
    pub fn try_effect(mut self, stat: Stat, value: f64) -> Result<Self, CatalogError> {
        let Some(value) = checked_f64_to_fixed64(value) else {
            return Err(CatalogError::InvalidValue {
                node: self.key,
                stat,
            });
        };
        self.effects.push(Effect { stat, value });
        Ok(self)
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.insert(behavior);
        self
    }

    /// Declare a connection to another node by key.
    pub fn connect(mut self, key: impl Into<String>) -> Self {
        self.connections.push(key.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a set of node definitions does not form a valid catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no nodes")]
    Empty,

    #[error("catalog exceeds {max} nodes")]
    TooManyNodes { max: usize },

    #[error("duplicate node key: {0}")]
    DuplicateNode(String),

    #[error("node {node} connects to unknown node {target}")]
    UnknownConnection { node: String, target: String },

    #[error("node {0} connects to itself")]
    SelfConnection(String),

    #[error("catalog has no start node")]
    MissingRoot,

    #[error("catalog has more than one start node: {first} and {second}")]
    MultipleRoots { first: String, second: String },

    #[error("start node {node} must cost 0, costs {cost}")]
    RootHasCost { node: String, cost: u32 },

    #[error("node {node} has an unrepresentable value for {stat}")]
    InvalidValue { node: String, stat: Stat },

    #[error("node {node} has a non-positive multiplier for {stat}")]
    NonPositiveMultiplier { node: String, stat: Stat },

    #[error("node {node} is not reachable from the start node")]
    Unreachable { node: String },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Maximum catalog size; node indices are `u16`.
pub const MAX_NODES: usize = u16::MAX as usize;

/// Collects node definitions and validates them into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    nodes: Vec<NodeDef>,
    index: HashMap<String, NodeIdx>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Its [`NodeIdx`] is its registration order.
    pub fn add(&mut self, node: NodeDef) -> Result<NodeIdx, CatalogError> {
        if self.index.contains_key(&node.key) {
            return Err(CatalogError::DuplicateNode(node.key));
        }
        if self.nodes.len() >= MAX_NODES {
            return Err(CatalogError::TooManyNodes { max: MAX_NODES });
        }

        let idx = NodeIdx(self.nodes.len() as u16);
        self.index.insert(node.key.clone(), idx);
        self.nodes.push(node);
        Ok(idx)
    }

    /// Register several nodes in order, stopping at the first error.
    pub fn extend(
        &mut self,
        nodes: impl IntoIterator<Item = NodeDef>,
    ) -> Result<&mut Self, CatalogError> {
        for node in nodes {
            self.add(node)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate the registered nodes and freeze them into a catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.nodes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut root: Option<NodeIdx> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            for target in &node.connections {
                if *target == node.key {
                    return Err(CatalogError::SelfConnection(node.key.clone()));
                }
                if !self.index.contains_key(target) {
                    return Err(CatalogError::UnknownConnection {
                        node: node.key.clone(),
                        target: target.clone(),
                    });
                }
            }

            for effect in &node.effects {
                if effect.stat.kind() == StatKind::Multiplicative && effect.value <= Fixed64::ZERO {
                    return Err(CatalogError::NonPositiveMultiplier {
                        node: node.key.clone(),
                        stat: effect.stat,
                    });
                }
            }

            if node.tier == Tier::Start {
                if let Some(first) = root {
                    return Err(CatalogError::MultipleRoots {
                        first: self.nodes[first.index()].key.clone(),
                        second: node.key.clone(),
                    });
                }
                if node.cost != 0 {
                    return Err(CatalogError::RootHasCost {
                        node: node.key.clone(),
                        cost: node.cost,
                    });
                }
                root = Some(NodeIdx(i as u16));
            }
        }

        let root = root.ok_or(CatalogError::MissingRoot)?;
        let catalog = Catalog {
            nodes: self.nodes,
            index: self.index,
            root,
        };

        // Every node must hang off the root once edges are made symmetric.
        let adjacency = AdjacencyIndex::build(&catalog);
        let reached = adjacency.connected_within(catalog.root, &catalog.all_nodes());
        if let Some(node) = catalog.iter().find(|(idx, _)| !reached.contains(*idx)) {
            return Err(CatalogError::Unreachable {
                node: node.1.key.clone(),
            });
        }

        Ok(catalog)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The validated, immutable node catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    nodes: Vec<NodeDef>,
    index: HashMap<String, NodeIdx>,
    root: NodeIdx,
}

impl Catalog {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built catalog; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The single start node.
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn get(&self, idx: NodeIdx) -> Option<&NodeDef> {
        self.nodes.get(idx.index())
    }

    /// Resolve a node key to its index. Unknown keys resolve to `None`.
    pub fn index_of(&self, key: &str) -> Option<NodeIdx> {
        self.index.get(key).copied()
    }

    pub fn node(&self, key: &str) -> Option<&NodeDef> {
        self.index_of(key).and_then(|idx| self.get(idx))
    }

    pub fn contains(&self, idx: NodeIdx) -> bool {
        idx.index() < self.nodes.len()
    }

    /// Iterate nodes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &NodeDef)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIdx(i as u16), node))
    }

    /// The set containing every node.
    pub fn all_nodes(&self) -> ActiveSet {
        (0..self.nodes.len()).map(|i| NodeIdx(i as u16)).collect()
    }

    /// Sum of all node costs: the points needed to unlock everything.
    pub fn total_cost(&self) -> u32 {
        self.nodes
            .iter()
            .fold(0u32, |acc, node| acc.saturating_add(node.cost))
    }

    /// Sum of the costs of the nodes in `set`. Indices outside the catalog
    /// contribute nothing.
    pub fn cost_of(&self, set: &ActiveSet) -> u32 {
        set.iter()
            .filter_map(|idx| self.get(idx))
            .fold(0u32, |acc, node| acc.saturating_add(node.cost))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn build(nodes: Vec<NodeDef>) -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::new();
        builder.extend(nodes)?;
        builder.build()
    }

    #[test]
    fn builds_a_star_catalog() {
        let catalog = test_utils::star_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.root(), NodeIdx(0));
        assert_eq!(catalog.index_of("origin"), Some(NodeIdx(0)));
        assert_eq!(catalog.index_of("missing"), None);
        assert!(catalog.node("north").is_some());
    }

    #[test]
    fn indices_follow_registration_order() {
        let catalog = test_utils::line_catalog(5);
        let keys: Vec<&str> = catalog.iter().map(|(_, n)| n.key.as_str()).collect();
        assert_eq!(keys, vec!["n0", "n1", "n2", "n3", "n4"]);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(CatalogBuilder::new().build().unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn duplicate_keys_are_rejected_at_registration() {
        let mut builder = CatalogBuilder::new();
        builder.add(NodeDef::new("origin", Tier::Start, 0)).unwrap();
        let err = builder
            .add(NodeDef::new("origin", Tier::Small, 1))
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateNode("origin".into()));
    }

    #[test]
    fn unknown_connections_are_rejected() {
        let err = build(vec![NodeDef::new("origin", Tier::Start, 0).connect("nowhere")]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownConnection { .. }));
    }

    #[test]
    fn self_connections_are_rejected() {
        let err = build(vec![NodeDef::new("origin", Tier::Start, 0).connect("origin")]).unwrap_err();
        assert_eq!(err, CatalogError::SelfConnection("origin".into()));
    }

    #[test]
    fn root_rules_are_enforced() {
        let err = build(vec![NodeDef::new("a", Tier::Small, 1)]).unwrap_err();
        assert_eq!(err, CatalogError::MissingRoot);

        let err = build(vec![
            NodeDef::new("a", Tier::Start, 0).connect("b"),
            NodeDef::new("b", Tier::Start, 0),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::MultipleRoots { .. }));

        let err = build(vec![NodeDef::new("a", Tier::Start, 3)]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::RootHasCost {
                node: "a".into(),
                cost: 3
            }
        );
    }

    #[test]
    fn zero_multipliers_are_rejected() {
        let err = build(vec![
            NodeDef::new("origin", Tier::Start, 0),
            NodeDef::new("null", Tier::Small, 1)
                .effect(Stat::Damage, 0.0)
                .connect("origin"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::NonPositiveMultiplier {
                node: "null".into(),
                stat: Stat::Damage
            }
        );
    }

    #[test]
    fn unrepresentable_effect_values_are_errors() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e30] {
            let err = NodeDef::new("bad", Tier::Small, 1)
                .try_effect(Stat::Armor, value)
                .unwrap_err();
            assert_eq!(
                err,
                CatalogError::InvalidValue {
                    node: "bad".into(),
                    stat: Stat::Armor
                }
            );
        }

        let node = NodeDef::new("ok", Tier::Small, 1)
            .try_effect(Stat::Armor, 2.5)
            .unwrap();
        assert_eq!(node.effects[0].value, test_utils::fixed(2.5));
    }

    #[test]
    #[should_panic(expected = "unrepresentable value for armor")]
    fn effect_panics_on_nan() {
        let _ = NodeDef::new("bad", Tier::Small, 1).effect(Stat::Armor, f64::NAN);
    }

    #[test]
    fn negative_additive_values_are_allowed() {
        let catalog = build(vec![
            NodeDef::new("origin", Tier::Start, 0),
            NodeDef::new("glass", Tier::Keystone, 3)
                .effect(Stat::MaxHealth, -50.0)
                .connect("origin"),
        ]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn islands_are_rejected() {
        let err = build(vec![
            NodeDef::new("origin", Tier::Start, 0).connect("a"),
            NodeDef::new("a", Tier::Small, 1),
            NodeDef::new("island", Tier::Small, 1),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::Unreachable {
                node: "island".into()
            }
        );
    }

    #[test]
    fn one_directional_declarations_still_connect() {
        // Only the leaf declares the edge; the root lists nothing.
        let catalog = build(vec![
            NodeDef::new("origin", Tier::Start, 0),
            NodeDef::new("leaf", Tier::Small, 1).connect("origin"),
        ]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn costs_are_summed() {
        let catalog = test_utils::line_catalog(4);
        assert_eq!(catalog.total_cost(), 3);
        let set = ActiveSet::from_keys(&catalog, ["n0", "n1", "n2"]);
        assert_eq!(catalog.cost_of(&set), 2);
    }
}
