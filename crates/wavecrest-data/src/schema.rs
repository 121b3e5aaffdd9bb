//! Serde data file structs for skill graph definitions.
//!
//! These structs define the on-disk format of a catalog. They are
//! deserialized from RON, JSON, or TOML and then converted into
//! [`NodeDef`](wavecrest_core::catalog::NodeDef)s by the loader. Stat and
//! behavior names are closed enums, so a misspelled name is a parse error
//! rather than a silently ignored string.

use serde::Deserialize;
use wavecrest_core::behavior::Behavior;
use wavecrest_core::catalog::Tier;
use wavecrest_core::stat::Stat;

/// Top-level catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogData {
    pub nodes: Vec<NodeData>,
}

/// A node definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeData {
    pub key: String,
    /// Display name; the key is used when empty.
    #[serde(default)]
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub cost: u32,
    /// `(stat, value)` pairs, in order.
    #[serde(default)]
    pub effects: Vec<(Stat, f64)>,
    #[serde(default)]
    pub behaviors: Vec<Behavior>,
    #[serde(default)]
    pub connections: Vec<String>,
}
