use serde::{Deserialize, Serialize};

/// Position of a node in catalog order. Doubles as the node's bit index in
/// build codes. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIdx(pub u16);

impl NodeIdx {
    /// The index as a `usize`, for slice lookups.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by [`Session::subscribe`](crate::session::Session::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_idx_orders_by_position() {
        assert!(NodeIdx(0) < NodeIdx(1));
        assert_eq!(NodeIdx(7).index(), 7);
    }

    #[test]
    fn node_idx_displays_as_bare_position() {
        assert_eq!(NodeIdx(5).to_string(), "5");
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(NodeIdx(0), "origin");
        map.insert(NodeIdx(1), "sharpened_edge");
        assert_eq!(map[&NodeIdx(1)], "sharpened_edge");
    }
}
