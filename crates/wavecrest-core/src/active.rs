use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::id::NodeIdx;

/// A set of unlocked nodes, iterated in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ActiveSet(BTreeSet<NodeIdx>);

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing only the catalog's root.
    pub fn with_root(catalog: &Catalog) -> Self {
        let mut set = Self::new();
        set.insert(catalog.root());
        set
    }

    /// Resolve keys against a catalog. Keys the catalog does not know are
    /// dropped rather than reported, so a set from another catalog version
    /// degrades to its known subset.
    pub fn from_keys<'a>(catalog: &Catalog, keys: impl IntoIterator<Item = &'a str>) -> Self {
        keys.into_iter()
            .filter_map(|key| catalog.index_of(key))
            .collect()
    }

    /// Returns `true` if `idx` was not already present.
    pub fn insert(&mut self, idx: NodeIdx) -> bool {
        self.0.insert(idx)
    }

    pub fn contains(&self, idx: NodeIdx) -> bool {
        self.0.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.0.iter().copied()
    }

    /// Drop every index that does not name a node in `catalog`.
    pub fn retain_known(&mut self, catalog: &Catalog) {
        self.0.retain(|idx| catalog.contains(*idx));
    }

    /// Node keys in catalog order. Unknown indices are skipped.
    pub fn keys<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        self.iter()
            .filter_map(|idx| catalog.get(idx))
            .map(|node| node.key.as_str())
            .collect()
    }
}

impl FromIterator<NodeIdx> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = NodeIdx>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<NodeIdx> for ActiveSet {
    fn extend<I: IntoIterator<Item = NodeIdx>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn with_root_holds_only_the_root() {
        let catalog = test_utils::star_catalog();
        let set = ActiveSet::with_root(&catalog);
        assert_eq!(set.len(), 1);
        assert!(set.contains(catalog.root()));
    }

    #[test]
    fn from_keys_drops_unknown_keys() {
        let catalog = test_utils::star_catalog();
        let set = ActiveSet::from_keys(&catalog, ["origin", "north", "from_a_newer_patch"]);
        assert_eq!(set.keys(&catalog), vec!["origin", "north"]);
    }

    #[test]
    fn iteration_is_in_catalog_order() {
        let set: ActiveSet = [NodeIdx(3), NodeIdx(0), NodeIdx(2)].into_iter().collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![NodeIdx(0), NodeIdx(2), NodeIdx(3)]
        );
    }

    #[test]
    fn retain_known_drops_out_of_range_indices() {
        let catalog = test_utils::star_catalog();
        let mut set: ActiveSet = [NodeIdx(0), NodeIdx(1), NodeIdx(40)].into_iter().collect();
        set.retain_known(&catalog);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(NodeIdx(40)));
    }
}
