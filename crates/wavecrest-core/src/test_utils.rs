//! Shared test helpers for unit tests, property tests and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::behavior::Behavior;
use crate::catalog::{Catalog, CatalogBuilder, NodeDef, Tier};
use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::stat::Stat;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    f64_to_fixed64(v)
}

// ===========================================================================
// Catalogs
// ===========================================================================

/// Build a catalog from definitions, panicking on validation errors.
pub fn catalog_of(nodes: impl IntoIterator<Item = NodeDef>) -> Catalog {
    let mut builder = CatalogBuilder::new();
    builder.extend(nodes).expect("test catalog nodes must register");
    builder.build().expect("test catalog must validate")
}

/// `origin` with three spokes:
///
/// | key   | cost | effects                              | behavior |
/// |-------|------|--------------------------------------|----------|
/// | north | 1    | +20 max_health, x1.5 damage          | ricochet |
/// | east  | 2    | +30 max_health                       | thorns   |
/// | west  | 3    | x2 damage                            |          |
pub fn star_catalog() -> Catalog {
    catalog_of([
        NodeDef::new("origin", Tier::Start, 0).connect("north"),
        NodeDef::new("north", Tier::Small, 1)
            .branch("offense")
            .effect(Stat::MaxHealth, 20.0)
            .effect(Stat::Damage, 1.5)
            .behavior(Behavior::Ricochet),
        NodeDef::new("east", Tier::Small, 2)
            .branch("defense")
            .effect(Stat::MaxHealth, 30.0)
            .behavior(Behavior::Thorns)
            .connect("origin"),
        NodeDef::new("west", Tier::Notable, 3)
            .branch("offense")
            .effect(Stat::Damage, 2.0)
            .connect("origin"),
    ])
}

/// A path `n0 - n1 - ... - n{len-1}` where `n0` is the root and every other
/// node costs 1 and adds +1 armor and x1.1 attack speed.
pub fn line_catalog(len: usize) -> Catalog {
    let nodes = (0..len.max(1)).map(|i| {
        if i == 0 {
            NodeDef::new("n0", Tier::Start, 0)
        } else {
            NodeDef::new(format!("n{i}"), Tier::Small, 1)
                .effect(Stat::Armor, 1.0)
                .effect(Stat::AttackSpeed, 1.1)
                .connect(format!("n{}", i - 1))
        }
    });
    catalog_of(nodes)
}

/// A `width` x `height` grid with the root in the top-left corner. Node
/// `g{x}_{y}` connects right and down; costs grow with distance from the
/// root. Every node carries one additive and one multiplicative effect so
/// composition exercises rounding.
pub fn grid_catalog(width: usize, height: usize) -> Catalog {
    let width = width.max(1);
    let height = height.max(1);
    let mut nodes = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let key = format!("g{x}_{y}");
            let mut node = if x == 0 && y == 0 {
                NodeDef::new(key, Tier::Start, 0)
            } else {
                NodeDef::new(key, Tier::Small, ((x + y) % 3 + 1) as u32)
                    .effect(Stat::DamageReduction, 0.07)
                    .effect(Stat::MoveSpeed, 1.0 + 0.013 * (x * height + y) as f64)
            };
            if x + 1 < width {
                node = node.connect(format!("g{}_{y}", x + 1));
            }
            if y + 1 < height {
                node = node.connect(format!("g{x}_{}", y + 1));
            }
            nodes.push(node);
        }
    }

    catalog_of(nodes)
}
