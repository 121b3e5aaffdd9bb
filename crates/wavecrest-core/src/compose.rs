//! Stat composition: active node set in, [`ComputedModifiers`] out.
//!
//! Composition starts from the identity snapshot (additive stats 0,
//! multiplicative stats 1, no behaviors) and folds every effect of every
//! active node into it with [`StatKind::combine`]. Caps from [`Stat::cap`]
//! are applied once, after the fold.
//!
//! Fixed-point multiplication rounds at each step, so the fold always runs in
//! ascending catalog order regardless of how the caller ordered its input.
//! The same set therefore always composes to the same bits.

use std::collections::BTreeSet;

use crate::behavior::{Behavior, BehaviorSet};
use crate::catalog::Catalog;
use crate::fixed::{Fixed64, fixed64_to_f64};
use crate::id::NodeIdx;
use crate::stat::{Stat, StatKind};

/// A snapshot of every stat modifier plus the unlocked behavior flags.
///
/// Additive fields hold the summed contribution (0 when untouched);
/// multiplicative fields hold the product (1 when untouched).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputedModifiers {
    // -- Additive --
    pub max_health: Fixed64,
    pub health_regen: Fixed64,
    pub armor: Fixed64,
    pub damage_reduction: Fixed64,
    pub crit_chance: Fixed64,
    pub crit_damage: Fixed64,
    pub dodge_chance: Fixed64,
    pub lifesteal: Fixed64,
    pub projectile_count: Fixed64,
    pub pierce: Fixed64,
    pub pickup_radius: Fixed64,

    // -- Multiplicative --
    pub damage: Fixed64,
    pub attack_speed: Fixed64,
    pub move_speed: Fixed64,
    pub projectile_speed: Fixed64,
    pub area_size: Fixed64,
    pub cooldown_rate: Fixed64,
    pub experience_gain: Fixed64,
    pub knockback_force: Fixed64,

    pub behaviors: BehaviorSet,
}

impl ComputedModifiers {
    /// The snapshot of a build with no effects.
    pub fn identity() -> Self {
        let zero = StatKind::Additive.identity();
        let one = StatKind::Multiplicative.identity();
        Self {
            max_health: zero,
            health_regen: zero,
            armor: zero,
            damage_reduction: zero,
            crit_chance: zero,
            crit_damage: zero,
            dodge_chance: zero,
            lifesteal: zero,
            projectile_count: zero,
            pierce: zero,
            pickup_radius: zero,
            damage: one,
            attack_speed: one,
            move_speed: one,
            projectile_speed: one,
            area_size: one,
            cooldown_rate: one,
            experience_gain: one,
            knockback_force: one,
            behaviors: BehaviorSet::empty(),
        }
    }

    /// Read a stat by name.
    pub fn get(&self, stat: Stat) -> Fixed64 {
        match stat {
            Stat::MaxHealth => self.max_health,
            Stat::HealthRegen => self.health_regen,
            Stat::Armor => self.armor,
            Stat::DamageReduction => self.damage_reduction,
            Stat::CritChance => self.crit_chance,
            Stat::CritDamage => self.crit_damage,
            Stat::DodgeChance => self.dodge_chance,
            Stat::Lifesteal => self.lifesteal,
            Stat::ProjectileCount => self.projectile_count,
            Stat::Pierce => self.pierce,
            Stat::PickupRadius => self.pickup_radius,
            Stat::Damage => self.damage,
            Stat::AttackSpeed => self.attack_speed,
            Stat::MoveSpeed => self.move_speed,
            Stat::ProjectileSpeed => self.projectile_speed,
            Stat::AreaSize => self.area_size,
            Stat::CooldownRate => self.cooldown_rate,
            Stat::ExperienceGain => self.experience_gain,
            Stat::KnockbackForce => self.knockback_force,
        }
    }

    /// Read a stat as `f64`, for combat code that works in floats.
    pub fn to_f64(&self, stat: Stat) -> f64 {
        fixed64_to_f64(self.get(stat))
    }

    pub fn has(&self, behavior: Behavior) -> bool {
        self.behaviors.contains(behavior)
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut Fixed64 {
        match stat {
            Stat::MaxHealth => &mut self.max_health,
            Stat::HealthRegen => &mut self.health_regen,
            Stat::Armor => &mut self.armor,
            Stat::DamageReduction => &mut self.damage_reduction,
            Stat::CritChance => &mut self.crit_chance,
            Stat::CritDamage => &mut self.crit_damage,
            Stat::DodgeChance => &mut self.dodge_chance,
            Stat::Lifesteal => &mut self.lifesteal,
            Stat::ProjectileCount => &mut self.projectile_count,
            Stat::Pierce => &mut self.pierce,
            Stat::PickupRadius => &mut self.pickup_radius,
            Stat::Damage => &mut self.damage,
            Stat::AttackSpeed => &mut self.attack_speed,
            Stat::MoveSpeed => &mut self.move_speed,
            Stat::ProjectileSpeed => &mut self.projectile_speed,
            Stat::AreaSize => &mut self.area_size,
            Stat::CooldownRate => &mut self.cooldown_rate,
            Stat::ExperienceGain => &mut self.experience_gain,
            Stat::KnockbackForce => &mut self.knockback_force,
        }
    }

    fn apply(&mut self, stat: Stat, value: Fixed64) {
        let slot = self.slot_mut(stat);
        *slot = stat.kind().combine(*slot, value);
    }

    /// Clamp every capped stat to its ceiling.
    fn apply_caps(&mut self) {
        for stat in Stat::ALL {
            if let Some(cap) = stat.cap() {
                let slot = self.slot_mut(stat);
                *slot = (*slot).min(cap);
            }
        }
    }
}

impl Default for ComputedModifiers {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compose the modifiers of a set of active nodes.
///
/// Duplicate indices count once and indices outside the catalog are ignored.
/// The result depends only on which nodes are present, never on the order
/// they were supplied in.
pub fn compose(catalog: &Catalog, active: impl IntoIterator<Item = NodeIdx>) -> ComputedModifiers {
    let ordered: BTreeSet<NodeIdx> = active.into_iter().collect();
    let mut out = ComputedModifiers::identity();

    for node in ordered.into_iter().filter_map(|idx| catalog.get(idx)) {
        for effect in &node.effects {
            out.apply(effect.stat, effect.value);
        }
        out.behaviors = out.behaviors.union(node.behaviors);
    }

    out.apply_caps();
    out
}

/// The modifiers with every node in the catalog active.
pub fn max_modifiers(catalog: &Catalog) -> ComputedModifiers {
    compose(catalog, catalog.all_nodes().iter())
}

// ===========================================================================
// Tests
// ===========================================================================
