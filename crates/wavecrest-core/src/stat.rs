//! Stat names and their composition rules.
//!
//! Every stat is classified once, here, as either additive or multiplicative.
//! Combat systems read [`ComputedModifiers`](crate::compose::ComputedModifiers)
//! and rely on that classification: moving a stat from one kind to the other
//! is a breaking change for every consumer.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed64, f64_to_fixed64};

/// How contributions to a stat combine across active nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Identity 0, contributions are summed.
    Additive,
    /// Identity 1, contributions are multiplied.
    Multiplicative,
}

impl StatKind {
    /// The value a stat of this kind holds when no node touches it.
    pub fn identity(self) -> Fixed64 {
        match self {
            StatKind::Additive => Fixed64::ZERO,
            StatKind::Multiplicative => Fixed64::ONE,
        }
    }

    /// Fold one contribution into an accumulator.
    pub fn combine(self, acc: Fixed64, value: Fixed64) -> Fixed64 {
        match self {
            StatKind::Additive => acc.saturating_add(value),
            StatKind::Multiplicative => acc.saturating_mul(value),
        }
    }
}

/// A modifier a node can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    // -- Additive --
    MaxHealth,
    HealthRegen,
    Armor,
    /// Fraction of incoming damage ignored. Capped below 1.0.
    DamageReduction,
    CritChance,
    CritDamage,
    DodgeChance,
    Lifesteal,
    ProjectileCount,
    Pierce,
    PickupRadius,

    // -- Multiplicative --
    Damage,
    AttackSpeed,
    MoveSpeed,
    ProjectileSpeed,
    AreaSize,
    /// Multiplier on ability cooldown durations (below 1 is faster).
    CooldownRate,
    ExperienceGain,
    KnockbackForce,
}

/// Ceiling on summed damage reduction, so no build can ignore all damage.
pub const DAMAGE_REDUCTION_CAP: f64 = 0.85;

/// Ceiling on summed dodge chance.
pub const DODGE_CHANCE_CAP: f64 = 0.6;

impl Stat {
    /// Every stat, additive ones first, in declaration order.
    pub const ALL: [Stat; 19] = [
        Stat::MaxHealth,
        Stat::HealthRegen,
        Stat::Armor,
        Stat::DamageReduction,
        Stat::CritChance,
        Stat::CritDamage,
        Stat::DodgeChance,
        Stat::Lifesteal,
        Stat::ProjectileCount,
        Stat::Pierce,
        Stat::PickupRadius,
        Stat::Damage,
        Stat::AttackSpeed,
        Stat::MoveSpeed,
        Stat::ProjectileSpeed,
        Stat::AreaSize,
        Stat::CooldownRate,
        Stat::ExperienceGain,
        Stat::KnockbackForce,
    ];

    /// The composition rule for this stat.
    pub fn kind(self) -> StatKind {
        match self {
            Stat::MaxHealth
            | Stat::HealthRegen
            | Stat::Armor
            | Stat::DamageReduction
            | Stat::CritChance
            | Stat::CritDamage
            | Stat::DodgeChance
            | Stat::Lifesteal
            | Stat::ProjectileCount
            | Stat::Pierce
            | Stat::PickupRadius => StatKind::Additive,

            Stat::Damage
            | Stat::AttackSpeed
            | Stat::MoveSpeed
            | Stat::ProjectileSpeed
            | Stat::AreaSize
            | Stat::CooldownRate
            | Stat::ExperienceGain
            | Stat::KnockbackForce => StatKind::Multiplicative,
        }
    }

    /// Hard ceiling applied after composition, if any.
    pub fn cap(self) -> Option<Fixed64> {
        match self {
            Stat::DamageReduction => Some(f64_to_fixed64(DAMAGE_REDUCTION_CAP)),
            Stat::CritChance => Some(Fixed64::ONE),
            Stat::DodgeChance => Some(f64_to_fixed64(DODGE_CHANCE_CAP)),
            Stat::MaxHealth
            | Stat::HealthRegen
            | Stat::Armor
            | Stat::CritDamage
            | Stat::Lifesteal
            | Stat::ProjectileCount
            | Stat::Pierce
            | Stat::PickupRadius
            | Stat::Damage
            | Stat::AttackSpeed
            | Stat::MoveSpeed
            | Stat::ProjectileSpeed
            | Stat::AreaSize
            | Stat::CooldownRate
            | Stat::ExperienceGain
            | Stat::KnockbackForce => None,
        }
    }

    /// Snake-case name as it appears in data files.
    pub fn name(self) -> &'static str {
        match self {
            Stat::MaxHealth => "max_health",
            Stat::HealthRegen => "health_regen",
            Stat::Armor => "armor",
            Stat::DamageReduction => "damage_reduction",
            Stat::CritChance => "crit_chance",
            Stat::CritDamage => "crit_damage",
            Stat::DodgeChance => "dodge_chance",
            Stat::Lifesteal => "lifesteal",
            Stat::ProjectileCount => "projectile_count",
            Stat::Pierce => "pierce",
            Stat::PickupRadius => "pickup_radius",
            Stat::Damage => "damage",
            Stat::AttackSpeed => "attack_speed",
            Stat::MoveSpeed => "move_speed",
            Stat::ProjectileSpeed => "projectile_speed",
            Stat::AreaSize => "area_size",
            Stat::CooldownRate => "cooldown_rate",
            Stat::ExperienceGain => "experience_gain",
            Stat::KnockbackForce => "knockback_force",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
