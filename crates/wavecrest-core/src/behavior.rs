//! Qualitative behavior flags unlocked by nodes.
//!
//! Unlike stats, behaviors carry no value: combat logic only asks whether a
//! flag is present. [`BehaviorSet`] is a bitmask over the closed
//! [`Behavior`] enumeration.

use serde::{Deserialize, Serialize};

/// A flag that switches on a piece of combat logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Projectiles bounce to a nearby enemy after a hit.
    Ricochet,
    /// Hits arc to additional enemies.
    ChainLightning,
    /// Killed enemies detonate.
    ExplodeOnKill,
    /// Contact damage is reflected to the attacker.
    Thorns,
    /// Survive one lethal hit per wave.
    SecondWind,
    /// Rotating projectiles circle the player.
    Orbitals,
    /// Nearby enemies are slowed.
    FrostAura,
    /// Damage rises as health falls.
    Berserk,
    /// Every Nth attack is empowered.
    Overcharge,
    /// Dashing grants brief invulnerability.
    PhaseDash,
    /// Pickups are pulled in from the whole arena.
    Magnetism,
    /// Damage taken is doubled.
    GlassCannon,
}

impl Behavior {
    /// Every behavior in declaration order.
    pub const ALL: [Behavior; 12] = [
        Behavior::Ricochet,
        Behavior::ChainLightning,
        Behavior::ExplodeOnKill,
        Behavior::Thorns,
        Behavior::SecondWind,
        Behavior::Orbitals,
        Behavior::FrostAura,
        Behavior::Berserk,
        Behavior::Overcharge,
        Behavior::PhaseDash,
        Behavior::Magnetism,
        Behavior::GlassCannon,
    ];

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// A set of [`Behavior`]s. Serialized as a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Behavior>", into = "Vec<Behavior>")]
pub struct BehaviorSet(u32);

impl BehaviorSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a behavior. Returns `true` if it was not already present.
    pub fn insert(&mut self, behavior: Behavior) -> bool {
        let had = self.contains(behavior);
        self.0 |= behavior.bit();
        !had
    }

    pub fn contains(&self, behavior: Behavior) -> bool {
        self.0 & behavior.bit() != 0
    }

    /// Set union.
    pub fn union(self, other: BehaviorSet) -> BehaviorSet {
        BehaviorSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate present behaviors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Behavior> + '_ {
        Behavior::ALL.into_iter().filter(|b| self.contains(*b))
    }
}

impl FromIterator<Behavior> for BehaviorSet {
    fn from_iter<I: IntoIterator<Item = Behavior>>(iter: I) -> Self {
        let mut set = BehaviorSet::empty();
        for behavior in iter {
            set.insert(behavior);
        }
        set
    }
}

impl From<Vec<Behavior>> for BehaviorSet {
    fn from(list: Vec<Behavior>) -> Self {
        list.into_iter().collect()
    }
}

impl From<BehaviorSet> for Vec<Behavior> {
    fn from(set: BehaviorSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_behavior_fits_in_the_mask() {
        assert!(Behavior::ALL.len() <= 32);
        let all: BehaviorSet = Behavior::ALL.into_iter().collect();
        assert_eq!(all.len(), Behavior::ALL.len());
    }

    #[test]
    fn insert_reports_novelty() {
        let mut set = BehaviorSet::empty();
        assert!(set.insert(Behavior::Thorns));
        assert!(!set.insert(Behavior::Thorns));
        assert!(set.contains(Behavior::Thorns));
        assert!(!set.contains(Behavior::Berserk));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn union_is_presence_of_either() {
        let a: BehaviorSet = [Behavior::Ricochet, Behavior::Orbitals].into_iter().collect();
        let b: BehaviorSet = [Behavior::Orbitals, Behavior::FrostAura].into_iter().collect();
        let u = a.union(b);
        assert_eq!(
            u.iter().collect::<Vec<_>>(),
            vec![Behavior::Ricochet, Behavior::Orbitals, Behavior::FrostAura]
        );
        assert_eq!(a.union(b), b.union(a));
    }

    #[test]
    fn serializes_as_a_list() {
        let set: BehaviorSet = [Behavior::SecondWind, Behavior::Ricochet].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["ricochet","second_wind"]"#);
        let back: BehaviorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn unknown_behavior_names_are_rejected() {
        let result: Result<BehaviorSet, _> = serde_json::from_str(r#"["ricochett"]"#);
        assert!(result.is_err());
    }
}
