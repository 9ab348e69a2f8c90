//! Picks the next entry to test.
//!
//! A roll of 1-100 chooses a tier by fixed bands (roughly 32% need-to-learn,
//! 62% normal, 5% known, 1% old). Need-to-learn is never chosen twice in a
//! row by the roll alone, and an empty tier falls back through a fixed order
//! until a non-empty one turns up. The entry is then drawn uniformly by
//! position within that tier.

use rand::Rng;
use tracing::debug;

use crate::error::{IntegrityError, Result};
use crate::registry::TierRegistry;
use crate::types::{EntryId, Tier};

/// The drawn entry and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub id: EntryId,
    pub tier: Tier,
    pub position: usize,
    pub roll: u8,
}

/// Tier named by a roll before any anti-repetition or fallback rule.
pub fn band_for_roll(roll: u8) -> Tier {
    match roll {
        0..=32 => Tier::NeedToLearn,
        33..=94 => Tier::Normal,
        95..=99 => Tier::Known,
        _ => Tier::Old,
    }
}

/// Selection state carried between draws.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    recently_used_need_to_learn: bool,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous draw came from need-to-learn.
    pub fn recently_used_need_to_learn(&self) -> bool {
        self.recently_used_need_to_learn
    }

    /// Settle on a non-empty tier for `roll` (1-100).
    ///
    /// Returns `None` when every tier is empty; the selector state is only
    /// updated when a tier is found.
    pub fn choose_tier(&mut self, roll: u8, registry: &TierRegistry) -> Option<Tier> {
        let mut flag = self.recently_used_need_to_learn;
        let mut tier = band_for_roll(roll);
        if tier == Tier::Normal {
            flag = false;
        }

        if tier == Tier::NeedToLearn {
            if flag {
                tier = Tier::Normal;
                flag = false;
            } else {
                flag = true;
            }
        }

        let empty = |tier: Tier| registry.count(tier) == 0;
        if empty(tier) {
            tier = Tier::Normal;
        }
        if empty(tier) && !flag {
            tier = Tier::NeedToLearn;
        }
        if empty(tier) && roll % 10 == 5 {
            tier = Tier::Old;
        }
        if empty(tier) {
            tier = Tier::Known;
        }
        if empty(tier) {
            tier = Tier::Old;
        }
        if empty(tier) {
            tier = Tier::NeedToLearn;
            flag = true;
        }
        if empty(tier) {
            return None;
        }

        self.recently_used_need_to_learn = flag;
        Some(tier)
    }

    /// Draw the next entry, or `None` when there is nothing to test.
    pub fn select<R: Rng>(
        &mut self,
        registry: &TierRegistry,
        rng: &mut R,
    ) -> Result<Option<Selection>> {
        let roll: u8 = rng.random_range(1..=100);
        let Some(tier) = self.choose_tier(roll, registry) else {
            debug!(roll, "no entries to select from");
            return Ok(None);
        };

        let count = registry.count(tier);
        let position = rng.random_range(1..=count);
        let entry = registry.entry_at(tier, position).ok_or_else(|| {
            let err = IntegrityError::PositionMismatch {
                tier,
                position,
                count,
            };
            tracing::error!(%err, roll, "indexing error during selection");
            err
        })?;

        debug!(roll, %tier, position, id = %entry.id(), "selected entry");
        Ok(Some(Selection {
            id: entry.id(),
            tier,
            position,
            roll,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry(counts: [usize; 4]) -> TierRegistry {
        let mut registry = TierRegistry::new();
        for (tier, count) in Tier::ALL.into_iter().zip(counts) {
            for i in 0..count {
                registry
                    .insert(EntryRecord::new(format!("{tier}{i}"), "x").in_tier(tier))
                    .unwrap();
            }
        }
        registry
    }

    #[test]
    fn bands_match_boundaries() {
        assert_eq!(band_for_roll(1), Tier::NeedToLearn);
        assert_eq!(band_for_roll(32), Tier::NeedToLearn);
        assert_eq!(band_for_roll(33), Tier::Normal);
        assert_eq!(band_for_roll(94), Tier::Normal);
        assert_eq!(band_for_roll(95), Tier::Known);
        assert_eq!(band_for_roll(99), Tier::Known);
        assert_eq!(band_for_roll(100), Tier::Old);
    }

    #[test]
    fn need_to_learn_not_chosen_twice_running() {
        let registry = registry([3, 3, 3, 3]);
        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(10, &registry), Some(Tier::NeedToLearn));
        assert!(selector.recently_used_need_to_learn());
        assert_eq!(selector.choose_tier(10, &registry), Some(Tier::Normal));
        assert!(!selector.recently_used_need_to_learn());
        assert_eq!(selector.choose_tier(10, &registry), Some(Tier::NeedToLearn));
    }

    #[test]
    fn known_roll_keeps_flag() {
        let registry = registry([3, 3, 3, 3]);
        let mut selector = Selector::new();
        selector.choose_tier(5, &registry);
        assert_eq!(selector.choose_tier(97, &registry), Some(Tier::Known));
        assert!(selector.recently_used_need_to_learn());
        assert_eq!(selector.choose_tier(60, &registry), Some(Tier::Normal));
        assert!(!selector.recently_used_need_to_learn());
    }

    #[test]
    fn empty_known_falls_back_to_normal() {
        let registry = registry([1, 2, 0, 1]);
        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(96, &registry), Some(Tier::Normal));
    }

    #[test]
    fn empty_normal_falls_back_to_need_to_learn_when_unflagged() {
        let registry = registry([2, 0, 1, 1]);
        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(50, &registry), Some(Tier::NeedToLearn));
        // The fallback itself does not raise the flag.
        assert!(!selector.recently_used_need_to_learn());
    }

    #[test]
    fn flagged_fallback_prefers_known_unless_roll_ends_in_five() {
        let registry = registry([0, 0, 1, 1]);

        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(2, &registry), Some(Tier::Known));
        assert!(selector.recently_used_need_to_learn());

        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(25, &registry), Some(Tier::Old));
    }

    #[test]
    fn substituted_need_to_learn_can_still_be_reached_by_fallback() {
        let registry = registry([2, 0, 0, 0]);
        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(3, &registry), Some(Tier::NeedToLearn));
        assert_eq!(selector.choose_tier(3, &registry), Some(Tier::NeedToLearn));
        assert!(!selector.recently_used_need_to_learn());
    }

    #[test]
    fn last_resort_need_to_learn_sets_flag() {
        let registry = registry([2, 0, 0, 0]);
        let mut selector = Selector::new();
        selector.choose_tier(3, &registry);
        assert_eq!(selector.choose_tier(97, &registry), Some(Tier::NeedToLearn));
        assert!(selector.recently_used_need_to_learn());
    }

    #[test]
    fn empty_registry_selects_nothing_and_keeps_state() {
        let registry = TierRegistry::new();
        let mut selector = Selector::new();
        assert_eq!(selector.choose_tier(10, &registry), None);
        assert!(!selector.recently_used_need_to_learn());

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(selector.select(&registry, &mut rng).unwrap(), None);
    }

    #[test]
    fn selection_never_comes_from_an_empty_tier() {
        let registry = registry([0, 4, 0, 2]);
        let mut selector = Selector::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let selection = selector.select(&registry, &mut rng).unwrap().unwrap();
            assert!(registry.count(selection.tier) > 0);
            let entry = registry.get(selection.id).unwrap();
            assert_eq!(entry.tier(), selection.tier);
            assert_eq!(entry.position(), selection.position);
        }
    }
}
