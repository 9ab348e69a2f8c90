//! Mastery score and summary statistics.

use crate::registry::TierRegistry;
use crate::types::{EntryId, StreakDirection, Tier};

/// Holder of the longest current streak of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakLeader {
    pub id: EntryId,
    pub question: String,
    pub count: u32,
}

/// Entry counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub need_to_learn: usize,
    pub normal: usize,
    pub known: usize,
    pub old: usize,
}

/// Summary of the whole registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub mastery: f64,
    pub tiers: TierCounts,
    pub untested: usize,
    pub last_right: usize,
    pub last_wrong: usize,
    pub with_info: usize,
    pub with_hint: usize,
    pub longest_right: Option<StreakLeader>,
    pub longest_wrong: Option<StreakLeader>,
}

/// Overall mastery as a percentage, or `None` when there are no entries.
///
/// Each entry weighs 0 (need-to-learn) to 3 (old); 100% means everything is old.
pub fn mastery(registry: &TierRegistry) -> Option<f64> {
    let total = registry.len();
    if total == 0 {
        return None;
    }
    let weights: u64 = registry.iter().map(|e| u64::from(e.tier().weight())).sum();
    Some(100.0 * weights as f64 / (3.0 * total as f64))
}

/// Full statistics in one scan, or `None` when there are no entries.
pub fn statistics(registry: &TierRegistry) -> Option<Statistics> {
    let mastery = mastery(registry)?;

    let mut stats = Statistics {
        total: registry.len(),
        mastery,
        tiers: TierCounts {
            need_to_learn: registry.count(Tier::NeedToLearn),
            normal: registry.count(Tier::Normal),
            known: registry.count(Tier::Known),
            old: registry.count(Tier::Old),
        },
        untested: 0,
        last_right: 0,
        last_wrong: 0,
        with_info: 0,
        with_hint: 0,
        longest_right: None,
        longest_wrong: None,
    };

    let mut best_right = 0;
    let mut best_wrong = 0;
    for entry in registry.iter() {
        if entry.info.is_some() {
            stats.with_info += 1;
        }
        if entry.hint.is_some() {
            stats.with_hint += 1;
        }

        let leader = || StreakLeader {
            id: entry.id(),
            question: entry.question.clone(),
            count: entry.streak_count,
        };
        match entry.streak_direction {
            _ if entry.is_untested() => stats.untested += 1,
            StreakDirection::Right => {
                stats.last_right += 1;
                if entry.streak_count > best_right {
                    best_right = entry.streak_count;
                    stats.longest_right = Some(leader());
                }
            }
            StreakDirection::Wrong => {
                stats.last_wrong += 1;
                if entry.streak_count > best_wrong {
                    best_wrong = entry.streak_count;
                    stats.longest_wrong = Some(leader());
                }
            }
        }
    }

    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_entry_per_tier_is_half_mastered() {
        let mut registry = TierRegistry::new();
        for tier in Tier::ALL {
            registry
                .insert(EntryRecord::new(tier.as_str(), "x").in_tier(tier))
                .unwrap();
        }
        assert_eq!(mastery(&registry), Some(50.0));
    }

    #[test]
    fn empty_registry_has_no_score() {
        let registry = TierRegistry::new();
        assert_eq!(mastery(&registry), None);
        assert_eq!(statistics(&registry), None);
    }

    #[test]
    fn all_old_is_full_mastery() {
        let mut registry = TierRegistry::new();
        registry
            .insert(EntryRecord::new("a", "b").in_tier(Tier::Old))
            .unwrap();
        assert_eq!(mastery(&registry), Some(100.0));
    }

    #[test]
    fn statistics_count_streaks_and_extras() {
        let mut registry = TierRegistry::new();
        registry
            .insert(EntryRecord::new("fresh", "a").with_info("informal"))
            .unwrap();
        let first_long = registry
            .insert(
                EntryRecord::new("right4", "b")
                    .in_tier(Tier::NeedToLearn)
                    .with_streak(StreakDirection::Right, 4),
            )
            .unwrap();
        registry
            .insert(
                EntryRecord::new("right4-later", "c")
                    .in_tier(Tier::Known)
                    .with_streak(StreakDirection::Right, 4)
                    .with_hint("starts with c"),
            )
            .unwrap();
        let wrong = registry
            .insert(
                EntryRecord::new("wrong2", "d").with_streak(StreakDirection::Wrong, 2),
            )
            .unwrap();

        let stats = statistics(&registry).unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.untested, 1);
        assert_eq!(stats.last_right, 2);
        assert_eq!(stats.last_wrong, 1);
        assert_eq!(stats.with_info, 1);
        assert_eq!(stats.with_hint, 1);
        assert_eq!(
            stats.tiers,
            TierCounts {
                need_to_learn: 1,
                normal: 2,
                known: 1,
                old: 0
            }
        );
        // need-to-learn is scanned first, so it keeps the tie
        assert_eq!(stats.longest_right.map(|l| l.id), Some(first_long));
        assert_eq!(
            stats.longest_wrong,
            Some(StreakLeader {
                id: wrong,
                question: "wrong2".to_string(),
                count: 2
            })
        );
    }
}
