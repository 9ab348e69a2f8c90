//! Streak tracking and tier migration after each answer.
//!
//! Right answers build a right-streak, wrong answers a wrong-streak. Reaching a
//! tier's threshold moves the entry one step and restarts the streak at 1 in
//! the new tier. Using the hint caps the streak at 1, and a hinted answer in
//! the old tier sends the entry back to known.

use tracing::debug;

use crate::error::{IntegrityError, Result};
use crate::registry::{report, TierRegistry};
use crate::types::{Entry, EntryId, StreakDirection, Thresholds, Tier};

/// What the user did with a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct { used_hint: bool },
    Incorrect,
}

/// Direction of a tier change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Stayed,
    Promoted,
    Demoted,
}

/// Streak and tier after applying one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub direction: StreakDirection,
    pub count: u32,
    pub tier: Tier,
}

/// Result of recording an answer against an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub id: EntryId,
    pub from: Tier,
    pub to: Tier,
    pub direction: StreakDirection,
    pub streak: u32,
}

impl Outcome {
    pub fn movement(&self) -> Movement {
        match self.to.weight().cmp(&self.from.weight()) {
            std::cmp::Ordering::Greater => Movement::Promoted,
            std::cmp::Ordering::Less => Movement::Demoted,
            std::cmp::Ordering::Equal => Movement::Stayed,
        }
    }
}

/// Exact, case-sensitive comparison with the entry's answer.
pub fn is_correct(entry: &Entry, response: &str) -> bool {
    entry.answer == response
}

/// The promotion/demotion rules with their thresholds.
#[derive(Debug, Clone, Default)]
pub struct Progression {
    pub thresholds: Thresholds,
}

impl Progression {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Compute the next streak and tier without touching any registry.
    pub fn next_step(
        &self,
        tier: Tier,
        direction: StreakDirection,
        count: u32,
        answer: Answer,
    ) -> Step {
        match answer {
            Answer::Correct { used_hint: true } => {
                // Hinted answers never earn more than a single right.
                let step = Step {
                    direction: StreakDirection::Right,
                    count: 1,
                    tier,
                };
                if tier == Tier::Old {
                    return Step {
                        tier: Tier::Known,
                        ..step
                    };
                }
                self.promote(step, tier)
            }
            Answer::Correct { used_hint: false } => {
                let count = match direction {
                    StreakDirection::Right => count.saturating_add(1),
                    StreakDirection::Wrong => 1,
                };
                self.promote(
                    Step {
                        direction: StreakDirection::Right,
                        count,
                        tier,
                    },
                    tier,
                )
            }
            Answer::Incorrect => {
                let count = match direction {
                    StreakDirection::Wrong => count.saturating_add(1),
                    StreakDirection::Right => 1,
                };
                let step = Step {
                    direction: StreakDirection::Wrong,
                    count,
                    tier,
                };
                match (self.thresholds.demotion(tier), tier.demoted()) {
                    (Some(limit), Some(lower)) if count >= limit => Step {
                        count: 1,
                        tier: lower,
                        ..step
                    },
                    _ => step,
                }
            }
        }
    }

    fn promote(&self, step: Step, asked_from: Tier) -> Step {
        match (self.thresholds.promotion(asked_from), asked_from.promoted()) {
            (Some(limit), Some(higher)) if step.count >= limit => Step {
                count: 1,
                tier: higher,
                ..step
            },
            _ => step,
        }
    }

    /// Record an answer for `id`, updating its streak and moving it between tiers.
    pub fn record(
        &self,
        registry: &mut TierRegistry,
        id: EntryId,
        answer: Answer,
    ) -> Result<Outcome> {
        let entry = registry
            .get_mut(id)
            .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
        let from = entry.tier;
        let step = self.next_step(from, entry.streak_direction, entry.streak_count, answer);
        entry.streak_direction = step.direction;
        entry.streak_count = step.count;

        if step.tier != from {
            registry.move_to_tier(id, step.tier)?;
        }

        let outcome = Outcome {
            id,
            from,
            to: step.tier,
            direction: step.direction,
            streak: step.count,
        };
        debug!(%id, ?answer, %from, to = %outcome.to, streak = outcome.streak, "recorded answer");
        Ok(outcome)
    }
}
