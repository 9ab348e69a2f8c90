//! Core types for the vocab engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proficiency tier. Each entry lives in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NeedToLearn,
    Normal,
    Known,
    Old,
}

impl Tier {
    /// All tiers in the fixed iteration order used for scans and dumps.
    pub const ALL: [Tier; 4] = [Tier::NeedToLearn, Tier::Normal, Tier::Known, Tier::Old];

    /// Mastery weight (0-3), also the `known` column of the vocab file.
    pub fn weight(self) -> u8 {
        match self {
            Self::NeedToLearn => 0,
            Self::Normal => 1,
            Self::Known => 2,
            Self::Old => 3,
        }
    }

    /// Create from mastery weight.
    pub fn from_weight(weight: u8) -> Option<Self> {
        match weight {
            0 => Some(Self::NeedToLearn),
            1 => Some(Self::Normal),
            2 => Some(Self::Known),
            3 => Some(Self::Old),
            _ => None,
        }
    }

    /// Slot of this tier in per-tier arrays.
    pub(crate) fn index(self) -> usize {
        self.weight() as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedToLearn => "need-to-learn",
            Self::Normal => "normal",
            Self::Known => "known",
            Self::Old => "old",
        }
    }

    /// Tier reached on promotion, if any.
    pub fn promoted(self) -> Option<Self> {
        match self {
            Self::NeedToLearn => Some(Self::Normal),
            Self::Normal => Some(Self::Known),
            Self::Known => Some(Self::Old),
            Self::Old => None,
        }
    }

    /// Tier reached on demotion, if any.
    ///
    /// Normal drops straight to NeedToLearn and Old drops back to Normal,
    /// skipping Known.
    pub fn demoted(self) -> Option<Self> {
        match self {
            Self::NeedToLearn => None,
            Self::Normal => Some(Self::NeedToLearn),
            Self::Known => Some(Self::Normal),
            Self::Old => Some(Self::Normal),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of outcome `streak_count` is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakDirection {
    Right,
    Wrong,
}

impl Default for StreakDirection {
    fn default() -> Self {
        Self::Wrong
    }
}

/// Stable identifier of an entry inside a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vocabulary item and its learning state.
///
/// `tier` and `position` are owned by the registry and only readable from
/// outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub streak_direction: StreakDirection,
    pub streak_count: u32,
    pub(crate) tier: Tier,
    pub(crate) position: usize,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// 1-based rank within the current tier.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Never answered since it was created or marked as priority.
    pub fn is_untested(&self) -> bool {
        self.streak_count == 0
    }

    /// Flatten into a record for the saver.
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            question: self.question.clone(),
            answer: self.answer.clone(),
            info: self.info.clone(),
            hint: self.hint.clone(),
            streak_direction: self.streak_direction,
            streak_count: self.streak_count,
            tier: self.tier,
        }
    }
}

/// Flat entry record exchanged with loaders and savers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub streak_direction: StreakDirection,
    #[serde(default)]
    pub streak_count: u32,
    pub tier: Tier,
}

impl EntryRecord {
    /// Fresh, untested record. New entries start in the normal tier.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            info: None,
            hint: None,
            streak_direction: StreakDirection::default(),
            streak_count: 0,
            tier: Tier::Normal,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn in_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_streak(mut self, direction: StreakDirection, count: u32) -> Self {
        self.streak_direction = direction;
        self.streak_count = count;
        self
    }
}

/// Streak lengths that move an entry between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub need_to_learn_to_normal: u32,
    pub normal_to_need_to_learn: u32,
    pub normal_to_known: u32,
    pub known_to_normal: u32,
    pub known_to_old: u32,
    pub old_to_normal: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            need_to_learn_to_normal: 5,
            normal_to_need_to_learn: 3,
            normal_to_known: 5,
            known_to_normal: 2,
            known_to_old: 3,
            old_to_normal: 1,
        }
    }
}

impl Thresholds {
    /// Right-streak needed to leave `tier` upwards.
    pub fn promotion(&self, tier: Tier) -> Option<u32> {
        match tier {
            Tier::NeedToLearn => Some(self.need_to_learn_to_normal),
            Tier::Normal => Some(self.normal_to_known),
            Tier::Known => Some(self.known_to_old),
            Tier::Old => None,
        }
    }

    /// Wrong-streak needed to leave `tier` downwards.
    pub fn demotion(&self, tier: Tier) -> Option<u32> {
        match tier {
            Tier::NeedToLearn => None,
            Tier::Normal => Some(self.normal_to_need_to_learn),
            Tier::Known => Some(self.known_to_normal),
            Tier::Old => Some(self.old_to_normal),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    /// Longest text field kept when reading a vocab file, in characters.
    pub max_text_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            max_text_length: 255,
        }
    }
}
