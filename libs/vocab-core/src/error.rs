//! Error types for vocab-core.

use crate::types::{EntryId, Tier};
use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// A record was refused because a required field is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question is blank")]
    EmptyQuestion,

    #[error("answer is blank")]
    EmptyAnswer,
}

/// A broken registry invariant. These point at a bug in the engine, not at bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("entry {0} does not exist")]
    UnknownEntry(EntryId),

    #[error("entry {id} is not in the {tier} list")]
    EntryNotInTier { id: EntryId, tier: Tier },

    #[error("entry {id} is already in the {tier} list")]
    AlreadyPlaced { id: EntryId, tier: Tier },

    #[error("reindexing {tier}: counted {counted} entries, list claims {stored}")]
    ReindexMismatch {
        tier: Tier,
        counted: usize,
        stored: usize,
    },

    #[error("entry {id} sits in the {holder} list but is marked {marked}")]
    StrayEntry {
        id: EntryId,
        holder: Tier,
        marked: Tier,
    },

    #[error("no entry at position {position} of the {tier} list ({count} entries)")]
    PositionMismatch {
        tier: Tier,
        position: usize,
        count: usize,
    },
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid entry: {0}")]
    Validation(#[from] ValidationError),

    #[error("integrity violation: {0}")]
    Integrity(#[from] IntegrityError),
}

impl EngineError {
    /// True for errors caused by the caller's data rather than an engine defect.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errors from reading or writing a vocab file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_validation() {
        let error = EngineError::from(ValidationError::EmptyAnswer);
        assert_eq!(error.to_string(), "invalid entry: answer is blank");
        assert!(error.is_validation());
    }

    #[test]
    fn display_integrity() {
        let error = EngineError::from(IntegrityError::ReindexMismatch {
            tier: Tier::Known,
            counted: 2,
            stored: 3,
        });
        assert_eq!(
            error.to_string(),
            "integrity violation: reindexing known: counted 2 entries, list claims 3"
        );
        assert!(!error.is_validation());
    }

    #[test]
    fn display_not_in_tier() {
        let error = IntegrityError::EntryNotInTier {
            id: EntryId(7),
            tier: Tier::NeedToLearn,
        };
        assert_eq!(error.to_string(), "entry #7 is not in the need-to-learn list");
    }
}
