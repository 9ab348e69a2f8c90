//! Core vocab library shared by the trainer front-ends.
//!
//! Provides:
//! - Tier registry holding entries in four ordered mastery tiers
//! - Weighted random selection with an anti-repeat rule for need-to-learn
//! - Streak tracking with threshold-driven promotion and demotion
//! - Fuzzy lookup of entries by question or answer
//! - Mastery score and statistics
//! - Reader and writer for `.~sv`/`.csv` vocab files

pub mod editor;
pub mod error;
pub mod progress;
pub mod registry;
pub mod score;
pub mod search;
pub mod selection;
pub mod store;
pub mod types;

pub use editor::{apply_edit, Edit, EditEffect, EditorOutcome};
pub use error::{EngineError, IntegrityError, Result, StoreError, ValidationError};
pub use progress::{is_correct, Answer, Movement, Outcome, Progression, Step};
pub use registry::{LoadReport, TierRegistry};
pub use score::{mastery, statistics, Statistics, StreakLeader, TierCounts};
pub use search::{search, FuzzyMatch, SearchOutcome, SHORTLIST_LEN};
pub use selection::{band_for_roll, Selection, Selector};
pub use types::{Entry, EntryId, EntryRecord, Settings, StreakDirection, Thresholds, Tier};
