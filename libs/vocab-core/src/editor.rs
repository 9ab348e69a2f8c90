//! Entry editing: text changes, priority marking and deletion.

use tracing::debug;

use crate::error::{IntegrityError, Result, ValidationError};
use crate::registry::{report, TierRegistry};
use crate::types::{Entry, EntryId, Tier};

/// A change requested from the editor menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Question(String),
    Answer(String),
    Info(Option<String>),
    Hint(Option<String>),
    /// Send the entry back to need-to-learn so it comes up more often.
    MarkPriority,
    Delete,
}

/// What an edit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEffect {
    Updated,
    Prioritised,
    AlreadyPriority,
    Deleted(Entry),
}

/// Where the UI goes after an editor round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// Show the editor menu again.
    Repeat,
    /// Close the editor and carry on where it was opened from.
    Close,
    /// Leave to the main menu.
    ExitToRoot,
}

fn required(text: String, missing: ValidationError) -> std::result::Result<String, ValidationError> {
    if text.trim().is_empty() {
        Err(missing)
    } else {
        Ok(text)
    }
}

fn optional(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn entry_mut(registry: &mut TierRegistry, id: EntryId) -> Result<&mut Entry> {
    Ok(registry
        .get_mut(id)
        .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?)
}

/// Apply one edit to the entry `id`.
pub fn apply_edit(registry: &mut TierRegistry, id: EntryId, edit: Edit) -> Result<EditEffect> {
    match edit {
        Edit::Delete => return registry.delete(id).map(EditEffect::Deleted),
        Edit::MarkPriority => return mark_priority(registry, id),
        Edit::Question(text) => {
            let text = required(text, ValidationError::EmptyQuestion)?;
            entry_mut(registry, id)?.question = text;
        }
        Edit::Answer(text) => {
            let text = required(text, ValidationError::EmptyAnswer)?;
            entry_mut(registry, id)?.answer = text;
        }
        Edit::Info(text) => entry_mut(registry, id)?.info = optional(text),
        Edit::Hint(text) => entry_mut(registry, id)?.hint = optional(text),
    }
    Ok(EditEffect::Updated)
}

fn mark_priority(registry: &mut TierRegistry, id: EntryId) -> Result<EditEffect> {
    let tier = registry
        .locate(id)
        .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
    if tier == Tier::NeedToLearn {
        return Ok(EditEffect::AlreadyPriority);
    }

    registry.move_to_tier(id, Tier::NeedToLearn)?;
    if let Some(entry) = registry.get_mut(id) {
        entry.streak_count = 0;
    }
    debug!(%id, from = %tier, "marked entry as priority");
    Ok(EditEffect::Prioritised)
}
