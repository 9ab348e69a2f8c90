//! Tier registry: the arena of entries and the four ordered tier lists.
//!
//! Every entry is addressed by a stable [`EntryId`]. Each tier keeps an ordered
//! sequence of ids plus its own entry count; positions are re-derived from the
//! sequence by [`TierRegistry::reindex`] after every removal, so random draws
//! can address an entry by `1..=count` without gaps.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error, warn};

use crate::error::{IntegrityError, Result, ValidationError};
use crate::types::{Entry, EntryId, EntryRecord, Tier};

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Default, Clone)]
struct TierList {
    ids: Vec<EntryId>,
    count: usize,
}

/// The four tier lists and the entries they hold.
#[derive(Debug, Default)]
pub struct TierRegistry {
    entries: HashMap<EntryId, Entry>,
    lists: [TierList; 4],
    /// Entries taken out of a list without being destroyed, awaiting `add_to_tier`.
    detached: HashSet<EntryId>,
    next_id: u64,
}

/// Check the fields every entry must carry.
pub fn validate(record: &EntryRecord) -> std::result::Result<(), ValidationError> {
    if record.question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    if record.answer.trim().is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }
    Ok(())
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// Log an integrity violation where it is detected and hand it back.
pub(crate) fn report(err: IntegrityError) -> IntegrityError {
    error!(%err, "tier registry integrity violation");
    err
}

impl TierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loader records, dropping the invalid ones.
    pub fn from_records<I>(records: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = EntryRecord>,
    {
        let mut registry = Self::new();
        let report = registry.load(records);
        (registry, report)
    }

    /// Validate a record, create its entry and append it to the record's tier.
    pub fn insert(&mut self, record: EntryRecord) -> Result<EntryId> {
        validate(&record)?;

        let id = EntryId(self.next_id);
        self.next_id += 1;

        let entry = Entry {
            id,
            question: record.question,
            answer: record.answer,
            info: non_blank(record.info),
            hint: non_blank(record.hint),
            streak_direction: record.streak_direction,
            streak_count: record.streak_count,
            tier: record.tier,
            position: 0,
        };
        self.entries.insert(id, entry);
        self.detached.insert(id);
        self.add_to_tier(id, record.tier)?;
        Ok(id)
    }

    /// Insert every record, counting the ones refused by validation.
    pub fn load<I>(&mut self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = EntryRecord>,
    {
        let mut report = LoadReport::default();
        for (index, record) in records.into_iter().enumerate() {
            match self.insert(record) {
                Ok(_) => report.accepted += 1,
                Err(err) => {
                    report.rejected += 1;
                    warn!(record = index + 1, %err, "removing faulty vocab record");
                }
            }
        }
        debug!(
            accepted = report.accepted,
            rejected = report.rejected,
            "loaded vocab records"
        );
        report
    }

    /// Append a detached entry to `tier`, making it the tier's tail.
    pub fn add_to_tier(&mut self, id: EntryId, tier: Tier) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
        if !self.detached.remove(&id) {
            return Err(report(IntegrityError::AlreadyPlaced {
                id,
                tier: entry.tier,
            })
            .into());
        }

        let list = &mut self.lists[tier.index()];
        list.ids.push(id);
        list.count += 1;
        entry.tier = tier;
        entry.position = list.count;
        Ok(())
    }

    /// Unlink an entry from `tier` and reindex what is left.
    ///
    /// With `destroy` the entry is released from the registry and handed back;
    /// its id is dead afterwards. Otherwise it stays detached until the next
    /// [`add_to_tier`](Self::add_to_tier).
    pub fn remove_from_tier(
        &mut self,
        id: EntryId,
        tier: Tier,
        destroy: bool,
    ) -> Result<Option<Entry>> {
        let list = &mut self.lists[tier.index()];
        let index = list
            .ids
            .iter()
            .position(|candidate| *candidate == id)
            .ok_or_else(|| report(IntegrityError::EntryNotInTier { id, tier }))?;

        list.ids.remove(index);
        list.count -= 1;
        self.reindex(tier)?;

        if destroy {
            Ok(self.entries.remove(&id))
        } else {
            self.detached.insert(id);
            Ok(None)
        }
    }

    /// Renumber `tier` as `1..=count` in list order.
    pub fn reindex(&mut self, tier: Tier) -> Result<()> {
        let Self { entries, lists, .. } = self;
        let list = &lists[tier.index()];

        let mut counted = 0;
        for id in &list.ids {
            let Some(entry) = entries.get_mut(id) else {
                continue;
            };
            if entry.tier != tier {
                return Err(report(IntegrityError::StrayEntry {
                    id: *id,
                    holder: tier,
                    marked: entry.tier,
                })
                .into());
            }
            counted += 1;
            entry.position = counted;
        }

        if counted != list.count {
            return Err(report(IntegrityError::ReindexMismatch {
                tier,
                counted,
                stored: list.count,
            })
            .into());
        }
        Ok(())
    }

    /// Move an entry to the end of another tier, keeping list and `tier` field in step.
    pub fn move_to_tier(&mut self, id: EntryId, to: Tier) -> Result<()> {
        if self.detached.contains(&id) {
            return self.add_to_tier(id, to);
        }
        let from = self
            .get(id)
            .map(Entry::tier)
            .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
        if from == to {
            return Ok(());
        }

        self.remove_from_tier(id, from, false)?;
        self.add_to_tier(id, to)?;
        debug!(%id, %from, %to, "moved entry");
        Ok(())
    }

    /// Remove an entry from whichever tier holds it and release it.
    pub fn delete(&mut self, id: EntryId) -> Result<Entry> {
        if self.detached.remove(&id) {
            return self
                .entries
                .remove(&id)
                .ok_or_else(|| report(IntegrityError::UnknownEntry(id)).into());
        }
        let tier = self
            .locate(id)
            .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
        let entry = self
            .remove_from_tier(id, tier, true)?
            .ok_or_else(|| report(IntegrityError::UnknownEntry(id)))?;
        debug!(%id, %tier, "deleted entry");
        Ok(entry)
    }

    /// Release every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        self.detached.clear();
        self.lists = Default::default();
        debug!(released, "unloaded all entries");
        released
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(&id)
    }

    /// Tier currently holding the entry.
    pub fn locate(&self, id: EntryId) -> Option<Tier> {
        if self.detached.contains(&id) {
            return None;
        }
        self.entries.get(&id).map(Entry::tier)
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.lists[tier.index()].count
    }

    /// Entries held across all four tiers.
    pub fn len(&self) -> usize {
        self.lists.iter().map(|list| list.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn head(&self, tier: Tier) -> Option<&Entry> {
        self.lists[tier.index()]
            .ids
            .first()
            .and_then(|id| self.entries.get(id))
    }

    pub fn tail(&self, tier: Tier) -> Option<&Entry> {
        self.lists[tier.index()]
            .ids
            .last()
            .and_then(|id| self.entries.get(id))
    }

    /// Entry whose position in `tier` is `position` (1-based).
    pub fn entry_at(&self, tier: Tier, position: usize) -> Option<&Entry> {
        let index = position.checked_sub(1)?;
        self.lists[tier.index()]
            .ids
            .get(index)
            .and_then(|id| self.entries.get(id))
            .filter(|entry| entry.position == position)
    }

    /// Entries of one tier in list order.
    pub fn iter_tier(&self, tier: Tier) -> impl Iterator<Item = &Entry> + '_ {
        self.lists[tier.index()]
            .ids
            .iter()
            .filter_map(move |id| self.entries.get(id))
    }

    /// All entries, tier by tier from need-to-learn to old.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        Tier::ALL.into_iter().flat_map(move |tier| self.iter_tier(tier))
    }

    /// Ordered flat copy of every entry for the saver.
    pub fn dump(&self) -> Vec<EntryRecord> {
        self.iter().map(Entry::to_record).collect()
    }

    /// Verify every tier without modifying anything.
    pub fn check_integrity(&self) -> Result<()> {
        for tier in Tier::ALL {
            let list = &self.lists[tier.index()];
            let mut counted = 0;
            for id in &list.ids {
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| report(IntegrityError::UnknownEntry(*id)))?;
                if entry.tier != tier {
                    return Err(report(IntegrityError::StrayEntry {
                        id: *id,
                        holder: tier,
                        marked: entry.tier,
                    })
                    .into());
                }
                counted += 1;
                if entry.position != counted {
                    return Err(report(IntegrityError::PositionMismatch {
                        tier,
                        position: counted,
                        count: list.count,
                    })
                    .into());
                }
            }
            if counted != list.count {
                return Err(report(IntegrityError::ReindexMismatch {
                    tier,
                    counted,
                    stored: list.count,
                })
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use pretty_assertions::assert_eq;

    fn registry_with(tier: Tier, questions: &[&str]) -> (TierRegistry, Vec<EntryId>) {
        let mut registry = TierRegistry::new();
        let ids = questions
            .iter()
            .map(|q| {
                registry
                    .insert(EntryRecord::new(*q, format!("{q}-answer")).in_tier(tier))
                    .unwrap()
            })
            .collect();
        (registry, ids)
    }

    fn positions(registry: &TierRegistry, tier: Tier) -> Vec<(String, usize)> {
        registry
            .iter_tier(tier)
            .map(|e| (e.question.clone(), e.position()))
            .collect()
    }

    #[test]
    fn add_assigns_tail_position_and_tier() {
        let (registry, ids) = registry_with(Tier::Known, &["a", "b", "c"]);
        assert_eq!(registry.count(Tier::Known), 3);
        let last = registry.get(ids[2]).unwrap();
        assert_eq!(last.tier(), Tier::Known);
        assert_eq!(last.position(), 3);
        assert_eq!(registry.head(Tier::Known).unwrap().question, "a");
        assert_eq!(registry.tail(Tier::Known).unwrap().question, "c");
    }

    #[test]
    fn remove_head_reindexes() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b", "c"]);
        registry.remove_from_tier(ids[0], Tier::Normal, true).unwrap();
        assert_eq!(
            positions(&registry, Tier::Normal),
            vec![("b".to_string(), 1), ("c".to_string(), 2)]
        );
        assert_eq!(registry.head(Tier::Normal).unwrap().question, "b");
    }

    #[test]
    fn remove_middle_reindexes() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b", "c"]);
        registry.remove_from_tier(ids[1], Tier::Normal, true).unwrap();
        assert_eq!(
            positions(&registry, Tier::Normal),
            vec![("a".to_string(), 1), ("c".to_string(), 2)]
        );
    }

    #[test]
    fn remove_tail_moves_tail_back() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b", "c"]);
        registry.remove_from_tier(ids[2], Tier::Normal, true).unwrap();
        assert_eq!(registry.tail(Tier::Normal).unwrap().question, "b");
        assert_eq!(registry.count(Tier::Normal), 2);
    }

    #[test]
    fn removing_sole_entry_empties_only_that_tier() {
        let mut registry = TierRegistry::new();
        let lonely = registry
            .insert(EntryRecord::new("solo", "one").in_tier(Tier::Old))
            .unwrap();
        registry
            .insert(EntryRecord::new("other", "two").in_tier(Tier::Known))
            .unwrap();

        let released = registry.remove_from_tier(lonely, Tier::Old, true).unwrap();
        assert_eq!(released.map(|e| e.question), Some("solo".to_string()));
        assert_eq!(registry.count(Tier::Old), 0);
        assert!(registry.head(Tier::Old).is_none());
        assert!(registry.tail(Tier::Old).is_none());
        assert_eq!(registry.count(Tier::Known), 1);
        assert!(registry.get(lonely).is_none());
    }

    #[test]
    fn remove_from_wrong_tier_is_reported() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a"]);
        let err = registry
            .remove_from_tier(ids[0], Tier::Known, false)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Integrity(IntegrityError::EntryNotInTier {
                id: ids[0],
                tier: Tier::Known
            })
        );
        assert_eq!(registry.count(Tier::Normal), 1);
    }

    #[test]
    fn add_rejects_entry_already_in_a_list() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a"]);
        let err = registry.add_to_tier(ids[0], Tier::Old).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Integrity(IntegrityError::AlreadyPlaced { .. })
        ));
    }

    #[test]
    fn detached_entry_can_be_added_elsewhere() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b"]);
        let kept = registry.remove_from_tier(ids[0], Tier::Normal, false).unwrap();
        assert!(kept.is_none());
        assert_eq!(registry.locate(ids[0]), None);

        registry.add_to_tier(ids[0], Tier::Known).unwrap();
        assert_eq!(registry.locate(ids[0]), Some(Tier::Known));
        assert_eq!(registry.get(ids[0]).unwrap().position(), 1);
        registry.check_integrity().unwrap();
    }

    #[test]
    fn move_appends_and_keeps_both_tiers_dense() {
        let mut registry = TierRegistry::new();
        let a = registry.insert(EntryRecord::new("a", "1")).unwrap();
        let b = registry.insert(EntryRecord::new("b", "2")).unwrap();
        registry
            .insert(EntryRecord::new("c", "3").in_tier(Tier::Known))
            .unwrap();

        registry.move_to_tier(a, Tier::Known).unwrap();

        assert_eq!(registry.get(a).unwrap().tier(), Tier::Known);
        assert_eq!(
            positions(&registry, Tier::Known),
            vec![("c".to_string(), 1), ("a".to_string(), 2)]
        );
        assert_eq!(registry.get(b).unwrap().position(), 1);
        registry.check_integrity().unwrap();
    }

    #[test]
    fn move_to_same_tier_keeps_order() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b"]);
        registry.move_to_tier(ids[0], Tier::Normal).unwrap();
        assert_eq!(registry.head(Tier::Normal).unwrap().id(), ids[0]);
    }

    #[test]
    fn load_counts_rejected_records() {
        let records = vec![
            EntryRecord::new("gato", "cat"),
            EntryRecord::new("", "dog"),
            EntryRecord::new("pez", "   "),
            EntryRecord::new("perro", "dog").in_tier(Tier::Old),
        ];
        let (registry, report) = TierRegistry::from_records(records);
        assert_eq!(
            report,
            LoadReport {
                accepted: 2,
                rejected: 2
            }
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.count(Tier::Old), 1);
        registry.check_integrity().unwrap();
    }

    #[test]
    fn insert_drops_blank_info_and_hint() {
        let mut registry = TierRegistry::new();
        let id = registry
            .insert(EntryRecord::new("gato", "cat").with_info("  ").with_hint("meow"))
            .unwrap();
        let entry = registry.get(id).unwrap();
        assert_eq!(entry.info, None);
        assert_eq!(entry.hint.as_deref(), Some("meow"));
    }

    #[test]
    fn dump_follows_tier_then_list_order() {
        let mut registry = TierRegistry::new();
        registry
            .insert(EntryRecord::new("old", "o").in_tier(Tier::Old))
            .unwrap();
        registry.insert(EntryRecord::new("norm1", "n")).unwrap();
        registry
            .insert(EntryRecord::new("n2l", "x").in_tier(Tier::NeedToLearn))
            .unwrap();
        registry.insert(EntryRecord::new("norm2", "n")).unwrap();

        let questions: Vec<_> = registry.dump().into_iter().map(|r| r.question).collect();
        assert_eq!(questions, vec!["n2l", "norm1", "norm2", "old"]);
    }

    #[test]
    fn delete_and_clear_release_entries() {
        let (mut registry, ids) = registry_with(Tier::Normal, &["a", "b", "c"]);
        let gone = registry.delete(ids[1]).unwrap();
        assert_eq!(gone.question, "b");
        assert!(registry.delete(ids[1]).is_err());
        registry.check_integrity().unwrap();

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert!(registry.head(Tier::Normal).is_none());
    }

    #[test]
    fn entry_at_addresses_by_position() {
        let (registry, _) = registry_with(Tier::NeedToLearn, &["a", "b", "c"]);
        assert_eq!(registry.entry_at(Tier::NeedToLearn, 2).unwrap().question, "b");
        assert!(registry.entry_at(Tier::NeedToLearn, 0).is_none());
        assert!(registry.entry_at(Tier::NeedToLearn, 4).is_none());
    }
}
