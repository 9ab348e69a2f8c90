//! Entry lookup by exact or approximate text.

use crate::registry::TierRegistry;
use crate::types::EntryId;

/// Longest shortlist returned by [`rank`].
pub const SHORTLIST_LEN: usize = 10;

/// A scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub id: EntryId,
    pub score: u32,
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Exactly one entry has the query as its question or answer.
    Exact(EntryId),
    /// No single exact match. `exact` counts the entries that matched exactly
    /// (0 or more than 1); `matches` holds the best scored candidates, highest
    /// first, and is empty if nothing scored.
    Shortlist {
        exact: usize,
        matches: Vec<FuzzyMatch>,
    },
}

/// Entries whose question or answer equals `query`, in scan order.
pub fn exact_matches(registry: &TierRegistry, query: &str) -> Vec<EntryId> {
    registry
        .iter()
        .filter(|entry| entry.question == query || entry.answer == query)
        .map(|entry| entry.id())
        .collect()
}

/// Look up an entry, falling back to a ranked shortlist when there is no
/// single exact match.
pub fn search(registry: &TierRegistry, query: &str) -> SearchOutcome {
    match exact_matches(registry, query).as_slice() {
        [only] => SearchOutcome::Exact(*only),
        exact => SearchOutcome::Shortlist {
            exact: exact.len(),
            matches: rank(registry, query),
        },
    }
}

/// Number of leading characters `a` and `b` share.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Number of leading characters of `query` that occur anywhere in `text`.
pub fn leading_span(query: &str, text: &str) -> usize {
    query.chars().take_while(|c| text.contains(*c)).count()
}

/// Score one question/answer pair against `query`.
pub fn score(query: &str, question: &str, answer: &str) -> u32 {
    let mut score = 0;
    if query == question || query == answer {
        score += 10;
    }
    let prefix = common_prefix_len(query, question).max(common_prefix_len(query, answer));
    score += 2 * prefix as u32;
    score += leading_span(query, question) as u32;
    score += leading_span(query, answer) as u32;
    score
}

struct Candidate {
    found: FuzzyMatch,
    seen: usize,
}

/// Top [`SHORTLIST_LEN`] entries by score, highest first, ties in scan order.
///
/// A newcomer only displaces the weakest candidate with a strictly greater
/// score, so among equal scores the earlier entries are kept.
pub fn rank(registry: &TierRegistry, query: &str) -> Vec<FuzzyMatch> {
    let mut kept: Vec<Candidate> = Vec::with_capacity(SHORTLIST_LEN);

    for (seen, entry) in registry.iter().enumerate() {
        let found = FuzzyMatch {
            id: entry.id(),
            score: score(query, &entry.question, &entry.answer),
        };
        if found.score == 0 {
            continue;
        }
        if kept.len() < SHORTLIST_LEN {
            kept.push(Candidate { found, seen });
            continue;
        }
        // Weakest slot: lowest score, latest arrival among equals.
        let weakest = kept
            .iter_mut()
            .min_by(|a, b| {
                a.found
                    .score
                    .cmp(&b.found.score)
                    .then(b.seen.cmp(&a.seen))
            });
        if let Some(slot) = weakest {
            if found.score > slot.found.score {
                *slot = Candidate { found, seen };
            }
        }
    }

    kept.sort_by(|a, b| b.found.score.cmp(&a.found.score).then(a.seen.cmp(&b.seen)));
    kept.into_iter().map(|candidate| candidate.found).collect()
}

/// The shortlist item the user picked (1-based). Zero or out of range picks nothing.
pub fn pick(shortlist: &[FuzzyMatch], choice: usize) -> Option<EntryId> {
    choice
        .checked_sub(1)
        .and_then(|index| shortlist.get(index))
        .map(|found| found.id)
}
