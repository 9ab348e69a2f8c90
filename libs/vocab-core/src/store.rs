//! Reader and writer for vocab files.
//!
//! # Format
//! ```text
//! gato~cat~noun~starts with c~1~3~1
//! "a~b"~tilde~~~0~0~0
//! ```
//! One record per line: question, answer, info, hint, right (1 when the streak
//! counts right answers), streak count, tier weight (0 need-to-learn .. 3 old).
//! A field wrapped in double quotes may contain the separator; a doubled quote
//! inside it stands for one literal quote. `.csv` files use a comma instead of
//! the tilde.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::StoreError;
use crate::registry::{LoadReport, TierRegistry};
use crate::types::{EntryRecord, StreakDirection, Tier};

/// Separator of native vocab files.
pub const TILDE: char = '~';
/// Separator of spreadsheet exports.
pub const COMMA: char = ',';

/// Separator implied by a file's extension.
pub fn separator_for(path: &Path) -> char {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => COMMA,
        _ => TILDE,
    }
}

/// Parse file content into records.
///
/// Parsing is lenient: a missing number reads as 0 and out-of-range numbers
/// are clamped. Records with a blank question or answer are returned as they
/// are so that [`TierRegistry::load`] can reject and count them.
pub fn parse(content: &str, separator: char, max_text_length: usize) -> Vec<EntryRecord> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let fields = split_fields(line, separator);
            RecordReader {
                fields: &fields,
                line: idx + 1,
                max_text_length,
            }
            .read()
        })
        .collect()
}

struct RecordReader<'a> {
    fields: &'a [String],
    line: usize,
    max_text_length: usize,
}

impl RecordReader<'_> {
    fn read(&self) -> EntryRecord {
        let right = self.number(4, "right", Some(1));
        let streak_count = self.number(5, "counter", None);
        let weight = self.number(6, "known", Some(3));

        EntryRecord {
            question: self.text(0).unwrap_or_default(),
            answer: self.text(1).unwrap_or_default(),
            info: self.text(2),
            hint: self.text(3),
            streak_direction: if right == 1 {
                StreakDirection::Right
            } else {
                StreakDirection::Wrong
            },
            streak_count: u32::try_from(streak_count).unwrap_or(u32::MAX),
            tier: Tier::from_weight(weight as u8).unwrap_or(Tier::Old),
        }
    }

    fn text(&self, index: usize) -> Option<String> {
        let text = self.fields.get(index)?.trim();
        if text.is_empty() {
            return None;
        }
        Some(text.chars().take(self.max_text_length).collect())
    }

    fn number(&self, index: usize, name: &str, max: Option<u64>) -> u64 {
        let digits: String = self
            .fields
            .get(index)
            .map(|field| {
                field
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit())
                    .collect()
            })
            .unwrap_or_default();

        if digits.is_empty() {
            warn!(line = self.line, field = name, "expected a number, using 0");
            return 0;
        }
        let value = digits.parse::<u64>().unwrap_or(u64::MAX);
        match max {
            Some(max) => value.min(max),
            None => value,
        }
    }
}

/// Split a line on `separator`, honouring double-quoted fields.
fn split_fields(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars
            .next_if(|c| c.is_whitespace() && *c != separator)
            .is_some()
        {}

        let mut field = String::new();
        let mut more = false;
        if chars.next_if_eq(&'"').is_some() {
            while let Some(c) = chars.next() {
                if c != '"' {
                    field.push(c);
                } else if chars.next_if_eq(&'"').is_some() {
                    field.push('"');
                } else {
                    break;
                }
            }
            // Anything between the closing quote and the separator is dropped.
            more = chars.by_ref().any(|c| c == separator);
        } else {
            for c in chars.by_ref() {
                if c == separator {
                    more = true;
                    break;
                }
                field.push(c);
            }
        }

        fields.push(field);
        if !more {
            return fields;
        }
    }
}

/// Wrap `text` in quotes when it holds the separator or a quote; inner quotes are doubled.
fn quote(text: &str, separator: char) -> Cow<'_, str> {
    if text.contains(separator) || text.contains('"') {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

/// Serialize records, one per line, with no trailing newline.
pub fn write(records: &[EntryRecord], separator: char) -> String {
    records
        .iter()
        .map(|record| {
            let right = match record.streak_direction {
                StreakDirection::Right => 1,
                StreakDirection::Wrong => 0,
            };
            [
                quote(&record.question, separator).into_owned(),
                quote(&record.answer, separator).into_owned(),
                quote(record.info.as_deref().unwrap_or_default(), separator).into_owned(),
                quote(record.hint.as_deref().unwrap_or_default(), separator).into_owned(),
                right.to_string(),
                record.streak_count.to_string(),
                record.tier.weight().to_string(),
            ]
            .join(&separator.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a vocab file into `registry`, merging with whatever it already holds.
pub fn load_file(
    path: &Path,
    registry: &mut TierRegistry,
    max_text_length: usize,
) -> Result<LoadReport, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = parse(&content, separator_for(path), max_text_length);
    let report = registry.load(records);
    info!(
        path = %path.display(),
        accepted = report.accepted,
        rejected = report.rejected,
        "read vocab file"
    );
    Ok(report)
}

/// Write every entry of `registry` to `path`. Returns how many were written.
pub fn save_file(path: &Path, registry: &TierRegistry) -> Result<usize, StoreError> {
    let records = registry.dump();
    fs::write(path, write(&records, separator_for(path))).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), saved = records.len(), "saved vocab file");
    Ok(records.len())
}
