//! Database management: adding entries, finding them and the entry editor.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};
use vocab_core::search::{pick, search, SearchOutcome};
use vocab_core::{apply_edit, Edit, EditEffect, EditorOutcome, EntryId, EntryRecord};

use crate::session::Session;

const MANAGE_MENU: &str = "\
Vocab database management menu:

\ta: Add vocab
\te: Edit or delete vocab
\tx: Exit to main menu
";

/// The management menu, until the user goes back to the main menu.
pub fn run<R: BufRead, W: Write>(session: &mut Session<R, W>) -> io::Result<()> {
    loop {
        session.console.say(MANAGE_MENU)?;
        match session.console.choice("> ")? {
            Some('a') => add_entry(session)?,
            Some('e') => {
                let query = session.console.ask("Entry to edit or delete: ")?;
                match find_entry(session, &query)? {
                    Some(id) => {
                        if editor(session, id, false)? == EditorOutcome::ExitToRoot {
                            return Ok(());
                        }
                    }
                    None => session.console.say("No entry selected.")?,
                }
            }
            Some('x') => return Ok(()),
            _ => session.console.say("Invalid choice. Please try again.")?,
        }
    }
}

fn clip<R, W>(session: &Session<R, W>, text: String) -> String {
    let max = session.config.settings.max_text_length;
    if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text
    }
}

fn add_entry<R: BufRead, W: Write>(session: &mut Session<R, W>) -> io::Result<()> {
    let max = session.config.settings.max_text_length;
    let question = session
        .console
        .ask(format!("Question text for this entry (max {max} chars): "))?;
    let answer = session
        .console
        .ask(format!("Answer text for this entry (max {max} chars): "))?;

    let mut record = EntryRecord::new(clip(session, question), clip(session, answer));
    if session.console.yes_no("Add additional info for this entry?")? {
        if let Some(info) = session.console.optional_text("Info: ")? {
            record = record.with_info(clip(session, info));
        }
    }
    if session
        .console
        .yes_no("Add a hint to help you remember this entry?")?
    {
        if let Some(hint) = session.console.optional_text("Hint: ")? {
            record = record.with_hint(clip(session, hint));
        }
    }

    match session.registry.insert(record) {
        Ok(id) => {
            session.changed = true;
            debug!(%id, "added entry");
            session.console.say("Vocab successfully added.")
        }
        Err(err) => {
            warn!(%err, "entry not added");
            session.console.say(format!("Vocab creation failed: {err}"))
        }
    }
}

/// Resolve `query` to one entry: a unique exact match, or a pick from the shortlist.
pub fn find_entry<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    query: &str,
) -> io::Result<Option<EntryId>> {
    let (exact, shortlist) = match search(&session.registry, query) {
        SearchOutcome::Exact(id) => return Ok(Some(id)),
        SearchOutcome::Shortlist { exact, matches } => (exact, matches),
    };

    let question = if exact > 1 {
        "More than one match found. Show best matches?"
    } else {
        "No exact matches found. Perform fuzzy search?"
    };
    if !session.console.yes_no(question)? {
        return Ok(None);
    }
    if shortlist.is_empty() {
        session.console.say("No matches found.")?;
        return Ok(None);
    }

    for (n, found) in shortlist.iter().enumerate() {
        let Some(entry) = session.registry.get(found.id) else {
            continue;
        };
        let line = format!(
            "Option {}: Question: '{}'.\nScore: {}. Answer: '{}'.",
            n + 1,
            entry.question,
            found.score,
            entry.answer
        );
        session.console.say(line)?;
    }
    let choice = session
        .console
        .number("\nEnter the number of the entry to select, or 0 to cancel: ")?;
    Ok(choice.and_then(|choice| pick(&shortlist, choice)))
}

/// Run the editor for `id` until the user closes it.
///
/// `from_test` selects which way out is offered: back to the test or back to
/// the management menu.
pub fn editor<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    id: EntryId,
    from_test: bool,
) -> io::Result<EditorOutcome> {
    loop {
        match editor_round(session, id, from_test)? {
            EditorOutcome::Repeat => continue,
            outcome => return Ok(outcome),
        }
    }
}

fn editor_round<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    id: EntryId,
    from_test: bool,
) -> io::Result<EditorOutcome> {
    let Some(entry) = session.registry.get(id) else {
        session.console.say("That entry no longer exists.")?;
        return Ok(EditorOutcome::Close);
    };

    let mut card = format!(
        "Current entry:\n\nQuestion: {}\nAnswer: '{}'\n",
        entry.question, entry.answer
    );
    card.push_str(&match &entry.info {
        Some(info) => format!("Info: {info}\n"),
        None => "No info.\n".to_string(),
    });
    card.push_str(&match &entry.hint {
        Some(hint) => format!("Hint: {hint}\n"),
        None => "No hint.\n".to_string(),
    });
    session.console.say(card)?;

    let leave = if from_test {
        "\tt: close this menu and continue testing\n\tx: end testing and return to the main menu\n"
    } else {
        "\tr: return to the database management menu\n\tx: return to the main menu\n"
    };
    session.console.say(format!(
        "Options:\n\n\tq: change the question\n\ta: change the answer\n\ti: add or change the info\n\th: add or change the hint\n\tp: mark as high priority to learn\n\td: delete this entry\n{leave}"
    ))?;

    let max = session.config.settings.max_text_length;
    let edit = match session.console.choice("> ")? {
        Some('q') => {
            let text = session.console.ask(format!("New question (max {max} chars): "))?;
            Some(Edit::Question(clip(session, text)))
        }
        Some('a') => {
            let text = session.console.ask(format!("New answer (max {max} chars): "))?;
            Some(Edit::Answer(clip(session, text)))
        }
        Some('i') => {
            let text = session
                .console
                .optional_text(format!("New info, blank to remove (max {max} chars): "))?;
            Some(Edit::Info(text.map(|t| clip(session, t))))
        }
        Some('h') => {
            let text = session
                .console
                .optional_text(format!("New hint, blank to remove (max {max} chars): "))?;
            Some(Edit::Hint(text.map(|t| clip(session, t))))
        }
        Some('p') => Some(Edit::MarkPriority),
        Some('d') => {
            if session.console.yes_no(
                "Are you sure you want to delete this entry? Once you save, this is permanent!",
            )? {
                Some(Edit::Delete)
            } else {
                session.console.say("Entry was NOT deleted.")?;
                None
            }
        }
        Some('x') => return Ok(EditorOutcome::ExitToRoot),
        Some('t') if from_test => return Ok(EditorOutcome::Close),
        Some('r') if !from_test => return Ok(EditorOutcome::Close),
        Some('t') => {
            session
                .console
                .say("You are not testing. Return to the main menu and pick 'Test me!'.")?;
            None
        }
        Some('r') => {
            session
                .console
                .say("Database management is not available while testing.")?;
            None
        }
        _ => {
            session.console.say("Invalid choice.")?;
            None
        }
    };

    if let Some(edit) = edit {
        match apply_edit(&mut session.registry, id, edit) {
            Ok(EditEffect::Deleted(_)) => {
                session.changed = true;
                session.console.say("Entry deleted!")?;
                return Ok(EditorOutcome::Close);
            }
            Ok(EditEffect::AlreadyPriority) => session.console.say("Already marked as priority!")?,
            Ok(EditEffect::Prioritised) => {
                session.changed = true;
                session.console.say("This entry will be brought up more often.")?;
            }
            Ok(EditEffect::Updated) => session.changed = true,
            Err(err) => session.console.say(format!("Edit refused: {err}"))?,
        }
    }

    if session.console.yes_no("Select again from the options menu?")? {
        return Ok(EditorOutcome::Repeat);
    }
    let back = if from_test {
        "Continue testing?"
    } else {
        "Return to database management menu?"
    };
    Ok(if session.console.yes_no(back)? {
        EditorOutcome::Close
    } else {
        EditorOutcome::ExitToRoot
    })
}
