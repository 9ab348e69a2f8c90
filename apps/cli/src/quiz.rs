//! The test loop.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::error;
use vocab_core::{
    is_correct, mastery, Answer, EditorOutcome, Movement, Outcome, StreakDirection, Tier,
};

use crate::manage;
use crate::session::Session;

/// Ask questions until the user stops or leaves through the editor.
pub fn run<R: BufRead, W: Write>(session: &mut Session<R, W>) -> io::Result<()> {
    loop {
        let selection = match session
            .selector
            .select(&session.registry, &mut session.rng)
            .context("selecting the next entry")
        {
            Ok(Some(selection)) => selection,
            Ok(None) => return session.console.say("No entries to test. Load or add some first."),
            Err(err) => {
                error!("{err:#}");
                return session.console.say("Indexing error, stopping the test.");
            }
        };
        let Some(entry) = session.registry.get(selection.id).cloned() else {
            return session.console.say("Indexing error, stopping the test.");
        };

        session
            .console
            .say(format!("\nTranslate the following:\n\n\t{}\n", entry.question))?;
        match &entry.info {
            Some(info) => session.console.say(format!("Useful info: {info}"))?,
            None => session
                .console
                .say("There is no additional information for this entry.")?,
        }
        let prompt = if entry.hint.is_some() {
            session.console.say(
                "There is a hint for this entry. If you view it, a right answer will not improve your streak.",
            )?;
            "Your translation (or 'h' for hint):\n\n\t"
        } else {
            "Your translation:\n\n\t"
        };

        let mut response = session.console.ask(prompt)?;
        let mut used_hint = false;
        if let Some(hint) = entry.hint.as_deref().filter(|_| response.trim() == "h") {
            used_hint = true;
            response = session
                .console
                .ask(format!("\nHINT: {hint}\n\nYour translation:\n\n\t"))?;
        }

        let answer = if is_correct(&entry, &response) {
            Answer::Correct { used_hint }
        } else {
            Answer::Incorrect
        };
        let outcome = match session
            .progression
            .record(&mut session.registry, entry.id(), answer)
        {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, "recording answer failed");
                return session.console.say("Could not record that answer, stopping the test.");
            }
        };
        session.changed = true;

        for line in comments(&outcome, answer, &entry.answer) {
            session.console.say(line)?;
        }
        session.console.say(format!(
            "Your score is now {:.1}%.",
            mastery(&session.registry).unwrap_or(0.0)
        ))?;

        match session
            .console
            .choice("Type 'o' for options, 'x' to stop, or press enter for another question: ")?
        {
            Some('o') => {
                if manage::editor(session, entry.id(), true)? == EditorOutcome::ExitToRoot {
                    return Ok(());
                }
            }
            Some('x') => return Ok(()),
            _ => {}
        }
    }
}

/// Feedback lines for one answered question.
pub fn comments(outcome: &Outcome, answer: Answer, correct_answer: &str) -> Vec<String> {
    let mut lines = Vec::new();
    match answer {
        Answer::Correct { used_hint: true } => {
            lines.push("Well done. See if you can remember without the hint next time...".into());
        }
        Answer::Correct { used_hint: false } => {
            lines.push("Yay!".into());
            if outcome.direction == StreakDirection::Right && outcome.streak > 2 {
                lines.push(format!(
                    "You answered correctly the last {} times in a row!",
                    outcome.streak
                ));
            }
        }
        Answer::Incorrect => {
            lines.push(format!("Sorry, the correct answer is:\n\n\t{correct_answer}\n"));
            if outcome.streak > 1 {
                lines.push(format!(
                    "You've got this one wrong the last {} times.",
                    outcome.streak
                ));
            }
        }
    }

    let movement = match (outcome.movement(), outcome.to) {
        (Movement::Stayed, _) => None,
        (Movement::Promoted, Tier::Normal) => Some(
            "Looks like you know this one a little better now!\nIt will be brought up less frequently.",
        ),
        (Movement::Promoted, Tier::Known) => Some(
            "Looks like you know this one now!\nIt will be brought up much less frequently.",
        ),
        (Movement::Promoted, _) => Some(
            "OK! So this one's well-learnt.\nIt probably won't be brought up much any more.",
        ),
        (Movement::Demoted, Tier::NeedToLearn) => Some("This one could do with some learning..."),
        (Movement::Demoted, Tier::Known) => {
            Some("It will be brought up a couple more times to help you remember it.")
        }
        (Movement::Demoted, _) if outcome.from == Tier::Old => Some(
            "This old one caught you out, huh? It will be brought up a few more times to help you remember it.",
        ),
        (Movement::Demoted, _) => {
            Some("OK, perhaps you don't know this one as well as you once did...")
        }
    };
    lines.extend(movement.map(String::from));
    lines
}
