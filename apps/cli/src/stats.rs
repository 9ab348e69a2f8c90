//! Statistics screen.

use std::io::{self, BufRead, Write};

use vocab_core::{statistics, Statistics};

use crate::session::Session;

pub fn show<R: BufRead, W: Write>(session: &mut Session<R, W>) -> io::Result<()> {
    match statistics(&session.registry) {
        Some(stats) => session.console.say(render(&stats)),
        None => session.console.say("No entries loaded."),
    }
}

/// Statistics as the text shown from the main menu.
pub fn render(stats: &Statistics) -> String {
    let mut text = format!(
        "Your current stats:\n\nYour current score: {:.1}%\n\nThere are presently {} entries loaded.\n",
        stats.mastery, stats.total
    );
    text.push_str(&format!(
        "Need to learn: {}, normal: {}, known: {}, old: {}.\n\n",
        stats.tiers.need_to_learn, stats.tiers.normal, stats.tiers.known, stats.tiers.old
    ));
    if stats.untested > 0 {
        text.push_str(&format!(
            "{} of these you've never been tested on.\n",
            stats.untested
        ));
    } else {
        text.push_str("You've been tested on all of them at least once.\n");
    }
    text.push_str(&format!(
        "{} of these you got RIGHT the last time they came up.\n{} of these you got WRONG the last time they came up.\n\n",
        stats.last_right, stats.last_wrong
    ));
    text.push_str(&format!(
        "{} loaded entries have additional info.\n{} loaded entries have an associated hint.\n",
        stats.with_info, stats.with_hint
    ));
    if let Some(leader) = &stats.longest_right {
        text.push_str(&format!(
            "\nYour longest run of right answers is '{}', which you got right the last {} times.\n",
            leader.question, leader.count
        ));
    }
    if let Some(leader) = &stats.longest_wrong {
        text.push_str(&format!(
            "\nYour longest run of wrong answers is '{}', which you got wrong the last {} times.\n",
            leader.question, leader.count
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::{EntryRecord, StreakDirection, Tier, TierRegistry};

    #[test]
    fn render_mentions_score_and_leaders() {
        let mut registry = TierRegistry::new();
        registry
            .insert(EntryRecord::new("gato", "cat").in_tier(Tier::Old))
            .unwrap();
        registry
            .insert(
                EntryRecord::new("perro", "dog")
                    .in_tier(Tier::NeedToLearn)
                    .with_streak(StreakDirection::Wrong, 4),
            )
            .unwrap();

        let text = render(&statistics(&registry).unwrap());
        assert!(text.contains("Your current score: 50.0%"));
        assert!(text.contains("1 of these you've never been tested on."));
        assert!(text.contains("'perro', which you got wrong the last 4 times"));
        assert!(!text.contains("right the last"));
    }
}
