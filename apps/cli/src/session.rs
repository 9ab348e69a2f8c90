//! Session state and the main menu.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use vocab_core::{store, Progression, Selector, TierRegistry};

use crate::config::Config;
use crate::console::Console;
use crate::{manage, quiz, stats};

const NATIVE_EXTENSION: &str = "~sv";

const MAIN_MENU: &str = "\
Main menu:

\tv: View statistics
\tt: Test me!
\tl: Load
\tm: Manage database
\ts: Save
\tx: Exit
";

/// Everything one trainer run works on.
pub struct Session<R, W> {
    pub console: Console<R, W>,
    pub registry: TierRegistry,
    pub selector: Selector,
    pub progression: Progression,
    pub rng: StdRng,
    pub config: Config,
    /// Unsaved answers or edits.
    pub changed: bool,
    /// File most recently loaded or saved.
    pub current_file: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(console: Console<R, W>, config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            console,
            registry: TierRegistry::new(),
            selector: Selector::new(),
            progression: Progression::new(config.settings.thresholds),
            rng,
            config,
            changed: false,
            current_file: None,
        }
    }

    /// Load the configured vocab file if there is one.
    pub fn open_default(&mut self) -> io::Result<()> {
        let path = self.config.db.clone();
        if path.exists() {
            self.load_from(&path)
        } else {
            info!(path = %path.display(), "no vocab file at startup");
            self.console.say(format!(
                "No vocab file at {}. Starting with an empty database.",
                path.display()
            ))
        }
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.console.say("Welcome to the Vocab Trainer.")?;
        match self.main_menu() {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                warn!("input closed, leaving without saving");
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            self.console.say(MAIN_MENU)?;
            match self.console.choice("> ")? {
                Some('v') => stats::show(self)?,
                Some('t') => quiz::run(self)?,
                Some('l') => self.reload()?,
                Some('m') => manage::run(self)?,
                Some('s') => self.save()?,
                Some('x') => return self.shutdown(),
                _ => self.console.say("Invalid choice. Please try again.")?,
            }
        }
    }

    fn reload(&mut self) -> io::Result<()> {
        if self.changed
            && self.console.yes_no(
                "Do you want to save your current vocab before loading another database?",
            )?
        {
            self.save()?;
        }
        if !self.registry.is_empty()
            && self.console.yes_no(
                "Unload the current database first? Otherwise the file is merged in and may add duplicates.",
            )?
        {
            let released = self.registry.clear();
            self.console
                .say(format!("Unloaded {released} entries from memory."))?;
        }

        let reply = self.console.ask(format!(
            "File to load (enter for {}): ",
            self.config.db.display()
        ))?;
        let path = match reply.trim() {
            "" => self.config.db.clone(),
            name => PathBuf::from(name),
        };
        self.load_from(&path)
    }

    fn load_from(&mut self, path: &Path) -> io::Result<()> {
        match store::load_file(path, &mut self.registry, self.config.settings.max_text_length) {
            Ok(report) => {
                self.current_file = Some(path.to_path_buf());
                self.console.say(format!(
                    "{} entries read from {}.\n{} faulty entries encountered.",
                    report.accepted,
                    path.display(),
                    report.rejected
                ))
            }
            Err(err) => {
                warn!(%err, "load failed");
                self.console.say(format!("Unable to read {}: {err}", path.display()))
            }
        }
    }

    /// Ask where to save and write the database there.
    pub fn save(&mut self) -> io::Result<()> {
        let target = self
            .current_file
            .clone()
            .unwrap_or_else(|| self.config.db.clone());
        self.console
            .say("WARNING: saving over an existing file replaces its contents.")?;

        let path = if self
            .console
            .yes_no(format!("Save to {}?", target.display()))?
        {
            target
        } else {
            let name = self.console.ask("File name to save to: ")?;
            if name.trim().is_empty() {
                return self.console.say("Nothing saved.");
            }
            with_default_extension(PathBuf::from(name.trim()))
        };

        match store::save_file(&path, &self.registry) {
            Ok(saved) => {
                self.changed = false;
                self.current_file = Some(path.clone());
                self.console
                    .say(format!("{saved} entries saved to {}.", path.display()))
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.console.say(format!("Error while saving: {err}"))
            }
        }
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if self.changed
            && self
                .console
                .yes_no("Your database has changed since you last saved. Save now?")?
        {
            self.save()?;
        }
        self.console.say("Bye for now!")
    }
}

/// Give a typed file name the native `.~sv` extension when it has none.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(NATIVE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_names_get_the_native_extension() {
        assert_eq!(
            with_default_extension(PathBuf::from("spanish")),
            PathBuf::from("spanish.~sv")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("words.csv")),
            PathBuf::from("words.csv")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("backup.~sv")),
            PathBuf::from("backup.~sv")
        );
    }
}
