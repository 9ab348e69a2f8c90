//! Shared helpers for scripted trainer sessions.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use vocab_core::{Settings, TierRegistry};
use vocab_trainer::config::Config;
use vocab_trainer::console::Console;
use vocab_trainer::session::Session;

pub type ScriptedSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

/// Write a vocab file into `dir` and return its path.
pub fn write_db(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("vtdb.~sv");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// Deterministic configuration pointing at `db`.
pub fn config_for(db: &Path) -> Config {
    Config {
        db: db.to_path_buf(),
        settings: Settings::default(),
        seed: Some(7),
    }
}

/// A session that reads `input` line by line and loads the configured file.
pub fn scripted(input: &str, config: Config) -> ScriptedSession {
    let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let mut session = Session::new(console, config);
    session.open_default().unwrap();
    session
}

pub fn output(session: &ScriptedSession) -> String {
    String::from_utf8(session.console.output().clone()).unwrap()
}

/// Read a saved file back into a fresh registry.
pub fn reload(path: &Path) -> TierRegistry {
    let mut registry = TierRegistry::new();
    vocab_core::store::load_file(path, &mut registry, 255).unwrap();
    registry
}
