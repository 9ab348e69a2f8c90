pub mod config;
pub mod console;
pub mod manage;
pub mod quiz;
pub mod session;
pub mod stats;

use std::io;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::console::Console;
use crate::session::Session;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they stay out of the prompts.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env().context("reading configuration")?;
    tracing::info!(db = %config.db.display(), seed = ?config.seed, "starting vocab trainer");

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let mut session = Session::new(console, config);
    session.open_default()?;
    session.run()?;
    Ok(())
}
