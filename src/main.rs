//! Shmup entry point
//!
//! Wires the terminal collaborators to a session and runs it until quit.

use std::fs::File;
use std::io;

use anyhow::Context;
use env_logger::{Builder, Env, Target};

use shmup::assets::{AssetStore, MANIFEST_FILE};
use shmup::audio::TerminalAudio;
use shmup::platform::{SystemClock, TerminalInput};
use shmup::renderer::TerminalRenderer;
use shmup::settings::{SETTINGS_FILE, Settings};
use shmup::Session;

const LOG_FILE: &str = "shmup.log";

/// Log to a file; the terminal belongs to the game
fn init_logging() {
    let file = match File::create(LOG_FILE) {
        Ok(file) => file,
        // Nowhere to log without corrupting the display
        Err(_) => return,
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.target(Target::Pipe(Box::new(file)));
    let _ = builder.try_init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("Shmup starting...");

    let settings = Settings::load(SETTINGS_FILE);
    let assets = AssetStore::load(MANIFEST_FILE);
    let audio = TerminalAudio::new(&assets, &settings);

    let renderer = TerminalRenderer::new(io::stdout(), &settings)
        .context("failed to initialise the terminal")?;
    let input = TerminalInput::spawn();
    let seed: u64 = rand::random();

    let mut session = Session::new(
        settings,
        seed,
        assets,
        renderer,
        input,
        audio,
        SystemClock::new(),
    );
    session.run()?;
    log::info!("Shmup exiting");
    Ok(())
}
