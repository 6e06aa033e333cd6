//! Main tracking mode.
//!
//! Attaches to the game, then polls on the configured cadence: game state
//! transitions, a kill scan while in game, and overlay output whenever the
//! counters change. Reattaches when the game restarts.

use std::sync::mpsc::Receiver;

use anyhow::Result;
use d2reader_core::{
    D2Reader, Error, GameState, GameStateDetector, KillCategory, KillCounts, MemoryReader,
    ProcessHandle, ReadMemory, StreamOutput, attach,
};
use owo_colors::OwoColorize;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::input::{self, KeyAction};
use crate::retry::attach_with_retry;
use crate::shutdown::ShutdownSignal;

pub fn run(config: &Config, pid: Option<u32>) -> Result<()> {
    let shutdown = ShutdownSignal::with_ctrlc()?;
    let keys = input::spawn_keyboard_monitor(shutdown.clone());

    let output = match &config.stream_dir {
        Some(dir) => StreamOutput::new(true, dir),
        None => StreamOutput::disabled(),
    };
    if output.is_enabled() {
        info!("Writing overlay files to {}", output.base_dir().display());
    }

    info!("d2reader {}", env!("CARGO_PKG_VERSION"));
    println!("Waiting for Diablo II... (Esc or q to quit, r for a new session)");

    let names = config.process_names();
    while !shutdown.is_shutdown() {
        let Some(process) = attach_with_retry(pid, &names, config.attach_retry(), &shutdown)?
        else {
            break;
        };

        match attach(&process) {
            Ok(mut session) if session.is_supported() => {
                println!(
                    "Tracking {} {} (PID {})",
                    process.name,
                    session.build(),
                    process.pid
                );
                if let Err(e) = track(&mut session, &process, config, &keys, &output, &shutdown) {
                    error!("Tracker error: {}", e);
                }
                debug!("Process disconnected, waiting for reconnect...");
            }
            Ok(session) => {
                warn!("Build {} is not supported, nothing to track", session.build());
            }
            Err(Error::ModuleNotLoaded(module)) => {
                info!("Game is still loading ({} not mapped yet)", module);
            }
            Err(e) => error!("Failed to attach: {}", e),
        }

        if shutdown.wait(config.attach_retry()) {
            break;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

fn track(
    session: &mut D2Reader<MemoryReader<'_>>,
    process: &ProcessHandle,
    config: &Config,
    keys: &Receiver<KeyAction>,
    output: &StreamOutput,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let mut detector = GameStateDetector::new();
    let mut last_counts = session.kill_counts();
    output.write_kills(&last_counts, session.session_started())?;

    while !shutdown.is_shutdown() {
        if session.reader().read_bytes(process.base_address, 4).is_err() {
            info!("Process terminated");
            break;
        }

        while let Ok(action) = keys.try_recv() {
            if action == KeyAction::NewSession {
                session.new_session();
                println!("{}", "New session started".cyan());
            }
        }

        let in_game = session.is_in_game();
        if let Some(state) = detector.update(in_game, session.is_paused()) {
            info!("Game state: {}", state);
            on_state_change(session, state, output);
        }

        if in_game {
            session.update_kills()?;
        }

        let counts = session.kill_counts();
        if counts != last_counts {
            print_kills(&counts, &last_counts);
            output.write_kills(&counts, session.session_started())?;
            if let Ok(stats) = session.player_stats() {
                output.write_player(&stats)?;
            }
            last_counts = counts;
        }

        if shutdown.wait(config.poll_interval()) {
            break;
        }
    }
    Ok(())
}

fn on_state_change(session: &D2Reader<MemoryReader<'_>>, state: GameState, output: &StreamOutput) {
    let result = match state {
        GameState::InGame => session.player_stats().and_then(|stats| {
            println!(
                "{} - level {} ({:.1}%), MF {}%, players {}",
                stats.name.green(),
                stats.level,
                stats.exp_percent * 100.0,
                stats.magic_find,
                stats.players_x
            );
            output.write_player(&stats)
        }),
        GameState::OutOfGame => output.clear_player(),
        GameState::Paused | GameState::Unknown => Ok(()),
    };
    if let Err(e) = result {
        debug!("State change handling failed: {}", e);
    }
}

fn print_kills(counts: &KillCounts, previous: &KillCounts) {
    let line: Vec<String> = counts
        .iter()
        .filter(|(category, _)| *category != KillCategory::Other)
        .map(|(category, n)| {
            let text = format!("{}: {}", category, n);
            if n > previous.get(category) {
                text.yellow().to_string()
            } else {
                text
            }
        })
        .collect();
    println!("{}", line.join("  "));
}
