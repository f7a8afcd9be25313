use std::time::Duration;

use clap::Args;
use meditation_core::{Command, Config, Event, Player, Scheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::Presenter;

#[derive(Args)]
pub struct PlayArgs {
    /// Override the tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Start with narration muted
    #[arg(long)]
    muted: bool,
    /// Disable narration audio entirely
    #[arg(long)]
    no_audio: bool,
    /// Print raw events as JSON lines instead of text
    #[arg(long)]
    json: bool,
    /// Begin immediately instead of waiting for [s]
    #[arg(long)]
    autostart: bool,
}

fn command_for(key: &str) -> Option<Command> {
    match key.trim() {
        "s" | "start" => Some(Command::Start),
        "p" | "pause" => Some(Command::TogglePause),
        "m" | "mute" => Some(Command::ToggleMute),
        "r" | "restart" => Some(Command::Restart),
        "i" | "info" => Some(Command::Snapshot),
        "q" | "quit" => Some(Command::Shutdown),
        _ => None,
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(ms) = args.tick_ms {
        config.clock.tick_ms = ms;
    }
    if args.muted {
        config.audio.start_muted = true;
    }
    if args.no_audio {
        config.audio.enabled = false;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(play(config, args.json, args.autostart))
}

async fn play(
    config: Config,
    json: bool,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let period = Duration::from_millis(config.clock.tick_ms.max(1));
    let scheduler = Scheduler::new(config.audio.director()).with_muted(config.audio.start_muted);
    let (handle, mut events, task) = Player::new(scheduler, period).spawn();
    let mut presenter = Presenter::new(config.display.clone());

    if !json {
        for line in Presenter::intro() {
            println!("{line}");
        }
    }
    if autostart {
        handle.start().await?;
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut live = autostart;

    loop {
        tokio::select! {
            line = input.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match command_for(&line) {
                        Some(Command::Shutdown) => break,
                        Some(command) => {
                            live |= command == Command::Start;
                            handle.send(command).await?;
                        }
                        None => debug!(input = %line, "ignored key"),
                    },
                    // Keep playing to the end when input is piped.
                    None if live => stdin_open = false,
                    None => break,
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                if json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    for line in presenter.render(&event) {
                        println!("{line}");
                    }
                }
                match event {
                    Event::SessionStarted { .. } => live = true,
                    Event::SessionRestarted { .. } => live = false,
                    Event::SessionClosed { .. } => {
                        live = false;
                        if !stdin_open {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    // The player may already be gone if every event was drained.
    let _ = handle.shutdown().await;
    task.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for("s"), Some(Command::Start));
        assert_eq!(command_for("p\n"), Some(Command::TogglePause));
        assert_eq!(command_for("mute"), Some(Command::ToggleMute));
        assert_eq!(command_for("r"), Some(Command::Restart));
        assert_eq!(command_for("q"), Some(Command::Shutdown));
        assert_eq!(command_for("x"), None);
    }
}
