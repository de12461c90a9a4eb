//! `taskwin`: view and manage the latest incomplete tasks.
//!
//! ```bash
//! # Interactive shell against the default service URL
//! cargo run --bin taskwin
//!
//! # One-shot commands
//! cargo run --bin taskwin -- list
//! cargo run --bin taskwin -- add "Buy milk" -d "2 litres"
//! cargo run --bin taskwin -- done 3
//!
//! # Without a service
//! cargo run --bin taskwin -- --offline
//! ```

use std::io::{self, Write as _};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_appender::non_blocking::WorkerGuard;

use taskwin::config::{CliArgs, ClientConfig, Command};
use taskwin::engine::{ClientState, SyncEngine};
use taskwin::gateway::TaskGateway;
use taskwin::gateway::http::HttpGateway;
use taskwin::gateway::memory::InMemoryGateway;
use taskwin::ui::{self, SHELL_HELP, ShellCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::from(2);
        }
    };

    // Logs go to a file; stdout belongs to the renderer.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let command = cli.command.clone().unwrap_or(Command::Shell);
    tracing::info!(?command, offline = config.offline, "taskwin starting");

    let result = if config.offline {
        let gateway = InMemoryGateway::with_tasks([
            ("Water the plants", "Balcony and kitchen"),
            ("Book dentist", ""),
            ("Renew library card", "Expires end of month"),
        ]);
        run(SyncEngine::new(gateway), &config, command).await
    } else {
        match HttpGateway::from_url(&config.base_url, config.request_timeout) {
            Ok(gateway) => run(SyncEngine::new(gateway), &config, command).await,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(2);
            }
        }
    };

    tracing::info!("taskwin exiting");
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskwin.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Run one command to completion.
///
/// One-shot commands exit non-zero when the engine ends with an error message.
async fn run<G: TaskGateway>(
    engine: SyncEngine<G>,
    config: &ClientConfig,
    command: Command,
) -> io::Result<ExitCode> {
    let mut engine = engine.with_max_title_len(config.max_title_len);

    match command {
        Command::List => engine.refresh().await,
        Command::Add { title, description } => {
            engine.set_title(&title);
            engine.set_description(&description);
            engine.submit_create().await;
        }
        Command::Done { id } => engine.submit_complete(id).await,
        Command::Shell => {
            shell(engine).await?;
            return Ok(ExitCode::SUCCESS);
        }
    }

    let state = engine.snapshot();
    print!("{}", ui::render(&state));
    io::stdout().flush()?;
    Ok(if state.last_error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Interactive loop: a renderer task redraws on every published snapshot
/// while this task feeds parsed intents to the engine one at a time.
async fn shell<G: TaskGateway>(mut engine: SyncEngine<G>) -> io::Result<()> {
    let renderer = tokio::spawn(render_until_closed(engine.subscribe(), io::stdout()));

    engine.refresh().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ui::parse_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Help) => write!(io::stdout(), "{SHELL_HELP}> ")?,
            Ok(ShellCommand::Intents(intents)) => {
                for intent in intents {
                    engine.apply(intent).await;
                }
            }
            Err(usage) => write!(io::stdout(), "{usage}\n> ")?,
        }
        io::stdout().flush()?;
    }

    // Dropping the engine closes the channel and ends the renderer.
    drop(engine);
    let _ = renderer.await;
    Ok(())
}

/// Redraw on every snapshot until the engine goes away or `out` stops
/// accepting writes.
async fn render_until_closed<W: io::Write>(mut rx: watch::Receiver<ClientState>, mut out: W) {
    while rx.changed().await.is_ok() {
        let text = ui::render(&rx.borrow_and_update());
        if let Err(e) = write!(out, "\n{text}> ").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "output closed, renderer stopping");
            break;
        }
    }
}
