use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coordinator::{validate_endpoint, CoordinatorEvent, InputCoordinator};
use dispatcher::CommandDispatcher;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;

use config::{load_settings, DEFAULT_SETTINGS_FILE};
use input::{parse_line, InputLine};

/// Streams joystick samples from stdin to a simulator control port.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<String>,
    /// Print notifications as JSON lines instead of plain text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    validate_endpoint(&settings.host, &settings.port)
        .with_context(|| format!("invalid endpoint {}:{}", settings.host, settings.port))?;

    let dispatcher = CommandDispatcher::new(settings.dispatcher_config())
        .context("failed to start dispatch worker")?;
    let mut coordinator = InputCoordinator::new(dispatcher);

    let mut events = coordinator.subscribe_events();
    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event, json);
        }
    });

    coordinator.set_host(settings.host.as_str());
    coordinator.set_port(settings.port.as_str());
    coordinator.connect_current()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        line_no += 1;
        match parse_line(&line) {
            Ok(InputLine::Axes { px, py, pa, pb }) => {
                let outcome = coordinator.forward_values(px, py, pa, pb);
                debug!(line = line_no, ?outcome, "forwarded sample");
            }
            Ok(InputLine::Connect { host, port }) => {
                // Rejections reach the user through the event printer.
                let _ = coordinator.connect(&host, &port);
            }
            Ok(InputLine::Blank) => {}
            Err(err) => warn!(line = line_no, "ignoring input: {err}"),
        }
    }

    drop(coordinator);
    let _ = printer.await;
    Ok(())
}

fn print_event(event: &CoordinatorEvent, json: bool) {
    let notice = event.notice();
    if json {
        match serde_json::to_string(&notice) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!("failed to encode notification: {err}"),
        }
        return;
    }
    match &notice.cause {
        Some(cause) => println!("{}: {cause}", notice.description),
        None => println!("{}", notice.description),
    }
}
