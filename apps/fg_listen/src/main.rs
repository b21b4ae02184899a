use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use shared::protocol::parse_set_line;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Local stand-in for the simulator's telnet control port. Prints every
/// property assignment it receives.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:6400")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(addr = %cli.bind, "listening for control connections");

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        info!(%peer, "client connected");
        match serve(stream).await {
            Ok(commands) => info!(%peer, commands, "client disconnected"),
            Err(err) => warn!(%peer, "connection dropped: {err:#}"),
        }
    }
}

/// One client at a time, like the simulator. Returns the number of accepted
/// `set` commands.
async fn serve(stream: TcpStream) -> Result<u64> {
    let mut lines = BufReader::new(stream).lines();
    let mut commands = 0u64;
    while let Some(line) = lines.next_line().await.context("read failed")? {
        match parse_set_line(&line) {
            Some(cmd) => {
                commands += 1;
                println!("{} = {}", cmd.path, cmd.value);
            }
            None if line.trim().is_empty() => {}
            None => warn!(line = %line, "unrecognised command"),
        }
    }
    Ok(commands)
}
