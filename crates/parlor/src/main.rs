//! Parlor binary: wires the terminal, the bus, and the event loop.

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use parlor::{prompt, pump, reader, Config, Room};
use parlor_transport::WsBroker;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    if !config.lookup_addrs.is_empty() {
        tracing::debug!(
            addrs = ?config.lookup_addrs,
            "lookup addresses accepted but unused in this version"
        );
    }

    let broker = WsBroker::new(config.broker_addr.clone());

    // The inbox outlives every enter/leave cycle: one conduit for all
    // deliveries, created before the loop starts.
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (identity_tx, identity_rx) = watch::channel(String::new());

    let room = Room::new(broker, inbox_tx, identity_tx);

    std::thread::spawn(move || {
        reader::read_commands(std::io::stdin().lock(), cmd_tx, identity_rx);
    });

    prompt::print_help();
    pump::run(room, inbox_rx, cmd_rx, termination_signal()).await;
}

/// Resolves when SIGINT, SIGTERM, or SIGHUP arrives.
async fn termination_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
        (Ok(mut term), Ok(mut hup)) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
                _ = hup.recv() => {}
            }
        }
        _ => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
