//! The event loop.
//!
//! One task waits on three sources — typed commands, delivered message
//! bodies, and the termination signal — and handles exactly one event
//! per iteration. `tokio::select!` polls the ready branches in random
//! order, so no source can starve another, and because only one event
//! is served at a time the room state is never mutated concurrently.
//!
//! Exit paths:
//! - `q` command: leave the room (teardown), then break.
//! - termination signal: break immediately, no teardown — process
//!   exit closes whatever connections remain open.
//! - command channel closed (terminal EOF or a fatal read error in
//!   the reader): break, no teardown.
//!
//! Once the loop has exited nothing further is processed; a command
//! still sitting in the queue stays there.

use std::future::Future;

use tokio::sync::mpsc;

use parlor_protocol::Command;
use parlor_transport::Broker;

use crate::prompt;
use crate::room::Room;

enum Flow {
    Continue,
    Quit,
}

/// Runs the event loop to completion and returns the room in its
/// final state.
pub async fn run<B: Broker>(
    mut room: Room<B>,
    mut inbox: mpsc::UnboundedReceiver<String>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    shutdown: impl Future<Output = ()>,
) -> Room<B> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(cmd) => {
                    if let Flow::Quit = dispatch(&mut room, cmd).await {
                        break;
                    }
                }
                None => {
                    tracing::debug!("command source closed, exiting");
                    break;
                }
            },
            Some(body) = inbox.recv() => {
                println!("{}", prompt::room_line(&body));
            }
            _ = &mut shutdown => {
                tracing::debug!("termination signal, exiting");
                break;
            }
        }
    }

    room
}

/// Handles one command. Operation errors are displayed and the loop
/// carries on; only `Quit` ends it.
async fn dispatch<B: Broker>(room: &mut Room<B>, cmd: Command) -> Flow {
    match cmd {
        Command::Enter(topic) => {
            if let Err(e) = room.enter(&topic).await {
                println!("{e}");
            }
        }
        Command::Leave => room.leave().await,
        Command::Say(text) => {
            if let Err(e) = room.say(&text).await {
                println!("{e}");
            }
        }
        Command::Register(name) => room.register(name),
        Command::Help => prompt::print_help(),
        Command::Quit => {
            // Explicit quit tears the session down before exiting.
            room.leave().await;
            return Flow::Quit;
        }
        Command::Unknown(code) => println!("invalid option: {code}"),
    }
    Flow::Continue
}
