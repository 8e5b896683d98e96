//! The command source: a blocking line reader on its own thread.
//!
//! Reads one line at a time, parses it, and forwards the resulting
//! [`Command`] into the event loop's channel. The reader never checks
//! an exit flag before blocking — instead, a line read after the loop
//! has exited simply fails to send and is discarded, which closes the
//! window between a termination signal and the next blocking read.
//!
//! EOF or a failed terminal read ends the reader; dropping the sender
//! then ends the event loop, which terminates the process.

use std::io::{BufRead, Write};

use tokio::sync::{mpsc, watch};

use parlor_protocol::{parse, Command};

use crate::prompt;

/// Reads commands from `input` until EOF, a read error, or the loop
/// side going away. Generic over the input so tests can drive it with
/// an in-memory cursor.
pub fn read_commands<R: BufRead>(
    mut input: R,
    commands: mpsc::UnboundedSender<Command>,
    identity: watch::Receiver<String>,
) {
    let mut line = String::new();
    loop {
        let name = identity.borrow().clone();
        print!("{}", prompt::cmd_prompt(&name));
        let _ = std::io::stdout().flush();

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                tracing::debug!("end of input");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "terminal read failed");
                break;
            }
        }

        match parse(&line) {
            Ok(Some(cmd)) => {
                if commands.send(cmd).is_err() {
                    // The event loop is gone; this line is dropped,
                    // never processed.
                    break;
                }
            }
            Ok(None) => {} // empty line, silently ignored
            Err(e) => println!("{e}"),
        }
    }
}
