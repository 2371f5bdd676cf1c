//! `/control`: runtime reconfiguration and shutdown.
//!
//! Commands are single-line text frames made of space-separated tokens:
//!
//! | Command | Effect | Reply |
//! |---|---|---|
//! | `close` | resolves the shutdown signal, then closes this connection | `ok` |
//! | `newPath <path> <delaySeconds>` | registers a one-shot delayed echo path | `ok` |
//! | anything else | none | the command text, unmodified |
//!
//! A `newPath` with bad arguments is answered with `error: <reason>` and
//! the loop keeps going.

use std::time::Duration;

use axum::extract::ws::{Message, close_code};

use super::session::{Session, payload_text};
use crate::app_state::AppState;
use crate::domain::PathBehavior;
use crate::error::ServerError;

/// Reply sent for every successful command.
pub const OK_REPLY: &str = "ok";

/// A parsed control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Stop the server.
    Close,
    /// Register `path` with a fixed reply delay.
    NewPath {
        /// Path as given by the client (normalized on registration).
        path: String,
        /// Reply delay.
        delay: Duration,
    },
    /// Not a known command; echoed back.
    Unrecognized,
}

impl ControlCommand {
    /// Parses one command line. A trailing line terminator is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidCommand`] when `newPath` has the wrong
    /// number of arguments, an empty path, or a delay that is not a
    /// non-negative integer.
    pub fn parse(line: &str) -> Result<Self, ServerError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut tokens = line.split(' ');

        match tokens.next() {
            Some("close") => Ok(Self::Close),
            Some("newPath") => {
                let (Some(path), Some(delay), None) = (tokens.next(), tokens.next(), tokens.next())
                else {
                    return Err(ServerError::InvalidCommand(
                        "usage: newPath <path> <delaySeconds>".to_string(),
                    ));
                };
                if path.trim_start_matches('/').is_empty() {
                    return Err(ServerError::InvalidCommand(
                        "newPath requires a non-empty path".to_string(),
                    ));
                }
                let secs: u64 = delay.parse().map_err(|_| {
                    ServerError::InvalidCommand(format!(
                        "delay `{delay}` is not a non-negative integer"
                    ))
                })?;
                Ok(Self::NewPath {
                    path: path.to_string(),
                    delay: Duration::from_secs(secs),
                })
            }
            _ => Ok(Self::Unrecognized),
        }
    }
}

/// Runs the command loop until `close` is received or the connection ends.
///
/// # Errors
///
/// Returns the error that ended the connection when the loop stops for
/// any reason other than the `close` command.
pub async fn run_control(session: &mut Session, state: &AppState) -> Result<(), ServerError> {
    loop {
        let message = session.recv().await?;
        let command = match &message {
            Message::Text(text) => ControlCommand::parse(text.as_str()),
            _ => Ok(ControlCommand::Unrecognized),
        };

        match command {
            Ok(ControlCommand::Close) => {
                session.send(Message::text(OK_REPLY)).await?;
                if state.shutdown.trigger() {
                    tracing::info!("shutdown requested over control channel");
                } else {
                    tracing::debug!("shutdown already requested");
                }
                session.close(close_code::NORMAL, "").await?;
                return Ok(());
            }
            Ok(ControlCommand::NewPath { path, delay }) => {
                let behavior = PathBehavior::new(&path, delay);
                tracing::info!(
                    path = %behavior.path,
                    delay_secs = delay.as_secs(),
                    "registered path"
                );
                let _ = state.registry.insert(behavior).await;
                session.send(Message::text(OK_REPLY)).await?;
            }
            Ok(ControlCommand::Unrecognized) => {
                tracing::debug!(command = %payload_text(&message), "unrecognized control command");
                session.send(message).await?;
            }
            Err(error) => {
                tracing::warn!(%error, "rejected control command");
                session.send(Message::text(format!("error: {error}"))).await?;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_close() {
        let Ok(command) = ControlCommand::parse("close") else {
            panic!("close should parse");
        };
        assert_eq!(command, ControlCommand::Close);

        let Ok(command) = ControlCommand::parse("close\r\n") else {
            panic!("close with line terminator should parse");
        };
        assert_eq!(command, ControlCommand::Close);
    }

    #[test]
    fn parses_new_path() {
        let Ok(command) = ControlCommand::parse("newPath foo 2") else {
            panic!("newPath should parse");
        };
        assert_eq!(
            command,
            ControlCommand::NewPath {
                path: "foo".to_string(),
                delay: Duration::from_secs(2),
            }
        );
    }

    #[test]
    fn new_path_rejects_bad_arguments() {
        for line in [
            "newPath",
            "newPath foo",
            "newPath foo 2 extra",
            "newPath foo two",
            "newPath foo -1",
            "newPath foo 1.5",
            "newPath / 1",
            "newPath  1",
        ] {
            let result = ControlCommand::parse(line);
            assert!(
                matches!(result, Err(ServerError::InvalidCommand(_))),
                "`{line}` should be rejected"
            );
        }
    }

    #[test]
    fn unknown_commands_are_unrecognized() {
        for line in ["hello", "", "CLOSE", "newpath foo 1", " close"] {
            let Ok(command) = ControlCommand::parse(line) else {
                panic!("`{line}` should parse as unrecognized");
            };
            assert_eq!(command, ControlCommand::Unrecognized, "`{line}`");
        }
    }
}
