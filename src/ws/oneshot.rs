//! Single-exchange routes: open/close test, close-during-echo, registered
//! paths, and the default echo-once reply.

use axum::extract::ws::{Message, close_code};

use super::session::{Session, payload_text};
use crate::domain::PathBehavior;
use crate::error::ServerError;

/// Close reason sent by `/closeduringecho`.
pub const CLOSE_DURING_ECHO_REASON: &str = "closed";

/// `/openclosetest`: reads once and never replies.
///
/// # Errors
///
/// Returns how the peer ended the connection if it did so before sending
/// anything.
pub async fn open_close_test(session: &mut Session) -> Result<(), ServerError> {
    let message = session.recv().await?;
    tracing::debug!(
        bytes = payload_text(&message).len(),
        "ignoring message on open/close test route"
    );
    Ok(())
}

/// `/closeduringecho`: discards one message, then closes with 1001.
///
/// # Errors
///
/// Returns how the peer ended the connection, or a transport error from
/// sending the close frame.
pub async fn close_during_echo(session: &mut Session) -> Result<(), ServerError> {
    let _ = session.recv().await?;
    session
        .close(close_code::AWAY, CLOSE_DURING_ECHO_REASON)
        .await
}

/// Registered path: echoes one message after the configured delay, then
/// closes the connection.
///
/// # Errors
///
/// Returns how the peer ended the connection, or a transport error.
pub async fn custom_path(
    session: &mut Session,
    behavior: &PathBehavior,
) -> Result<(), ServerError> {
    let message = session.recv().await?;
    if !behavior.delay.is_zero() {
        tokio::time::sleep(behavior.delay).await;
    }
    session.send(message).await?;
    session.close(close_code::NORMAL, "").await
}

/// Any other path: replies once with `Data received as: <message>!`, then
/// leaves the connection open until the peer closes it.
///
/// # Errors
///
/// Ends with how the peer closed the connection.
pub async fn echo_once(session: &mut Session) -> Result<(), ServerError> {
    let message = session.recv().await?;
    let reply = echo_once_reply(&message);
    session.send(Message::text(reply)).await?;

    loop {
        let _ = session.recv().await?;
    }
}

/// Formats the echo-once reply for `message`.
#[must_use]
pub fn echo_once_reply(message: &Message) -> String {
    format!("Data received as: {}!", payload_text(message))
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;

    use super::*;

    #[test]
    fn echo_once_reply_wraps_text() {
        assert_eq!(
            echo_once_reply(&Message::text("test")),
            "Data received as: test!"
        );
    }

    #[test]
    fn echo_once_reply_renders_binary() {
        assert_eq!(
            echo_once_reply(&Message::Binary(Bytes::from_static(b"raw"))),
            "Data received as: raw!"
        );
    }
}
