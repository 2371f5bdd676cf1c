//! One upgraded WebSocket connection.
//!
//! [`Session`] wraps the axum socket with the pieces every route needs:
//! keepalive pings while waiting for data, classification of how the peer
//! went away, and a bounded close handshake.

use std::borrow::Cow;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::error::{CloseInfo, ServerError};

/// Close-handshake progress of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseState {
    Open,
    /// The peer sent a close frame; our reply is queued but not flushed.
    PeerClosed,
    Closed,
}

/// What woke up a pending [`Session::recv`].
enum Wake {
    Frame(Option<Result<Message, axum::Error>>),
    Keepalive,
}

/// A single client connection.
#[derive(Debug)]
pub struct Session {
    socket: WebSocket,
    keepalive: Option<Interval>,
    close_timeout: Duration,
    state: CloseState,
}

impl Session {
    /// Wraps an upgraded socket.
    ///
    /// With `ping_interval` set, a ping is sent every interval while a
    /// [`recv`](Self::recv) is pending; the first one goes out one full
    /// interval after the connection opens.
    #[must_use]
    pub fn new(socket: WebSocket, ping_interval: Option<Duration>, close_timeout: Duration) -> Self {
        let keepalive = ping_interval.map(|period| {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        Self {
            socket,
            keepalive,
            close_timeout,
            state: CloseState::Open,
        }
    }

    /// Waits for the next text or binary message.
    ///
    /// Ping and pong frames are consumed here; pong replies are sent by the
    /// protocol layer.
    ///
    /// # Errors
    ///
    /// - [`ServerError::ClosedNormally`] if the peer closed with 1000 or 1001.
    /// - [`ServerError::ClosedAbnormally`] for any other close, including a
    ///   close frame without a status code or a dropped connection.
    /// - [`ServerError::Transport`] if the socket failed.
    pub async fn recv(&mut self) -> Result<Message, ServerError> {
        if self.state != CloseState::Open {
            return Err(ServerError::ClosedAbnormally(CloseInfo::default()));
        }

        loop {
            let wake = tokio::select! {
                frame = self.socket.next() => Wake::Frame(frame),
                () = next_tick(&mut self.keepalive) => Wake::Keepalive,
            };

            match wake {
                Wake::Keepalive => {
                    tracing::trace!("sending keepalive ping");
                    self.socket.send(Message::Ping(Bytes::new())).await?;
                }
                Wake::Frame(Some(Ok(message @ (Message::Text(_) | Message::Binary(_))))) => {
                    return Ok(message);
                }
                Wake::Frame(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => {}
                Wake::Frame(Some(Ok(Message::Close(frame)))) => {
                    self.state = CloseState::PeerClosed;
                    return Err(classify_close(frame));
                }
                Wake::Frame(Some(Err(error))) => {
                    self.state = CloseState::Closed;
                    return Err(ServerError::Transport(error));
                }
                Wake::Frame(None) => {
                    self.state = CloseState::Closed;
                    return Err(ServerError::ClosedAbnormally(CloseInfo::default()));
                }
            }
        }
    }

    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] if the write fails.
    pub async fn send(&mut self, message: Message) -> Result<(), ServerError> {
        self.socket.send(message).await?;
        Ok(())
    }

    /// Starts a server-side close with `code` and `reason`, then waits
    /// (bounded by the configured close timeout) for the peer's reply.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] if the close frame cannot be sent.
    pub async fn close(&mut self, code: u16, reason: &str) -> Result<(), ServerError> {
        if self.state != CloseState::Open {
            return Ok(());
        }
        self.state = CloseState::Closed;
        self.socket
            .send(Message::Close(Some(CloseFrame {
                code,
                reason: reason.into(),
            })))
            .await?;
        self.drain().await;
        Ok(())
    }

    /// Completes the close handshake after a handler returned.
    ///
    /// An open connection is closed normally; a connection the peer
    /// already closed gets its queued close reply flushed.
    pub async fn finish(&mut self) {
        match self.state {
            CloseState::Open => {
                if let Err(error) = self.close(close_code::NORMAL, "").await {
                    tracing::debug!(%error, "normal close failed");
                }
            }
            CloseState::PeerClosed => {
                self.state = CloseState::Closed;
                self.drain().await;
            }
            CloseState::Closed => {}
        }
    }

    /// Reads until the stream ends so queued close frames get flushed.
    async fn drain(&mut self) {
        let drained = tokio::time::timeout(self.close_timeout, async {
            while let Some(Ok(_)) = self.socket.next().await {}
        })
        .await;
        if drained.is_err() {
            tracing::debug!("peer did not finish the close handshake in time");
        }
    }
}

/// Renders a data message as text; binary payloads are decoded lossily.
#[must_use]
pub fn payload_text(message: &Message) -> Cow<'_, str> {
    match message {
        Message::Text(text) => Cow::Borrowed(text.as_str()),
        Message::Binary(data) => String::from_utf8_lossy(data),
        _ => Cow::Borrowed(""),
    }
}

/// Maps a received close frame to the session outcome.
fn classify_close(frame: Option<CloseFrame>) -> ServerError {
    match frame {
        Some(frame) if frame.code == close_code::NORMAL || frame.code == close_code::AWAY => {
            ServerError::ClosedNormally
        }
        Some(frame) => ServerError::ClosedAbnormally(CloseInfo {
            code: Some(frame.code),
            reason: frame.reason.as_str().to_owned(),
        }),
        None => ServerError::ClosedAbnormally(CloseInfo::default()),
    }
}

async fn next_tick(keepalive: &mut Option<Interval>) {
    match keepalive {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn normal_and_going_away_are_normal_closes() {
        for code in [close_code::NORMAL, close_code::AWAY] {
            let outcome = classify_close(Some(CloseFrame {
                code,
                reason: "".into(),
            }));
            assert!(matches!(outcome, ServerError::ClosedNormally));
        }
    }

    #[test]
    fn other_codes_are_abnormal_with_details() {
        let outcome = classify_close(Some(CloseFrame {
            code: 4500,
            reason: "This is a good reason.".into(),
        }));
        let ServerError::ClosedAbnormally(info) = outcome else {
            panic!("expected an abnormal close");
        };
        assert_eq!(info.code, Some(4500));
        assert_eq!(info.reason, "This is a good reason.");
    }

    #[test]
    fn close_without_status_has_no_details() {
        let ServerError::ClosedAbnormally(info) = classify_close(None) else {
            panic!("expected an abnormal close");
        };
        assert_eq!(info, CloseInfo::default());
    }

    #[test]
    fn payload_text_decodes_binary_lossily() {
        assert_eq!(payload_text(&Message::text("hello")), "hello");
        assert_eq!(
            payload_text(&Message::Binary(Bytes::from_static(b"bytes"))),
            "bytes"
        );
        assert_eq!(
            payload_text(&Message::Binary(Bytes::from_static(&[0xff]))),
            "\u{fffd}"
        );
    }
}
