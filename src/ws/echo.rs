//! `/echotest`: the echo loop.
//!
//! Query parameters:
//! - `delay=<seconds>` (fractional allowed) waits before each reply.
//! - `fragment=true` splits a text message on whitespace and sends each
//!   token as its own message.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;

use super::session::Session;
use crate::domain::EchoCounters;
use crate::error::ServerError;

/// Per-connection echo settings taken from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoOptions {
    /// Wait applied before replying to each message.
    pub delay: Option<Duration>,
    /// Split text replies into whitespace-separated tokens.
    pub fragment: bool,
}

impl EchoOptions {
    /// Reads `delay` and `fragment` from parsed query parameters.
    ///
    /// A `delay` that is not a finite, non-negative number is ignored.
    #[must_use]
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let delay = query.get("delay").and_then(|raw| {
            let parsed = parse_delay(raw);
            if parsed.is_none() {
                tracing::warn!(delay = %raw, "ignoring invalid delay parameter");
            }
            parsed
        });
        let fragment = query.get("fragment").is_some_and(|v| v == "true");
        Self { delay, fragment }
    }

    /// Builds the outbound messages for one received message.
    #[must_use]
    pub fn replies_for(&self, message: Message) -> Vec<Message> {
        match message {
            Message::Text(text) if self.fragment => text
                .as_str()
                .split_whitespace()
                .map(|token| Message::text(token.to_string()))
                .collect(),
            other => vec![other],
        }
    }
}

fn parse_delay(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Runs the echo loop until the peer goes away or the socket fails.
///
/// The session counts as an active echo client for its whole lifetime;
/// the exit bookkeeping runs on every return path.
///
/// # Errors
///
/// Always ends with the error that stopped the loop, typically
/// [`ServerError::ClosedNormally`].
pub async fn run_echo(
    session: &mut Session,
    options: &EchoOptions,
    counters: &Arc<EchoCounters>,
) -> Result<(), ServerError> {
    let _client = counters.enter();

    loop {
        let message = session.recv().await?;
        counters.record_received();

        if let Some(delay) = options.delay {
            tokio::time::sleep(delay).await;
        }

        for reply in options.replies_for(message) {
            session.send(reply).await?;
            counters.record_sent();
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn texts(messages: Vec<Message>) -> Vec<String> {
        messages
            .into_iter()
            .map(|m| match m {
                Message::Text(t) => t.as_str().to_string(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn no_parameters_means_plain_echo() {
        let options = EchoOptions::from_query(&HashMap::new());
        assert_eq!(options, EchoOptions::default());
        assert_eq!(
            texts(options.replies_for(Message::text("Test message"))),
            vec!["Test message".to_string()]
        );
    }

    #[test]
    fn delay_accepts_fractional_seconds() {
        let options = EchoOptions::from_query(&query(&[("delay", "0.25")]));
        assert_eq!(options.delay, Some(Duration::from_millis(250)));

        let options = EchoOptions::from_query(&query(&[("delay", "20")]));
        assert_eq!(options.delay, Some(Duration::from_secs(20)));
    }

    #[test]
    fn invalid_delay_is_ignored() {
        for raw in ["abc", "-1", "NaN", "inf", ""] {
            let options = EchoOptions::from_query(&query(&[("delay", raw)]));
            assert_eq!(options.delay, None, "delay={raw}");
        }
    }

    #[test]
    fn fragment_requires_exact_true() {
        assert!(EchoOptions::from_query(&query(&[("fragment", "true")])).fragment);
        assert!(!EchoOptions::from_query(&query(&[("fragment", "1")])).fragment);
        assert!(!EchoOptions::from_query(&query(&[("fragment", "false")])).fragment);
    }

    #[test]
    fn fragment_splits_text_on_whitespace_in_order() {
        let options = EchoOptions {
            delay: None,
            fragment: true,
        };
        let replies = options.replies_for(Message::text("  one two\tthree\nfour "));
        assert_eq!(texts(replies), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn fragment_of_blank_text_sends_nothing() {
        let options = EchoOptions {
            delay: None,
            fragment: true,
        };
        assert!(options.replies_for(Message::text("   ")).is_empty());
    }

    #[test]
    fn binary_is_never_fragmented() {
        let options = EchoOptions {
            delay: None,
            fragment: true,
        };
        let payload = Bytes::from_static(&[1, 2, 3, 4, 5, 6]);
        let replies = options.replies_for(Message::Binary(payload.clone()));
        assert_eq!(replies, vec![Message::Binary(payload)]);
    }
}
