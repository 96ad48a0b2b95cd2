//! Server-sent-event subscription to the matchmaker hint stream.
//!
//! A subscription owns one background task that reads the response body,
//! splits it into lines and forwards every decoded hint to a caller-supplied
//! bounded channel. Frames that fail to decode are forwarded as
//! [`Event::Error`] and the stream keeps going.
//!
//! # Example
//!
//! ```rust,no_run
//! use mev_share_kit::{Event, EventClient, MAINNET};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> Result<(), mev_share_kit::Error> {
//! let client = EventClient::new(MAINNET.stream_url);
//! let (tx, mut rx) = mpsc::channel(64);
//! let subscription = client.subscribe(tx).await?;
//!
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         Event::Data(hint) => println!("hint for {}", hint.hash),
//!         Event::Error(e) => eprintln!("skipping frame: {e}"),
//!     }
//! }
//! subscription.stop();
//! # Ok(())
//! # }
//! ```

use futures::StreamExt;
use reqwest::header::ACCEPT;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Error, TransportError};
use crate::types::Event;

/// Longest unterminated line the reader buffers before giving up.
const MAX_LINE_LEN: usize = 64 * 1024;

// ============================================================================
// EventClient
// ============================================================================

/// Client for the matchmaker's hint stream and history API.
///
/// Requests are unauthenticated.
#[derive(Clone, Debug)]
pub struct EventClient {
    pub(crate) url: String,
    pub(crate) client: reqwest::Client,
}

impl EventClient {
    /// Create a new event client for the given base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http_client(url, reqwest::Client::new())
    }

    /// Create a new event client on a caller-configured `reqwest::Client`.
    ///
    /// The stream is long-lived, so the client should not carry a total
    /// request timeout.
    pub fn with_http_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the hint stream and start forwarding events to `events`.
    ///
    /// Fails without spawning anything if the connection cannot be made or
    /// the server does not answer with a success status. Otherwise returns as
    /// soon as the response headers arrive.
    ///
    /// Events are pushed with backpressure: a full channel pauses reading.
    /// When the reader exits it drops its sender, so a receiver holding no
    /// other senders sees the channel close.
    pub async fn subscribe(&self, events: mpsc::Sender<Event>) -> Result<Subscription, Error> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::status(status.as_u16(), body).into());
        }

        debug!(url = %self.url, "subscribed to hint stream");

        let (stop, stopped) = watch::channel(false);
        let handle = tokio::spawn(read_events(response, events, stopped));

        Ok(Subscription { stop, handle })
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle to one open hint stream.
///
/// Dropping the handle stops the reader as well.
#[derive(Debug)]
pub struct Subscription {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stop reading. Safe to call any number of times.
    ///
    /// Wakes the reader even while it waits on the network or on a full
    /// channel. At most one event already being handed over may still be
    /// delivered afterwards.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Returns true while the reader task is running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Wait for the reader to exit, either after [`stop`](Self::stop) or
    /// when the server closes the stream.
    pub async fn finished(self) {
        let Subscription { stop, handle } = self;
        let _ = handle.await;
        drop(stop);
    }
}

// ============================================================================
// Reader
// ============================================================================

async fn read_events(
    response: reqwest::Response,
    events: mpsc::Sender<Event>,
    mut stopped: watch::Receiver<bool>,
) {
    let mut body = response.bytes_stream();
    let mut lines = LineDecoder::default();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = stopped.wait_for(|stop| *stop) => {
                debug!("hint stream stopped");
                return;
            }
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                lines.push(&bytes);
                while let Some(line) = lines.next_line() {
                    if !forward(&line, &events, &mut stopped).await {
                        return;
                    }
                }
                if lines.pending() > MAX_LINE_LEN {
                    warn!(
                        pending = lines.pending(),
                        limit = MAX_LINE_LEN,
                        "hint stream line too long"
                    );
                    return;
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, "hint stream failed");
                return;
            }
            None => {
                if let Some(line) = lines.finish() {
                    forward(&line, &events, &mut stopped).await;
                }
                debug!("hint stream closed by server");
                return;
            }
        }
    }
}

/// Decode one line and push it to the channel.
///
/// Returns false when the reader should exit.
async fn forward(
    line: &str,
    events: &mpsc::Sender<Event>,
    stopped: &mut watch::Receiver<bool>,
) -> bool {
    let Some(payload) = frame_payload(line) else {
        trace!(line, "skipping keep-alive");
        return true;
    };
    let event = Event::decode(payload);

    tokio::select! {
        biased;
        _ = stopped.wait_for(|stop| *stop) => false,
        sent = events.send(event) => sent.is_ok(),
    }
}

/// The JSON payload of a frame, or `None` for blank and comment lines.
fn frame_payload(line: &str) -> Option<&str> {
    if line.trim().is_empty() || line.starts_with(':') {
        return None;
    }
    Some(match line.strip_prefix("data:") {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    })
}

/// Reassembles `\n`-terminated lines from arbitrary chunk boundaries.
#[derive(Debug, Default)]
struct LineDecoder {
    buf: Vec<u8>,
    /// Prefix of `buf` already known to contain no `\n`.
    scanned: usize,
}

impl LineDecoder {
    fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<String> {
        let Some(offset) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') else {
            self.scanned = self.buf.len();
            return None;
        };
        let end = self.scanned + offset;
        let line: Vec<u8> = self.buf.drain(..=end).collect();
        self.scanned = 0;
        Some(to_line(&line[..end]))
    }

    /// Bytes buffered for the line not yet terminated.
    fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Whatever is left after the stream ends, if anything.
    fn finish(&mut self) -> Option<String> {
        self.scanned = 0;
        if self.buf.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buf);
        Some(to_line(&line))
    }
}

fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
