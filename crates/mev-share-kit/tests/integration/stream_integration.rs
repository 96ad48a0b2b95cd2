//! Hint stream subscription against a raw TCP server.
//!
//! The server answers with a close-delimited `text/event-stream` body so the
//! tests control exactly when bytes arrive and whether the connection stays
//! open.

use std::time::Duration;

use mev_share_kit::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

const HASH: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";
const SSE_HEADERS: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\n\r\n";
const WAIT: Duration = Duration::from_secs(5);

/// What the mock server does once its body has been written.
enum Then {
    Close,
    /// Keep the socket open until the sender fires or is dropped.
    HoldOpen(oneshot::Receiver<()>),
}

async fn read_request(socket: &mut TcpStream) {
    let mut request: Vec<u8> = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
    }
}

/// Serve one SSE connection, writing each chunk with a short pause between.
async fn serve(chunks: Vec<&'static str>, then: Then) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(SSE_HEADERS).await.unwrap();
        for chunk in chunks {
            socket.write_all(chunk.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        if let Then::HoldOpen(release) = then {
            let _ = release.await;
        }
    });

    format!("http://{addr}")
}

fn hint(hash: &str) -> &'static str {
    Box::leak(format!("data: {{\"hash\":\"{hash}\",\"logs\":null,\"txs\":null}}\n\n").into_boxed_str())
}

async fn next(rx: &mut mpsc::Receiver<Event>) -> Option<Event> {
    timeout(WAIT, rx.recv()).await.expect("timed out waiting for event")
}

// =============================================================================
// Frame handling
// =============================================================================

#[tokio::test]
async fn test_ping_blank_data_and_garbage() {
    crate::init_tracing();
    let url = serve(
        vec![":ping\n", "\n", hint(HASH), "data: not-json\n\n"],
        Then::Close,
    )
    .await;

    let (tx, mut rx) = mpsc::channel(16);
    let _subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    let first = next(&mut rx).await.unwrap();
    assert_eq!(first.data().unwrap().hash, HASH.parse::<B256>().unwrap());

    let second = next(&mut rx).await.unwrap();
    assert!(second.is_error());
    assert_eq!(second.error().unwrap().line(), "not-json");

    // Server closed the connection: reader exits and drops its sender.
    assert!(next(&mut rx).await.is_none());
}

#[tokio::test]
async fn test_frames_split_across_chunks() {
    let url = serve(
        vec![
            "data: {\"hash\":\"0x0101010101010101",
            "010101010101010101010101010101010101010101010101\"}\r\n",
            "\r\n:ping\r\n",
            "data:{\"hash\":\"0x0202020202020202020202020202020202020202020202020202020202020202\"}",
        ],
        Then::Close,
    )
    .await;

    let (tx, mut rx) = mpsc::channel(16);
    let _subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    let first = next(&mut rx).await.unwrap().into_result().unwrap();
    assert_eq!(first.hash, B256::repeat_byte(0x01));

    // Unterminated final frame is flushed when the stream ends.
    let last = next(&mut rx).await.unwrap().into_result().unwrap();
    assert_eq!(last.hash, B256::repeat_byte(0x02));

    assert!(next(&mut rx).await.is_none());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_stop_while_connection_held_open() {
    crate::init_tracing();
    let (_release, held) = oneshot::channel();
    let url = serve(vec![hint(HASH)], Then::HoldOpen(held)).await;

    let (tx, mut rx) = mpsc::channel(16);
    let subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    assert!(next(&mut rx).await.unwrap().data().is_some());
    assert!(subscription.is_active());

    subscription.stop();
    subscription.stop();

    assert!(next(&mut rx).await.is_none());
    timeout(WAIT, subscription.finished())
        .await
        .expect("reader did not exit after stop");
}

#[tokio::test]
async fn test_drop_subscription_stops_reader() {
    let (_release, held) = oneshot::channel();
    let url = serve(vec![hint(HASH)], Then::HoldOpen(held)).await;

    let (tx, mut rx) = mpsc::channel(16);
    let subscription = EventClient::new(url).subscribe(tx).await.unwrap();
    assert!(next(&mut rx).await.is_some());

    drop(subscription);
    assert!(next(&mut rx).await.is_none());
}

#[tokio::test]
async fn test_stop_wakes_reader_blocked_on_full_channel() {
    let (_release, held) = oneshot::channel();
    let url = serve(vec![hint(HASH), hint(HASH), hint(HASH)], Then::HoldOpen(held)).await;

    let (tx, mut rx) = mpsc::channel(1);
    let subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    // Let the reader fill the channel and block on the next send.
    tokio::time::sleep(Duration::from_millis(200)).await;
    subscription.stop();

    let mut delivered = 0;
    while next(&mut rx).await.is_some() {
        delivered += 1;
    }
    assert!(delivered <= 1, "delivered {delivered} events after stop");
}

#[tokio::test]
async fn test_finished_when_server_closes() {
    let url = serve(vec![":ping\n\n"], Then::Close).await;

    let (tx, _rx) = mpsc::channel(1);
    let subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    timeout(WAIT, subscription.finished())
        .await
        .expect("reader did not exit after server close");
}

#[tokio::test]
async fn test_reader_exits_on_oversized_line() {
    crate::init_tracing();
    let (_release, held) = oneshot::channel();
    let endless: &'static str =
        Box::leak(format!("data: {}", "a".repeat(80 * 1024)).into_boxed_str());
    let url = serve(vec![hint(HASH), endless], Then::HoldOpen(held)).await;

    let (tx, mut rx) = mpsc::channel(16);
    let subscription = EventClient::new(url).subscribe(tx).await.unwrap();

    assert!(next(&mut rx).await.unwrap().data().is_some());
    // The server keeps the connection open; only the length limit ends it.
    assert!(next(&mut rx).await.is_none());
    timeout(WAIT, subscription.finished())
        .await
        .expect("reader did not exit on oversized line");
}

// =============================================================================
// Connection errors
// =============================================================================

#[tokio::test]
async fn test_subscribe_non_success_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\n\r\nbusy")
            .await
            .unwrap();
    });

    let (tx, mut rx) = mpsc::channel(1);
    let err = EventClient::new(format!("http://{addr}"))
        .subscribe(tx)
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "busy");
        }
        other => panic!("expected Status, got {other:?}"),
    }
    // Nothing was spawned; the sender was dropped with the failed call.
    assert!(rx.recv().await.is_none());
}
