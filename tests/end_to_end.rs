//! End-to-end tests over real localhost TCP
//!
//! Exercises the full path: source → broadcaster → wire → receiver →
//! buffer, plus the command channel and disconnect pruning.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use framecast::client::StreamReceiver;
use framecast::server::{BroadcastServer, PlaybackStatus, ServerConfig};
use framecast::{MemorySource, SharedPlayer};

/// Five visually distinct payloads standing in for encoded frames.
fn five_frame_cycle() -> Vec<Bytes> {
    (0u8..5).map(|i| Bytes::from(vec![i; 32])).collect()
}

async fn start_server(config: ServerConfig) -> (Arc<BroadcastServer>, std::net::SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let source = MemorySource::new(five_frame_cycle()).unwrap();
    let server = Arc::new(BroadcastServer::new(config));

    let server_task = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = server_task.run_with_listener(listener, source).await;
    });

    (server, addr)
}

#[tokio::test]
async fn client_buffers_frames_in_production_order() {
    let (_server, addr) = start_server(ServerConfig::default().frame_rate(10)).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, _write_half) = stream.into_split();

    let player = SharedPlayer::new(300);
    let receiver = StreamReceiver::new(Arc::clone(&player), 16 * 1024 * 1024);
    let receiver_task = tokio::spawn(receiver.run(read_half));

    // 10 fps for 1.2 s yields ~12 frames.
    tokio::time::sleep(Duration::from_millis(1200)).await;

    player
        .with_state(|state| {
            let len = state.buffer.len();
            assert!(len >= 10, "expected at least 10 frames, got {}", len);
            // Pacing holds: no busier than configured (generous upper bound).
            assert!(len <= 16, "expected at most 16 frames, got {}", len);

            // Strict cyclic production order 0,1,2,3,4,0,1,...
            let start = state.buffer.get(0).unwrap().payload[0] as usize;
            for offset in 0..len {
                let frame = state.buffer.get(offset).unwrap();
                let expected = ((start + offset) % 5) as u8;
                assert_eq!(
                    frame.payload[0], expected,
                    "frame at offset {} out of cycle order",
                    offset
                );
                assert_eq!(frame.sequence, offset as u64);
            }
        })
        .await;

    receiver_task.abort();
}

#[tokio::test]
async fn sibling_consumer_survives_a_broken_one() {
    let (server, addr) = start_server(ServerConfig::default().frame_rate(50)).await;

    let broken = TcpStream::connect(addr).await.unwrap();
    let healthy = TcpStream::connect(addr).await.unwrap();

    // Both consumers register.
    let registry = Arc::clone(server.registry());
    tokio::time::timeout(Duration::from_secs(2), async {
        while registry.len().await < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("consumers never registered");

    let (healthy_read, _healthy_write) = healthy.into_split();
    let player = SharedPlayer::new(300);
    let receiver = StreamReceiver::new(Arc::clone(&player), 16 * 1024 * 1024);
    let receiver_task = tokio::spawn(receiver.run(healthy_read));

    // Break consumer A mid-broadcast.
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(broken);

    let before = player.buffered().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let after = player.buffered().await;

    assert!(
        after > before,
        "healthy consumer stopped receiving after sibling broke ({} -> {})",
        before,
        after
    );

    // The broken session is eventually pruned.
    tokio::time::timeout(Duration::from_secs(2), async {
        while registry.len().await > 1 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("broken consumer never pruned");

    receiver_task.abort();
}

#[tokio::test]
async fn command_channel_updates_session_bookkeeping() {
    let (server, addr) = start_server(ServerConfig::default().frame_rate(50)).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();

    let registry = Arc::clone(server.registry());
    tokio::time::timeout(Duration::from_secs(2), async {
        while registry.len().await < 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("consumer never registered");

    // Keep receiving so the session stays healthy and `delivered` grows.
    let player = SharedPlayer::new(300);
    let receiver = StreamReceiver::new(Arc::clone(&player), 16 * 1024 * 1024);
    let receiver_task = tokio::spawn(receiver.run(read_half));

    // Let some frames arrive, then pause and rewind.
    tokio::time::sleep(Duration::from_millis(300)).await;
    write_half.write_all(b"pause\nrewind\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let session_id = 1; // first registered consumer
    let control = registry.control(session_id).await.expect("session missing");
    assert_eq!(control.status, PlaybackStatus::Pause);
    assert!(control.delivered > 0);

    // Playback control is client-local: a paused consumer keeps receiving.
    let before = player.buffered().await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    let after = player.buffered().await;
    assert!(
        after > before,
        "paused consumer stopped receiving frames ({} -> {})",
        before,
        after
    );

    receiver_task.abort();
}

#[tokio::test]
async fn server_refuses_to_start_without_media() {
    let err = MemorySource::new(Vec::new()).unwrap_err();
    assert!(matches!(err, framecast::Error::SourceUnavailable { .. }));

    let err = framecast::DirectorySource::open("/no/such/media").unwrap_err();
    assert!(matches!(err, framecast::Error::SourceUnavailable { .. }));
}
