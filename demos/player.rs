//! Playback client demo
//!
//! Run with: cargo run --example player [SERVER_ADDR] [RESIZE_FACTOR]
//!
//! Connects to a broadcast server, buffers the incoming frame stream, and
//! plays it back under interactive control. Type commands on stdin:
//!
//!   play            resume forward playback
//!   pause           hold the current position
//!   rewind          play backward through the buffered window
//!   fast-forward    advisory server-side seek
//!   analyze         launch the configured analysis tool (FRAMECAST_ANALYZE)
//!
//! Rendering here is a thin stand-in: decoded frames are reported on the
//! terminal rather than drawn into a window.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpStream;

use framecast::client::{DecodedFrame, Renderer};
use framecast::{ClientConfig, CommandDispatcher, PlaybackEngine, SharedPlayer, StreamReceiver};

/// Reports every Nth rendered frame on the terminal.
struct TerminalRenderer {
    rendered: u64,
}

impl TerminalRenderer {
    fn new() -> Self {
        Self { rendered: 0 }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &DecodedFrame) {
        self.rendered += 1;
        if self.rendered % 30 == 1 {
            println!(
                "frame seq={} {}x{} ({} rendered)",
                frame.sequence, frame.width, frame.height, self.rendered
            );
        }
    }
}

fn print_usage() {
    eprintln!("Usage: player [SERVER_ADDR] [RESIZE_FACTOR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  SERVER_ADDR     Broadcast server address (default: 127.0.0.1:8000)");
    eprintln!("  RESIZE_FACTOR   Display scale for decoded frames (default: 0.2)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FRAMECAST_ANALYZE   Command line spawned by the 'analyze' token");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("framecast=info".parse()?)
                .add_directive("player=info".parse()?),
        )
        .init();

    let server_addr: SocketAddr = args
        .get(1)
        .map(|s| s.replace("localhost", "127.0.0.1"))
        .unwrap_or_else(|| "127.0.0.1:8000".to_string())
        .parse()?;

    let resize_factor: f32 = match args.get(2) {
        Some(factor) => factor.parse().map_err(|_| "RESIZE_FACTOR must be a number")?,
        None => 0.2,
    };

    let analysis_command = std::env::var("FRAMECAST_ANALYZE")
        .ok()
        .map(|line| line.split_whitespace().map(String::from).collect());

    let mut config = ClientConfig::with_addr(server_addr).resize_factor(resize_factor);
    config.analysis_command = analysis_command;

    println!("Connecting to {}...", server_addr);
    let stream = TcpStream::connect(server_addr).await?;
    println!("Connected. Commands: play / pause / rewind / fast-forward / analyze");

    let (read_half, write_half) = stream.into_split();

    let player = SharedPlayer::new(config.buffer_capacity);

    let receiver = StreamReceiver::new(Arc::clone(&player), config.max_frame_size);
    let receiver_task = tokio::spawn(receiver.run(read_half));

    let engine = PlaybackEngine::new(Arc::clone(&player), config.clone(), TerminalRenderer::new());
    let engine_task = tokio::spawn(engine.run());

    let dispatcher = CommandDispatcher::new(
        Arc::clone(&player),
        write_half,
        config.analysis_command.clone(),
    );
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        _ = dispatcher.run(stdin) => {
            println!("Input closed.");
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    receiver_task.abort();
    engine_task.abort();

    Ok(())
}
