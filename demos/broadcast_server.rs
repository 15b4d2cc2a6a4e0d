//! Frame broadcast server demo
//!
//! Run with: cargo run --example broadcast_server MEDIA_DIR [BIND_ADDR] [FPS]
//!
//! Examples:
//!   cargo run --example broadcast_server ./media                  # 0.0.0.0:8000 at 30 fps
//!   cargo run --example broadcast_server ./media localhost:9000   # custom address
//!   cargo run --example broadcast_server ./media 0.0.0.0:8000 10  # custom rate
//!
//! MEDIA_DIR is a directory of encoded still images (jpg/png), one file per
//! frame, played in file-name order and looped forever. Connect with:
//!   cargo run --example player 127.0.0.1:8000

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use framecast::{BroadcastServer, DirectorySource, FrameSource, ServerConfig};

/// Parse a bind address, accepting `IP`, `IP:PORT`, or `localhost[:PORT]`.
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8000;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: broadcast_server MEDIA_DIR [BIND_ADDR] [FPS]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  MEDIA_DIR    Directory of encoded frame images (jpg/png)");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:8000)");
    eprintln!("  FPS          Target frame rate (default: 30)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        if args.len() < 2 {
            std::process::exit(1);
        }
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("framecast=debug".parse()?)
                .add_directive("broadcast_server=info".parse()?),
        )
        .init();

    let media_dir = &args[1];

    let bind_addr = match args.get(2) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:8000".parse()?,
    };

    let frame_rate: u32 = match args.get(3) {
        Some(fps_str) => fps_str.parse().map_err(|_| "FPS must be a number")?,
        None => 30,
    };

    // Opening the media is the startup gate: an unusable source means the
    // server never begins broadcasting.
    let source = DirectorySource::open(media_dir)?;

    let config = ServerConfig::default().bind(bind_addr).frame_rate(frame_rate);

    println!("Starting broadcast server on {}", bind_addr);
    println!("Media: {} ({} frames, looped)", media_dir, source.frame_count());
    println!("Rate:  {} fps", frame_rate);
    println!();
    println!("Connect a player: cargo run --example player {}", bind_addr);

    let server = Arc::new(BroadcastServer::new(config));

    // Periodic stats line.
    {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(5));
            loop {
                ticker.tick().await;
                let snap = server.stats().snapshot();
                let consumers = server.registry().len().await;
                println!(
                    "Stats: consumers={} published={} sent={}B dropped={}",
                    consumers, snap.frames_published, snap.bytes_sent, snap.consumers_dropped,
                );
            }
        });
    }

    server
        .run_until(source, async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
