//! Bring-up/diagnostic binary for the NetSIO bridge.
//!
//! Binds the bridge to a UDP port, logs `DEVICE_CONNECTED`/`DEVICE_DISCONNECTED`
//! transitions as they're observed, and optionally fires the canned
//! device-probe command frame (`NetSioBridge::test_cmd`, spec.md §4.F) so a
//! developer can exercise the wire protocol against a real FujiNet-PC peer
//! with no emulator attached.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use netsio_bridge::NetSioBridge;

/// NetSIO bridge diagnostic/bring-up tool.
#[derive(Debug, Parser)]
#[command(name = "netsio-cli", version, about)]
struct Args {
    /// UDP port to bind (spec.md §6: "a single port number; default chosen
    /// by the host").
    #[arg(long, env = "NETSIO_PORT", default_value_t = 9997)]
    port: u16,

    /// Send the canned device-probe command frame once a peer is known,
    /// then exit.
    #[arg(long)]
    test_cmd: bool,

    /// How long to wait for a peer before giving up on `--test-cmd`.
    #[arg(long, default_value = "5")]
    timeout_secs: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let bridge = NetSioBridge::init(args.port)
        .with_context(|| format!("binding NetSIO UDP socket on port {}", args.port))?;
    tracing::info!(port = args.port, "netsio-cli: bridge listening");

    if args.test_cmd {
        return run_test_cmd(&bridge, Duration::from_secs(args.timeout_secs));
    }

    let mut was_enabled = bridge.is_enabled();
    loop {
        let enabled = bridge.is_enabled();
        if enabled != was_enabled {
            if enabled {
                tracing::info!("netsio-cli: peer device connected");
            } else {
                tracing::info!("netsio-cli: peer device disconnected");
            }
            was_enabled = enabled;
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}

fn run_test_cmd(bridge: &NetSioBridge, timeout: Duration) -> Result<()> {
    let deadline = std::time::Instant::now() + timeout;
    while bridge.peer_addr().is_none() {
        if std::time::Instant::now() >= deadline {
            anyhow::bail!("no NetSIO peer discovered within {:?}", timeout);
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    tracing::info!(peer = ?bridge.peer_addr(), "netsio-cli: sending test_cmd probe");
    bridge.test_cmd();

    // Give the peer a moment to respond before the process exits, so the
    // SYNC_RESPONSE isn't dropped along with the socket.
    std::thread::sleep(Duration::from_millis(200));
    tracing::info!("netsio-cli: test_cmd complete");
    Ok(())
}
