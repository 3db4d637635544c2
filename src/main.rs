//! gridcast binary: wait for a GP4 session, then stream wheel packets.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridcast::config::AppConfig;

/// How often the waiting state re-checks for the simulator segment.
#[cfg(windows)]
const SEGMENT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(500);

#[derive(Debug, Parser)]
#[command(name = "gridcast", version, about)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "gridcast.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Sequential by design: one thread, pacing via timed sleeps.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("gridcast {} - GP4 telemetry bridge for UDP wheel peripherals", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load(&args.config)
        .with_context(|| format!("cannot load configuration from {}", args.config.display()))?;

    info!(
        target = %config.target(),
        frequency_hz = config.network.frequency_hz,
        min_rpm = config.rev_lights.min_rpm,
        max_rpm = config.rev_lights.max_rpm,
        max_percent = config.rev_lights.max_percent,
        "configuration loaded"
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    run_bridge(config, cancel).await
}

/// Cancel the session token on the first Ctrl-C.
fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, closing after the current cycle");
                cancel.cancel();
            }
            Err(error) => warn!(%error, "cannot listen for interrupt signal"),
        }
    });
}

#[cfg(windows)]
async fn run_bridge(config: AppConfig, cancel: CancellationToken) -> anyhow::Result<()> {
    use gridcast::session::{self, SessionEnd};
    use gridcast::windows::{self, SEGMENT_NAME};
    use gridcast::{TelemetryError, UdpSink};

    info!(segment = SEGMENT_NAME, "waiting for GP4 to start (enable Export in GPxCInfo)");

    let mut segment = match windows::wait_for_segment(SEGMENT_POLL_INTERVAL, &cancel).await {
        Ok(segment) => segment,
        Err(error) if error.is_cancellation() => {
            info!("cancelled before a simulator session started");
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    };

    let mut sink = UdpSink::bind(config.target()).await?;
    info!(target = %sink.target(), "GP4 session found, streaming packets");

    let outcome = session::stream(&mut segment, &mut sink, &config, &cancel).await;

    teardown(sink, segment);

    match outcome {
        Ok(SessionEnd::Cancelled) => {
            info!("session closed");
            Ok(())
        }
        Err(error @ TelemetryError::SegmentLost { .. }) => {
            Err(anyhow::Error::new(error).context("session ended: simulator telemetry lost"))
        }
        Err(error) => Err(error.into()),
    }
}

/// Converging teardown: both releases are always attempted and each outcome
/// is reported on its own.
#[cfg(windows)]
fn teardown(sink: gridcast::UdpSink, segment: gridcast::SharedMemorySegment) {
    sink.close();
    info!("closed UDP session");

    match segment.close() {
        Ok(()) => info!("released shared-memory segment"),
        Err(error) => warn!(%error, "failed to release shared-memory segment"),
    }
}

#[cfg(not(windows))]
async fn run_bridge(_config: AppConfig, _cancel: CancellationToken) -> anyhow::Result<()> {
    // GP4 and its shared-memory export only exist on Windows.
    Err(gridcast::TelemetryError::unsupported_platform("live GP4 telemetry", "Windows").into())
}
