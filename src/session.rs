//! The streaming session loop and lap-time tracking.
//!
//! A session has two states. *Waiting* — the segment does not exist yet — is
//! handled by the platform layer polling `try_open`; once a segment is
//! mapped the loop here runs *Streaming* until the segment is lost
//! (terminal) or the user cancels. There is no transition back to Waiting: a
//! reappearing segment belongs to a new session, and resuming silently would
//! send stale telemetry under its identity.
//!
//! Each streaming cycle takes one snapshot, sends the car-telemetry,
//! lap-status and car-status packets in that order with a full pacing delay
//! after each send, then feeds the cycle's lap number to the tracker. The
//! cycle period is therefore three pacing delays plus processing time.

use crate::Result;
use crate::config::AppConfig;
use crate::net::PacketSink;
use crate::packets::{car_status, car_telemetry, lap_data};
use crate::source::TelemetrySource;
use crate::telemetry::TelemetrySnapshot;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cross-cycle lap-time state.
///
/// `last_lap_ms` holds the filtered last-completed-lap time the lap-status
/// packet reports. It updates only when the lap counter advances past a
/// previously observed nonzero lap number; the very first increment (away
/// from lap 0) is suppressed because the buffer's previous-lap field still
/// holds a stale or partial split at that point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LapTimeTracker {
    last_lap_ms: u32,
    prev_lap_number: u8,
}

impl LapTimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last completed lap time, 0 until a lap has been completed.
    pub fn last_lap_ms(&self) -> u32 {
        self.last_lap_ms
    }

    /// Feed one cycle's lap number and previous-lap-time reading.
    ///
    /// Call once per cycle, after the cycle's packets are encoded, with
    /// values read at the top of the same cycle.
    pub fn observe(&mut self, lap_number: u8, previous_lap_time_ms: u32) {
        if self.prev_lap_number != 0 && self.prev_lap_number < lap_number {
            debug!(
                lap = lap_number,
                lap_time_ms = previous_lap_time_ms,
                "lap completed, updating last lap time"
            );
            self.last_lap_ms = previous_lap_time_ms;
        }
        self.prev_lap_number = lap_number;
    }
}

/// Why a streaming session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user interrupted the program; a normal close, not a failure.
    Cancelled,
}

/// Run the streaming loop until cancellation or segment loss.
///
/// # Errors
///
/// Returns the segment-lost condition if the source fails or the buffer goes
/// short mid-session. Transient send failures are logged and skipped, not
/// retried; datagram loss is a protocol characteristic.
pub async fn stream<S, K>(
    source: &mut S,
    sink: &mut K,
    config: &AppConfig,
    cancel: &CancellationToken,
) -> Result<SessionEnd>
where
    S: TelemetrySource,
    K: PacketSink,
{
    let interval = config.send_interval();
    let mut tracker = LapTimeTracker::new();
    let mut scratch = Vec::new();
    let mut cycles: u64 = 0;

    info!(
        interval_ms = interval.as_millis() as u64,
        "streaming session started, three packets per cycle"
    );

    loop {
        source.read_into(&mut scratch).await?;
        let snapshot = TelemetrySnapshot::read(&scratch, &config.rev_lights)?;

        let datagrams = [
            car_telemetry::encode(&snapshot),
            lap_data::encode(&snapshot, tracker.last_lap_ms()),
            car_status::encode(&snapshot),
        ];
        for datagram in &datagrams {
            if let Pace::Cancelled = send_paced(sink, datagram, interval, cancel).await {
                info!("cancellation requested, closing session");
                return Ok(SessionEnd::Cancelled);
            }
        }

        tracker.observe(snapshot.lap_number, snapshot.previous_lap_time_ms);

        cycles += 1;
        if cycles % 1000 == 0 {
            debug!(cycles, lap = snapshot.lap_number, "session streaming");
        }
    }
}

enum Pace {
    Continue,
    Cancelled,
}

/// Send one datagram, then sleep the pacing interval.
///
/// A send failure is logged and the cycle continues; cancellation is observed
/// at the sleep, ending the session cleanly after the current delay.
async fn send_paced<K: PacketSink>(
    sink: &mut K,
    datagram: &[u8],
    interval: Duration,
    cancel: &CancellationToken,
) -> Pace {
    if let Err(error) = sink.send(datagram).await {
        warn!(%error, len = datagram.len(), "dropping undeliverable datagram");
    }

    tokio::select! {
        _ = cancel.cancelled() => Pace::Cancelled,
        _ = tokio::time::sleep(interval) => Pace::Continue,
    }
}
