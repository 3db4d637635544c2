//! Lap status packet: lap times, position and pit status.
//!
//! The last-lap field comes from the [`LapTimeTracker`](crate::session::LapTimeTracker),
//! not straight from the buffer, so the wheel never shows a clock split as a
//! completed lap. Sector times, penalties and the pit-lane timers are
//! placeholder constants.

use crate::codec::WireWriter;
use crate::packets::header::{self, HEADER_LEN, PacketId};
use crate::telemetry::TelemetrySnapshot;

/// Payload length in bytes.
pub const PAYLOAD_LEN: usize = 50;

/// Encode a complete lap-status datagram (`header || payload`).
///
/// `last_lap_ms` is the tracker's filtered last-completed-lap time. The
/// delta-to-car-ahead field is 16-bit on the wire and saturates at 65535; no
/// other field is clamped.
pub fn encode(snapshot: &TelemetrySnapshot, last_lap_ms: u32) -> Vec<u8> {
    let mut w = WireWriter::with_capacity(HEADER_LEN + PAYLOAD_LEN);
    header::write(&mut w, PacketId::LapData);

    w.put_u32(last_lap_ms);
    w.put_u32(snapshot.current_lap_time_ms);
    w.put_u16(0); // sector 1 time ms
    w.put_u8(0); // sector 1 time minutes
    w.put_u16(0); // sector 2 time ms
    w.put_u8(0); // sector 2 time minutes
    w.put_u16(snapshot.delta_ahead_ms.min(u32::from(u16::MAX)) as u16);
    w.put_u16(0); // delta to race leader
    w.put_f32(-1.0); // lap distance, unknown
    w.put_f32(-1.0); // total distance, unknown
    w.put_f32(0.0); // safety car delta
    w.put_u8(snapshot.car_position);
    w.put_u8(snapshot.lap_number);
    w.put_u8(snapshot.pit_status as u8);
    w.put_u8(0); // pit stop count
    w.put_u8(0); // sector
    w.put_u8(0); // current lap invalid
    w.put_u8(0); // penalties
    w.put_u8(0); // total warnings
    w.put_u8(0); // corner cutting warnings
    w.put_u8(0); // unserved drive-through penalties
    w.put_u8(0); // unserved stop-go penalties
    w.put_u8(0); // grid position
    w.put_u8(0); // driver status
    w.put_u8(0); // result status
    w.put_u8(0); // pit lane timer active
    w.put_u16(0); // pit lane time in lane ms
    w.put_u16(0); // pit stop timer ms
    w.put_u8(0); // pit stop should serve penalty

    debug_assert_eq!(w.len(), HEADER_LEN + PAYLOAD_LEN);
    w.into_bytes()
}
