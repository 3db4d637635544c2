//! Car telemetry packet: speed, gear, RPM and the rev-light intensity.
//!
//! Pedal inputs, tyre and brake temperatures, pressures and surface types are
//! not exported by the simulator and go out as placeholder constants.

use crate::codec::WireWriter;
use crate::packets::header::{self, HEADER_LEN, PacketId};
use crate::telemetry::TelemetrySnapshot;

/// Payload length in bytes.
pub const PAYLOAD_LEN: usize = 63;

/// Fixed rev-light LED bitmask the wheel expects alongside the percent value.
const REV_LIGHTS_BIT_VALUE: u16 = 14;
/// MFD panel shown for the secondary player slot.
const SECONDARY_MFD_PANEL_INDEX: u8 = 1;
/// Suggested gear is not computed; 1 keeps the wheel's indicator quiet.
const SUGGESTED_GEAR: i8 = 1;

/// Encode a complete car-telemetry datagram (`header || payload`).
pub fn encode(snapshot: &TelemetrySnapshot) -> Vec<u8> {
    let mut w = WireWriter::with_capacity(HEADER_LEN + PAYLOAD_LEN);
    header::write(&mut w, PacketId::CarTelemetry);

    w.put_u16(snapshot.speed as u16);
    w.put_f32(0.0); // throttle
    w.put_f32(0.0); // steer
    w.put_f32(0.0); // brake
    w.put_u8(0); // clutch
    w.put_i8(snapshot.gear as i8);
    w.put_u16(snapshot.engine_rpm);
    w.put_u8(0); // DRS
    w.put_u8(snapshot.rev_lights_percent);
    w.put_u16(REV_LIGHTS_BIT_VALUE);
    for _ in 0..4 {
        w.put_u16(0); // brake temperatures
    }
    for _ in 0..4 {
        w.put_u8(0); // tyre surface temperatures
    }
    for _ in 0..4 {
        w.put_u8(0); // tyre inner temperatures
    }
    w.put_u16(u16::from(snapshot.engine_temperature));
    for _ in 0..4 {
        w.put_f32(0.0); // tyre pressures
    }
    for _ in 0..4 {
        w.put_u8(0); // surface types
    }
    w.put_u8(0); // MFD panel index
    w.put_u8(SECONDARY_MFD_PANEL_INDEX);
    w.put_i8(SUGGESTED_GEAR);

    debug_assert_eq!(w.len(), HEADER_LEN + PAYLOAD_LEN);
    w.into_bytes()
}
