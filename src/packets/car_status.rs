//! Car status packet: fuel, rev limits and the FIA flag.
//!
//! One raw fuel reading feeds both fuel fields; the RPM limits, gear count
//! and fuel capacity are fixed for the car set this deployment targets. ERS,
//! DRS and tyre-compound fields are placeholder constants.

use crate::codec::WireWriter;
use crate::packets::header::{self, HEADER_LEN, PacketId};
use crate::telemetry::TelemetrySnapshot;

/// Payload length in bytes.
pub const PAYLOAD_LEN: usize = 55;

/// Fuel tank capacity reported to the wheel.
const FUEL_CAPACITY: f32 = 99.0;
/// Rev limit reported to the wheel.
const MAX_RPM: u16 = 17_000;
/// Idle RPM reported to the wheel.
const IDLE_RPM: u16 = 9_000;
/// Gear count reported to the wheel.
const MAX_GEARS: u8 = 7;

/// Encode a complete car-status datagram (`header || payload`).
pub fn encode(snapshot: &TelemetrySnapshot) -> Vec<u8> {
    // The raw reading is in tenths; both fuel fields carry the same value.
    let fuel = f32::from(snapshot.fuel_raw) / 10.0;

    let mut w = WireWriter::with_capacity(HEADER_LEN + PAYLOAD_LEN);
    header::write(&mut w, PacketId::CarStatus);

    w.put_u8(0); // traction control
    w.put_u8(0); // anti-lock brakes
    w.put_u8(0); // fuel mix
    w.put_u8(0); // front brake bias
    w.put_u8(0); // pit limiter
    w.put_f32(fuel); // fuel in tank
    w.put_f32(FUEL_CAPACITY);
    w.put_f32(fuel); // fuel remaining in laps
    w.put_u16(MAX_RPM);
    w.put_u16(IDLE_RPM);
    w.put_u8(MAX_GEARS);
    w.put_u8(0); // DRS allowed
    w.put_u16(0); // DRS activation distance
    w.put_u8(0); // actual tyre compound
    w.put_u8(0); // visual tyre compound
    w.put_u8(0); // tyre age laps
    w.put_i8(snapshot.fia_flag as i8);
    w.put_f32(0.0); // engine power ICE
    w.put_f32(0.0); // engine power MGU-K
    w.put_f32(0.0); // ERS store energy
    w.put_u8(0); // ERS deploy mode
    w.put_f32(0.0); // ERS harvested this lap MGU-K
    w.put_f32(0.0); // ERS harvested this lap MGU-H
    w.put_f32(0.0); // ERS deployed this lap
    w.put_u8(0); // network paused

    debug_assert_eq!(w.len(), HEADER_LEN + PAYLOAD_LEN);
    w.into_bytes()
}
