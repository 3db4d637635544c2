//! Field extraction from the simulator's shared-memory block.
//!
//! GP4 exports a fixed, undocumented byte layout; the offsets below are the
//! subset this bridge depends on. Reads are bounds-checked and a snapshot is
//! taken fresh every cycle — nothing here is cached across reads.

use crate::codec;
use crate::config::RevLightConfig;
use crate::{Result, TelemetryError};

/// Byte offsets into the `GPxCInfo` block.
pub mod offset {
    /// Combined pit/flag status byte (see [`classify_flag`](super::classify_flag)
    /// and [`classify_pit`](super::classify_pit)).
    pub const PIT_FLAG_STATUS: usize = 0;
    /// Current lap number.
    pub const LAP_NUMBER: usize = 1;
    /// Car position in the running order.
    pub const CAR_POSITION: usize = 2;
    /// Fuel reading, u16, tenths of the wire unit.
    pub const FUEL: usize = 3;
    /// Engine temperature, single byte.
    pub const ENGINE_TEMPERATURE: usize = 5;
    /// Speed, i16.
    pub const SPEED: usize = 6;
    /// Previous lap time in milliseconds, u32.
    pub const PREVIOUS_LAP_TIME_MS: usize = 10;
    /// Current gear.
    pub const GEAR: usize = 14;
    /// Engine RPM, u16.
    pub const ENGINE_RPM: usize = 15;
    /// In-progress lap time in milliseconds, u32.
    pub const CURRENT_LAP_TIME_MS: usize = 17;
    /// Delta to the car ahead in milliseconds, u32.
    pub const DELTA_AHEAD_MS: usize = 21;
}

/// Minimum segment length covering every offset the bridge reads.
pub const MIN_BUFFER_LEN: usize = 25;

/// Pit status codes as the peripheral protocol defines them.
///
/// The simulator only distinguishes "pitting" from "not pitting", so
/// `InPitArea` is never produced; it exists because the wire protocol
/// defines it and downstream tooling may match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PitStatus {
    None = 0,
    Pitting = 1,
    InPitArea = 2,
}

/// FIA flag codes as the peripheral protocol defines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum FiaFlag {
    None = 0,
    Warning = 1,
    Blue = 2,
    Yellow = 3,
}

/// One cycle's worth of values derived from the source block.
///
/// Built fresh every loop iteration and discarded after the three packets for
/// that cycle are encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySnapshot {
    pub speed: i16,
    pub gear: u8,
    pub engine_rpm: u16,
    pub rev_lights_percent: u8,
    pub engine_temperature: u8,
    pub fuel_raw: u16,
    pub lap_number: u8,
    pub car_position: u8,
    pub pit_status: PitStatus,
    pub fia_flag: FiaFlag,
    pub current_lap_time_ms: u32,
    pub previous_lap_time_ms: u32,
    pub delta_ahead_ms: u32,
}

impl TelemetrySnapshot {
    /// Extract a snapshot from the raw segment contents.
    ///
    /// # Errors
    ///
    /// Returns the segment-lost condition if the buffer is shorter than
    /// [`MIN_BUFFER_LEN`] — a truncated view is indistinguishable from the
    /// simulator tearing the segment down.
    pub fn read(buffer: &[u8], rev_lights: &RevLightConfig) -> Result<Self> {
        if buffer.len() < MIN_BUFFER_LEN {
            return Err(TelemetryError::short_read(0, MIN_BUFFER_LEN, buffer.len()));
        }

        let status = codec::read_u8(buffer, offset::PIT_FLAG_STATUS)?;
        let engine_rpm = codec::read_u16(buffer, offset::ENGINE_RPM)?;

        Ok(Self {
            speed: codec::read_i16(buffer, offset::SPEED)?,
            gear: codec::read_u8(buffer, offset::GEAR)?,
            engine_rpm,
            rev_lights_percent: rev_lights_percent(engine_rpm, rev_lights),
            engine_temperature: codec::read_u8(buffer, offset::ENGINE_TEMPERATURE)?,
            fuel_raw: codec::read_u16(buffer, offset::FUEL)?,
            lap_number: codec::read_u8(buffer, offset::LAP_NUMBER)?,
            car_position: codec::read_u8(buffer, offset::CAR_POSITION)?,
            pit_status: classify_pit(status),
            fia_flag: classify_flag(status),
            current_lap_time_ms: codec::read_u32(buffer, offset::CURRENT_LAP_TIME_MS)?,
            previous_lap_time_ms: codec::read_u32(buffer, offset::PREVIOUS_LAP_TIME_MS)?,
            delta_ahead_ms: codec::read_u32(buffer, offset::DELTA_AHEAD_MS)?,
        })
    }
}

/// Scale a raw RPM reading into the wheel's rev-bar intensity.
///
/// At or below `min_rpm` the bar is dark. Above it, the value ramps linearly
/// so that `max_rpm` lands on `max_percent`, truncated to an integer. This is
/// a display intensity capped at `max_percent`, not a literal 0–100 share of
/// the RPM range.
pub fn rev_lights_percent(rpm: u16, config: &RevLightConfig) -> u8 {
    if rpm <= config.min_rpm {
        return 0;
    }
    let span = f64::from(config.max_rpm) - f64::from(config.min_rpm);
    let scaled =
        f64::from(rpm - config.min_rpm) * (100.0 / span) * f64::from(config.max_percent) / 100.0;
    // Truncates toward zero; saturates into the u8 the wire field carries.
    scaled as u8
}

/// Map the raw status byte to a flag code, highest priority first.
///
/// The table is first-match: 8 before 4 before the warning pair.
pub fn classify_flag(status: u8) -> FiaFlag {
    match status {
        8 => FiaFlag::Blue,
        4 => FiaFlag::Yellow,
        1 | 2 => FiaFlag::Warning,
        _ => FiaFlag::None,
    }
}

/// Map the raw status byte to a pit status code.
pub fn classify_pit(status: u8) -> PitStatus {
    if status == 1 { PitStatus::Pitting } else { PitStatus::None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REV: RevLightConfig = RevLightConfig { min_rpm: 9000, max_rpm: 17000, max_percent: 90 };

    fn frame() -> Vec<u8> {
        let mut buffer = vec![0u8; MIN_BUFFER_LEN];
        buffer[offset::PIT_FLAG_STATUS] = 1;
        buffer[offset::LAP_NUMBER] = 3;
        buffer[offset::CAR_POSITION] = 7;
        buffer[offset::FUEL..offset::FUEL + 2].copy_from_slice(&412u16.to_le_bytes());
        buffer[offset::ENGINE_TEMPERATURE] = 96;
        buffer[offset::SPEED..offset::SPEED + 2].copy_from_slice(&287i16.to_le_bytes());
        buffer[offset::PREVIOUS_LAP_TIME_MS..offset::PREVIOUS_LAP_TIME_MS + 4]
            .copy_from_slice(&83_421u32.to_le_bytes());
        buffer[offset::GEAR] = 5;
        buffer[offset::ENGINE_RPM..offset::ENGINE_RPM + 2].copy_from_slice(&13_000u16.to_le_bytes());
        buffer[offset::CURRENT_LAP_TIME_MS..offset::CURRENT_LAP_TIME_MS + 4]
            .copy_from_slice(&45_200u32.to_le_bytes());
        buffer[offset::DELTA_AHEAD_MS..offset::DELTA_AHEAD_MS + 4]
            .copy_from_slice(&1_250u32.to_le_bytes());
        buffer
    }

    #[test]
    fn snapshot_extracts_documented_offsets() {
        let snapshot = TelemetrySnapshot::read(&frame(), &REV).unwrap();
        assert_eq!(snapshot.speed, 287);
        assert_eq!(snapshot.gear, 5);
        assert_eq!(snapshot.engine_rpm, 13_000);
        assert_eq!(snapshot.rev_lights_percent, 45);
        assert_eq!(snapshot.engine_temperature, 96);
        assert_eq!(snapshot.fuel_raw, 412);
        assert_eq!(snapshot.lap_number, 3);
        assert_eq!(snapshot.car_position, 7);
        assert_eq!(snapshot.pit_status, PitStatus::Pitting);
        assert_eq!(snapshot.fia_flag, FiaFlag::Warning);
        assert_eq!(snapshot.current_lap_time_ms, 45_200);
        assert_eq!(snapshot.previous_lap_time_ms, 83_421);
        assert_eq!(snapshot.delta_ahead_ms, 1_250);
    }

    #[test]
    fn short_buffer_is_segment_lost() {
        let buffer = vec![0u8; MIN_BUFFER_LEN - 1];
        let error = TelemetrySnapshot::read(&buffer, &REV).unwrap_err();
        assert!(matches!(error, TelemetryError::SegmentLost { .. }));
    }

    #[test]
    fn rev_lights_documented_example() {
        // floor((13000-9000) * (100/8000) * 90/100) = floor(45.0)
        assert_eq!(rev_lights_percent(13_000, &REV), 45);
    }

    #[test]
    fn rev_lights_dark_at_or_below_min() {
        assert_eq!(rev_lights_percent(0, &REV), 0);
        assert_eq!(rev_lights_percent(8_999, &REV), 0);
        assert_eq!(rev_lights_percent(9_000, &REV), 0);
    }

    #[test]
    fn rev_lights_capped_at_max_percent() {
        assert_eq!(rev_lights_percent(17_000, &REV), 90);
    }

    #[test]
    fn rev_lights_truncates_not_rounds() {
        // 10500: 1500 * 0.0125 * 0.9 = 16.875 -> 16
        assert_eq!(rev_lights_percent(10_500, &REV), 16);
    }

    #[test]
    fn flag_priority_table() {
        assert_eq!(classify_flag(8), FiaFlag::Blue);
        assert_eq!(classify_flag(4), FiaFlag::Yellow);
        assert_eq!(classify_flag(2), FiaFlag::Warning);
        assert_eq!(classify_flag(1), FiaFlag::Warning);
        assert_eq!(classify_flag(0), FiaFlag::None);
        assert_eq!(classify_flag(255), FiaFlag::None);
    }

    #[test]
    fn pit_status_never_reports_in_pit_area() {
        assert_eq!(classify_pit(1), PitStatus::Pitting);
        assert_eq!(classify_pit(0), PitStatus::None);
        assert_eq!(classify_pit(2), PitStatus::None);
        assert_eq!(classify_pit(255), PitStatus::None);
    }

    proptest! {
        #[test]
        fn rev_lights_monotone_and_bounded(rpm_a in 9_001u16..=17_000, rpm_b in 9_001u16..=17_000) {
            let (lo, hi) = if rpm_a <= rpm_b { (rpm_a, rpm_b) } else { (rpm_b, rpm_a) };
            let at_lo = rev_lights_percent(lo, &REV);
            let at_hi = rev_lights_percent(hi, &REV);
            prop_assert!(at_lo <= at_hi);
            prop_assert!(at_hi <= REV.max_percent);
        }

        #[test]
        fn rev_lights_matches_reference_formula(rpm in 9_001u16..=17_000) {
            let expected = ((f64::from(rpm) - 9_000.0) * (100.0 / 8_000.0) * 90.0 / 100.0) as u8;
            prop_assert_eq!(rev_lights_percent(rpm, &REV), expected);
        }
    }
}
