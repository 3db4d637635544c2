//! Fixed-width little-endian wire primitives.
//!
//! Everything the peripheral protocol carries is little-endian: the writer
//! appends fixed-width fields to a growing buffer, and the read helpers pull
//! typed values out of the raw source segment with bounds checking. A read
//! past the end of the segment is reported as the segment-lost condition,
//! never silently zero-filled.

use crate::{Result, TelemetryError};

/// Append-only little-endian writer used by the packet encoders.
///
/// Field order on the wire is the order of the `put_*` calls, so an encoder
/// written as one straight-line sequence of puts matches the wire layout by
/// construction.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_i8(&mut self, value: i8) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Read a single byte at `offset`.
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset).copied().ok_or_else(|| TelemetryError::short_read(offset, 1, data.len()))
}

/// Read a little-endian signed 16-bit value at `offset`.
pub fn read_i16(data: &[u8], offset: usize) -> Result<i16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or_else(|| TelemetryError::short_read(offset, 2, data.len()))?;
    Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian unsigned 16-bit value at `offset`.
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or_else(|| TelemetryError::short_read(offset, 2, data.len()))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian unsigned 32-bit value at `offset`.
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or_else(|| TelemetryError::short_read(offset, 4, data.len()))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn writer_emits_little_endian() {
        let mut writer = WireWriter::with_capacity(32);
        writer.put_u8(0xAB);
        writer.put_i8(-2);
        writer.put_u16(0x1234);
        writer.put_u32(0xDEAD_BEEF);
        writer.put_u64(1);
        writer.put_f32(1.0);

        let bytes = writer.into_bytes();
        assert_eq!(bytes[0], 0xAB);
        assert_eq!(bytes[1], 0xFE);
        assert_eq!(&bytes[2..4], &[0x34, 0x12]);
        assert_eq!(&bytes[4..8], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(&bytes[8..16], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &1.0f32.to_le_bytes());
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn short_reads_fail_as_segment_lost() {
        let data = [0u8; 10];
        assert!(read_u8(&data, 10).is_err());
        assert!(read_u16(&data, 9).is_err());
        assert!(read_u32(&data, 7).is_err());
        assert!(read_u32(&data, 6).is_ok());

        match read_u32(&data, 21) {
            Err(TelemetryError::SegmentLost { offset: Some(21), .. }) => {}
            other => panic!("expected SegmentLost at offset 21, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn u16_round_trips(value: u16, pad in 0usize..8) {
            let mut writer = WireWriter::default();
            for _ in 0..pad {
                writer.put_u8(0);
            }
            writer.put_u16(value);
            let bytes = writer.into_bytes();
            prop_assert_eq!(read_u16(&bytes, pad).unwrap(), value);
        }

        #[test]
        fn u32_round_trips(value: u32, pad in 0usize..8) {
            let mut writer = WireWriter::default();
            for _ in 0..pad {
                writer.put_u8(0);
            }
            writer.put_u32(value);
            let bytes = writer.into_bytes();
            prop_assert_eq!(read_u32(&bytes, pad).unwrap(), value);
        }
    }
}
