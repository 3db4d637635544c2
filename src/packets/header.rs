//! The fixed header prefixed to every outgoing packet.
//!
//! Only the packet-type id varies; every other field is a deployment constant
//! because this bridge tracks no session state — the peripheral keys its
//! parsing off the format id and packet id alone.

use crate::codec::WireWriter;

/// Protocol format identifier.
pub const PACKET_FORMAT: u16 = 2023;
/// Game year the format belongs to.
pub const GAME_YEAR: u8 = 23;
/// Game major version advertised in the header.
pub const GAME_MAJOR_VERSION: u8 = 1;
/// Game minor version advertised in the header.
pub const GAME_MINOR_VERSION: u8 = 18;
/// Header schema version.
pub const PACKET_VERSION: u8 = 1;
/// Constant session identifier; no live session tracking in this deployment.
pub const SESSION_UID: u64 = 1;
/// Index of the only car this bridge reports.
pub const PLAYER_CAR_INDEX: u8 = 0;
/// 255 marks the secondary-player slot unused.
pub const SECONDARY_PLAYER_CAR_INDEX: u8 = 255;

/// Encoded header length in bytes.
pub const HEADER_LEN: usize = 29;

/// Packet-type identifiers for the three packets this bridge emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketId {
    LapData = 2,
    CarTelemetry = 6,
    CarStatus = 7,
}

impl PacketId {
    /// The wire value of this packet type.
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Append the header for `id` to `writer`.
pub(crate) fn write(writer: &mut WireWriter, id: PacketId) {
    writer.put_u16(PACKET_FORMAT);
    writer.put_u8(GAME_YEAR);
    writer.put_u8(GAME_MAJOR_VERSION);
    writer.put_u8(GAME_MINOR_VERSION);
    writer.put_u8(PACKET_VERSION);
    writer.put_u8(id.id());
    writer.put_u64(SESSION_UID);
    writer.put_f32(0.0); // session time
    writer.put_u32(0); // frame identifier
    writer.put_u32(0); // overall frame identifier
    writer.put_u8(PLAYER_CAR_INDEX);
    writer.put_u8(SECONDARY_PLAYER_CAR_INDEX);
}

/// Encode a standalone header for `id`.
pub fn encode(id: PacketId) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(HEADER_LEN);
    write(&mut writer, id);
    writer.into_bytes()
}
