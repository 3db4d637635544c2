//! Bridges Grand Prix 4 telemetry to F1-protocol steering-wheel peripherals.
//!
//! GP4 exports live telemetry as a fixed-layout shared-memory block; wheel
//! peripherals expect the F1-23-style UDP packet protocol. gridcast reads the
//! block, derives the display values the wheel needs (rev-light intensity, a
//! filtered last-lap time that never shows a clock split), and streams three
//! little-endian packet types — car telemetry, lap status, car status — at a
//! configured cadence.
//!
//! # Architecture
//!
//! - [`codec`] — fixed-width little-endian wire primitives
//! - [`telemetry`] — offset-addressed extraction and derived values
//! - [`packets`] — the shared header and the three payload encoders
//! - [`session`] — the paced streaming loop and lap-time tracker
//! - [`source`] / [`net`] — seams for the segment reader and UDP sender
//! - [`windows`] — the live `GPxCInfo` mapping (Windows only)
//!
//! # Example
//!
//! Encoding one cycle's packets from a raw segment snapshot:
//!
//! ```rust
//! use gridcast::config::RevLightConfig;
//! use gridcast::packets::{self, HEADER_LEN};
//! use gridcast::telemetry::TelemetrySnapshot;
//!
//! let rev_lights = RevLightConfig { min_rpm: 9000, max_rpm: 17000, max_percent: 90 };
//! let segment = vec![0u8; gridcast::telemetry::MIN_BUFFER_LEN];
//!
//! let snapshot = TelemetrySnapshot::read(&segment, &rev_lights)?;
//! let datagram = packets::car_telemetry::encode(&snapshot);
//! assert_eq!(datagram.len(), HEADER_LEN + packets::car_telemetry::PAYLOAD_LEN);
//! # Ok::<(), gridcast::TelemetryError>(())
//! ```

pub mod codec;
pub mod config;
mod error;
pub mod net;
pub mod packets;
pub mod session;
pub mod source;
pub mod telemetry;

// Platform-specific modules
#[cfg(windows)]
pub mod windows;

// Core exports
pub use config::{AppConfig, NetworkConfig, RevLightConfig};
pub use error::{Result, TelemetryError};
pub use net::{PacketSink, UdpSink};
pub use session::{LapTimeTracker, SessionEnd};
pub use source::{ReplaySource, TelemetrySource};
pub use telemetry::{FiaFlag, PitStatus, TelemetrySnapshot};

// Windows segment exports
#[cfg(windows)]
pub use windows::SharedMemorySegment;
