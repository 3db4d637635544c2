//! Telemetry source seam.
//!
//! The streaming loop reads whole-segment snapshots through [`TelemetrySource`]
//! so it runs identically against the live shared-memory segment and the
//! scripted [`ReplaySource`] used in development and tests.

use crate::{Result, TelemetryError};
use async_trait::async_trait;

/// A source of raw telemetry segment snapshots.
#[async_trait]
pub trait TelemetrySource: Send {
    /// Copy the segment's current contents into `out`, replacing anything
    /// already there.
    ///
    /// # Errors
    ///
    /// Returns the segment-lost condition when the source can no longer be
    /// read; the session treats that as terminal.
    async fn read_into(&mut self, out: &mut Vec<u8>) -> Result<()>;
}

/// Scripted source that plays back one frame per read.
///
/// Stands in for the simulator when it is not running: each `read_into`
/// returns the next scripted frame, and exhausting the script behaves like
/// the simulator exiting (the segment-lost condition).
#[derive(Debug)]
pub struct ReplaySource {
    frames: std::vec::IntoIter<Vec<u8>>,
}

impl ReplaySource {
    /// Create a replay over `frames`, consumed one per read.
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self { frames: frames.into_iter() }
    }
}

#[async_trait]
impl TelemetrySource for ReplaySource {
    async fn read_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        match self.frames.next() {
            Some(frame) => {
                out.clear();
                out.extend_from_slice(&frame);
                Ok(())
            }
            None => Err(TelemetryError::segment_lost("replay script exhausted")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replay_plays_frames_in_order_then_reports_loss() {
        let mut source = ReplaySource::new(vec![vec![1, 2], vec![3]]);
        let mut out = Vec::new();

        source.read_into(&mut out).await.unwrap();
        assert_eq!(out, vec![1, 2]);

        source.read_into(&mut out).await.unwrap();
        assert_eq!(out, vec![3]);

        let error = source.read_into(&mut out).await.unwrap_err();
        assert!(matches!(error, TelemetryError::SegmentLost { .. }));
    }
}
