//! GP4 shared-memory access on Windows.
//!
//! GP4 (with GPxCInfo export enabled) publishes telemetry in a named
//! file-mapping object. This module maps a read-only view of it and copies
//! the documented region out as a snapshot each cycle. There is no data-valid
//! event to wait on; reads are taken on demand and brief torn reads are a
//! tolerated protocol characteristic, not a fault.

use crate::source::TelemetrySource;
use crate::telemetry::MIN_BUFFER_LEN;
use crate::{Result, TelemetryError};
use async_trait::async_trait;
use std::ptr::NonNull;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Memory::{
    FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, OpenFileMappingW, UnmapViewOfFile,
};
use windows::core::PCWSTR;

/// Name of GP4's telemetry file mapping.
pub const SEGMENT_NAME: &str = "GPxCInfo";

/// Read-only view of the GP4 telemetry segment.
pub struct SharedMemorySegment {
    mapping: HANDLE,
    base: NonNull<u8>,
    released: bool,
}

impl SharedMemorySegment {
    /// Attempt to open and map the named segment.
    ///
    /// # Errors
    ///
    /// Returns the retryable [`TelemetryError::SegmentUnavailable`] when the
    /// mapping does not exist (the simulator has not started exporting), and
    /// [`TelemetryError::WindowsApi`] for any other mapping failure.
    pub fn try_open() -> Result<Self> {
        trace!(name = SEGMENT_NAME, "attempting to open telemetry segment");

        let mapping = unsafe {
            let wide_name = wide_string(SEGMENT_NAME);
            OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR::from_raw(wide_name.as_ptr()))
                .map_err(|e| {
                    TelemetryError::segment_unavailable_with_source(SEGMENT_NAME, Box::new(e))
                })?
        };

        let base = unsafe {
            let view = MapViewOfFile(mapping, FILE_MAP_READ, 0, 0, 0);
            match NonNull::new(view.Value as *mut u8) {
                Some(base) => base,
                None => {
                    let win_err = windows::core::Error::from_thread();
                    let _ = CloseHandle(mapping);
                    return Err(TelemetryError::windows_api("MapViewOfFile", win_err));
                }
            }
        };

        debug!(name = SEGMENT_NAME, "mapped telemetry segment");
        Ok(Self { mapping, base, released: false })
    }

    /// Unmap the view and close the mapping handle.
    ///
    /// Both releases are attempted even if the first fails; the first failure
    /// is the one reported.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let (unmap, close) = unsafe {
            let addr = MEMORY_MAPPED_VIEW_ADDRESS { Value: self.base.as_ptr() as *mut _ };
            (UnmapViewOfFile(addr), CloseHandle(self.mapping))
        };
        unmap.map_err(|e| TelemetryError::windows_api("UnmapViewOfFile", e))?;
        close.map_err(|e| TelemetryError::windows_api("CloseHandle", e))?;
        Ok(())
    }
}

#[async_trait]
impl TelemetrySource for SharedMemorySegment {
    async fn read_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        // SAFETY: the view covers at least the documented region while the
        // mapping handle is open; the copy makes the snapshot independent of
        // concurrent writes by the simulator.
        let view = unsafe { std::slice::from_raw_parts(self.base.as_ptr(), MIN_BUFFER_LEN) };
        out.clear();
        out.extend_from_slice(view);
        Ok(())
    }
}

impl Drop for SharedMemorySegment {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

// SAFETY: the segment holds a read-only mapping handle and view pointer,
// both safe to move between threads.
unsafe impl Send for SharedMemorySegment {}

/// Poll until the segment exists, the Waiting half of the session lifecycle.
///
/// # Errors
///
/// Returns [`TelemetryError::Cancelled`] if the user interrupts the wait, or
/// a non-retryable mapping error as-is.
pub async fn wait_for_segment(
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> Result<SharedMemorySegment> {
    let mut attempts: u64 = 0;
    loop {
        match SharedMemorySegment::try_open() {
            Ok(segment) => {
                info!(name = SEGMENT_NAME, attempts, "simulator session found");
                return Ok(segment);
            }
            Err(error) if error.is_retryable() => {
                attempts += 1;
                if attempts % 60 == 1 {
                    debug!(name = SEGMENT_NAME, attempts, "still waiting for simulator");
                }
            }
            Err(error) => return Err(error),
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(TelemetryError::Cancelled),
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }
}

/// Convert a string to a null-terminated wide string for Windows APIs.
fn wide_string(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}
