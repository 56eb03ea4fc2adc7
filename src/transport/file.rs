//! # Character Device Transport
//!
//! Sends jobs to a local printer device node such as `/dev/usb/lp0`.
//!
//! ## Chunked Writes
//!
//! Large buffers are written in chunks so the kernel's device buffer is
//! never overwhelmed and so the elapsed-time bound can be checked
//! between chunks. A plain blocking `write` cannot be preempted
//! portably, so the timeout is enforced at chunk granularity rather
//! than mid-syscall.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::EtiquetaError;
use crate::transport::{DeviceStatus, Transport};

/// Chunk size for writes (bytes).
const CHUNK_SIZE: usize = 4096;

/// Writes to a printer character device.
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Transport for FileTransport {
    fn transmit(&mut self, data: &[u8], timeout: Duration) -> Result<DeviceStatus, EtiquetaError> {
        let started = Instant::now();
        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| {
                EtiquetaError::Transmit(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        for chunk in data.chunks(CHUNK_SIZE) {
            if started.elapsed() > timeout {
                return Err(EtiquetaError::Transmit(format!(
                    "write to {} timed out after {:?}",
                    self.path.display(),
                    timeout
                )));
            }
            file.write_all(chunk).map_err(|e| {
                EtiquetaError::Transmit(format!("Write to {} failed: {}", self.path.display(), e))
            })?;
        }

        file.flush().map_err(|e| {
            EtiquetaError::Transmit(format!("Flush of {} failed: {}", self.path.display(), e))
        })?;

        debug!(bytes = data.len(), device = %self.path.display(), "transmitted job");

        // Device nodes give no status reply on the write channel.
        Ok(DeviceStatus {
            bytes_written: data.len(),
            response: None,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_to_regular_file() {
        // A regular file stands in for the device node.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lp0");
        std::fs::write(&path, b"").unwrap();

        let mut transport = FileTransport::new(path.clone());
        let status = transport
            .transmit(b"hello printer", Duration::from_secs(5))
            .unwrap();

        assert_eq!(status.bytes_written, 13);
        assert!(status.response.is_none());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello printer");
    }

    #[test]
    fn test_missing_device_is_transmit_error() {
        let mut transport = FileTransport::new(PathBuf::from("/nonexistent/lp0"));
        let err = transport
            .transmit(b"data", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, EtiquetaError::Transmit(_)));
    }
}
