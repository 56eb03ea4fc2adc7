//! # Printer Transport Layer
//!
//! This module provides communication backends for sending encoded jobs
//! to printers.
//!
//! ## Available Transports
//!
//! - [`file`]: character device (e.g. `/dev/usb/lp0`)
//! - [`tcp`]: network printing (port 9100)
//!
//! ## Device Specifiers
//!
//! Devices are addressed by URL-style specifier strings:
//!
//! - `file:///dev/usb/lp0`
//! - `tcp://192.168.1.50` (default port 9100)
//! - `tcp://printer.local:9100`
//!
//! ## Concurrency
//!
//! A transport carries one byte stream at a time: mid-stream
//! interleaving would corrupt the print job, so callers must serialize
//! transmissions per device. There is no cancellation; once a write
//! begins it runs to completion or failure.

pub mod file;
pub mod tcp;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::EtiquetaError;

pub use file::FileTransport;
pub use tcp::TcpTransport;

/// Device acknowledgement captured after a transmission.
#[derive(Debug, Clone, Default)]
pub struct DeviceStatus {
    /// Bytes handed to the device channel.
    pub bytes_written: usize,
    /// Raw status reply, when the channel supports reading one.
    pub response: Option<Vec<u8>>,
}

impl DeviceStatus {
    /// Check a raw status reply for reported errors. Channels that
    /// cannot read a reply pass trivially.
    pub fn ensure_ok(&self) -> Result<(), EtiquetaError> {
        if let Some(reply) = &self.response
            && reply.len() >= 10
        {
            let (err1, err2) = (reply[8], reply[9]);
            if err1 != 0 || err2 != 0 {
                return Err(EtiquetaError::DeviceStatus(format!(
                    "printer reported error bytes {:#04x}/{:#04x}",
                    err1, err2
                )));
            }
        }
        Ok(())
    }
}

/// A one-way (plus optional status readback) channel to a printer.
pub trait Transport {
    /// Send `data` as a single logical write, bounded by `timeout`.
    fn transmit(&mut self, data: &[u8], timeout: Duration) -> Result<DeviceStatus, EtiquetaError>;
}

/// Parsed device address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSpecifier {
    File { path: PathBuf },
    Tcp { host: String, port: u16 },
}

impl DeviceSpecifier {
    /// Parse a specifier string.
    ///
    /// ## Example
    ///
    /// ```
    /// use etiqueta::transport::DeviceSpecifier;
    ///
    /// let dev = DeviceSpecifier::parse("tcp://192.168.1.50").unwrap();
    /// assert_eq!(dev, DeviceSpecifier::Tcp {
    ///     host: "192.168.1.50".to_string(),
    ///     port: 9100,
    /// });
    /// ```
    pub fn parse(s: &str) -> Result<Self, EtiquetaError> {
        if let Some(path) = s.strip_prefix("file://") {
            if path.is_empty() {
                return Err(EtiquetaError::Config("empty device path".to_string()));
            }
            return Ok(Self::File {
                path: PathBuf::from(path),
            });
        }
        if let Some(addr) = s.strip_prefix("tcp://") {
            let (host, port) = match addr.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port.parse().map_err(|_| {
                        EtiquetaError::Config(format!("Invalid port in specifier: {}", s))
                    })?;
                    (host, port)
                }
                None => (addr, tcp::DEFAULT_PORT),
            };
            if host.is_empty() {
                return Err(EtiquetaError::Config("empty device host".to_string()));
            }
            return Ok(Self::Tcp {
                host: host.to_string(),
                port,
            });
        }
        // Bare paths are a convenience for local devices.
        if s.starts_with('/') {
            return Ok(Self::File {
                path: PathBuf::from(s),
            });
        }
        Err(EtiquetaError::Config(format!(
            "Unknown device specifier '{}'. Use 'file:///dev/usb/lp0' or 'tcp://host[:port]'",
            s
        )))
    }

    /// Open a transport for this device.
    pub fn open(&self) -> Box<dyn Transport + Send> {
        match self {
            Self::File { path } => Box::new(FileTransport::new(path.clone())),
            Self::Tcp { host, port } => Box::new(TcpTransport::new(host.clone(), *port)),
        }
    }
}

impl std::fmt::Display for DeviceSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "file://{}", path.display()),
            Self::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_specifier() {
        let dev = DeviceSpecifier::parse("file:///dev/usb/lp0").unwrap();
        assert_eq!(
            dev,
            DeviceSpecifier::File {
                path: PathBuf::from("/dev/usb/lp0")
            }
        );
    }

    #[test]
    fn test_parse_bare_path() {
        let dev = DeviceSpecifier::parse("/dev/usb/lp1").unwrap();
        assert_eq!(
            dev,
            DeviceSpecifier::File {
                path: PathBuf::from("/dev/usb/lp1")
            }
        );
    }

    #[test]
    fn test_parse_tcp_with_port() {
        let dev = DeviceSpecifier::parse("tcp://printer.local:9101").unwrap();
        assert_eq!(
            dev,
            DeviceSpecifier::Tcp {
                host: "printer.local".to_string(),
                port: 9101
            }
        );
    }

    #[test]
    fn test_parse_tcp_default_port() {
        let dev = DeviceSpecifier::parse("tcp://10.0.0.7").unwrap();
        assert_eq!(
            dev,
            DeviceSpecifier::Tcp {
                host: "10.0.0.7".to_string(),
                port: 9100
            }
        );
    }

    #[test]
    fn test_parse_garbage_is_config_error() {
        assert!(matches!(
            DeviceSpecifier::parse("lpt1"),
            Err(EtiquetaError::Config(_))
        ));
        assert!(matches!(
            DeviceSpecifier::parse("tcp://host:notaport"),
            Err(EtiquetaError::Config(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for s in ["file:///dev/usb/lp0", "tcp://10.0.0.7:9100"] {
            let dev = DeviceSpecifier::parse(s).unwrap();
            assert_eq!(DeviceSpecifier::parse(&dev.to_string()).unwrap(), dev);
        }
    }

    #[test]
    fn test_status_ok_without_response() {
        let status = DeviceStatus {
            bytes_written: 10,
            response: None,
        };
        assert!(status.ensure_ok().is_ok());
    }

    #[test]
    fn test_status_error_bytes() {
        let mut reply = vec![0u8; 32];
        reply[8] = 0x01;
        let status = DeviceStatus {
            bytes_written: 10,
            response: Some(reply),
        };
        assert!(matches!(
            status.ensure_ok(),
            Err(EtiquetaError::DeviceStatus(_))
        ));
    }
}
