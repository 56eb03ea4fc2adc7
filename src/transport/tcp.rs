//! # Network Transport
//!
//! Sends jobs to a network printer over a raw TCP socket (the
//! conventional port-9100 print path).
//!
//! The socket's connect, write, and read operations all carry
//! timeouts derived from the caller's budget, so a wedged printer
//! surfaces as a transmit error instead of a hang. After the job is
//! written, a short read window collects the printer's status reply if
//! it sends one; silence is not an error.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::EtiquetaError;
use crate::transport::{DeviceStatus, Transport};

/// Conventional raw-print port.
pub const DEFAULT_PORT: u16 = 9100;

/// Status replies are 32 bytes.
const STATUS_LEN: usize = 32;

/// Read window for the status reply after the job is sent.
const STATUS_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Sends jobs over TCP.
pub struct TcpTransport {
    host: String,
    port: u16,
}

impl TcpTransport {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Transport for TcpTransport {
    fn transmit(&mut self, data: &[u8], timeout: Duration) -> Result<DeviceStatus, EtiquetaError> {
        let addr = self.addr();
        let sock_addr = addr
            .to_socket_addrs()
            .map_err(|e| EtiquetaError::Transmit(format!("Cannot resolve {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| EtiquetaError::Transmit(format!("No address for {}", addr)))?;

        let mut stream = TcpStream::connect_timeout(&sock_addr, timeout)
            .map_err(|e| EtiquetaError::Transmit(format!("Failed to connect {}: {}", addr, e)))?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(|e| EtiquetaError::Transmit(format!("Socket setup failed: {}", e)))?;

        stream
            .write_all(data)
            .map_err(|e| EtiquetaError::Transmit(format!("Write to {} failed: {}", addr, e)))?;
        stream
            .flush()
            .map_err(|e| EtiquetaError::Transmit(format!("Flush of {} failed: {}", addr, e)))?;

        debug!(bytes = data.len(), device = %addr, "transmitted job");

        // Collect the status reply if the printer sends one.
        stream
            .set_read_timeout(Some(STATUS_READ_TIMEOUT))
            .map_err(|e| EtiquetaError::Transmit(format!("Socket setup failed: {}", e)))?;
        let mut reply = vec![0u8; STATUS_LEN];
        let response = match stream.read(&mut reply) {
            Ok(n) if n > 0 => {
                reply.truncate(n);
                Some(reply)
            }
            _ => None,
        };

        Ok(DeviceStatus {
            bytes_written: data.len(),
            response,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_transmit_to_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            sock.read_to_end(&mut received).unwrap();
            received
        });

        let mut transport = TcpTransport::new("127.0.0.1".to_string(), port);
        let status = transport
            .transmit(b"job bytes", Duration::from_secs(5))
            .unwrap();
        assert_eq!(status.bytes_written, 9);

        assert_eq!(server.join().unwrap(), b"job bytes");
    }

    #[test]
    fn test_status_reply_is_captured() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut buf = [0u8; 16];
            let _ = sock.read(&mut buf);
            let reply = [0u8; 32];
            let _ = sock.write_all(&reply);
        });

        let mut transport = TcpTransport::new("127.0.0.1".to_string(), port);
        let status = transport.transmit(b"job", Duration::from_secs(5)).unwrap();
        assert_eq!(status.response.as_deref().map(|r| r.len()), Some(32));
        assert!(status.ensure_ok().is_ok());
    }

    #[test]
    fn test_unreachable_host_is_transmit_error() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let mut transport = TcpTransport::new("192.0.2.1".to_string(), 9100);
        let err = transport
            .transmit(b"job", Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, EtiquetaError::Transmit(_)));
    }
}
