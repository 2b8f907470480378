//! UDP transport for the NetSIO bridge.
//!
//! Binds a single datagram socket on `INADDR_ANY:<port>` and learns the peer
//! address lazily from the first inbound datagram (spec.md §3, §6). `send`
//! is a silent, logged no-op until a peer has been learned — there is
//! nowhere to send to yet.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind NetSIO UDP socket: {0}")]
    Bind(#[source] io::Error),
}

/// A bound NetSIO UDP socket plus its lazily-learned peer address.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: RwLock<Option<SocketAddr>>,
}

impl UdpTransport {
    /// Bind `INADDR_ANY:port`. The socket is left in blocking mode — `recv`
    /// is meant to run in a dedicated thread (spec.md §5).
    pub fn bind(port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(("0.0.0.0", port)).map_err(TransportError::Bind)?;
        Ok(Self {
            socket,
            peer: RwLock::new(None),
        })
    }

    /// The learned peer address, if any datagram has arrived yet.
    pub fn peer(&self) -> Option<SocketAddr> {
        *self.peer.read().unwrap_or_else(|e| e.into_inner())
    }

    /// The address this socket is actually bound to. Mostly useful for
    /// tests and diagnostics that bind to port 0 and need to learn the
    /// OS-assigned ephemeral port.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn is_peer_known(&self) -> bool {
        self.peer().is_some()
    }

    /// Send `bytes` to the learned peer. If no peer is known yet, the send
    /// is dropped and logged — never an error, per spec.md §4.B.
    pub fn send(&self, bytes: &[u8]) {
        let Some(peer) = self.peer() else {
            tracing::warn!(len = bytes.len(), "netsio: dropping send, no peer known yet");
            return;
        };

        match self.send_with_eintr_retry(bytes, peer) {
            Ok(n) if n == bytes.len() => {
                tracing::trace!(len = n, %peer, "netsio: send");
            }
            Ok(n) => {
                tracing::warn!(sent = n, len = bytes.len(), %peer, "netsio: partial send");
            }
            Err(e) => {
                tracing::warn!(error = %e, %peer, "netsio: send failed");
            }
        }
    }

    fn send_with_eintr_retry(&self, bytes: &[u8], peer: SocketAddr) -> io::Result<usize> {
        match self.socket.send_to(bytes, peer) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => self.socket.send_to(bytes, peer),
            other => other,
        }
    }

    /// Block until a datagram arrives. Updates the learned peer address and
    /// returns the payload alongside the sender. Retries exactly once on a
    /// transient `EINTR`.
    pub fn recv(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        let mut buf = [0u8; 65536];
        let (n, from) = match self.socket.recv_from(&mut buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => self.socket.recv_from(&mut buf)?,
            other => other?,
        };

        *self.peer.write().unwrap_or_else(|e| e.into_inner()) = Some(from);
        Ok((buf[..n].to_vec(), from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_before_any_recv_is_a_silent_no_op() {
        let transport = UdpTransport::bind(0).unwrap();
        assert!(!transport.is_peer_known());
        // Must not panic, must not block.
        transport.send(&[0x01]);
    }

    #[test]
    fn recv_learns_peer_and_returns_payload() {
        let server = UdpTransport::bind(0).unwrap();
        let server_addr = server.socket.local_addr().unwrap();

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client.send_to(&[0x01], server_addr).unwrap();

        let (payload, from) = server.recv().unwrap();
        assert_eq!(payload, vec![0x01]);
        assert_eq!(from, client.local_addr().unwrap());
        assert!(server.is_peer_known());
        assert_eq!(server.peer(), Some(from));
    }

    #[test]
    fn send_reaches_learned_peer() {
        let server = UdpTransport::bind(0).unwrap();
        let server_addr = server.socket.local_addr().unwrap();

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client.set_read_timeout(Some(std::time::Duration::from_secs(2))).unwrap();
        client.send_to(&[0x01], server_addr).unwrap();

        let (_, from) = server.recv().unwrap();
        assert_eq!(from, client.local_addr().unwrap());

        server.send(&[0x02]);
        let mut buf = [0u8; 8];
        let (n, _) = client.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x02]);
    }
}
