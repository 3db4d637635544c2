//! Outbound packet sink.
//!
//! Delivery is fire-and-forget: one datagram per encoded packet, no buffering
//! and no retransmission. The session loop logs a failed send and moves on to
//! the next packet.

use crate::{Result, TelemetryError};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::debug;

/// Destination for encoded packets.
#[async_trait]
pub trait PacketSink: Send {
    /// Send one datagram.
    async fn send(&mut self, datagram: &[u8]) -> Result<()>;
}

/// UDP sink bound to an ephemeral local port, sending to a fixed target.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Bind a local socket for sending to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Network`] if the local bind fails.
    pub async fn bind(target: SocketAddr) -> Result<Self> {
        let bind_addr: SocketAddr = if target.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket =
            UdpSocket::bind(bind_addr).await.map_err(|e| TelemetryError::network("bind", e))?;
        debug!(%target, "UDP sink bound");
        Ok(Self { socket, target })
    }

    /// The peripheral address this sink delivers to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Release the socket. Dropping the socket is infallible, so this always
    /// succeeds; it exists so teardown can report each resource explicitly.
    pub fn close(self) {
        drop(self.socket);
    }
}

#[async_trait]
impl PacketSink for UdpSink {
    async fn send(&mut self, datagram: &[u8]) -> Result<()> {
        self.socket
            .send_to(datagram, self.target)
            .await
            .map_err(|e| TelemetryError::network("send_to", e))?;
        Ok(())
    }
}
