use std::net::SocketAddr;

use tokio::{net::TcpStream, sync::mpsc};

/// A TCP connection accepted by the tun stack, tagged with the destination
/// the client originally dialed.
#[derive(Debug)]
pub struct InboundConnection {
    pub stream: TcpStream,
    pub destination: SocketAddr,
}

/// A UDP datagram captured by the tun stack.
#[derive(Debug, Clone)]
pub struct InboundPacket {
    pub data: Vec<u8>,
    pub source: SocketAddr,
    pub destination: SocketAddr,
}

/// Caller-owned delivery channels for traffic accepted by the tun listener.
///
/// The reconciler and the listener only ever send into these; the receiving
/// ends stay with the caller and are never closed from this side.
#[derive(Debug, Clone)]
pub struct InboundSinks {
    pub tcp: mpsc::Sender<InboundConnection>,
    pub udp: mpsc::Sender<InboundPacket>,
}
