use std::net::SocketAddr;

use async_trait::async_trait;

use crate::{config::TunConfig, error::Result, inbound::InboundSinks};

/// A live tun listener owning the OS device and its sockets.
///
/// At most one instance exists at a time; [`TunManager`](crate::TunManager)
/// is its sole owner.
#[async_trait]
pub trait TunnelHandle: Send + Sync {
    /// Address the listener is bound to.
    fn address(&self) -> SocketAddr;

    /// The configuration this listener was actually created with, after the
    /// platform layer filled in anything it allocated (e.g. the device name).
    /// Once a listener is live, this is the source of truth.
    fn config(&self) -> TunConfig;

    /// Rebind to the current default network route without recreating the
    /// device. Best-effort; cheap compared to a full recreate.
    async fn flush_default_interface(&self) -> Result<()>;

    /// Tear the listener down. Must be idempotent.
    async fn close(&self);
}

/// Factory for tun listeners. The packet-processing stack lives behind this
/// seam; the reconciler only decides when to call it.
#[async_trait]
pub trait TunnelService: Send + Sync {
    type Handle: TunnelHandle;

    async fn create(&self, config: &TunConfig, sinks: InboundSinks) -> Result<Self::Handle>;
}
