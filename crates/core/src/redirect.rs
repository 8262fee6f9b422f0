use async_trait::async_trait;

use crate::error::Result;

/// A kernel redirect program attached to a set of interfaces, steering
/// matching traffic toward the tun device.
#[async_trait]
pub trait RedirectHandle: Send + Sync {
    /// The interface names the program is attached to.
    fn interfaces(&self) -> &[String];

    /// Detach from every interface. Must be idempotent.
    async fn close(&self);
}

/// Loader/attacher for the kernel redirect program. The bytecode and the
/// attach mechanics live behind this seam.
#[async_trait]
pub trait RedirectService: Send + Sync {
    type Handle: RedirectHandle;

    async fn attach(&self, interfaces: &[String], device: &str) -> Result<Self::Handle>;
}
