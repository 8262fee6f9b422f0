//! Configuration-driven reconciler for the two singleton OS resources behind
//! a transparent-proxy inbound: the tun listener and the kernel redirect
//! program attached to physical interfaces.
//!
//! Callers push desired-state snapshots; [`TunManager`] decides per snapshot
//! whether the live listener already satisfies it (refresh), differs from it
//! (tear down and recreate), or should not exist (tear down).
//! [`RedirectManager`] rebuilds the redirect attachment on every call, gated
//! by the tunnel's current state. The packet stack and the redirect program
//! itself stay behind the [`tunnel`] and [`redirect`] service traits.

pub mod config;
pub mod diff;
pub mod error;
pub mod inbound;
pub mod redirect;
pub mod redirect_manager;
pub mod tun_manager;
pub mod tunnel;

pub use config::{CanonicalConfig, TunConfig, TunStack};
pub use error::{Error, Result};
pub use inbound::{InboundConnection, InboundPacket, InboundSinks};
pub use redirect::{RedirectHandle, RedirectService};
pub use redirect_manager::RedirectManager;
pub use tun_manager::{AppliedState, TunConfigSource, TunManager};
pub use tunnel::{TunnelHandle, TunnelService};
