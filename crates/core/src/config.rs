use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};

/// Network stack implementation backing the tun device.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TunStack {
    System,
    #[default]
    Gvisor,
    Mixed,
}

/// Desired state of the tun listener, as loaded by the configuration layer.
///
/// The reconciler treats a value of this type as input-only: it is cloned
/// before any normalization, so the caller's copy is never reordered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct TunConfig {
    pub enable: bool,
    pub device: String,
    pub stack: TunStack,
    pub auto_route: bool,
    pub auto_detect_interface: bool,
    pub mtu: u32,
    pub strict_route: bool,
    pub endpoint_independent_nat: bool,
    /// UDP NAT idle timeout, in seconds.
    pub udp_timeout: u64,
    /// Externally supplied tun file descriptor, e.g. from Android VpnService.
    pub file_descriptor: Option<i32>,

    pub dns_hijack: Vec<String>,
    pub inet4_address: Vec<Ipv4Net>,
    pub inet6_address: Vec<Ipv6Net>,
    pub inet4_route_address: Vec<Ipv4Net>,
    pub inet6_route_address: Vec<Ipv6Net>,
    pub include_uid: Vec<u32>,
    pub include_uid_range: Vec<String>,
    pub exclude_uid: Vec<u32>,
    pub exclude_uid_range: Vec<String>,
    pub include_android_user: Vec<u32>,
    pub include_package: Vec<String>,
    pub exclude_package: Vec<String>,
}

impl TunConfig {
    /// Produces the canonical form of this snapshot: every unordered list
    /// field sorted by its natural total order, duplicates kept.
    ///
    /// Operates on a fresh clone; `self` is left untouched.
    pub fn canonicalized(&self) -> CanonicalConfig {
        let mut config = self.clone();
        config.dns_hijack.sort();
        config.inet4_address.sort();
        config.inet6_address.sort();
        config.inet4_route_address.sort();
        config.inet6_route_address.sort();
        config.include_uid.sort();
        config.include_uid_range.sort();
        config.exclude_uid.sort();
        config.exclude_uid_range.sort();
        config.include_android_user.sort();
        config.include_package.sort();
        config.exclude_package.sort();
        CanonicalConfig(config)
    }
}

/// A [`TunConfig`] whose list fields are in canonical order.
///
/// Only [`TunConfig::canonicalized`] produces one, so the diff engine and the
/// persisted last-applied state never see an un-normalized snapshot.
#[derive(Debug, Clone, Default)]
pub struct CanonicalConfig(TunConfig);

impl CanonicalConfig {
    pub fn config(&self) -> &TunConfig {
        &self.0
    }

    pub fn into_config(self) -> TunConfig {
        self.0
    }

    pub fn enabled(&self) -> bool {
        self.0.enable
    }

    /// Records that this configuration failed to take effect: the persisted
    /// form keeps every requested field but reports the tunnel as disabled.
    pub(crate) fn disable(&mut self) {
        self.0.enable = false;
    }
}
