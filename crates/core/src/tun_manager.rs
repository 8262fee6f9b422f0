use std::{
    net::SocketAddr,
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::{
    config::{CanonicalConfig, TunConfig},
    diff::has_changed,
    error::Result,
    inbound::InboundSinks,
    tunnel::{TunnelHandle, TunnelService},
};

/// Terminal outcome of the most recent tunnel reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppliedState {
    /// No live listener: disabled by configuration, or torn down by
    /// [`TunManager::shutdown`].
    #[default]
    Disabled,
    /// Listener created and live.
    Active,
    /// Creation failed; the reported configuration was downgraded to
    /// disabled and no retry happens until a materially different
    /// configuration arrives.
    DisabledOnError,
}

/// Read-only view of the tunnel state for components that must not take the
/// reconcile lock, such as the redirect manager.
pub trait TunConfigSource: Send + Sync {
    /// The live listener's recorded configuration, or the last applied one
    /// when no listener is live.
    fn current_config(&self) -> TunConfig;

    /// Monotonic counter bumped whenever the tunnel state actually changes.
    /// Readers can detect that a snapshot went stale underneath them.
    fn version(&self) -> u64;
}

struct TunState<H> {
    handle: Option<H>,
    /// Canonical form of the last configuration a reconcile finished
    /// handling, success or failure. This is the diff basis: a failed
    /// configuration stays here in its requested form so that resubmitting
    /// it verbatim classifies as unchanged and does not hammer the OS with
    /// doomed creation attempts.
    last_handled: CanonicalConfig,
}

/// Owns the singleton tun listener and decides, per incoming configuration
/// snapshot, whether to leave it alone, refresh it, or recreate it.
///
/// Construct one per process and share it by reference; all state lives in
/// the manager, not in globals.
pub struct TunManager<S: TunnelService> {
    service: S,
    state: Mutex<TunState<S::Handle>>,
    // Lock-free snapshot for current_config()/applied_state(); updated only
    // at commit points while the state mutex is held.
    snapshot: RwLock<(TunConfig, AppliedState)>,
    version: AtomicU64,
}

impl<S: TunnelService> TunManager<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(TunState {
                handle: None,
                last_handled: CanonicalConfig::default(),
            }),
            snapshot: RwLock::new((TunConfig::default(), AppliedState::Disabled)),
            version: AtomicU64::new(0),
        }
    }

    /// Brings the tun listener in line with `new_config`.
    ///
    /// Unchanged configurations only trigger a best-effort rebind of the
    /// live listener to the current default route. Changed ones tear the
    /// listener down and, when the new configuration is enabled, create a
    /// fresh one. A failed creation leaves the listener absent, reports the
    /// configuration as disabled and returns the error; the failure is not
    /// retried until a materially different configuration arrives.
    ///
    /// Returns the bound address of the live listener, if any. The whole
    /// call runs under the manager's lock; concurrent reconciles serialize.
    pub async fn reconcile(
        &self,
        new_config: TunConfig,
        sinks: InboundSinks,
    ) -> Result<Option<SocketAddr>> {
        let mut state = self.state.lock().await;
        let next = new_config.canonicalized();

        if !has_changed(&state.last_handled, &next) {
            if let Some(handle) = state.handle.as_ref() {
                // Refresh is best-effort and does not change the no-op
                // classification of this call.
                if let Err(err) = handle.flush_default_interface().await {
                    warn!("failed to rebind tun listener to default interface: {err}");
                }
            }
            let address = state.handle.as_ref().map(|handle| handle.address());
            state.last_handled = next;
            return Ok(address);
        }

        if let Some(handle) = state.handle.take() {
            handle.close().await;
        }

        if !next.enabled() {
            self.commit(&mut state, next, AppliedState::Disabled);
            return Ok(None);
        }

        match self.service.create(next.config(), sinks).await {
            Ok(handle) => {
                let address = handle.address();
                info!("tun listener bound at {address}");
                state.handle = Some(handle);
                self.commit(&mut state, next, AppliedState::Active);
                Ok(Some(address))
            }
            Err(err) => {
                error!("failed to start tun listener: {err}");
                self.commit(&mut state, next, AppliedState::DisabledOnError);
                Err(err)
            }
        }
    }

    /// The configuration currently in effect. Lock-free; may trail an
    /// in-flight reconcile by one commit.
    pub fn current_config(&self) -> TunConfig {
        self.snapshot.read().map_or_else(
            |poisoned| poisoned.into_inner().0.clone(),
            |guard| guard.0.clone(),
        )
    }

    /// Outcome of the most recent reconcile that changed the tunnel state.
    pub fn applied_state(&self) -> AppliedState {
        self.snapshot
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().1, |guard| guard.1)
    }

    /// Closes the live listener, if any. Safe to call repeatedly and at
    /// process exit. With no listener left, `current_config` falls back to
    /// the last applied configuration.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.handle.take() {
            handle.close().await;
            let reported = state.last_handled.clone().into_config();
            self.publish(reported, AppliedState::Disabled);
        }
    }

    fn commit(&self, state: &mut TunState<S::Handle>, next: CanonicalConfig, applied: AppliedState) {
        // The live listener's own recorded configuration wins over the
        // requested one: the platform layer may have filled in fields it
        // allocated, such as the device name.
        let reported = match (&state.handle, applied) {
            (Some(handle), AppliedState::Active) => handle.config(),
            _ => {
                let mut config = next.clone();
                if applied == AppliedState::DisabledOnError {
                    config.disable();
                }
                config.into_config()
            }
        };
        state.last_handled = next;
        self.publish(reported, applied);
    }

    fn publish(&self, reported: TunConfig, applied: AppliedState) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = (reported, applied),
            Err(poisoned) => *poisoned.into_inner() = (reported, applied),
        }
        self.version.fetch_add(1, Ordering::Release);
    }
}

impl<S: TunnelService> TunConfigSource for TunManager<S> {
    fn current_config(&self) -> TunConfig {
        TunManager::current_config(self)
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
