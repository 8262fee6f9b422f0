use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::{
    error::Result,
    redirect::{RedirectHandle, RedirectService},
    tun_manager::TunConfigSource,
};

/// Owns the singleton kernel redirect program.
///
/// Unlike the tunnel, the redirect attachment is cheap enough to rebuild
/// wholesale: every reconcile tears the previous attachment down and, when
/// the tunnel is enabled and the interface set non-empty, attaches anew.
/// Repeated external invocation is the only retry mechanism.
pub struct RedirectManager<R: RedirectService> {
    service: R,
    tun: Arc<dyn TunConfigSource>,
    state: Mutex<Option<R::Handle>>,
}

impl<R: RedirectService> RedirectManager<R> {
    pub fn new(service: R, tun: Arc<dyn TunConfigSource>) -> Self {
        Self {
            service,
            tun,
            state: Mutex::new(None),
        }
    }

    /// Reattaches the redirect program to the given interfaces.
    ///
    /// The names are sorted and deduplicated into a canonical set; the
    /// caller's slice is left untouched. Runs under the manager's own lock,
    /// independent of the tunnel manager's.
    pub async fn reconcile(&self, interface_names: &[String]) -> Result<()> {
        let mut state = self.state.lock().await;

        let mut names = interface_names.to_vec();
        names.sort();
        names.dedup();

        if let Some(handle) = state.take() {
            handle.close().await;
        }

        if names.is_empty() {
            return Ok(());
        }

        // The tunnel state is read without its reconcile lock: a concurrent
        // tunnel change can make this snapshot stale, which the version
        // re-check below surfaces. The next interface-change event converges.
        let observed_version = self.tun.version();
        let tun_config = self.tun.current_config();
        if !tun_config.enable {
            return Ok(());
        }

        match self.service.attach(&names, &tun_config.device).await {
            Ok(handle) => {
                info!(
                    "attached redirect program to interfaces {:?}",
                    handle.interfaces()
                );
                if self.tun.version() != observed_version {
                    warn!(
                        "tun configuration changed while attaching redirect program; \
                         attachment may be stale until the next reconcile"
                    );
                }
                *state = Some(handle);
                Ok(())
            }
            Err(err) => {
                error!("failed to attach redirect program: {err}");
                Err(err)
            }
        }
    }

    /// Detaches the live redirect program, if any. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.take() {
            handle.close().await;
        }
    }
}
