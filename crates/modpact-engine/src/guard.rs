//! Engine facade owned by the host.
//!
//! `LinkGuard` holds the live policy state and exposes the two event-driven
//! entry points: `announce_modules` for the link-established callback and
//! `handle_inventory` for the message-received callback. Both run
//! synchronously on the host's control thread.

use std::sync::Arc;

use modpact_core::catalog::ModuleCatalog;
use modpact_core::Result;

use crate::broadcast;
use crate::config;
use crate::link::{OperNotifier, ServerPeer};
use crate::obs::GuardMetrics;
use crate::policy::{PolicyConfig, PolicyStore};
use crate::reconcile::{self, ReconcileCtx, ReconcileOutcome};

pub struct LinkGuard {
    server_name: String,
    notifier: Arc<dyn OperNotifier>,
    store: PolicyStore,
    config: PolicyConfig,
    metrics: Arc<GuardMetrics>,
}

impl LinkGuard {
    /// Build a guard with an empty policy: nothing denied, every switch
    /// off, so all mismatches merely warn until configuration is applied.
    pub fn new(server_name: impl Into<String>, notifier: Arc<dyn OperNotifier>) -> Self {
        Self {
            server_name: server_name.into(),
            notifier,
            store: PolicyStore::new(),
            config: PolicyConfig::default(),
            metrics: Arc::new(GuardMetrics::default()),
        }
    }

    /// Install freshly applied policy state, replacing the previous pair
    /// wholesale.
    pub fn install_policy(&mut self, store: PolicyStore, config: PolicyConfig) {
        tracing::info!(
            deny_rules = store.len(),
            squit_on_deny = config.squit_on_deny,
            squit_on_missing = config.squit_on_missing,
            squit_on_mismatch = config.squit_on_mismatch,
            "installing module policy"
        );
        self.store = store;
        self.config = config;
    }

    /// Drop all policy state; used on unload/reload so no stale rules
    /// survive until the next apply.
    pub fn clear_policy(&mut self) {
        self.store.clear();
        self.config = PolicyConfig::default();
    }

    /// Validate and apply a structured configuration document, then
    /// install the result.
    pub fn load_config_str(
        &mut self,
        text: &str,
        source: &str,
        catalog: &mut dyn ModuleCatalog,
    ) -> Result<()> {
        let (store, config) = config::load_from_str(text, source, catalog)?;
        self.install_policy(store, config);
        Ok(())
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn policy_store(&self) -> &PolicyStore {
        &self.store
    }

    pub fn policy_config(&self) -> PolicyConfig {
        self.config
    }

    pub fn metrics(&self) -> &GuardMetrics {
        &self.metrics
    }

    /// Shared handle for the host's scrape endpoint.
    pub fn metrics_handle(&self) -> Arc<GuardMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Link-established callback: dump the local catalog to the new peer.
    pub fn announce_modules(
        &self,
        peer: &dyn ServerPeer,
        catalog: &dyn ModuleCatalog,
    ) -> Result<()> {
        broadcast::announce(peer, catalog, &self.metrics)
    }

    /// As `announce_modules` with an explicit payload bound; hosts with a
    /// non-default transport line length use this.
    pub fn announce_modules_bounded(
        &self,
        peer: &dyn ServerPeer,
        catalog: &dyn ModuleCatalog,
        max_payload: usize,
    ) -> Result<()> {
        broadcast::announce_bounded(peer, catalog, &self.metrics, max_payload)
    }

    /// Message-received callback: reconcile one `REQMODS` payload.
    pub fn handle_inventory(
        &self,
        peer: &dyn ServerPeer,
        catalog: &dyn ModuleCatalog,
        payload: &str,
    ) -> ReconcileOutcome {
        let ctx = ReconcileCtx {
            server_name: &self.server_name,
            store: &self.store,
            config: self.config,
            notifier: self.notifier.as_ref(),
            metrics: &self.metrics,
        };
        reconcile::handle(&ctx, peer, catalog, payload)
    }
}
