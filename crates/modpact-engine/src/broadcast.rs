//! Inventory broadcaster: dump the local catalog to a newly linked peer.
//!
//! Runs once per link establishment, only on the side that owns the
//! physical connection. Leaves introduced by a hub are skipped; the hub
//! announces for every node it introduces, so each directly connected pair
//! still exchanges inventories exactly once.

use modpact_core::catalog::ModuleCatalog;
use modpact_core::protocol::inventory::{chunk_inventory, CMD_REQMODS, MAX_PAYLOAD_LEN};
use modpact_core::Result;

use crate::link::ServerPeer;
use crate::obs::GuardMetrics;

/// Push the full local catalog to `peer` in bounded `REQMODS` messages.
///
/// Every module is dumped regardless of scope or load state, so the peer
/// can deny even locally scoped ones.
pub(crate) fn announce(
    peer: &dyn ServerPeer,
    catalog: &dyn ModuleCatalog,
    metrics: &GuardMetrics,
) -> Result<()> {
    announce_bounded(peer, catalog, metrics, MAX_PAYLOAD_LEN)
}

pub(crate) fn announce_bounded(
    peer: &dyn ServerPeer,
    catalog: &dyn ModuleCatalog,
    metrics: &GuardMetrics,
    max_payload: usize,
) -> Result<()> {
    if !peer.is_local_server() {
        tracing::debug!(peer = %peer.name(), "not announcing inventory to hub-introduced peer");
        return Ok(());
    }

    let payloads = chunk_inventory(catalog.entries(), max_payload);
    for payload in &payloads {
        peer.send(CMD_REQMODS, payload)?;
    }

    metrics
        .messages_broadcast
        .add(&[("peer", peer.name())], payloads.len() as u64);
    tracing::debug!(
        peer = %peer.name(),
        modules = catalog.entries().len(),
        messages = payloads.len(),
        "announced module inventory"
    );
    Ok(())
}
