//! Inventory reconciler: evaluate a peer's inventory against local policy.
//!
//! One call handles one `REQMODS` payload. Entries are evaluated in message
//! order; a link-severing hit short-circuits the rest of the message (the
//! host stops delivering for that peer once termination is requested, so
//! later messages never arrive either). Effects accumulate across messages
//! from the same peer: nothing here assumes a single message carries the
//! whole inventory.

use modpact_core::catalog::ModuleCatalog;
use modpact_core::protocol::inventory;

use crate::link::{NoticeScope, OperNotifier, ServerPeer};
use crate::obs::GuardMetrics;
use crate::policy::{evaluate_entry, Finding, Flow, PolicyConfig, PolicyStore};

/// Termination reason for a globally required module we do not have.
pub const REASON_MISSING: &str = "Missing globally required module";

/// Termination reason for a version divergence.
pub const REASON_MISMATCH: &str = "Module version mismatch";

/// Result of processing one inventory payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Sender was not a directly connected server, or the payload was
    /// empty; nothing was evaluated.
    Ignored,
    /// Every entry was processed; `warnings` notices were raised.
    Completed { warnings: u32 },
    /// Processing stopped at a link-severing entry.
    Terminated { reason: String },
}

pub(crate) struct ReconcileCtx<'a> {
    pub server_name: &'a str,
    pub store: &'a PolicyStore,
    pub config: PolicyConfig,
    pub notifier: &'a dyn OperNotifier,
    pub metrics: &'a GuardMetrics,
}

pub(crate) fn handle(
    ctx: &ReconcileCtx<'_>,
    peer: &dyn ServerPeer,
    catalog: &dyn ModuleCatalog,
    payload: &str,
) -> ReconcileOutcome {
    // A non-server sender shouldn't really be possible here, but still.
    if !peer.is_local_server() || payload.trim().is_empty() {
        tracing::debug!(peer = %peer.name(), "ignoring inventory from non-server or empty payload");
        return ReconcileOutcome::Ignored;
    }

    ctx.metrics
        .inventories_received
        .inc(&[("peer", peer.name())]);

    let mut warnings = 0u32;
    for token in payload.split(' ').filter(|t| !t.is_empty()) {
        let Some(entry) = inventory::parse_token(token) else {
            continue;
        };
        ctx.metrics.entries_evaluated.inc(&[]);

        let finding = evaluate_entry(&entry, ctx.store, catalog);
        match act_on(ctx, peer, &entry.name, finding) {
            Flow::Continue => {}
            Flow::Warned => warnings += 1,
            Flow::Terminated(reason) => {
                tracing::debug!(peer = %peer.name(), %reason, "inventory reconciliation severed link");
                return ReconcileOutcome::Terminated { reason };
            }
        }
    }

    tracing::debug!(peer = %peer.name(), warnings, "inventory message reconciled");
    ReconcileOutcome::Completed { warnings }
}

/// Map one finding to notices and, where configured, link termination.
fn act_on(
    ctx: &ReconcileCtx<'_>,
    peer: &dyn ServerPeer,
    module: &str,
    finding: Finding,
) -> Flow {
    match finding {
        Finding::Clean | Finding::MissingLocal => Flow::Continue,

        Finding::DenyHit { reason } => {
            // This particular notice is for local operators only; both
            // sides of the link report it independently.
            ctx.notifier.notify(
                NoticeScope::Local,
                &format!(
                    "Server {} is using module '{}' which is listed in a deny module block (reason: {})",
                    peer.name(),
                    module,
                    reason
                ),
            );
            ctx.metrics.deny_hits.inc(&[("peer", peer.name())]);
            if ctx.config.squit_on_deny {
                // When set to squit, the rule's reason is used as-is.
                ctx.notifier.notify(
                    NoticeScope::Network,
                    &format!(
                        "ABORTING LINK: {} <=> {} (reason: {})",
                        ctx.server_name,
                        peer.name(),
                        reason
                    ),
                );
                return terminate(ctx, peer, "deny", reason);
            }
            Flow::Warned
        }

        Finding::MissingGlobal => {
            // Only the server missing the module can report it, so the
            // warning goes network-wide.
            ctx.notifier.notify(
                NoticeScope::Network,
                &format!(
                    "Globally required module '{}' wasn't (fully) loaded or is missing entirely",
                    module
                ),
            );
            ctx.metrics.missing_modules.inc(&[("peer", peer.name())]);
            if ctx.config.squit_on_missing {
                ctx.notifier.notify(
                    NoticeScope::Network,
                    &format!("ABORTING LINK: {} <=> {}", ctx.server_name, peer.name()),
                );
                return terminate(ctx, peer, "missing", REASON_MISSING.to_string());
            }
            Flow::Warned
        }

        Finding::VersionMismatch { ours, theirs } => {
            // Mismatches are reported on both ends separately, a local
            // notice is enough.
            ctx.notifier.notify(
                NoticeScope::Local,
                &format!(
                    "Version mismatch for module '{}' (ours: {}, theirs: {})",
                    module,
                    ours,
                    theirs.as_deref().unwrap_or("none")
                ),
            );
            ctx.metrics.version_mismatches.inc(&[("peer", peer.name())]);
            if ctx.config.squit_on_mismatch {
                ctx.notifier.notify(
                    NoticeScope::Network,
                    &format!("ABORTING LINK: {} <=> {}", ctx.server_name, peer.name()),
                );
                return terminate(ctx, peer, "mismatch", REASON_MISMATCH.to_string());
            }
            Flow::Warned
        }
    }
}

fn terminate(ctx: &ReconcileCtx<'_>, peer: &dyn ServerPeer, cause: &str, reason: String) -> Flow {
    ctx.metrics.links_terminated.inc(&[("cause", cause)]);
    peer.terminate(&reason);
    Flow::Terminated(reason)
}
