//! Collaborator contracts owned by the host server.
//!
//! The engine never opens sockets or delivers notices itself; the host's
//! connection and notification layers implement these traits and the engine
//! drives them synchronously from its callbacks.

use modpact_core::Result;

/// Where an operator notice should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeScope {
    /// Operators on this server only.
    Local,
    /// Operators network-wide.
    Network,
}

/// Operator-notification sink.
pub trait OperNotifier {
    fn notify(&self, scope: NoticeScope, text: &str);
}

/// A directly reachable server in the network topology.
///
/// `terminate` is a request to the connection owner. It is the host's
/// responsibility to stop delivering data for this peer once termination
/// has been requested; the engine does no further work for it within the
/// current message.
pub trait ServerPeer {
    /// The peer's server name.
    fn name(&self) -> &str;

    /// True when this is a server-type link whose physical connection
    /// terminates on this side (not a peer introduced by a hub).
    fn is_local_server(&self) -> bool;

    /// Send one protocol line (`command` plus a single payload parameter).
    fn send(&self, command: &str, payload: &str) -> Result<()>;

    /// Sever the link, propagating `reason` to the rest of the network.
    fn terminate(&self, reason: &str);
}
