//! Shared test doubles for the engine integration tests.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::sync::Mutex;

use modpact_core::Result;
use modpact_engine::{NoticeScope, OperNotifier, ServerPeer};

pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Notifier that records every notice for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeScope, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeScope, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<(NoticeScope, String)> {
        std::mem::take(&mut *self.notices.lock().unwrap())
    }
}

impl OperNotifier for RecordingNotifier {
    fn notify(&self, scope: NoticeScope, text: &str) {
        self.notices.lock().unwrap().push((scope, text.to_string()));
    }
}

/// Peer that records sends and termination requests.
pub struct TestPeer {
    name: String,
    local: bool,
    sent: Mutex<Vec<(String, String)>>,
    terminated: Mutex<Option<String>>,
}

impl TestPeer {
    /// A directly connected server-type peer.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            local: true,
            sent: Mutex::new(Vec::new()),
            terminated: Mutex::new(None),
        }
    }

    /// A peer introduced by a hub (not locally connected).
    pub fn hub_introduced(name: &str) -> Self {
        Self {
            local: false,
            ..Self::new(name)
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_payloads(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn terminated_reason(&self) -> Option<String> {
        self.terminated.lock().unwrap().clone()
    }
}

impl ServerPeer for TestPeer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_local_server(&self) -> bool {
        self.local
    }

    fn send(&self, command: &str, payload: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((command.to_string(), payload.to_string()));
        Ok(())
    }

    fn terminate(&self, reason: &str) {
        *self.terminated.lock().unwrap() = Some(reason.to_string());
    }
}
