//! Connection and user shown in the navigation bar.
//!
//! Process-wide state with an explicit read/write/clear lifecycle. Every
//! write bumps a generation counter so views can tell when to re-read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, RwLock};

pub const NO_CONNECTION_LABEL: &str = "—";
pub const DEMO_MODE_LABEL: &str = "demo mode";
pub const GUEST_LABEL: &str = "guest";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub connection_id: Option<i32>,
}

#[derive(Debug, Default)]
pub struct ConnectionState {
    info: RwLock<ConnectionInfo>,
    generation: AtomicU64,
}

static GLOBAL: LazyLock<ConnectionState> = LazyLock::new(ConnectionState::new);

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance.
    pub fn global() -> &'static ConnectionState {
        &GLOBAL
    }

    pub fn read(&self) -> ConnectionInfo {
        match self.info.read() {
            Ok(info) => info.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn write(&self, info: ConnectionInfo) {
        self.update(|current| *current = info);
    }

    pub fn update(&self, f: impl FnOnce(&mut ConnectionInfo)) {
        let mut guard = match self.info.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
        drop(guard);
        self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(target: "wp_workbench::connection", "connection state changed");
    }

    /// Log out: forget the connection and the user.
    pub fn clear(&self) {
        self.write(ConnectionInfo::default());
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// `ip:port`, `ip`, the demo-mode label when running without a server,
    /// or a dash.
    pub fn label(&self, demo_mode: bool) -> String {
        let info = self.read();
        match (info.ip.filter(|ip| !ip.is_empty()), info.port) {
            (Some(ip), Some(port)) => format!("{ip}:{port}"),
            (Some(ip), None) => ip,
            (None, _) if demo_mode => DEMO_MODE_LABEL.to_string(),
            (None, _) => NO_CONNECTION_LABEL.to_string(),
        }
    }

    /// The user name, `guest` in demo mode, or empty.
    pub fn username_label(&self, demo_mode: bool) -> String {
        match self.read().username.filter(|name| !name.is_empty()) {
            Some(name) => name,
            None if demo_mode => GUEST_LABEL.to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        let state = ConnectionState::new();
        assert_eq!(state.label(false), "—");
        assert_eq!(state.label(true), "demo mode");
        assert_eq!(state.username_label(true), "guest");
        assert_eq!(state.username_label(false), "");

        state.write(ConnectionInfo {
            ip: Some("10.0.0.7".into()),
            port: Some(8080),
            username: Some("ops".into()),
            connection_id: Some(3),
        });
        assert_eq!(state.label(true), "10.0.0.7:8080");
        assert_eq!(state.username_label(true), "ops");

        state.update(|info| info.port = None);
        assert_eq!(state.label(false), "10.0.0.7");
    }

    #[test]
    fn clear_bumps_generation() {
        let state = ConnectionState::new();
        state.update(|info| info.ip = Some("1.1.1.1".into()));
        let before = state.generation();
        state.clear();
        assert_eq!(state.generation(), before + 1);
        assert_eq!(state.read(), ConnectionInfo::default());
    }
}
