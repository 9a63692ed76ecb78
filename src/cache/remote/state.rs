//! Connection state of the remote store.

use std::time::Duration;

use serde::Serialize;

/// Lifecycle state of the connection to the backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Snapshot of the connection state machine.
///
/// Published as a whole by the supervisor, so readers never see a state
/// paired with a stale attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Failed attempts in the current bounded-retry phase
    pub attempt_count: u32,
    /// Whether the periodic reconnection timer is armed
    pub periodic_reconnect: bool,
}

impl ConnectionStatus {
    /// State of a freshly constructed store.
    pub fn initial() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempt_count: 0,
            periodic_reconnect: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// Shortest period the reconnection timer runs at.
pub const MIN_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Timing of the reconnection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts in one bounded-retry phase
    pub max_attempts: u32,
    /// Pause between attempts of the bounded-retry phase
    pub retry_delay: Duration,
    /// Period of the reconnection timer once bounded retries are exhausted
    pub reconnect_interval: Duration,
}

impl ReconnectPolicy {
    /// Timer period actually used, never below [`MIN_RECONNECT_INTERVAL`].
    pub fn periodic_interval(&self) -> Duration {
        self.reconnect_interval.max(MIN_RECONNECT_INTERVAL)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            reconnect_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        let status = ConnectionStatus::initial();
        assert_eq!(status.state, ConnectionState::Disconnected);
        assert_eq!(status.attempt_count, 0);
        assert!(!status.periodic_reconnect);
        assert!(!status.is_connected());
    }

    #[test]
    fn test_default_policy() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.retry_delay, Duration::from_secs(5));
        assert_eq!(policy.reconnect_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_periodic_interval_is_clamped() {
        let policy = ReconnectPolicy {
            reconnect_interval: Duration::ZERO,
            ..ReconnectPolicy::default()
        };
        assert_eq!(policy.periodic_interval(), MIN_RECONNECT_INTERVAL);
        assert_eq!(
            ReconnectPolicy::default().periodic_interval(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_value(ConnectionStatus::initial()).unwrap();
        assert_eq!(json["state"], "disconnected");
    }
}
