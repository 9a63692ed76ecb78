//! Connection supervisor
//!
//! A single background task owns every transition of the connection state
//! machine:
//!
//! ```text
//!            connect ok                      connection error
//! Connecting ----------> Connected ------------------------------+
//!   |    ^                   ^                                   |
//!   |    | retry after       | connect ok                        v
//!   |    | retry_delay       |                          Disconnected (periodic)
//!   +----+                   +---- Connecting <-- tick every -----+
//!   |                                             reconnect_interval
//!   | max_attempts failed
//!   v
//! Disconnected (periodic)
//! ```
//!
//! Operations only read the published [`ConnectionStatus`] snapshot.

use std::sync::Arc;

use tokio::sync::{watch, Notify, RwLock};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::backend::{Connection, Connector};
use super::state::{ConnectionState, ConnectionStatus, ReconnectPolicy};

// == Link ==
/// State shared between the store and its supervisor task.
pub(crate) struct Link {
    status: watch::Sender<ConnectionStatus>,
    connection: RwLock<Option<Arc<dyn Connection>>>,
    wake: Notify,
}

impl Link {
    pub(crate) fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::initial());
        Self {
            status,
            connection: RwLock::new(None),
            wake: Notify::new(),
        }
    }

    pub(crate) fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Returns the live connection, or `None` unless the state is `Connected`.
    pub(crate) async fn connection(&self) -> Option<Arc<dyn Connection>> {
        if !self.status().is_connected() {
            return None;
        }
        self.connection.read().await.clone()
    }

    /// Asks a waiting periodic timer to start its next cycle now.
    ///
    /// Ignored unless the store is disconnected with the timer armed, so a
    /// connection attempt is never started while another is in flight.
    pub(crate) fn request_reconnect(&self) -> bool {
        let status = self.status();
        if status.state != ConnectionState::Disconnected || !status.periodic_reconnect {
            debug!(state = ?status.state, "Ignoring reconnect request");
            return false;
        }
        self.wake.notify_one();
        true
    }

    /// Returns to the initial state and hands back the connection handle.
    pub(crate) async fn reset(&self) -> Option<Arc<dyn Connection>> {
        self.status.send_replace(ConnectionStatus::initial());
        self.connection.write().await.take()
    }

    /// Applies one transition and returns the snapshot it published.
    fn update(&self, apply: impl FnOnce(&mut ConnectionStatus)) -> ConnectionStatus {
        self.status.send_modify(apply);
        self.status()
    }

    async fn install(&self, connection: Arc<dyn Connection>) {
        // Handle first, so a reader that sees Connected always finds it
        *self.connection.write().await = Some(connection);
        self.update(|status| {
            status.state = ConnectionState::Connected;
            status.attempt_count = 0;
            status.periodic_reconnect = false;
        });
    }

    async fn lose_connection(&self) {
        self.update(|status| {
            status.state = ConnectionState::Disconnected;
            status.periodic_reconnect = true;
        });
        *self.connection.write().await = None;
    }
}

// == Supervisor ==
/// Drives the connection state machine until the task is aborted.
pub(crate) async fn supervise(link: Arc<Link>, connector: Arc<dyn Connector>, policy: ReconnectPolicy) {
    let mut pending = connect_with_retry(&link, connector.as_ref(), &policy).await;

    loop {
        let connection = match pending.take() {
            Some(connection) => connection,
            None => reconnect_periodically(&link, connector.as_ref(), &policy).await,
        };

        let err = connection.closed().await;
        error!(
            error = %err,
            "Cache connection lost, retrying every {:?}",
            policy.periodic_interval()
        );
        link.lose_connection().await;
    }
}

/// Bounded-retry phase. Returns `None` once `max_attempts` attempts failed.
async fn connect_with_retry(
    link: &Link,
    connector: &dyn Connector,
    policy: &ReconnectPolicy,
) -> Option<Arc<dyn Connection>> {
    link.update(|status| {
        status.state = ConnectionState::Connecting;
        status.attempt_count = 0;
    });

    loop {
        match connector.connect().await {
            Ok(connection) => {
                link.install(connection.clone()).await;
                info!("Cache connection established");
                return Some(connection);
            }
            Err(err) => {
                let attempts = link
                    .update(|status| status.attempt_count += 1)
                    .attempt_count;

                if attempts < policy.max_attempts {
                    warn!(
                        attempt = attempts,
                        max_attempts = policy.max_attempts,
                        error = %err,
                        "Cache connection attempt failed, retrying in {:?}",
                        policy.retry_delay
                    );
                    time::sleep(policy.retry_delay).await;
                } else {
                    warn!(
                        attempts,
                        error = %err,
                        "Cache connection attempts exhausted, retrying every {:?}",
                        policy.periodic_interval()
                    );
                    link.update(|status| {
                        status.state = ConnectionState::Disconnected;
                        status.periodic_reconnect = true;
                    });
                    return None;
                }
            }
        }
    }
}

/// Periodic mode. Each tick re-enters the bounded-retry phase; returns once
/// a connection is established.
async fn reconnect_periodically(
    link: &Link,
    connector: &dyn Connector,
    policy: &ReconnectPolicy,
) -> Arc<dyn Connection> {
    let period = policy.periodic_interval();
    let mut timer = time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = timer.tick() => debug!("Periodic cache reconnection tick"),
            _ = link.wake.notified() => debug!("Cache reconnection requested"),
        }

        info!("Attempting to re-establish cache connection");
        if let Some(connection) = connect_with_retry(link, connector, policy).await {
            return connection;
        }
    }
}
