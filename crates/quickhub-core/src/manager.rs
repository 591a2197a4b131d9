// ── Manager facade ──
//
// One manager per hub session: owns the snapshot store, the poller, and
// the connection state, and is handed to consumers by reference. The
// initial listing and the event loop share the same HubClient, so both
// pick up credential changes through the ConfigProvider.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use quickhub_api::HubClient;

use crate::error::CoreError;
use crate::model::{CHILD_INTERFACE, MANAGED_INTERFACE, QuickApp};
use crate::poller::{EventPoller, PollerConfig, PollerState};
use crate::sort::{SortColumn, SortDirection, sort_apps};
use crate::store::SnapshotStore;

/// Connection state observable by consumers.
///
/// Derived, never set directly: it changes only as a side effect of
/// [`QuickAppManager::load_all`] outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Manager tuning. Defaults match the hub protocol values.
#[derive(Debug, Clone, Default)]
pub struct ManagerConfig {
    pub poller: PollerConfig,
}

/// The main entry point for consumers.
///
/// Owns one [`SnapshotStore`] and one [`EventPoller`] per connected
/// session. Consumers observe the store and connection state through
/// `watch` receivers and control the poll loop with
/// [`start()`](Self::start) / [`stop()`](Self::stop).
pub struct QuickAppManager {
    client: HubClient,
    store: Arc<SnapshotStore>,
    connection: watch::Sender<ConnectionState>,
    poller: EventPoller,
}

impl QuickAppManager {
    pub fn new(client: HubClient) -> Self {
        Self::with_config(client, ManagerConfig::default())
    }

    pub fn with_config(client: HubClient, config: ManagerConfig) -> Self {
        let store = Arc::new(SnapshotStore::new());
        let (connection, _) = watch::channel(ConnectionState::Disconnected);
        let poller = EventPoller::with_config(client.clone(), Arc::clone(&store), config.poller);
        Self {
            client,
            store,
            connection,
            poller,
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &HubClient {
        &self.client
    }

    /// The snapshot store.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    // ── Initial load ─────────────────────────────────────────────────

    /// Fetch the full listing and swap it into the store.
    ///
    /// Two fetches run concurrently — managed apps and child apps — and
    /// both must land before the connection state updates: Connected only
    /// if both succeeded, Disconnected (with the error surfaced) on any
    /// failure. A failed load never touches the poll cursor and never
    /// stops an already-running poller.
    pub async fn load_all(&self) -> Result<(), CoreError> {
        let (apps, children) = tokio::join!(
            self.client.list_devices(MANAGED_INTERFACE),
            self.client.list_devices(CHILD_INTERFACE),
        );

        match (apps, children) {
            (Ok(apps), Ok(children)) => {
                let records: Vec<QuickApp> = apps
                    .into_iter()
                    .filter_map(|d| QuickApp::try_from(d).ok())
                    .chain(
                        children
                            .into_iter()
                            .filter_map(|d| QuickApp::try_from(d).ok().map(QuickApp::as_child)),
                    )
                    .collect();
                info!(count = records.len(), "loaded QuickApp listing");
                self.store.replace_all(records);
                self.connection.send_replace(ConnectionState::Connected);
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "initial load failed");
                self.connection.send_replace(ConnectionState::Disconnected);
                Err(e.into())
            }
        }
    }

    /// Load the listing, then start the event poll loop.
    ///
    /// A failed load leaves the poller untouched and returns the error.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.load_all().await?;
        self.start();
        Ok(())
    }

    // ── Poller lifecycle ─────────────────────────────────────────────

    /// Start the long-poll loop (idempotent).
    pub fn start(&self) {
        self.poller.start();
    }

    /// Stop the long-poll loop cooperatively.
    pub fn stop(&self) {
        self.poller.stop();
    }

    /// The poller, for cursor and state inspection.
    pub fn poller(&self) -> &EventPoller {
        &self.poller
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    /// Subscribe to poller state changes.
    pub fn poller_state(&self) -> watch::Receiver<PollerState> {
        self.poller.state()
    }

    /// Subscribe to snapshot changes.
    pub fn apps(&self) -> watch::Receiver<Arc<Vec<Arc<QuickApp>>>> {
        self.store.subscribe()
    }

    /// Current snapshot ordered for display.
    pub fn apps_sorted(&self, column: SortColumn, direction: SortDirection) -> Vec<Arc<QuickApp>> {
        let mut apps: Vec<Arc<QuickApp>> = self.store.snapshot().iter().map(Arc::clone).collect();
        sort_apps(&mut apps, column, direction);
        apps
    }
}
