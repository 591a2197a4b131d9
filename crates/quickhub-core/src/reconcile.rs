// ── Event reconciliation ──
//
// Applies one batch of remote events to the snapshot store, in array
// order. Removals mutate directly; every other relevant kind is a
// fetch-and-gate: re-read the device and let its current interface set
// decide between upsert and removal. Failures are isolated per event.

use std::str::FromStr;
use std::sync::Arc;

use strum::{Display, EnumString};
use tracing::{debug, warn};

use quickhub_api::HubClient;
use quickhub_api::models::RemoteEvent;

use crate::model::{MANAGED_INTERFACE, QuickApp};
use crate::store::SnapshotStore;

/// The event kinds this engine reacts to. Everything else in the hub's
/// stream is dropped without side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum EventKind {
    #[strum(serialize = "DeviceRemovedEvent")]
    DeviceRemoved,
    #[strum(serialize = "DeviceChangedRoomEvent")]
    DeviceChangedRoom,
    #[strum(serialize = "DeviceCreatedEvent")]
    DeviceCreated,
    #[strum(serialize = "DeviceModifiedEvent")]
    DeviceModified,
    #[strum(serialize = "QuickAppFilesChangedEvent")]
    QuickAppFilesChanged,
}

impl EventKind {
    /// Classify a raw event, returning `None` for irrelevant kinds.
    pub fn classify(event: &RemoteEvent) -> Option<Self> {
        event.kind.as_deref().and_then(|k| Self::from_str(k).ok())
    }
}

/// Applies remote events to a [`SnapshotStore`].
pub struct Reconciler {
    client: HubClient,
    store: Arc<SnapshotStore>,
}

impl Reconciler {
    pub fn new(client: HubClient, store: Arc<SnapshotStore>) -> Self {
        Self { client, store }
    }

    /// Apply a batch sequentially, in array order.
    ///
    /// Ordering matters: a removal followed by a creation for the same id
    /// must land in that order to match remote truth. A malformed or
    /// failing event is skipped; the rest of the batch still applies.
    pub async fn apply_batch(&self, events: &[RemoteEvent]) {
        for event in events {
            self.apply(event).await;
        }
    }

    async fn apply(&self, event: &RemoteEvent) {
        let Some(kind) = EventKind::classify(event) else {
            return;
        };
        let Some(id) = event.device_id() else {
            debug!(kind = %kind, "dropping event without a device id");
            return;
        };

        match kind {
            EventKind::DeviceRemoved => {
                debug!(id, "device removed");
                self.store.remove(id);
            }
            // Created, modified, room-changed, and files-changed all
            // resolve the same way: re-fetch and gate on interfaces.
            EventKind::DeviceCreated
            | EventKind::DeviceChangedRoom
            | EventKind::DeviceModified
            | EventKind::QuickAppFilesChanged => {
                self.refresh_device(id).await;
            }
        }
    }

    /// Fetch one device and apply the interface gate: carrying the
    /// managed capability means upsert, anything else means removal if
    /// present. A fetch failure is logged and skipped — the next poll
    /// cycle or a later event reconciles it.
    async fn refresh_device(&self, id: u64) {
        let device = match self.client.get_device(id).await {
            Ok(device) => device,
            Err(e) => {
                warn!(id, error = %e, "device refresh failed, skipping event");
                return;
            }
        };

        if device.has_interface(MANAGED_INTERFACE) {
            match QuickApp::try_from(device) {
                Ok(app) => {
                    let is_new = self.store.upsert(app);
                    debug!(id, is_new, "upserted QuickApp");
                }
                Err(e) => warn!(id, error = %e, "skipping malformed device record"),
            }
        } else if self.store.remove(id).is_some() {
            debug!(id, "device no longer carries the managed interface, removed");
        }
    }
}
