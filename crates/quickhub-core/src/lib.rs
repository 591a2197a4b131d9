//! Live-state synchronization between a hub's event stream and a local
//! QuickApp snapshot.
//!
//! This crate owns the engine that `quickhub` consumers (the CLI today)
//! observe instead of talking to the hub directly:
//!
//! - **[`QuickAppManager`]** — Facade managing the full lifecycle:
//!   [`load_all()`](QuickAppManager::load_all) fetches the initial device
//!   listing, [`connect()`](QuickAppManager::connect) additionally starts the
//!   long-poll loop, [`start()`](QuickAppManager::start) /
//!   [`stop()`](QuickAppManager::stop) control the poller independently of
//!   any UI lifecycle.
//!
//! - **[`SnapshotStore`]** — Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch`): the full local view of which QuickApps exist,
//!   published to subscribers after every mutation.
//!
//! - **[`EventPoller`]** — The long-poll state machine. One logical loop per
//!   poller, a monotonically advancing cursor, fixed backoff on failure,
//!   cooperative cancellation.
//!
//! - **Reconciler** ([`reconcile`]) — Classifies incoming events against an
//!   allow-list and applies the matching store mutation, isolating per-event
//!   failures so one bad event never poisons a batch.
//!
//! The engine never crashes the process on hub trouble; the worst outcome is
//! a prolonged `Disconnected` state with automatic retry.

pub mod error;
pub mod manager;
pub mod model;
pub mod poller;
pub mod reconcile;
pub mod sort;
pub mod store;

pub use error::CoreError;
pub use manager::{ConnectionState, ManagerConfig, QuickAppManager};
pub use model::{CHILD_INTERFACE, MANAGED_INTERFACE, QuickApp};
pub use poller::{EventPoller, PollerState};
pub use sort::{SortColumn, SortDirection};
pub use store::SnapshotStore;
