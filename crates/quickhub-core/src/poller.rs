// ── Long-poll state machine ──
//
// One logical loop per poller: request, reconcile, immediately re-poll.
// The server itself blocks up to its advertised window when nothing is
// new, so the loop idles inside the HTTP call. Failures take a fixed
// backoff and loop again; nothing here is ever fatal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use quickhub_api::HubClient;
use quickhub_api::events::SERVER_WAIT_SECS;

use crate::reconcile::Reconciler;
use crate::store::SnapshotStore;

/// Observable poller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Never started.
    Idle,
    /// Awaiting or processing a long-poll response.
    Polling,
    /// Delayed retry after a failed iteration.
    Backoff,
    /// Explicitly stopped.
    Stopped,
}

/// Timing knobs for the poll loop.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Fixed delay before retrying after a failed iteration.
    pub backoff: Duration,
    /// How long the server is asked to hold each poll open, in seconds.
    pub server_wait_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_millis(5000),
            server_wait_secs: SERVER_WAIT_SECS,
        }
    }
}

/// Drives the continuous long-poll loop against the hub's event stream.
///
/// At most one loop is active per poller: [`start()`](Self::start) while a
/// loop is live is a no-op. [`stop()`](Self::stop) is cooperative — an
/// in-flight request completes and its result is discarded without
/// processing. The cursor survives stop/start, so a restarted poller
/// resumes where the previous loop left off.
pub struct EventPoller {
    client: HubClient,
    store: Arc<SnapshotStore>,
    config: PollerConfig,
    cursor: Arc<AtomicU64>,
    state: Arc<watch::Sender<PollerState>>,
    /// Bumped on every spawn; a superseded loop stops publishing state.
    generation: Arc<AtomicU64>,
    task: Mutex<Option<PollTask>>,
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl EventPoller {
    pub fn new(client: HubClient, store: Arc<SnapshotStore>) -> Self {
        Self::with_config(client, store, PollerConfig::default())
    }

    pub fn with_config(client: HubClient, store: Arc<SnapshotStore>, config: PollerConfig) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            client,
            store,
            config,
            cursor: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Start the poll loop. Idempotent: a second call while a loop is
    /// live (polling or backing off) does nothing.
    pub fn start(&self) {
        let Ok(mut guard) = self.task.lock() else {
            return;
        };
        if let Some(task) = guard.as_ref() {
            if !task.cancel.is_cancelled() && !task.handle.is_finished() {
                debug!("poller already running, ignoring start");
                return;
            }
        }

        info!("starting event poll loop");
        let cancel = CancellationToken::new();
        let loop_task = PollLoop {
            client: self.client.clone(),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            cursor: Arc::clone(&self.cursor),
            state: Arc::clone(&self.state),
            cancel: cancel.clone(),
            generation: Arc::clone(&self.generation),
            // A previous cancelled loop may still be draining its final
            // request; bumping the generation silences its state sends.
            my_generation: self.generation.fetch_add(1, Ordering::AcqRel) + 1,
        };
        let handle = tokio::spawn(loop_task.run());
        *guard = Some(PollTask { cancel, handle });
    }

    /// Request the loop to stop before its next iteration.
    ///
    /// Advisory: an in-flight request is not aborted; its response is
    /// discarded once it lands.
    pub fn stop(&self) {
        let Ok(guard) = self.task.lock() else {
            return;
        };
        if let Some(task) = guard.as_ref() {
            info!("stopping event poll loop");
            task.cancel.cancel();
        }
        let _ = self.state.send(PollerState::Stopped);
    }

    /// Whether a poll loop is currently live (started and not stopped).
    pub fn is_running(&self) -> bool {
        self.task.lock().is_ok_and(|guard| {
            guard
                .as_ref()
                .is_some_and(|task| !task.cancel.is_cancelled() && !task.handle.is_finished())
        })
    }

    /// The last event sequence number observed.
    pub fn cursor(&self) -> u64 {
        self.cursor.load(Ordering::Acquire)
    }

    /// Subscribe to poller state transitions.
    pub fn state(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }
}

/// One spawned instance of the loop. Exits only on cancellation.
struct PollLoop {
    client: HubClient,
    store: Arc<SnapshotStore>,
    config: PollerConfig,
    cursor: Arc<AtomicU64>,
    state: Arc<watch::Sender<PollerState>>,
    cancel: CancellationToken,
    generation: Arc<AtomicU64>,
    my_generation: u64,
}

impl PollLoop {
    /// Publish a state transition unless a newer loop superseded this one.
    fn set_state(&self, state: PollerState) {
        if self.generation.load(Ordering::Acquire) == self.my_generation {
            let _ = self.state.send(state);
        }
    }

    async fn run(self) {
        let reconciler = Reconciler::new(self.client.clone(), Arc::clone(&self.store));
        self.set_state(PollerState::Polling);

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let last = self.cursor.load(Ordering::Acquire);
            match self
                .client
                .refresh_states(last, self.config.server_wait_secs)
                .await
            {
                Ok(batch) => {
                    if self.cancel.is_cancelled() {
                        // Stopped while the request was in flight; the
                        // response is discarded without processing.
                        break;
                    }
                    if let Some(new_last) = batch.last {
                        // Advance only on strictly greater values; stale
                        // or duplicate responses never move the cursor
                        // back.
                        self.cursor.fetch_max(new_last, Ordering::AcqRel);
                    }
                    if !batch.events.is_empty() {
                        debug!(count = batch.events.len(), "reconciling event batch");
                        reconciler.apply_batch(&batch.events).await;
                    }
                    // Immediately re-poll: continuous long poll.
                }
                Err(e) => {
                    warn!(error = %e, "poll iteration failed, backing off");
                    self.set_state(PollerState::Backoff);
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => break,
                        () = tokio::time::sleep(self.config.backoff) => {}
                    }
                    self.set_state(PollerState::Polling);
                }
            }
        }

        self.set_state(PollerState::Stopped);
    }
}
