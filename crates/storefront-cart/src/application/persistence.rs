//! Persistence bridge between the cart store and durable storage.
//!
//! At startup the saved snapshot is loaded into the store exactly once
//! (`hydrate`). Afterwards a single background task writes the latest
//! snapshot whenever the store changes (`spawn_persister`). The task only
//! ever reads the newest value from the watch channel and awaits each write
//! before the next one, so writes land in revision order and bursts of
//! changes coalesce into one write.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::error::DomainError;
use storefront_core::storage::SnapshotStorage;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::application::store::{CartSnapshot, CartStore};
use crate::domain::aggregates::{Cart, CartLineItem};

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "@cart_items";

/// How long startup waits for the saved snapshot before giving up.
pub const DEFAULT_HYDRATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the persistence bridge.
#[derive(Debug, Clone)]
pub struct PersistenceSettings {
    /// Storage key of the snapshot.
    pub key: String,
    /// Upper bound on the startup read.
    pub hydration_timeout: Duration,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            key: CART_STORAGE_KEY.to_owned(),
            hydration_timeout: DEFAULT_HYDRATION_TIMEOUT,
        }
    }
}

/// How the startup load went. In every case the store ends up ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// A saved cart was installed.
    Restored {
        /// Number of line items restored.
        items: usize,
    },
    /// Nothing was saved; the cart starts empty.
    Empty,
    /// The snapshot could not be read or decoded; the cart starts empty.
    Recovered {
        /// Why the snapshot was discarded.
        reason: String,
    },
}

/// Serializes the cart's line items.
///
/// # Errors
///
/// Returns `DomainError::MalformedSnapshot` if serialization fails.
pub fn encode_snapshot(cart: &Cart) -> Result<String, DomainError> {
    serde_json::to_string(cart.items())
        .map_err(|e| DomainError::MalformedSnapshot(format!("snapshot encoding failed: {e}")))
}

/// Parses a stored snapshot back into a cart.
///
/// # Errors
///
/// Returns `DomainError::MalformedSnapshot` if the blob is not a list of line
/// items or violates the cart invariants.
pub fn decode_snapshot(blob: &str) -> Result<Cart, DomainError> {
    let items: Vec<CartLineItem> = serde_json::from_str(blob)
        .map_err(|e| DomainError::MalformedSnapshot(format!("snapshot decoding failed: {e}")))?;
    Cart::from_items(items)
}

/// Loads the saved cart into `store` and marks it ready.
///
/// Read failures, timeouts and malformed snapshots are logged once and
/// recovered from with an empty cart; they never abort startup. Returns the
/// outcome together with the revision at which the store became ready.
#[instrument(skip(store, storage, settings), fields(key = %settings.key))]
pub async fn hydrate(
    store: &CartStore,
    storage: &dyn SnapshotStorage,
    settings: &PersistenceSettings,
) -> (HydrationOutcome, u64) {
    let read = match tokio::time::timeout(settings.hydration_timeout, storage.read(&settings.key))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(DomainError::Storage(format!(
            "snapshot read timed out after {:?}",
            settings.hydration_timeout
        ))),
    };

    let decoded = read.and_then(|blob| match blob {
        Some(blob) if !blob.trim().is_empty() => decode_snapshot(&blob).map(Some),
        _ => Ok(None),
    });

    let (cart, outcome) = match decoded {
        Ok(Some(cart)) => {
            let items = cart.len();
            (cart, HydrationOutcome::Restored { items })
        }
        Ok(None) => (Cart::new(), HydrationOutcome::Empty),
        Err(err) => {
            warn!(error = %err, "failed to load saved cart, starting empty");
            (
                Cart::new(),
                HydrationOutcome::Recovered {
                    reason: err.to_string(),
                },
            )
        }
    };

    let ready_revision = store.complete_hydration(cart);
    info!(?outcome, ready_revision, "cart hydrated");
    (outcome, ready_revision)
}

/// Handle to the background persist task.
///
/// Dropping the handle stops the task after a final flush.
#[derive(Debug)]
pub struct Persister {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Persister {
    /// Writes the latest snapshot if it has not been written yet, then stops
    /// the task.
    pub async fn shutdown(self) {
        let Self { stop, task } = self;
        // The task may already have exited because the store was dropped.
        let _ = stop.send(());
        if let Err(err) = task.await {
            warn!(error = %err, "cart persister ended abnormally");
        }
    }
}

/// Starts the task that writes every revision newer than `baseline_revision`.
///
/// Pass the revision returned by [`hydrate`] so that the hydrated state and
/// anything dispatched while hydrating are never written back.
pub fn spawn_persister(
    store: &CartStore,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    baseline_revision: u64,
) -> Persister {
    let receiver = store.subscribe();
    let (stop, stopped) = oneshot::channel();
    let task = tokio::spawn(run_persister(
        receiver,
        storage,
        key,
        baseline_revision,
        stopped,
    ));
    Persister { stop, task }
}

/// Hydrates `store`, then starts persisting it.
pub async fn bootstrap(
    store: &CartStore,
    storage: Arc<dyn SnapshotStorage>,
    settings: &PersistenceSettings,
) -> (HydrationOutcome, Persister) {
    let (outcome, ready_revision) = hydrate(store, storage.as_ref(), settings).await;
    let persister = spawn_persister(store, storage, settings.key.clone(), ready_revision);
    (outcome, persister)
}

async fn run_persister(
    mut receiver: watch::Receiver<CartSnapshot>,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    mut last_written: u64,
    mut stopped: oneshot::Receiver<()>,
) {
    // Pick up anything that changed between readiness and subscription.
    receiver.mark_changed();
    loop {
        tokio::select! {
            biased;
            _ = &mut stopped => {
                persist_latest(&mut receiver, storage.as_ref(), &key, &mut last_written).await;
                break;
            }
            changed = receiver.changed() => {
                persist_latest(&mut receiver, storage.as_ref(), &key, &mut last_written).await;
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!(last_written, "cart persister stopped");
}

async fn persist_latest(
    receiver: &mut watch::Receiver<CartSnapshot>,
    storage: &dyn SnapshotStorage,
    key: &str,
    last_written: &mut u64,
) {
    let snapshot = receiver.borrow_and_update().clone();
    if !snapshot.is_ready() || snapshot.revision <= *last_written {
        return;
    }

    let blob = match encode_snapshot(&snapshot.cart) {
        Ok(blob) => blob,
        Err(err) => {
            warn!(error = %err, revision = snapshot.revision, "failed to encode cart snapshot");
            return;
        }
    };

    match storage.write(key, &blob).await {
        Ok(()) => {
            *last_written = snapshot.revision;
            debug!(revision = snapshot.revision, "persisted cart snapshot");
        }
        // The in-memory cart stays authoritative; the next change retries.
        Err(err) => {
            warn!(error = %err, revision = snapshot.revision, "failed to persist cart snapshot");
        }
    }
}
