use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;

use futures::future::FutureExt;
use tokio::sync::mpsc;

use crate::{
    batch_function::BatchFunction,
    batch_key::BatchKey,
    pending_batch::{PendingBatch, Registration},
};

/// A `SchedulerWorker` is the "single-thread" worker task that owns the
/// pending batches and runs the combined fetches.
///
/// Once started, it runs in a loop until the parent `BatchResolver` aborts
/// its `JoinHandle` or drops the registration channel tx.
///
/// The worker can be in one of three states during its lifetime:
///
/// 1. Waiting for registrations.
/// 2. Draining the registration queue and staging calls into pending
///    batches.
/// 3. Flushing the pending batches it staged.
///
/// One cycle through this loop covers one resolution round.
///
/// In state (1), the worker awaits the registration channel, idling until
/// work arrives.
///
/// In state (2), the worker synchronously pulls registrations from the queue
/// until it receives a NoneType indicating that no more are pending. Each
/// registration joins the live pending batch for its batch key, or opens a
/// fresh one if the key has none. Because the worker only wakes after the
/// engine's current round of resolver calls has enqueued its registrations,
/// every sibling call lands in the same batch before anything is fetched.
///
/// In state (3), each staged batch is removed from the pending map and its
/// `BatchFunction` is invoked exactly once with that batch's sources, in
/// registration order; the outcome is fanned back out over the calls'
/// response channels. Registrations that arrive while a flush is running stay
/// queued for the next round and open brand-new batches, even under a key
/// that was just flushed.
pub struct SchedulerWorker<S, V, F>
where
    S: 'static + Send + Sync + Debug,
    V: 'static + Send + Debug,
    F: 'static + BatchFunction<S, V> + Send,
    F::Args: 'static + Send + Sync,
    F::Context: 'static + Send + Sync,
    F::Error: 'static + Send + Clone + Debug,
{
    request_rx: mpsc::UnboundedReceiver<Registration<S, V, F>>,
    pending: HashMap<BatchKey, PendingBatch<S, V, F>>,
    debug_name: &'static str,
}

impl<S, V, F> SchedulerWorker<S, V, F>
where
    S: 'static + Send + Sync + Debug,
    V: 'static + Send + Debug,
    F: 'static + BatchFunction<S, V> + Send,
    F::Args: 'static + Send + Sync,
    F::Context: 'static + Send + Sync,
    F::Error: 'static + Send + Clone + Debug,
{
    pub fn new(request_rx: mpsc::UnboundedReceiver<Registration<S, V, F>>) -> Self {
        Self {
            request_rx,
            pending: HashMap::new(),
            debug_name: std::any::type_name::<(S, V)>(),
        }
    }

    #[tracing::instrument(name = "SchedulerWorker", level = "trace", skip(self), fields(sv = self.debug_name))]
    pub async fn start(mut self) {
        loop {
            // Async await until the first registration of a round arrives.
            match self.request_rx.recv().await {
                None => {
                    tracing::info!("Tx channel closed. Terminating SchedulerWorker.");
                    return;
                }
                Some(registration) => self.stage(registration),
            }
            // Drain the rest of the round's registrations before flushing.
            while let Some(Some(registration)) = self.request_rx.recv().now_or_never() {
                self.stage(registration);
            }
            if !self.pending.is_empty() {
                self.flush_round().await;
            }
        }
    }

    #[tracing::instrument(skip_all, fields(key = ?registration.key, source = ?registration.source))]
    fn stage(&mut self, registration: Registration<S, V, F>) {
        match self.pending.entry(registration.key) {
            Entry::Occupied(mut batch) => batch.get_mut().push(registration),
            Entry::Vacant(slot) => {
                tracing::debug!("opening pending batch");
                slot.insert(PendingBatch::open(registration));
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn flush_round(&mut self) {
        // Every batch leaves the map before its batch function runs, so a
        // later registration under the same key opens a brand-new batch.
        let round = self.pending.drain().collect::<Vec<_>>();
        for (key, batch) in round {
            tracing::debug!(?key, calls = batch.len());
            batch.flush().await;
        }
    }
}
