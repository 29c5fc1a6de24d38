use std::fmt::Debug;
use std::ops::Drop;

use tokio::sync::{mpsc, oneshot};

use crate::{
    batch_function::BatchFunction,
    batch_key::ResolveInfo,
    error::BatchError,
    pending_batch::Registration,
    scheduler_worker::SchedulerWorker,
};

/// Wraps a [`BatchFunction`] into a per-call resolver, collapsing the N-fold
/// fan-out of sibling resolver calls at one field occurrence back into a
/// single combined fetch.
///
/// The execution engine calls [`BatchResolver::resolve`] once per sibling
/// source, passing a clone of the occurrence's [`ResolveInfo`] each time.
/// `resolve` never runs the batch function synchronously: each call registers
/// with the scheduler worker and returns a value that settles once the
/// occurrence's batch is flushed, so the batch function fires exactly once
/// per occurrence no matter how many siblings there are.
///
/// The `BatchResolver` struct acts as an intermediary between the async
/// domain in which `resolve` calls are invoked and the pseudo-single-threaded
/// domain of the `SchedulerWorker`. Callers can invoke the resolver from
/// multiple parallel tasks; registrations are enqueued on the worker's
/// request queue, and the worker stages, flushes, and answers them
/// sequentially via response oneshot channels.
///
/// Create one `BatchResolver` per query execution and pass it through the
/// execution context; sharing one across executions leaks pending state
/// between them. It must only be used where the engine calls the resolver
/// once per sibling source at one field occurrence (a one-to-one source-to-
/// result mapping) — anywhere else the grouping behavior is undefined.
pub struct BatchResolver<S, V, F>
where
    S: 'static + Send + Sync + Debug,
    V: 'static + Send + Debug,
    F: 'static + BatchFunction<S, V> + Send,
    F::Args: 'static + Send + Sync,
    F::Context: 'static + Send + Sync,
    F::Error: 'static + Send + Clone + Debug,
{
    request_tx: mpsc::UnboundedSender<Registration<S, V, F>>,
    worker_handle: tokio::task::JoinHandle<()>,
}

impl<S, V, F> Drop for BatchResolver<S, V, F>
where
    S: 'static + Send + Sync + Debug,
    V: 'static + Send + Debug,
    F: 'static + BatchFunction<S, V> + Send,
    F::Args: 'static + Send + Sync,
    F::Context: 'static + Send + Sync,
    F::Error: 'static + Send + Clone + Debug,
{
    fn drop(&mut self) {
        self.worker_handle.abort();
    }
}

impl<S, V, F> BatchResolver<S, V, F>
where
    S: 'static + Send + Sync + Debug,
    V: 'static + Send + Debug,
    F: 'static + BatchFunction<S, V> + Send,
    F::Args: 'static + Send + Sync,
    F::Context: 'static + Send + Sync,
    F::Error: 'static + Send + Clone + Debug,
{
    /// Creates a new BatchResolver for the provided BatchFunction.
    ///
    /// Note: the batch function is passed in as a marker for type inference.
    pub fn new(_: F) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            request_tx: tx,
            worker_handle: tokio::task::spawn(SchedulerWorker::new(rx).start()),
        }
    }

    /// Resolves the field for one sibling source.
    ///
    /// The batch key is taken from `info`, so calls sharing a `ResolveInfo`
    /// join the same pending batch; the batch's args and context come from
    /// whichever sibling registered first. The returned future settles when
    /// the batch is flushed, with this call's positional result or with the
    /// batch-wide failure.
    pub async fn resolve(
        &self,
        source: S,
        args: F::Args,
        context: F::Context,
        info: &ResolveInfo,
    ) -> Result<V, BatchError<F::Error>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(Registration { key: info.batch_key(), source, args, context, response_tx })
            .unwrap();
        response_rx.await.unwrap()
    }
}
