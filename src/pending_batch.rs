use std::fmt::Debug;

use tokio::sync::oneshot;

use crate::{batch_function::BatchFunction, batch_key::BatchKey, error::BatchError};

/// What each registered call eventually receives on its response channel.
pub type CallResult<V, E> = Result<V, BatchError<E>>;

/// One resolver call handed to the scheduler worker: the batch key derived
/// from the call's `ResolveInfo`, the source item, the call's args and
/// context values, and the oneshot on which the caller awaits its result.
pub struct Registration<S, V, F>
where
    F: BatchFunction<S, V>,
{
    pub key: BatchKey,
    pub source: S,
    pub args: F::Args,
    pub context: F::Context,
    pub response_tx: oneshot::Sender<CallResult<V, F::Error>>,
}

/// The accumulating, not-yet-flushed group of sibling calls for one batch
/// key.
///
/// Sources and response channels are kept in registration order and never
/// reordered; the args and context are the ones captured from the first call,
/// which by contract every sibling shares.
pub struct PendingBatch<S, V, F>
where
    F: BatchFunction<S, V>,
{
    sources: Vec<S>,
    args: F::Args,
    context: F::Context,
    calls: Vec<oneshot::Sender<CallResult<V, F::Error>>>,
}

impl<S, V, F> PendingBatch<S, V, F>
where
    F: BatchFunction<S, V>,
{
    /// Opens a fresh batch from the registration that created it.
    pub fn open(registration: Registration<S, V, F>) -> Self {
        let Registration { source, args, context, response_tx, .. } = registration;
        Self { sources: vec![source], args, context, calls: vec![response_tx] }
    }

    /// Appends a sibling call. Its position is fixed here, at registration
    /// time; the later call's own args and context are dropped in favor of
    /// the batch's.
    pub fn push(&mut self, registration: Registration<S, V, F>) {
        self.sources.push(registration.source);
        self.calls.push(registration.response_tx);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Invokes the batch function exactly once for this batch and fans the
    /// outcome back out to every registered call.
    pub async fn flush(self)
    where
        V: Debug,
        F::Error: Clone + Debug,
    {
        let Self { sources, args, context, calls } = self;
        let outcome = F::resolve(&sources, &args, &context).await;
        distribute(calls, outcome);
    }
}

/// Delivers a batch outcome positionally.
///
/// A result sequence of matching length sends `values[i]` to call `i`. A
/// mismatched length fails every call with the expected and actual counts,
/// and a batch-function failure is cloned to every call verbatim. A caller
/// that dropped its receiver is logged and skipped; the rest of the batch is
/// unaffected.
pub fn distribute<V, E>(calls: Vec<oneshot::Sender<CallResult<V, E>>>, outcome: Result<Vec<V>, E>)
where
    V: Debug,
    E: Clone + Debug,
{
    match outcome {
        Ok(values) if values.len() == calls.len() => {
            for (call, value) in calls.into_iter().zip(values) {
                send(call, Ok(value));
            }
        }
        Ok(values) => {
            let failure =
                BatchError::CardinalityMismatch { expected: calls.len(), actual: values.len() };
            for call in calls {
                send(call, Err(failure.clone()));
            }
        }
        Err(cause) => {
            for call in calls {
                send(call, Err(BatchError::BatchFunction(cause.clone())));
            }
        }
    }
}

fn send<V, E>(call: oneshot::Sender<CallResult<V, E>>, result: CallResult<V, E>)
where
    V: Debug,
    E: Debug,
{
    if let Err(e) = call.send(result) {
        tracing::error!(?e, "receiver dropped");
    }
}
