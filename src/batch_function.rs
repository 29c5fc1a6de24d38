use async_trait::async_trait;

/// A `BatchFunction` performs the single combined fetch for one batch of
/// sibling resolver calls. It receives every source value registered for one
/// field occurrence, in registration order, together with the argument record
/// and context value shared by those calls (captured from the first call that
/// opened the batch).
///
/// The contract is strictly positional: on success the returned sequence must
/// contain exactly one value per source, with `result[i]` belonging to
/// `sources[i]`. A sequence of any other length fails the whole batch with a
/// cardinality-mismatch error. To report a domain-level failure for a single
/// source while its siblings succeed, encode it as a value at that position
/// (e.g. an `Option` or a tagged result type); the scheduler passes such
/// values through unexamined.
///
/// On `Err`, the failure value is delivered verbatim to every call in the
/// batch, which is why the worker requires `Error: Clone`. There is no retry
/// and no partial recovery.
#[async_trait]
pub trait BatchFunction<S, V> {
    type Args;
    type Context;
    type Error;

    async fn resolve(
        sources: &[S],
        args: &Self::Args,
        context: &Self::Context,
    ) -> Result<Vec<V>, Self::Error>;
}
