use thiserror::Error;

/// Failure delivered to every call in a batch whose combined fetch did not
/// produce one result per source.
///
/// Both variants are group failures: the scheduler cannot know which subset
/// of a mismatched or failed batch, if any, is individually valid, so the
/// same error reaches every caller. `E` is the batch function's own error
/// type, passed through verbatim rather than wrapped into a generic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError<E> {
    /// The batch function succeeded but returned a result sequence whose
    /// length differs from the number of registered calls.
    #[error("batch result cardinality mismatch: expected {expected}, got {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },
    /// The batch function itself failed.
    #[error("batch function failed: {0}")]
    BatchFunction(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_mismatch_display_names_both_counts() {
        let err: BatchError<String> = BatchError::CardinalityMismatch { expected: 3, actual: 2 };
        assert_eq!(err.to_string(), "batch result cardinality mismatch: expected 3, got 2");
    }

    #[test]
    fn batch_function_display_passes_cause_through() {
        let err = BatchError::BatchFunction("store unreachable".to_owned());
        assert_eq!(err.to_string(), "batch function failed: store unreachable");
    }
}
