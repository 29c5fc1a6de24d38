use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Identity of one field occurrence within a query.
///
/// A `BatchKey` is an opaque token issued exactly once per occurrence, when
/// the engine builds the occurrence's [`ResolveInfo`]. Sibling calls carry the
/// same key because they share the same `ResolveInfo`; every other occurrence
/// gets a different key, even when field name and arguments are textually
/// identical. Keys are compared by this issued identity only, never by
/// inspecting field names or argument values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchKey(u64);

impl BatchKey {
    fn next() -> Self {
        BatchKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Describes the resolver call the execution engine is currently making:
/// which field selection, at which point in the query.
///
/// The engine constructs one `ResolveInfo` per field occurrence and hands a
/// clone of it to every sibling call at that occurrence. Construction issues
/// the occurrence's [`BatchKey`]; cloning preserves it. The field name is
/// carried for diagnostics only and plays no part in batching.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    field_name: String,
    key: BatchKey,
}

impl ResolveInfo {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self { field_name: field_name.into(), key: BatchKey::next() }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn batch_key(&self) -> BatchKey {
        self.key
    }
}
