use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use resolve_batch::{BatchFunction, BatchResolver, ResolveInfo};

// Empty functor that implements the BatchFunction trait. For this example, it
// looks film titles up in a shared HashMap, one combined lookup per batch.
struct TitleBatchFn;

#[async_trait]
impl BatchFunction<i64, String> for TitleBatchFn {
    type Args = ();
    type Context = Arc<HashMap<i64, String>>;
    type Error = String;

    async fn resolve(
        sources: &[i64],
        _args: &(),
        context: &Arc<HashMap<i64, String>>,
    ) -> Result<Vec<String>, String> {
        println!("fetching {} titles in one call", sources.len());
        sources
            .iter()
            .map(|id| context.get(id).cloned().ok_or(format!("unknown film {id}")))
            .collect()
    }
}

#[tokio::main]
async fn main() {
    let mut titles = HashMap::new();
    titles.insert(2001, "a space odyssey".to_owned());
    titles.insert(7, "samurai".to_owned());
    titles.insert(12, "angry men".to_owned());
    let titles = Arc::new(titles);

    let resolver = BatchResolver::new(TitleBatchFn {});

    // The engine hands every sibling call at one field occurrence the same
    // ResolveInfo, so all three resolve calls collapse into one fetch.
    let occurrence = ResolveInfo::new("title");
    let (a, b, c) = future::join3(
        resolver.resolve(7, (), titles.clone(), &occurrence),
        resolver.resolve(12, (), titles.clone(), &occurrence),
        resolver.resolve(2001, (), titles.clone(), &occurrence),
    )
    .await;

    assert_eq!(a.as_deref(), Ok("samurai"));
    assert_eq!(b.as_deref(), Ok("angry men"));
    assert_eq!(c.as_deref(), Ok("a space odyssey"));
}
