mod batch_function;
mod batch_key;
mod error;
mod pending_batch;
mod resolver;
mod scheduler_worker;

pub use batch_function::BatchFunction;
pub use batch_key::{BatchKey, ResolveInfo};
pub use error::BatchError;
pub use resolver::BatchResolver;
