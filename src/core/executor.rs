// executor.rs - Worker pool construction

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::core::errors::SpamError;

/// Number of workers used when the caller does not ask for a specific count
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Build a shareable worker pool. `None` sizes it to the available hardware
/// parallelism.
pub fn build_pool(threads: Option<usize>) -> Result<Arc<ThreadPool>, SpamError> {
    let num_threads = match threads {
        Some(0) => return Err(SpamError::ThreadPool("thread count must be at least 1".to_string())),
        Some(n) => n,
        None => default_threads(),
    };

    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("spamdist-worker-{}", i))
        .build()
        .map(Arc::new)
        .map_err(|e| SpamError::ThreadPool(e.to_string()))
}
