//! Shared background runtime.
//!
//! Front-ends without their own async context (FFI, CLI) run the controller's
//! writer and observer tasks here. The runtime is created lazily on first use
//! and lives for the rest of the process.

use once_cell::sync::OnceCell;
use tokio::runtime::{Handle, Runtime};

const WORKER_THREADS: usize = 2;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Returns a handle to the process-wide runtime, creating it if needed.
pub fn handle() -> std::io::Result<Handle> {
    let runtime = RUNTIME.get_or_try_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("jotter-bg")
            .enable_all()
            .build()
    })?;
    Ok(runtime.handle().clone())
}
