//! Signal handling for interrupted ingestion.
//!
//! SIGINT and SIGTERM set a shared flag. Ingestion stops at the next line and
//! the store is shut down normally, so the swap file never outlives the
//! process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Install signal handlers for graceful shutdown.
///
/// Returns an `Arc<AtomicBool>` that will be set to `true` when a
/// shutdown signal (SIGINT or SIGTERM) is received.
pub fn install_signal_handler() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();

    ctrlc::set_handler(move || {
        if shutdown_flag.swap(true, Ordering::SeqCst) {
            // Second signal - force exit
            tracing::warn!("Received second signal, forcing immediate exit");
            std::process::exit(1);
        }
        tracing::info!("Received shutdown signal, stopping ingestion");
    })
    .expect("Failed to set signal handler");

    shutdown
}
