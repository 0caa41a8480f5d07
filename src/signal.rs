//! Ctrl+C handling for graceful shutdown.
//!
//! A single `AtomicBool` is shared by the walker, the hasher and the finder.
//! Setting it stops the walk, makes the digest loop bail out between
//! chunks, and ends the run with exit code 130.
//!
//! ```rust,no_run
//! use hashdupe::duplicates::FinderConfig;
//! use hashdupe::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown without a signal.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag, for `FinderConfig::with_shutdown_flag`.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse the installed one.
///
/// `ctrlc` accepts a single handler per process; repeated calls (several
/// `run_app` invocations in one test binary) get the existing handler with
/// its flag reset.
///
/// # Errors
///
/// Returns [`SignalError`] if the OS refuses the handler.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Cleaning up...");
        log::info!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(ctrlc::Error::MultipleHandlers) => {
            // Another thread won the race or a foreign handler is installed
            let handler = GLOBAL_HANDLER.get_or_init(|| {
                log::debug!("Ctrl+C handler already registered, using unhooked handler");
                ShutdownHandler::new()
            });
            handler.reset();
            Ok(handler.clone())
        }
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}
