//! Logging setup for parread.
//!
//! Uses `tracing` macros throughout the crate; this module installs the
//! subscriber. `RUST_LOG` overrides the default filter:
//!
//! ```bash
//! RUST_LOG=parread=debug parread big.log   # plan details
//! RUST_LOG=warn parread big.log            # chunk failures only
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("parread=debug")
        } else {
            EnvFilter::new("parread=info")
        }
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(verbose)
            .with_thread_names(verbose)
            .with_writer(std::io::stderr)
            .compact(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}
