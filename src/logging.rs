//! Tracing setup shared by `loctext` and `loctext-scan`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `LOCTEXT_LOG=loctext::ipc=debug`.
pub const LOG_ENV: &str = "LOCTEXT_LOG";

/// Install the global subscriber, writing to stderr.
///
/// `LOCTEXT_LOG` wins when set and valid; otherwise `verbose` selects
/// between `loctext=debug` and `loctext=warn`. Calling this more than once
/// is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "loctext=debug" } else { "loctext=warn" }
}
