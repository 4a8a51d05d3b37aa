//! Log output for the CLI.
//!
//! Library crates emit `tracing` events; the binary decides what to show. The filter comes
//! from `LEXIS_LOG` (an `EnvFilter` directive such as `lexis_index=debug`), defaulting to
//! `warn`. `-v` and `-vv` override it with `info` and `debug`.

use std::{env, io};

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "LEXIS_LOG";

/// Filter used when neither `-v` nor `LEXIS_LOG` is given.
const DEFAULT_FILTER: &str = "warn";

/// Picks the filter directive for a verbosity count and the `LEXIS_LOG` value.
pub fn filter_directive(verbose: u8, env_filter: Option<&str>) -> String {
    match (verbose, env_filter) {
        (0, Some(directive)) if !directive.trim().is_empty() => directive.to_string(),
        (0, _) => DEFAULT_FILTER.to_string(),
        (1, _) => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Installs the stderr subscriber.
pub fn init_logging(verbose: u8) {
    let from_env = env::var(LOG_ENV).ok();
    let directive = filter_directive(verbose, from_env.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid {LOG_ENV} filter {directive:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: could not initialize logging: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_environment() {
        assert_eq!(filter_directive(0, None), "warn");
        assert_eq!(filter_directive(0, Some("lexis_index=debug")), "lexis_index=debug");
        assert_eq!(filter_directive(0, Some("  ")), "warn");
        assert_eq!(filter_directive(1, Some("error")), "info");
        assert_eq!(filter_directive(3, None), "debug");
    }
}
