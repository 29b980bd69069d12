//! Process-wide tracing setup. Library code only emits events; the binary
//! calls [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

/// Map a `-v` count onto a default filter directive.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `verbosity`.
/// Calling this again after a subscriber is installed does nothing.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(1);
        init_logging(2);
        tracing::info!("still alive");
    }
}
