//! Tracing setup for the `dlid` binary.
//!
//! Library code only emits events; installing a subscriber is left to the
//! binary. Logs go to stderr so that stdout carries transcripts and JSON.
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Only the first call in a
/// process has any effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}

/// Default level for the given verbosity flag.
pub fn level_for(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(true), Level::DEBUG);
        assert_eq!(level_for(false), Level::WARN);
    }

    #[test]
    fn repeated_initialisation_is_ignored() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
        tracing::debug!("still running");
    }
}
