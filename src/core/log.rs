use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "fxrates";

/// Filter for the crate's own spans and events: debug with `--verbose`,
/// silent otherwise. Dependencies such as reqwest and hyper stay quiet.
pub fn app_targets(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Targets::new().with_target(APP_TARGET, level)
}

/// `RUST_LOG` wins when set; otherwise mirror the verbose flag.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "off" }))
}

/// Installs the global subscriber, writing to stderr so table and JSON
/// output on stdout stay clean.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_targets(verbose))
        .with(env_filter(verbose))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_verbose_enables_app_debug() {
        let targets = app_targets(true);
        assert!(targets.would_enable("fxrates::providers::nbu", &Level::DEBUG));
        assert!(!targets.would_enable("fxrates::core", &Level::TRACE));
        assert!(!targets.would_enable("reqwest::connect", &Level::DEBUG));
    }

    #[test]
    fn test_quiet_by_default() {
        let targets = app_targets(false);
        assert!(!targets.would_enable("fxrates::core::aggregate", &Level::ERROR));
    }
}
