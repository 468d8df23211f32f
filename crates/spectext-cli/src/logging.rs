//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;

/// Maps `-v` repetitions to a log level: warnings by default, then info, then debug.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Installs a compact stderr subscriber. Does nothing if one is already set.
pub fn setup_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(9), Level::DEBUG);
    }

    #[test]
    fn test_setup_twice_is_harmless() {
        setup_logging(0);
        setup_logging(2);
    }
}
