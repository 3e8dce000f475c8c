use tracing_subscriber::EnvFilter;

use crate::flags::Flags;

/// Installs the global subscriber. Logs go to stderr; stdout is reserved for the session.
pub fn init(flags: &Flags) {
    let default_level = if flags.debug {
        "debug"
    } else if flags.quiet {
        "error"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
