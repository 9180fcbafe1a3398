use std::sync::OnceLock;

use tracing::Level;

static LOGGING: OnceLock<()> = OnceLock::new();

/// Logs go to stderr so stdout stays clean for `--json` consumers.
/// Safe to call more than once.
pub fn init(verbose: bool) {
    LOGGING.get_or_init(|| {
        let level = if verbose { Level::DEBUG } else { Level::WARN };
        // Also installs the log -> tracing bridge, so log::debug! etc. work
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
