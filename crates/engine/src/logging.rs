//! Log bootstrap for hosts that do not install their own subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber that logs the khata crates at `level`.
///
/// Returns `false` when a global subscriber was already installed (by the
/// host or an earlier call); the existing one is kept.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("khata_engine={level},khata_advisor={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
