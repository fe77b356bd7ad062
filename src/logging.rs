use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global subscriber used by both binaries.
pub fn init() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}
