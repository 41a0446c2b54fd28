pub mod fixtures;
pub mod snapshot;

pub use fixtures::TestFixtures;
pub use snapshot::SnapshotComparator;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("vtty=debug,vtty_terminal=debug")),
            )
            .with_test_writer()
            .init();
    });
}
