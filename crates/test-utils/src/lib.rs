pub mod builders;
pub mod fake_control_plane;

pub use fake_control_plane::{Call, FakeControlPlane, LaunchScript};

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Time limit applied by [`with_timeout`].
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialise tracing for tests.
///
/// Logs go through the test writer, so they only show up for failing tests
/// (or with `-- --nocapture`). `RUST_LOG` overrides the default of `debug`
/// for `ecsrun` and `warn` for everything else.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,ecsrun=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_time_limit(DEFAULT_TEST_TIMEOUT, f).await
}

/// Run a future with an explicit time limit.
///
/// Under `start_paused` the limit is measured on the paused clock, so it
/// must exceed the simulated waits of the test.
pub async fn with_time_limit<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, f)
        .await
        .unwrap_or_else(|_| panic!("test did not finish within {limit:?}"))
}
