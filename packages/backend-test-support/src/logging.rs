//! One-time tracing setup for unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Installs a test-writer subscriber. Idempotent; never panics if another
/// subscriber won the race.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
///
/// ```bash
/// TEST_LOG=werewolf_backend=debug cargo test -p werewolf-backend
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
