pub mod counting;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

pub use counting::CountingTarget;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Receive every remaining notification until the channel closes.
///
/// Fails if the channel is still open after 5 seconds.
pub async fn drain(rx: &mut tokio::sync::mpsc::Receiver<()>) -> anyhow::Result<usize> {
    let mut count = 0;
    loop {
        match tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv()).await {
            Ok(Some(())) => count += 1,
            Ok(None) => return Ok(count),
            Err(_) => anyhow::bail!("notification channel still open after 5 seconds"),
        }
    }
}
