#![allow(dead_code)]

use std::path::PathBuf;

use quizdeck::config::Config;
use quizdeck::Platform;

pub fn test_data_dir() -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    init_tracing();
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("quizdeck_test_{}_{}", std::process::id(), id));
    // Clean up leftover data from previous runs
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Route log output through the test harness, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn platform_at(dir: PathBuf) -> Platform {
    Platform::open(Config::with_data_dir(dir))
        .await
        .expect("failed to open test platform")
}

pub async fn create_test_platform() -> Platform {
    platform_at(test_data_dir()).await
}
