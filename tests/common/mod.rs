// tests/common/mod.rs

#![allow(dead_code)]

pub use taskexec_test_utils::init_tracing;

use std::time::Duration;

/// Poll until `cond` holds, panicking after 3 seconds.
///
/// The runtime under test reports through channels, so assertions on
/// recorded updates need a small settling window instead of a fixed sleep.
pub async fn wait_until(cond: impl Fn() -> bool, what: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while !cond() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
