#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route library diagnostics to the test output; `RUST_LOG=sciset_view=debug`
/// shows growth and materialization events.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Row-major reference values `0, 1, 2, ...` for `shape`.
pub fn counting(shape: &[usize]) -> Vec<f64> {
    (0..shape.iter().product::<usize>()).map(|i| i as f64).collect()
}
