pub mod mock;
pub mod user;

/// Idempotent logger setup shared by the integration tests.
#[allow(dead_code)]
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
