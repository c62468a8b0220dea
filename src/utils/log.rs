//! Logging setup.

use env_logger::Env;

/// Initialize env_logger once; later calls are no-ops so tests can call
/// this freely.
pub fn init_log() {
  let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .format_timestamp(None)
    .try_init();
}
