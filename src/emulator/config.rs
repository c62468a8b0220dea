//! Emulator configuration: TOML file plus CLI overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmulatorSection {
  /// Depth of the input FIFO in packed words.
  #[serde(default = "default_fifo_capacity")]
  pub fifo_capacity: usize,
  #[serde(default)]
  pub quiet: bool,
  /// Instruction trace output path; empty disables tracing.
  #[serde(default)]
  pub trace_file: String,
}

fn default_fifo_capacity() -> usize {
  crate::cfu::fifo::DEFAULT_CAPACITY
}

impl Default for EmulatorSection {
  fn default() -> Self {
    Self {
      fifo_capacity: default_fifo_capacity(),
      quiet: false,
      trace_file: String::new(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub emulator: EmulatorSection,
}

/// Load a configuration from a TOML file.
pub fn load_config_file(path: &Path) -> io::Result<AppConfig> {
  let content = fs::read_to_string(path)
    .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("cannot read config file {:?}: {}", path, e)))?;

  toml::from_str::<AppConfig>(&content)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("failed to parse TOML config: {}", e)))
}

/// Apply CLI parameter overrides on top of the loaded configuration.
pub fn apply_cli_overrides(
  config: &mut AppConfig,
  quiet: bool,
  trace_file: Option<&str>,
  fifo_capacity: Option<usize>,
) {
  if quiet {
    config.emulator.quiet = true;
  }
  if let Some(file) = trace_file {
    config.emulator.trace_file = file.to_string();
  }
  if let Some(capacity) = fifo_capacity {
    config.emulator.fifo_capacity = capacity;
  }
}

/// Validate the configuration.
pub fn validate_config(config: &AppConfig) -> io::Result<()> {
  if config.emulator.fifo_capacity == 0 {
    return Err(io::Error::new(
      io::ErrorKind::InvalidData,
      "fifo_capacity must be greater than 0".to_string(),
    ));
  }
  Ok(())
}
