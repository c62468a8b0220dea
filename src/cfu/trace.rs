//! Instruction trace.
//!
//! Optional JSON-lines record of every executed instruction, useful when
//! diffing the software unit against a hardware run.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
  pub funct3: u32,
  pub funct7: u32,
  pub in0: u32,
  pub in1: u32,
  pub result: u32,
}

pub struct Tracer {
  writer: BufWriter<File>,
  truncated: bool,
}

impl Tracer {
  pub fn create(path: &Path) -> io::Result<Self> {
    let file = File::create(path)?;
    Ok(Self {
      writer: BufWriter::new(file),
      truncated: false,
    })
  }

  /// Append one record. The first failed write marks the trace truncated;
  /// later records are dropped so the file never has a gap in the middle.
  pub fn record(&mut self, record: &TraceRecord) {
    if self.truncated {
      return;
    }
    let line = match serde_json::to_string(record) {
      Ok(line) => line,
      Err(err) => {
        log::warn!("trace record serialization failed, trace is truncated: {}", err);
        self.truncated = true;
        return;
      },
    };
    if let Err(err) = writeln!(self.writer, "{}", line) {
      log::warn!("trace write failed, trace is truncated: {}", err);
      self.truncated = true;
    }
  }

  pub fn is_truncated(&self) -> bool {
    self.truncated
  }

  pub fn flush(&mut self) -> io::Result<()> {
    if self.truncated {
      return Err(io::Error::new(io::ErrorKind::Other, "instruction trace is truncated"));
    }
    self.writer.flush()
  }
}
