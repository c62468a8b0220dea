//! Interactive shell.
//!
//! Small menu loop over the self-test surface, in the spirit of the serial
//! project menu the unit ships with on hardware.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Result};

use super::selftest;
use crate::cfu::SoftwareCfu;

fn print_menu() {
  println!("Project Menu");
  println!("  a - run ALU tests");
  println!("  m - run MAC tests");
  println!("  c - run conv check");
  println!("  t - run all tests");
  println!("  h - help");
  println!("  q - quit");
}

pub fn run(cfu: &mut SoftwareCfu) -> Result<()> {
  let mut editor = DefaultEditor::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

  print_menu();

  loop {
    match editor.readline("(imgc) ") {
      Ok(line) => {
        let trimmed = line.trim();

        if !trimmed.is_empty() {
          let _ = editor.add_history_entry(trimmed);
        }

        match trimmed {
          "" => {},
          "a" => {
            selftest::run_alu_tests(cfu);
          },
          "m" => {
            selftest::run_mac_tests(cfu);
          },
          "c" => {
            selftest::run_conv_check(cfu);
          },
          "t" => {
            selftest::run_all(cfu);
          },
          "h" => print_menu(),
          "q" => return Ok(()),
          other => {
            eprintln!("Unknown command: '{}'. Use 'h' for the menu, 'q' to quit", other);
          },
        }
      },
      Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
        // Ctrl-C / Ctrl-D: quit
        return Ok(());
      },
      Err(err) => {
        return Err(io::Error::new(io::ErrorKind::Other, err));
      },
    }
  }
}
