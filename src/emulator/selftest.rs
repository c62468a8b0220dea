//! Self-test surface.
//!
//! Deterministic sweeps with literal expected values, run before trusting
//! the unit inside a real convolution. A mismatch is reported as a pass/fail
//! diagnostic on stdout, never as an error.

use crate::cfu::isa::*;
use crate::cfu::SoftwareCfu;
use crate::conv::{cfu_conv_per_channel, conv_per_channel, ConvParams, Shape4};

/// ALU sweep over a, b in [-3, 3]: add, sub and mul for every pair.
pub fn run_alu_tests(cfu: &mut SoftwareCfu) -> bool {
  println!("\n=== ALU test ===\n");

  for a in -3i32..=3 {
    for b in -3i32..=3 {
      let add = cfu.execute(FUNCT3_ALU, ALU_ADD, a as u32, b as u32) as i32;
      let sub = cfu.execute(FUNCT3_ALU, ALU_SUB, a as u32, b as u32) as i32;
      let mul = cfu.execute(FUNCT3_ALU, ALU_MUL, a as u32, b as u32) as i32;

      if add != a + b || sub != a - b || mul != a * b {
        println!("*** ALU FAIL a={} b={}", a, b);
        return false;
      }
    }
  }

  println!("ALU TESTS OK");
  true
}

fn check_mac(name: &str, got: i32, expected: i32) -> bool {
  println!("{}: got={} expected={}", name, got, expected);
  if got != expected {
    println!("*** FAIL");
    return false;
  }
  true
}

/// MAC literal cases: simple dot product, accumulation with offset,
/// negative lanes, negative offset.
pub fn run_mac_tests(cfu: &mut SoftwareCfu) -> bool {
  println!("\n=== MAC test suite ===\n");

  println!("[1] simple MAC");
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  let r = cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x02020202) as i32;
  if !check_mac("simple", r, 8) {
    return false;
  }

  println!("\n[2] accumulate + offset");
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 1, 0);
  let r1 = cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32;
  let r2 = cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32;
  if !check_mac("acc 1", r1, 8) {
    return false;
  }
  if !check_mac("acc 2", r2, 16) {
    return false;
  }

  println!("\n[3] negative values");
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  // a = [-1,-2,-3,-4], b = [1,2,3,4]
  let r = cfu.execute(FUNCT3_MAC, MAC_ACC, 0xFCFDFEFF, 0x04030201) as i32;
  if !check_mac("negative", r, -30) {
    return false;
  }

  println!("\n[4] negative offset");
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, (-1i32) as u32, 0);
  let r = cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32;
  if !check_mac("neg offset", r, 0) {
    return false;
  }

  println!("\nMAC TESTS OK");
  true
}

/// Demo convolution: run the accelerated loop and the scalar reference over
/// the same deterministic tensors and compare every output byte.
pub fn run_conv_check(cfu: &mut SoftwareCfu) -> bool {
  println!("\n=== Conv check ===\n");

  let params = ConvParams::new(1, 1, -3);
  let input_shape = Shape4::new(1, 5, 5, 8);
  let filter_shape = Shape4::new(4, 3, 3, 8);
  let output_shape = Shape4::new(1, 5, 5, 4);

  // Deterministic pseudo-random tensor data.
  let mut seed: u32 = 0x13579BDF;
  let mut next = move || {
    seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    (seed >> 24) as u8 as i8
  };
  let input: Vec<i8> = (0..input_shape.flat_size()).map(|_| next()).collect();
  let filter: Vec<i8> = (0..filter_shape.flat_size()).map(|_| next()).collect();
  let bias: Vec<i32> = vec![940, -1200, 17, -3000];
  let output_multiplier: Vec<i32> = vec![1518500250, 1342177280, 1773741824, 1073741824];
  let output_shift: Vec<i32> = vec![-7, -8, -6, -7];

  let mut accel = vec![0i8; output_shape.flat_size()];
  let mut reference = vec![0i8; output_shape.flat_size()];

  if let Err(e) = cfu_conv_per_channel(
    cfu,
    &params,
    &output_multiplier,
    &output_shift,
    &input_shape,
    &input,
    &filter_shape,
    &filter,
    Some(&bias),
    &output_shape,
    &mut accel,
  ) {
    println!("*** CONV FAIL: {}", e);
    return false;
  }
  if let Err(e) = conv_per_channel(
    &params,
    &output_multiplier,
    &output_shift,
    &input_shape,
    &input,
    &filter_shape,
    &filter,
    Some(&bias),
    &output_shape,
    &mut reference,
  ) {
    println!("*** CONV FAIL: {}", e);
    return false;
  }

  for i in 0..accel.len() {
    if accel[i] != reference[i] {
      println!(
        "*** CONV FAIL at index {}: got={} expected={}",
        i, accel[i], reference[i]
      );
      return false;
    }
  }

  println!("CONV CHECK OK ({} output bytes)", accel.len());
  true
}

/// Run the whole acceptance gate.
pub fn run_all(cfu: &mut SoftwareCfu) -> bool {
  let alu = run_alu_tests(cfu);
  let mac = run_mac_tests(cfu);
  let conv = run_conv_check(cfu);
  let ok = alu && mac && conv;
  if ok {
    println!("\nALL TESTS OK");
  } else {
    println!("\n*** SELF-TEST FAILED");
  }
  ok
}
