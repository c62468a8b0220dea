//! Accelerator register file.
//!
//! Scalar state shared by the MAC and quantization units. Every register is a
//! signed 32-bit value with two's-complement wraparound, matching the width
//! of the hardware registers. State persists across instructions until an
//! explicit clear; nothing is reset implicitly on read.

#[derive(Debug, Clone, Default)]
pub struct RegFile {
  /// Zero-point added to each weight lane before the multiply.
  pub offset: i32,
  /// Running MAC sum.
  pub acc: i32,

  // Quantization parameters, one set per output channel.
  pub qnt_bias: i32,
  /// Q31 fixed-point multiplier.
  pub qnt_mul: i32,
  /// Positive = pre-multiply left shift, non-positive = post-multiply right shift.
  pub qnt_shift: i32,
  pub qnt_offset: i32,
  pub qnt_min: i32,
  pub qnt_max: i32,
}

impl RegFile {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn clear_acc(&mut self) {
    self.acc = 0;
  }

  /// Add `delta` into the accumulator, wrapping at 32 bits.
  pub fn accumulate(&mut self, delta: i32) -> i32 {
    self.acc = self.acc.wrapping_add(delta);
    self.acc
  }
}
