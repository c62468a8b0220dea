//! Per-channel integer requantization.
//!
//! Rescales the wide accumulator back into the 8-bit output range:
//! `q_out = clamp(offset + round(acc * (mul / 2^31) * 2^shift), min, max)`.
//! The arithmetic must stay bit-identical to the TFLite / gemmlowp
//! fixed-point reference; a one-LSB deviation changes the classification
//! output of a downstream network.

use super::regfile::RegFile;

/// Saturating rounding doubling high multiply of two Q31 values
/// (`gemmlowp::SaturatingRoundingDoublingHighMul`).
fn saturating_rounding_doubling_high_mul(a: i32, b: i32) -> i32 {
  // -1 * -1 in Q31 is the one overflow of the representable range.
  if a == i32::MIN && b == i32::MIN {
    return i32::MAX;
  }
  let ab = a as i64 * b as i64;
  let nudge: i64 = if ab >= 0 { 1 << 30 } else { 1 - (1 << 30) };
  ((ab + nudge) / (1i64 << 31)) as i32
}

/// Round-to-nearest divide by `2^exponent`
/// (`gemmlowp::RoundingDivideByPOT`). Ties round away from zero.
///
/// The wire accepts any shift register value, so exponents past 31 clamp to
/// 31 (gemmlowp's domain); the mask is built in i64 because `1 << 31`
/// overflows i32.
fn rounding_divide_by_pot(x: i32, exponent: i32) -> i32 {
  if exponent <= 0 {
    return x;
  }
  let exponent = exponent.min(31) as u32;
  let mask = ((1i64 << exponent) - 1) as i32;
  let remainder = x & mask;
  let threshold = (mask >> 1) + if x < 0 { 1 } else { 0 };
  (x >> exponent) + if remainder > threshold { 1 } else { 0 }
}

/// `tflite::MultiplyByQuantizedMultiplier`: apply a Q31 multiplier and a
/// signed power-of-two shift to a 32-bit accumulator.
pub fn multiply_by_quantized_multiplier(x: i32, quantized_multiplier: i32, shift: i32) -> i32 {
  let left_shift = if shift > 0 { shift } else { 0 };
  // unsigned_abs keeps shift = i32::MIN from overflowing on negation.
  let right_shift = if shift > 0 { 0 } else { shift.unsigned_abs().min(31) as i32 };
  // A wrapping left shift of 32 or more clears every bit.
  let shifted = if left_shift >= 32 { 0 } else { x.wrapping_shl(left_shift as u32) };
  let scaled = saturating_rounding_doubling_high_mul(shifted, quantized_multiplier);
  rounding_divide_by_pot(scaled, right_shift)
}

/// Requantize the current accumulator using the quantization registers.
/// Pure function of register state; the registers are left untouched.
pub fn requantize(regs: &RegFile) -> i32 {
  let acc = regs.acc.wrapping_add(regs.qnt_bias);
  let mut scaled = multiply_by_quantized_multiplier(acc, regs.qnt_mul, regs.qnt_shift);
  scaled = scaled.wrapping_add(regs.qnt_offset);
  scaled.clamp(regs.qnt_min, regs.qnt_max)
}
