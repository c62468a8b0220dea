//! 4-lane multiply-accumulate.

use super::packed;

/// Packed dot product of four signed 8-bit lane pairs:
/// `sum(a[i] * (b[i] + offset))`.
///
/// Only the `b` operand carries the zero-point, reproducing asymmetric
/// quantization where activations are stored as unsigned values biased by
/// the input offset. All arithmetic wraps at 32 bits.
pub fn mac4(a: u32, b: u32, offset: i32) -> i32 {
  let a_lanes = packed::unpack(a);
  let b_lanes = packed::unpack(b);

  let mut sum: i32 = 0;
  for i in 0..4 {
    let ai = a_lanes[i] as i32;
    let bi = b_lanes[i] as i32;
    sum = sum.wrapping_add(ai.wrapping_mul(bi.wrapping_add(offset)));
  }
  sum
}
