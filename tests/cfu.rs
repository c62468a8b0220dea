//! Wire-level tests through the instruction interface, the only boundary a
//! hardware backend shares with this software model.

use imgc::cfu::isa::*;
use imgc::SoftwareCfu;

#[test]
fn mac_literal_cases() {
  let mut cfu = SoftwareCfu::new();

  // Simple: [1,1,1,1] . [2,2,2,2] = 8
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x02020202) as i32, 8);

  // Accumulation with offset 1: 8 then 16.
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 1, 0);
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32, 8);
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32, 16);

  // Negative lanes: [-1,-2,-3,-4] . [1,2,3,4] = -30
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0xFCFDFEFF, 0x04030201) as i32, -30);

  // Negative offset: [1,1,1,1] . ([1,1,1,1] - 1) = 0
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, (-1i32) as u32, 0);
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101) as i32, 0);
}

#[test]
fn fifo_replay_round_trip() {
  let mut cfu = SoftwareCfu::new();
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);

  // Four words: lanes [1..], [2..], [3..], [4..]
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x01010101, 0x02020202);
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x03030303, 0x04040404);
  assert_eq!(cfu.fifo_len(), 4);

  // Replaying all four entries against [1,1,1,1] sums 4*(1+2+3+4) = 40.
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101);
  let first = cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101) as i32;
  assert_eq!(first, 40);
  assert_eq!(cfu.fifo_len(), 4);

  // The replay restored content and order, so a second full pass is
  // identical. This is what lets one window load serve every channel.
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101);
  let second = cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101) as i32;
  assert_eq!(second, first);
}

#[test]
fn fifo_bounded_push_drops_silently() {
  let mut cfu = SoftwareCfu::with_fifo_capacity(4);
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);

  // Six pushes into a 4-deep FIFO: the last two are dropped, no error.
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x01010101, 0x01010101);
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x01010101, 0x01010101);
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x7F7F7F7F, 0x7F7F7F7F);
  assert_eq!(cfu.fifo_len(), 4);

  // All four surviving entries are the [1,1,1,1] words.
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101);
  let acc = cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, 0x01010101, 0x01010101) as i32;
  assert_eq!(acc, 16);
}

#[test]
fn fifo_clear_is_independent_of_accumulator() {
  let mut cfu = SoftwareCfu::new();
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x01010101, 0x01010101);
  cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101);

  cfu.execute(FUNCT3_MAC, MAC_CLEAR_INPUT_VALS, 0, 0);
  assert_eq!(cfu.fifo_len(), 0);
  // Accumulator survives the FIFO clear.
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0, 0) as i32, 4);

  // And clearing the accumulator does not refill the FIFO.
  cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, 0x01010101, 0x01010101);
  cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);
  assert_eq!(cfu.fifo_len(), 2);
}

#[test]
fn quantization_through_the_wire() {
  let mut cfu = SoftwareCfu::new();

  let set = |cfu: &mut SoftwareCfu, bias: i32, mul: i32, shift: i32, offset: i32, min: i32, max: i32| {
    cfu.execute(FUNCT3_QNT, QNT_SET_BIAS, bias as u32, 0);
    cfu.execute(FUNCT3_QNT, QNT_SET_MUL, mul as u32, 0);
    cfu.execute(FUNCT3_QNT, QNT_SET_SHIFT, shift as u32, 0);
    cfu.execute(FUNCT3_QNT, QNT_SET_OFFSET, offset as u32, 0);
    cfu.execute(FUNCT3_QNT, QNT_SET_MIN, min as u32, 0);
    cfu.execute(FUNCT3_QNT, QNT_SET_MAX, max as u32, 0);
  };

  // acc = 256 via 64 unit MACs; 256 * (2^30/2^31) * 2^-1 = 64.
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  for _ in 0..64 {
    cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101);
  }
  set(&mut cfu, 0, 1 << 30, -1, 0, -128, 127);
  assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 64);

  // Bias pushes the result one step: (256 + 2) is still 64 after
  // rounding, (256 + 256) doubles it.
  set(&mut cfu, 256, 1 << 30, -1, 0, -128, 127);
  assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 127); // 128 clamped

  // Output offset shifts after the rescale.
  set(&mut cfu, 0, 1 << 30, -1, -10, -128, 127);
  assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 54);

  // Clamp window narrower than the result.
  set(&mut cfu, 0, 1 << 30, -1, 0, -5, 5);
  assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 5);
}

#[test]
fn quantization_with_extreme_shifts() {
  // Small per-channel scales push output_shift toward -31, and nothing at
  // the wire stops a driver writing past that. QNT_GET must return a value
  // for the whole shift range.
  let mut cfu = SoftwareCfu::new();
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 0, 0);
  for _ in 0..64 {
    cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101);
  }

  // acc = 256; 256 * (2^30/2^31) * 2^-31 rounds to 0, offset 5 lands on 5.
  cfu.execute(FUNCT3_QNT, QNT_SET_BIAS, 0, 0);
  cfu.execute(FUNCT3_QNT, QNT_SET_MUL, 1 << 30, 0);
  cfu.execute(FUNCT3_QNT, QNT_SET_OFFSET, 5, 0);
  cfu.execute(FUNCT3_QNT, QNT_SET_MIN, (-128i32) as u32, 0);
  cfu.execute(FUNCT3_QNT, QNT_SET_MAX, 127, 0);
  cfu.execute(FUNCT3_QNT, QNT_SET_SHIFT, (-31i32) as u32, 0);
  assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 5);

  // Shifts past -31 behave like -31.
  for shift in [-32i32, -40, i32::MIN] {
    cfu.execute(FUNCT3_QNT, QNT_SET_SHIFT, shift as u32, 0);
    assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 5, "shift {}", shift);
  }

  // Left shifts of 32 or more clear the accumulator before scaling.
  for shift in [32i32, 64, i32::MAX] {
    cfu.execute(FUNCT3_QNT, QNT_SET_SHIFT, shift as u32, 0);
    assert_eq!(cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32, 5, "shift {}", shift);
  }
}

#[test]
fn reserved_encodings_are_total_noops() {
  let mut cfu = SoftwareCfu::new();
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, 5, 0);
  cfu.execute(FUNCT3_MAC, MAC_ACC, 0x01010101, 0x01010101);
  let acc = cfu.execute(FUNCT3_MAC, MAC_ACC, 0, 0) as i32;

  for (funct3, funct7) in [(0u32, 6u32), (0, 127), (1, 7), (1, 100), (2, 0), (6, 6), (7, 3)] {
    assert_eq!(cfu.execute(funct3, funct7, 0xDEAD, 0xBEEF), 0);
  }

  // None of the reserved encodings touched the accumulator or FIFO.
  assert_eq!(cfu.execute(FUNCT3_MAC, MAC_ACC, 0, 0) as i32, acc);
  assert_eq!(cfu.fifo_len(), 0);
}
