//! Packed word helpers.
//!
//! A packed word is a `u32` carrying four signed 8-bit lanes in
//! little-endian lane order (lane 0 = bits 0..7). It holds either four
//! quantized activations or four filter weights.

/// Unpack a word into its four signed lanes.
pub fn unpack(word: u32) -> [i8; 4] {
  word.to_le_bytes().map(|b| b as i8)
}

/// Pack four signed lanes into a word.
pub fn pack(lanes: [i8; 4]) -> u32 {
  u32::from_le_bytes(lanes.map(|l| l as u8))
}

/// Pack four consecutive bytes of a tensor slice starting at `index`.
pub fn pack_from(data: &[i8], index: usize) -> u32 {
  pack([data[index], data[index + 1], data[index + 2], data[index + 3]])
}
