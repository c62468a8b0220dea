//! Instruction encoding.
//!
//! A custom-function-unit instruction carries an operation class (`funct3`),
//! a sub-operation (`funct7`) and two 32-bit operands. The numeric encoding
//! is a fixed external contract shared with the hardware implementation; it
//! is mapped to closed enums here, at the single wire boundary, so internal
//! dispatch stays exhaustive.

/// Operation class selectors (funct3).
pub const FUNCT3_MAC: u32 = 0;
pub const FUNCT3_QNT: u32 = 1;
pub const FUNCT3_ALU: u32 = 7;

/// MAC sub-operations (funct3 = 0).
pub const MAC_ACC: u32 = 0;
pub const MAC_CLEAR: u32 = 1;
pub const MAC_SET_OFFSET: u32 = 2;
pub const MAC_SET_INPUT_VALS: u32 = 3;
pub const MAC_ON_BUFFER: u32 = 4;
pub const MAC_CLEAR_INPUT_VALS: u32 = 5;

/// Quantization sub-operations (funct3 = 1).
pub const QNT_SET_BIAS: u32 = 0;
pub const QNT_SET_MUL: u32 = 1;
pub const QNT_SET_SHIFT: u32 = 2;
pub const QNT_SET_OFFSET: u32 = 3;
pub const QNT_SET_MIN: u32 = 4;
pub const QNT_SET_MAX: u32 = 5;
pub const QNT_GET: u32 = 6;

/// ALU sub-operations (funct3 = 7, self-test only).
pub const ALU_ADD: u32 = 0;
pub const ALU_SUB: u32 = 1;
pub const ALU_MUL: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacOp {
  /// Accumulate a packed dot product of the two operands.
  Acc,
  /// Reset the accumulator to zero.
  Clear,
  /// Load the zero-point offset register from operand 0.
  SetOffset,
  /// Push both operands into the input FIFO.
  SetInputVals,
  /// Accumulate both operands against replayed FIFO entries.
  OnBuffer,
  /// Reset the input FIFO to empty.
  ClearInputVals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QntOp {
  SetBias,
  SetMul,
  SetShift,
  SetOffset,
  SetMin,
  SetMax,
  /// Requantize the accumulator and return the clamped 8-bit result.
  Get,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  Add,
  Sub,
  Mul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Mac(MacOp),
  Qnt(QntOp),
  Alu(AluOp),
}

/// Decode a (funct3, funct7) pair. Reserved encodings decode to `None`;
/// the unit no-ops on them like permissive hardware, it does not fail.
pub fn decode(funct3: u32, funct7: u32) -> Option<Op> {
  match funct3 {
    FUNCT3_MAC => {
      let op = match funct7 {
        MAC_ACC => MacOp::Acc,
        MAC_CLEAR => MacOp::Clear,
        MAC_SET_OFFSET => MacOp::SetOffset,
        MAC_SET_INPUT_VALS => MacOp::SetInputVals,
        MAC_ON_BUFFER => MacOp::OnBuffer,
        MAC_CLEAR_INPUT_VALS => MacOp::ClearInputVals,
        _ => return None,
      };
      Some(Op::Mac(op))
    },
    FUNCT3_QNT => {
      let op = match funct7 {
        QNT_SET_BIAS => QntOp::SetBias,
        QNT_SET_MUL => QntOp::SetMul,
        QNT_SET_SHIFT => QntOp::SetShift,
        QNT_SET_OFFSET => QntOp::SetOffset,
        QNT_SET_MIN => QntOp::SetMin,
        QNT_SET_MAX => QntOp::SetMax,
        QNT_GET => QntOp::Get,
        _ => return None,
      };
      Some(Op::Qnt(op))
    },
    FUNCT3_ALU => {
      let op = match funct7 {
        ALU_ADD => AluOp::Add,
        ALU_SUB => AluOp::Sub,
        ALU_MUL => AluOp::Mul,
        _ => return None,
      };
      Some(Op::Alu(op))
    },
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_known_encodings() {
    assert_eq!(decode(FUNCT3_MAC, MAC_ON_BUFFER), Some(Op::Mac(MacOp::OnBuffer)));
    assert_eq!(decode(FUNCT3_QNT, QNT_GET), Some(Op::Qnt(QntOp::Get)));
    assert_eq!(decode(FUNCT3_ALU, ALU_MUL), Some(Op::Alu(AluOp::Mul)));
  }

  #[test]
  fn test_decode_reserved_encodings() {
    assert_eq!(decode(FUNCT3_MAC, 6), None);
    assert_eq!(decode(FUNCT3_QNT, 7), None);
    assert_eq!(decode(FUNCT3_ALU, 3), None);
    assert_eq!(decode(2, 0), None);
    assert_eq!(decode(6, 0), None);
  }
}
