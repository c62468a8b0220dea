//! Scalar ALU, used by the self-test surface only.

use super::isa::AluOp;

/// Stateless integer add/sub/mul on 32-bit operands, wrapping like the
/// hardware registers.
pub fn execute(op: AluOp, in0: u32, in1: u32) -> u32 {
  match op {
    AluOp::Add => in0.wrapping_add(in1),
    AluOp::Sub => in0.wrapping_sub(in1),
    AluOp::Mul => in0.wrapping_mul(in1),
  }
}
