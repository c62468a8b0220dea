//! Software CFU.
//!
//! Instruction-level model of the convolution accelerator. The same call
//! sequence that production code issues to the hardware unit is routed here
//! instead and must produce bit-identical results. Each instance owns its
//! register file and input FIFO, so independent convolution invocations get
//! isolated state.

use super::alu;
use super::fifo::InputFifo;
use super::isa::{self, AluOp, MacOp, Op, QntOp};
use super::mac;
use super::quant;
use super::regfile::RegFile;
use super::trace::{TraceRecord, Tracer};

pub struct SoftwareCfu {
  regs: RegFile,
  fifo: InputFifo,
  tracer: Option<Tracer>,
}

impl SoftwareCfu {
  pub fn new() -> Self {
    Self::with_fifo_capacity(super::fifo::DEFAULT_CAPACITY)
  }

  pub fn with_fifo_capacity(capacity: usize) -> Self {
    Self {
      regs: RegFile::new(),
      fifo: InputFifo::with_capacity(capacity),
      tracer: None,
    }
  }

  /// Attach an instruction tracer. Every subsequent `execute` call is
  /// recorded as one JSON line.
  pub fn set_tracer(&mut self, tracer: Tracer) {
    self.tracer = Some(tracer);
  }

  pub fn take_tracer(&mut self) -> Option<Tracer> {
    self.tracer.take()
  }

  pub fn fifo_len(&self) -> usize {
    self.fifo.len()
  }

  pub fn fifo_capacity(&self) -> usize {
    self.fifo.capacity()
  }

  /// Execute one instruction. This is the sole API boundary the convolution
  /// driver and test harnesses use; hardware and software backends are
  /// interchangeable behind it.
  ///
  /// Every instruction is total: reserved encodings return 0 with no side
  /// effect, mirroring hardware that no-ops on unknown funct values.
  pub fn execute(&mut self, funct3: u32, funct7: u32, in0: u32, in1: u32) -> u32 {
    let result = match isa::decode(funct3, funct7) {
      Some(Op::Mac(op)) => self.mac_op(op, in0, in1),
      Some(Op::Qnt(op)) => self.qnt_op(op, in0),
      Some(Op::Alu(op)) => alu::execute(op, in0, in1),
      None => {
        log::debug!("reserved encoding funct3={} funct7={}, no-op", funct3, funct7);
        0
      },
    };

    if let Some(tracer) = self.tracer.as_mut() {
      tracer.record(&TraceRecord {
        funct3,
        funct7,
        in0,
        in1,
        result,
      });
    }

    result
  }

  fn mac_op(&mut self, op: MacOp, in0: u32, in1: u32) -> u32 {
    match op {
      MacOp::Acc => {
        let sum = mac::mac4(in0, in1, self.regs.offset);
        self.regs.accumulate(sum) as u32
      },
      MacOp::Clear => {
        self.regs.clear_acc();
        self.regs.acc as u32
      },
      MacOp::SetOffset => {
        self.regs.offset = in0 as i32;
        self.regs.acc as u32
      },
      MacOp::SetInputVals => {
        self.fifo.push(in0);
        self.fifo.push(in1);
        0
      },
      MacOp::OnBuffer => {
        // One replay read per operand; an empty FIFO contributes nothing.
        for operand in [in0, in1] {
          if let Some(input_val) = self.fifo.replay() {
            let sum = mac::mac4(operand, input_val, self.regs.offset);
            self.regs.accumulate(sum);
          }
        }
        self.regs.acc as u32
      },
      MacOp::ClearInputVals => {
        self.fifo.clear();
        0
      },
    }
  }

  fn qnt_op(&mut self, op: QntOp, in0: u32) -> u32 {
    match op {
      QntOp::SetBias => {
        self.regs.qnt_bias = in0 as i32;
        0
      },
      QntOp::SetMul => {
        self.regs.qnt_mul = in0 as i32;
        0
      },
      QntOp::SetShift => {
        self.regs.qnt_shift = in0 as i32;
        0
      },
      QntOp::SetOffset => {
        self.regs.qnt_offset = in0 as i32;
        0
      },
      QntOp::SetMin => {
        self.regs.qnt_min = in0 as i32;
        0
      },
      QntOp::SetMax => {
        self.regs.qnt_max = in0 as i32;
        0
      },
      QntOp::Get => quant::requantize(&self.regs) as u32,
    }
  }
}

impl Default for SoftwareCfu {
  fn default() -> Self {
    Self::new()
  }
}
