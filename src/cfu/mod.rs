pub mod alu;
pub mod cfu;
pub mod fifo;
pub mod isa;
pub mod mac;
pub mod packed;
pub mod quant;
pub mod regfile;
pub mod trace;

pub use cfu::SoftwareCfu;
