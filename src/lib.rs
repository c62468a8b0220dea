pub mod cfu;
pub mod conv;
pub mod emulator;
pub mod utils;

pub use cfu::SoftwareCfu;
pub use utils::log::init_log;
