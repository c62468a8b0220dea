pub mod kernel;
pub mod params;
pub mod shape;

pub use kernel::{cfu_conv_per_channel, conv_per_channel};
pub use params::ConvParams;
pub use shape::Shape4;
