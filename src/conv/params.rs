//! Convolution parameters.

/// Scalar parameters of one quantized Conv2D op. Per-channel multiplier and
/// shift arrays travel separately, alongside the tensor data.
#[derive(Debug, Clone, Copy)]
pub struct ConvParams {
  pub stride_width: usize,
  pub stride_height: usize,
  pub pad_width: usize,
  pub pad_height: usize,
  /// Zero-point added to each input lane (`r = s * (q - Z)`); 128 for the
  /// uint8-biased activations of the image model.
  pub input_offset: i32,
  pub output_offset: i32,
  pub output_activation_min: i32,
  pub output_activation_max: i32,
}

impl ConvParams {
  pub fn new(stride: usize, pad: usize, output_offset: i32) -> Self {
    Self {
      stride_width: stride,
      stride_height: stride,
      pad_width: pad,
      pad_height: pad,
      input_offset: 128,
      output_offset,
      output_activation_min: -128,
      output_activation_max: 127,
    }
  }
}
