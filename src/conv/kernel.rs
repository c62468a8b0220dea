//! Per-channel quantized Conv2D kernels.
//!
//! `cfu_conv_per_channel` is the accelerated inner loop: it drives the
//! software CFU exclusively through the instruction interface, so the same
//! code path works against the real hardware unit. `conv_per_channel` is the
//! plain scalar reference the accelerated path must match bit-for-bit.

use crate::cfu::isa::*;
use crate::cfu::{packed, quant, SoftwareCfu};

use super::params::ConvParams;
use super::shape::Shape4;

fn validate(
  params: &ConvParams,
  output_multiplier: &[i32],
  output_shift: &[i32],
  input_shape: &Shape4,
  input_data: &[i8],
  filter_shape: &Shape4,
  filter_data: &[i8],
  bias_data: Option<&[i32]>,
  output_shape: &Shape4,
  output_data: &[i8],
) -> Result<(), String> {
  let input_depth = input_shape.dim(3);
  let output_depth = output_shape.dim(3);

  if params.output_activation_min > params.output_activation_max {
    return Err(format!(
      "activation min {} > max {}",
      params.output_activation_min, params.output_activation_max
    ));
  }
  if input_shape.dim(0) != output_shape.dim(0) {
    return Err(format!(
      "batch mismatch: input {} output {}",
      input_shape.dim(0),
      output_shape.dim(0)
    ));
  }
  if input_depth % 4 != 0 {
    return Err(format!("input depth {} is not a multiple of 4 lanes", input_depth));
  }
  if filter_shape.dim(3) != input_depth {
    return Err(format!(
      "filter depth {} != input depth {}",
      filter_shape.dim(3),
      input_depth
    ));
  }
  if filter_shape.dim(0) != output_depth {
    return Err(format!(
      "filter count {} != output depth {}",
      filter_shape.dim(0),
      output_depth
    ));
  }
  if output_multiplier.len() < output_depth || output_shift.len() < output_depth {
    return Err(format!(
      "per-channel multiplier/shift arrays shorter than output depth {}",
      output_depth
    ));
  }
  if let Some(bias) = bias_data {
    if bias.len() < output_depth {
      return Err(format!("bias size {} < output depth {}", bias.len(), output_depth));
    }
  }
  if input_data.len() < input_shape.flat_size() {
    return Err(format!(
      "input size {} < shape size {}",
      input_data.len(),
      input_shape.flat_size()
    ));
  }
  if filter_data.len() < filter_shape.flat_size() {
    return Err(format!(
      "filter size {} < shape size {}",
      filter_data.len(),
      filter_shape.flat_size()
    ));
  }
  if output_data.len() < output_shape.flat_size() {
    return Err(format!(
      "output size {} < shape size {}",
      output_data.len(),
      output_shape.flat_size()
    ));
  }
  Ok(())
}

/// CFU-accelerated Conv2D loop.
///
/// Per output pixel the in-bounds window words are loaded into the input
/// FIFO once; every output channel then replays that FIFO against its own
/// filter words and reads one requantized byte back. Fill order and replay
/// order traverse the identical tap list — that identity is what makes the
/// recycled FIFO line up with the filter stream.
#[allow(clippy::too_many_arguments)]
pub fn cfu_conv_per_channel(
  cfu: &mut SoftwareCfu,
  params: &ConvParams,
  output_multiplier: &[i32],
  output_shift: &[i32],
  input_shape: &Shape4,
  input_data: &[i8],
  filter_shape: &Shape4,
  filter_data: &[i8],
  bias_data: Option<&[i32]>,
  output_shape: &Shape4,
  output_data: &mut [i8],
) -> Result<(), String> {
  validate(
    params,
    output_multiplier,
    output_shift,
    input_shape,
    input_data,
    filter_shape,
    filter_data,
    bias_data,
    output_shape,
    output_data,
  )?;

  let batches = input_shape.dim(0);
  let input_height = input_shape.dim(1);
  let input_width = input_shape.dim(2);
  let input_depth = input_shape.dim(3);
  let filter_height = filter_shape.dim(1);
  let filter_width = filter_shape.dim(2);
  let output_height = output_shape.dim(1);
  let output_width = output_shape.dim(2);
  let output_depth = output_shape.dim(3);

  let max_window_words = filter_height * filter_width * (input_depth / 4);
  if max_window_words + 1 > cfu.fifo_capacity() {
    log::warn!(
      "window needs up to {} words but FIFO holds {}; excess pushes will be dropped",
      max_window_words + 1,
      cfu.fifo_capacity()
    );
  }

  // Load the input zero-point once per convolution.
  cfu.execute(FUNCT3_MAC, MAC_SET_OFFSET, params.input_offset as u32, 0);

  // Reused per pixel: the in-bounds (filter_y, filter_x, in_channel) taps.
  // Both the fill loop and every channel's replay loop walk this list, so
  // the two traversals cannot diverge.
  let mut taps: Vec<(usize, usize, usize)> = Vec::new();

  for batch in 0..batches {
    for out_y in 0..output_height {
      let in_y_origin = (out_y * params.stride_height) as i32 - params.pad_height as i32;
      for out_x in 0..output_width {
        let in_x_origin = (out_x * params.stride_width) as i32 - params.pad_width as i32;

        taps.clear();
        for filter_y in 0..filter_height {
          let in_y = in_y_origin + filter_y as i32;
          for filter_x in 0..filter_width {
            let in_x = in_x_origin + filter_x as i32;

            // Zero padding by omission: positions outside the image are
            // never pushed, so the live FIFO length shrinks at the borders.
            let inside = in_x >= 0
              && (in_x as usize) < input_width
              && in_y >= 0
              && (in_y as usize) < input_height;
            if !inside {
              continue;
            }

            for in_channel in (0..input_depth).step_by(4) {
              taps.push((filter_y, filter_x, in_channel));
            }
          }
        }

        // Fill the FIFO with this pixel's window, two packed words per
        // instruction. An odd tail is padded with a zero word; the replay
        // side pairs it with a zero filter word, contributing nothing.
        cfu.execute(FUNCT3_MAC, MAC_CLEAR_INPUT_VALS, 0, 0);
        let mut pending: Option<u32> = None;
        for &(filter_y, filter_x, in_channel) in &taps {
          let in_y = (in_y_origin + filter_y as i32) as usize;
          let in_x = (in_x_origin + filter_x as i32) as usize;
          let word = packed::pack_from(input_data, input_shape.offset(batch, in_y, in_x, in_channel));
          match pending.take() {
            None => pending = Some(word),
            Some(first) => {
              cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, first, word);
            },
          }
        }
        if let Some(first) = pending {
          cfu.execute(FUNCT3_MAC, MAC_SET_INPUT_VALS, first, 0);
        }

        for out_channel in 0..output_depth {
          cfu.execute(FUNCT3_MAC, MAC_CLEAR, 0, 0);

          let mut pending: Option<u32> = None;
          for &(filter_y, filter_x, in_channel) in &taps {
            let word =
              packed::pack_from(filter_data, filter_shape.offset(out_channel, filter_y, filter_x, in_channel));
            match pending.take() {
              None => pending = Some(word),
              Some(first) => {
                cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, first, word);
              },
            }
          }
          if let Some(first) = pending {
            cfu.execute(FUNCT3_MAC, MAC_ON_BUFFER, first, 0);
          }

          // Accumulator readback; the zero operands add nothing.
          cfu.execute(FUNCT3_MAC, MAC_ACC, 0, 0);

          let bias = bias_data.map_or(0, |b| b[out_channel]);
          cfu.execute(FUNCT3_QNT, QNT_SET_BIAS, bias as u32, 0);
          cfu.execute(FUNCT3_QNT, QNT_SET_MUL, output_multiplier[out_channel] as u32, 0);
          cfu.execute(FUNCT3_QNT, QNT_SET_SHIFT, output_shift[out_channel] as u32, 0);
          cfu.execute(FUNCT3_QNT, QNT_SET_OFFSET, params.output_offset as u32, 0);
          cfu.execute(FUNCT3_QNT, QNT_SET_MIN, params.output_activation_min as u32, 0);
          cfu.execute(FUNCT3_QNT, QNT_SET_MAX, params.output_activation_max as u32, 0);
          let out = cfu.execute(FUNCT3_QNT, QNT_GET, 0, 0) as i32;

          output_data[output_shape.offset(batch, out_y, out_x, out_channel)] = out as i8;
        }
      }
    }
  }

  Ok(())
}

/// Scalar reference Conv2D, the TFLite per-channel integer kernel. Used to
/// validate that the accelerated loop is numerically identical.
#[allow(clippy::too_many_arguments)]
pub fn conv_per_channel(
  params: &ConvParams,
  output_multiplier: &[i32],
  output_shift: &[i32],
  input_shape: &Shape4,
  input_data: &[i8],
  filter_shape: &Shape4,
  filter_data: &[i8],
  bias_data: Option<&[i32]>,
  output_shape: &Shape4,
  output_data: &mut [i8],
) -> Result<(), String> {
  validate(
    params,
    output_multiplier,
    output_shift,
    input_shape,
    input_data,
    filter_shape,
    filter_data,
    bias_data,
    output_shape,
    output_data,
  )?;

  let batches = input_shape.dim(0);
  let input_height = input_shape.dim(1);
  let input_width = input_shape.dim(2);
  let input_depth = input_shape.dim(3);
  let filter_height = filter_shape.dim(1);
  let filter_width = filter_shape.dim(2);
  let output_height = output_shape.dim(1);
  let output_width = output_shape.dim(2);
  let output_depth = output_shape.dim(3);

  for batch in 0..batches {
    for out_y in 0..output_height {
      let in_y_origin = (out_y * params.stride_height) as i32 - params.pad_height as i32;
      for out_x in 0..output_width {
        let in_x_origin = (out_x * params.stride_width) as i32 - params.pad_width as i32;
        for out_channel in 0..output_depth {
          let mut acc: i32 = 0;
          for filter_y in 0..filter_height {
            let in_y = in_y_origin + filter_y as i32;
            for filter_x in 0..filter_width {
              let in_x = in_x_origin + filter_x as i32;
              let inside = in_x >= 0
                && (in_x as usize) < input_width
                && in_y >= 0
                && (in_y as usize) < input_height;
              if !inside {
                continue;
              }
              for in_channel in 0..input_depth {
                let input_val =
                  input_data[input_shape.offset(batch, in_y as usize, in_x as usize, in_channel)] as i32;
                let filter_val =
                  filter_data[filter_shape.offset(out_channel, filter_y, filter_x, in_channel)] as i32;
                acc = acc.wrapping_add(
                  filter_val.wrapping_mul(input_val.wrapping_add(params.input_offset)),
                );
              }
            }
          }

          if let Some(bias) = bias_data {
            acc = acc.wrapping_add(bias[out_channel]);
          }
          acc = quant::multiply_by_quantized_multiplier(
            acc,
            output_multiplier[out_channel],
            output_shift[out_channel],
          );
          acc = acc.wrapping_add(params.output_offset);
          acc = acc.clamp(params.output_activation_min, params.output_activation_max);
          output_data[output_shape.offset(batch, out_y, out_x, out_channel)] = acc as i8;
        }
      }
    }
  }

  Ok(())
}
