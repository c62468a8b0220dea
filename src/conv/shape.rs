//! Tensor shape helper for the 4-D NHWC layout the conv kernels use.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape4 {
  dims: [usize; 4],
}

impl Shape4 {
  pub fn new(d0: usize, d1: usize, d2: usize, d3: usize) -> Self {
    Self {
      dims: [d0, d1, d2, d3],
    }
  }

  pub fn dim(&self, i: usize) -> usize {
    self.dims[i]
  }

  pub fn flat_size(&self) -> usize {
    self.dims.iter().product()
  }

  /// Flat index of element (i0, i1, i2, i3):
  /// `((i0 * d1 + i1) * d2 + i2) * d3 + i3`.
  pub fn offset(&self, i0: usize, i1: usize, i2: usize, i3: usize) -> usize {
    ((i0 * self.dims[1] + i1) * self.dims[2] + i2) * self.dims[3] + i3
  }
}
