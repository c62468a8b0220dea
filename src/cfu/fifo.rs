//! Input FIFO.
//!
//! Fixed-capacity ring buffer of packed words. The convolution driver fills
//! it once per output pixel and replays it once per output channel, so one
//! window load is reused across every filter without re-fetching from memory.

/// Default depth of the input buffer in the image-convolution variant.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct InputFifo {
  data: Vec<u32>,
  head: usize,
  tail: usize,
  count: usize,
}

impl InputFifo {
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      data: vec![0; capacity],
      head: 0,
      tail: 0,
      count: 0,
    }
  }

  /// Append a word at the tail. A push beyond capacity is silently dropped:
  /// no error, no overwrite. Sizing the window to the buffer is the caller's
  /// configuration responsibility.
  pub fn push(&mut self, word: u32) {
    if self.count < self.data.len() {
      self.data[self.tail] = word;
      self.tail = (self.tail + 1) % self.data.len();
      self.count += 1;
    }
  }

  /// Remove and return the head entry, or `None` when empty.
  pub fn pop_front(&mut self) -> Option<u32> {
    if self.count == 0 {
      return None;
    }
    let word = self.data[self.head];
    self.head = (self.head + 1) % self.data.len();
    self.count -= 1;
    Some(word)
  }

  /// Replay read: pop the head and immediately re-append it at the tail.
  /// Length and entry multiset are unchanged; after a full cycle every entry
  /// is back at its original relative position.
  pub fn replay(&mut self) -> Option<u32> {
    let word = self.pop_front()?;
    self.push(word);
    Some(word)
  }

  pub fn clear(&mut self) {
    self.head = 0;
    self.tail = 0;
    self.count = 0;
  }

  pub fn len(&self) -> usize {
    self.count
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  pub fn capacity(&self) -> usize {
    self.data.len()
  }
}

impl Default for InputFifo {
  fn default() -> Self {
    Self::new()
  }
}
