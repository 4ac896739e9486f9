//! Sliding-window iteration over log lines.

/// Iterator over every `size`-line window of `lines`.
///
/// Yields `(start offset, window slice)` for every start offset from 0 to
/// `lines.len() - size`. Inputs shorter than `size` yield nothing.
pub struct SlidingWindows<'a> {
  lines: &'a [String],
  size: usize,
  start: usize,
}

pub fn sliding_windows(lines: &[String], size: usize) -> SlidingWindows<'_> {
  SlidingWindows {
    lines,
    size,
    start: 0,
  }
}

impl<'a> Iterator for SlidingWindows<'a> {
  type Item = (usize, &'a [String]);

  fn next(&mut self) -> Option<Self::Item> {
    if self.size == 0 || self.start + self.size > self.lines.len() {
      return None;
    }
    let window = &self.lines[self.start..self.start + self.size];
    let start = self.start;
    self.start += 1;
    Some((start, window))
  }
}
