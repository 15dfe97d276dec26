//! Control sequence parameter accumulator
//!
//! Records byte ranges of the raw input between `;` delimiters. Parameters are
//! only sliced here; their numeric meaning belongs to the screen.

use std::ops::Range;

#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Offset where the open parameter started
    start: usize,

    /// Closed parameters, in order
    ranges: Vec<Range<usize>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all parameters and open the first one at `start`
    pub fn reset(&mut self, start: usize) {
        self.ranges.clear();
        self.start = start;
    }

    /// Close the open parameter at `end`. Empty parameters are kept.
    pub fn close(&mut self, end: usize) {
        let start = self.start.min(end);
        self.ranges.push(start..end);
    }

    /// Open the next parameter at `start`
    pub fn begin(&mut self, start: usize) {
        self.start = start;
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Slice the closed parameters out of `input`
    pub fn resolve<'a>(&self, input: &'a [u8]) -> Vec<&'a str> {
        self.ranges
            .iter()
            .map(|range| {
                input
                    .get(range.clone())
                    .and_then(|bytes| std::str::from_utf8(bytes).ok())
                    .unwrap_or("")
            })
            .collect()
    }
}
