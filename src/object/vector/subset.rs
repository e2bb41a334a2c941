use std::ops::Range;

use super::types::*;

/// Compact Indices
///
/// Representations of which positions of a vector are selected. Positions in
/// `Explicit` and `Repetition` are 1-based (`NA` selects a missing value),
/// while `Sequence` starts from a 0-based offset so that contiguous ranges
/// can be described without allocating positions.
///
/// All three variants describe an ordered sequence of locations; consumers
/// must produce identical results for equivalent indices regardless of the
/// variant used.
///
#[derive(Debug, Clone, PartialEq)]
pub enum CompactIndex {
    Explicit(Vec<Integer>),
    Sequence { start: usize, size: usize, step: isize },
    Repetition { position: Integer, size: usize },
}

impl CompactIndex {
    /// Contiguous, increasing sequence from a 0-based start
    pub fn seq(start: usize, size: usize) -> Self {
        CompactIndex::Sequence {
            start,
            size,
            step: 1,
        }
    }

    /// A single 1-based position (or `NA`) repeated `size` times
    pub fn rep(position: Integer, size: usize) -> Self {
        CompactIndex::Repetition { position, size }
    }

    pub fn len(&self) -> usize {
        match self {
            CompactIndex::Explicit(i) => i.len(),
            CompactIndex::Sequence { size, .. } => *size,
            CompactIndex::Repetition { size, .. } => *size,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The 0-based location selected at a logical position
    ///
    /// Returns `None` when the position selects a missing value or when the
    /// logical position lies past the end of the index.
    ///
    pub fn get_index_at(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }

        match self {
            CompactIndex::Explicit(i) => from_position(&i[index]),
            CompactIndex::Sequence { start, step, .. } => {
                let loc = *start as isize + index as isize * step;
                usize::try_from(loc).ok()
            }
            CompactIndex::Repetition { position, .. } => from_position(position),
        }
    }

    /// Iterate over 0-based locations, `None` marking missing selections
    pub fn iter(&self) -> CompactIndexIter<'_> {
        CompactIndexIter {
            index: self,
            i: 0,
            n: self.len(),
        }
    }

    /// Convert any representation into explicit 1-based positions
    pub fn materialize(&self) -> Self {
        match self {
            CompactIndex::Explicit(_) => self.clone(),
            _ => CompactIndex::Explicit(
                self.iter()
                    .map(|i| match i {
                        Some(i) => OptionNA::Some(i as i32 + 1),
                        None => OptionNA::NA,
                    })
                    .collect(),
            ),
        }
    }

    /// The largest 0-based location selected, if any
    pub fn max_location(&self) -> Option<usize> {
        match self {
            CompactIndex::Sequence { size: 0, .. } => None,
            CompactIndex::Sequence { start, size, step } if *step >= 0 => {
                Some(start + (size - 1) * (*step as usize))
            }
            CompactIndex::Sequence { start, .. } => Some(*start),
            _ => self.iter().flatten().max(),
        }
    }
}

fn from_position(x: &Integer) -> Option<usize> {
    match x {
        OptionNA::Some(i) if *i >= 1 => Some(*i as usize - 1),
        _ => None,
    }
}

pub struct CompactIndexIter<'a> {
    index: &'a CompactIndex,
    i: usize,
    n: usize,
}

impl Iterator for CompactIndexIter<'_> {
    type Item = Option<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i < self.n {
            let loc = self.index.get_index_at(self.i);
            self.i += 1;
            Some(loc)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.i;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CompactIndexIter<'_> {}

impl From<Vec<i32>> for CompactIndex {
    fn from(value: Vec<i32>) -> Self {
        CompactIndex::Explicit(value.into_iter().map(OptionNA::Some).collect())
    }
}

impl From<Vec<Integer>> for CompactIndex {
    fn from(value: Vec<Integer>) -> Self {
        CompactIndex::Explicit(value)
    }
}

impl From<Range<usize>> for CompactIndex {
    fn from(value: Range<usize>) -> Self {
        CompactIndex::seq(value.start, value.end.saturating_sub(value.start))
    }
}
