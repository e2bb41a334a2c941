use crate::map_vector;
use crate::object::Vector;

/// Walks an array in column-major order, one position along its trailing
/// dimensions at a time
///
/// For a position `shape_index` along the trailing dimensions, the element
/// at `size_index` along the first dimension lives at
/// `size_index + sum(shape_index[k] * strides[k])` of the flat data, where
/// `strides` is the cumulative product of the leading dimensions.
///
#[derive(Debug, Clone)]
pub struct ArrayStrider {
    dim: Vec<usize>,
    strides: Vec<usize>,
    shape_index: Vec<usize>,
    offset: usize,
}

impl ArrayStrider {
    pub fn new(dim: &[usize]) -> Self {
        let shape_n = dim.len().saturating_sub(1);

        let mut strides = Vec::with_capacity(shape_n);
        let mut stride = 1;
        for d in dim.iter().take(shape_n) {
            stride *= d;
            strides.push(stride);
        }

        ArrayStrider {
            dim: dim.to_vec(),
            strides,
            shape_index: vec![0; shape_n],
            offset: 0,
        }
    }

    /// Number of positions along the trailing dimensions
    pub fn shape_elem_n(&self) -> usize {
        self.dim.iter().skip(1).product()
    }

    pub fn shape_index(&self) -> &[usize] {
        &self.shape_index
    }

    /// Flat location of `size_index` at the current position
    pub fn loc(&self, size_index: usize) -> usize {
        size_index + self.offset
    }

    /// Flat offset of a position, treating dimensions of extent 1 as
    /// broadcast over any position
    pub fn offset_at(&self, shape_index: &[usize]) -> usize {
        shape_index
            .iter()
            .zip(self.dim.iter().skip(1))
            .zip(self.strides.iter())
            .map(|((s, d), stride)| if *d == 1 { 0 } else { s * stride })
            .sum()
    }

    /// Move to the next position along the trailing dimensions
    pub fn increment(&mut self) {
        for k in 0..self.shape_index.len() {
            self.shape_index[k] += 1;
            if self.shape_index[k] < self.dim[k + 1] {
                break;
            }
            self.shape_index[k] = 0;
        }

        self.offset = self
            .shape_index
            .iter()
            .zip(self.strides.iter())
            .map(|(s, stride)| s * stride)
            .sum();
    }
}

/// Repeat array data along trailing dimensions of extent 1
///
/// `from_dim` and `to_dim` must share their first dimension and rank.
///
pub fn broadcast(x: &Vector, from_dim: &[usize], to_dim: &[usize]) -> Vector {
    let from = ArrayStrider::new(from_dim);
    let n = to_dim.first().copied().unwrap_or(0);

    map_vector!(x, v => {
        let v = v.borrow();
        let mut to = ArrayStrider::new(to_dim);
        let mut out = Vec::with_capacity(n * to.shape_elem_n());

        for _ in 0..to.shape_elem_n() {
            let offset = from.offset_at(to.shape_index());
            out.extend(v[offset..offset + n].iter().cloned());
            to.increment();
        }

        out.into()
    })
}
