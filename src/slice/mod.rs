//! Slicing module
//!
//! Selection of observations by compact index, and assignment into
//! selected observations. Every representation of an index selects the
//! same observations, so results never depend on which one is used.
//!

use crate::error::Error;
use crate::map_vector;
use crate::object::*;
use crate::proxy::{vec_proxy, vec_restore};

pub mod strides;
use strides::ArrayStrider;

mod assign;
pub use assign::*;

/// Select observations of `x`
///
/// Missing locations, and locations past the end of `x`, select a missing
/// value. Names are sliced along with the data, with missing names read as
/// empty. Tables are sliced column-wise and shaped vectors along their first
/// dimension.
///
pub fn vec_slice(x: &Value, index: &CompactIndex) -> Result<Value, Error> {
    match x {
        Value::Null => Ok(Value::Null),
        Value::Unspecified(_) => Ok(Value::Unspecified(index.len())),
        Value::Vector(v, attrs) => {
            let names = attrs
                .names
                .as_ref()
                .map(|names| slice_names(names.borrow().as_slice(), index).into());

            match &attrs.dim {
                Some(dim) if dim.len() > 1 => {
                    let mut out_dim = dim.clone();
                    out_dim[0] = index.len();
                    Ok(Value::Vector(
                        slice_shaped(v, dim, index),
                        Attributes {
                            names,
                            dim: Some(out_dim),
                        },
                    ))
                }
                dim => Ok(Value::Vector(
                    map_vector!(v, v => slice_atoms(v.borrow().as_slice(), index).into()),
                    Attributes {
                        names,
                        dim: dim.as_ref().map(|_| vec![index.len()]),
                    },
                )),
            }
        }
        Value::Table(t) => {
            let columns = t
                .columns
                .iter()
                .map(|c| vec_slice(c, index))
                .collect::<Result<Vec<_>, _>>()?;

            let row_names = match &t.row_names {
                RowNames::Identifiers(ids) => RowNames::Identifiers(
                    index
                        .iter()
                        .map(|i| i.and_then(|i| ids.get(i).cloned()).unwrap_or_default())
                        .collect(),
                ),
                _ => RowNames::Compact(index.len()),
            };

            Ok(Value::Table(Table {
                names: t.names.clone(),
                columns,
                row_names,
                kind: t.kind,
            }))
        }
        Value::Extension(_) => {
            let proxy = vec_proxy(x)?;
            vec_restore(vec_slice(&proxy, index)?, x)
        }
        Value::Scalar(r) => Error::NotAVector(r.class.clone()).into(),
    }
}

/// Select a contiguous, increasing run of `size` observations from a 0-based
/// `start`
pub fn vec_slice_seq(x: &Value, start: usize, size: usize) -> Result<Value, Error> {
    vec_slice(x, &CompactIndex::seq(start, size))
}

/// Repeat the observation at a 0-based location `size` times
pub fn vec_slice_rep(x: &Value, location: usize, size: usize) -> Result<Value, Error> {
    let position = OptionNA::Some(location as i32 + 1);
    vec_slice(x, &CompactIndex::rep(position, size))
}

/// `n` missing observations of the type of `x`
pub fn vec_init(x: &Value, n: usize) -> Result<Value, Error> {
    vec_slice(x, &CompactIndex::rep(OptionNA::NA, n))
}

/// Select elements of a flat buffer
pub fn slice_atoms<T: Atomic>(x: &[T], index: &CompactIndex) -> Vec<T> {
    // contiguous in-bounds runs copy the underlying slice
    if let CompactIndex::Sequence {
        start,
        size,
        step: 1,
    } = index
    {
        if start + size <= x.len() {
            return x[*start..start + size].to_vec();
        }
    }

    index
        .iter()
        .map(|i| match i.and_then(|i| x.get(i)) {
            Some(x) => x.clone(),
            None => T::na(),
        })
        .collect()
}

fn slice_names(names: &[Character], index: &CompactIndex) -> Vec<Character> {
    slice_atoms(names, index)
        .into_iter()
        .map(|n| match n {
            OptionNA::NA => OptionNA::Some(String::new()),
            n => n,
        })
        .collect()
}

// Shaped data is sliced once for every position along the trailing
// dimensions, each time offsetting into the flat buffer.
fn slice_shaped(x: &Vector, dim: &[usize], index: &CompactIndex) -> Vector {
    let n = dim[0];

    map_vector!(x, v => {
        let v = v.borrow();
        let mut strider = ArrayStrider::new(dim);
        let mut out = Vec::with_capacity(index.len() * strider.shape_elem_n());

        for _ in 0..strider.shape_elem_n() {
            for i in index.iter() {
                out.push(match i {
                    Some(i) if i < n => v[strider.loc(i)].clone(),
                    _ => Atomic::na(),
                });
            }
            strider.increment();
        }

        out.into()
    })
}
