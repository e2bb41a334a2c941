use crate::coercion::incompatible;
use crate::error::{Action, Error};
use crate::map_vector;
use crate::object::*;
use crate::proxy::{vec_proxy, vec_restore};
use crate::size::vec_size;
use crate::zip_vector;

use super::strides::ArrayStrider;

/// Write `value` into the observations of `x` selected by `index`
///
/// `value` must already share the type of `x` and have one observation per
/// index position. Missing positions are skipped and positions past the end
/// of `x` are an error.
///
/// With [`Ownership::Total`] the caller vouches that `x` owns its buffers,
/// and they are written in place so every view of them observes the write.
/// With [`Ownership::Shared`] the buffers are duplicated first and `x` is
/// left untouched. Tables pass the same ownership on to every column.
///
pub fn vec_assign(x: &Value, index: &CompactIndex, value: &Value, ownership: Ownership) -> Result<Value, Error> {
    let actual = vec_size(value)?;
    if actual != index.len() {
        return Error::InternalSizeMismatch {
            expected: index.len(),
            actual,
        }
        .into();
    }

    let size = vec_size(x)?;
    if let Some(location) = index.max_location().filter(|l| *l >= size) {
        return Error::OutOfBounds {
            location: location + 1,
            size,
        }
        .into();
    }

    match (x, value) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Unspecified(_), Value::Unspecified(_)) => Ok(x.clone()),
        (Value::Extension(_), _) => {
            let proxy = vec_proxy(x)?;
            let value = vec_proxy(value)?;
            vec_restore(vec_assign(&proxy, index, &value, ownership)?, x)
        }
        (Value::Vector(xv, xa), Value::Vector(vv, va)) => {
            let out = map_vector!(xv, v => v.for_write(ownership));

            match (&xa.dim, &va.dim) {
                (Some(xd), Some(vd)) if xd.len() > 1 => {
                    if xd[1..] != vd[1..] {
                        return incompatible(value, x, "value", "x", Action::Convert).into();
                    }
                    zip_vector!(&out, vv, (o, r) => {
                        let r = r.inner_rc();
                        o.with_inner_mut(|buf| assign_shaped(buf, xd, index, r.as_slice(), vd));
                    }, _ => return incompatible(value, x, "value", "x", Action::Convert).into())
                }
                (Some(xd), _) if xd.len() > 1 => {
                    return incompatible(value, x, "value", "x", Action::Convert).into();
                }
                _ => zip_vector!(&out, vv, (o, r) => {
                    // the source is pinned before writing, so assigning a
                    // value into itself duplicates rather than aliases
                    let r = r.inner_rc();
                    o.with_inner_mut(|buf| assign_atoms(buf, index, r.as_slice()));
                }, _ => return incompatible(value, x, "value", "x", Action::Convert).into()),
            }

            Ok(Value::Vector(out, xa.clone()))
        }
        (Value::Table(xt), Value::Table(vt)) => {
            if xt.ncol() != vt.ncol() {
                return incompatible(value, x, "value", "x", Action::Convert).into();
            }

            let columns = xt
                .columns
                .iter()
                .zip(vt.columns.iter())
                .map(|(xc, vc)| vec_assign(xc, index, vc, ownership))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::Table(Table {
                columns,
                ..xt.clone()
            }))
        }
        (Value::Scalar(r), _) => Error::NotAVector(r.class.clone()).into(),
        _ => incompatible(value, x, "value", "x", Action::Convert).into(),
    }
}

fn assign_atoms<T: Clone>(buf: &mut [T], index: &CompactIndex, value: &[T]) {
    match index {
        CompactIndex::Explicit(positions) => {
            for (position, v) in positions.iter().zip(value.iter()) {
                match position {
                    OptionNA::Some(p) if *p >= 1 => buf[*p as usize - 1] = v.clone(),
                    _ => (),
                }
            }
        }
        CompactIndex::Sequence { start, size, step } => {
            // locations before the start of `buf` select nothing, as when slicing
            let mut loc = *start as isize;
            for v in value.iter().take(*size) {
                if let Ok(l) = usize::try_from(loc) {
                    buf[l] = v.clone();
                }
                loc += step;
            }
        }
        CompactIndex::Repetition { position, size } => {
            if let (OptionNA::Some(p), Some(v)) = (position, value.get(size.wrapping_sub(1))) {
                if *p >= 1 {
                    buf[*p as usize - 1] = v.clone();
                }
            }
        }
    }
}

fn assign_shaped<T: Clone>(buf: &mut [T], dim: &[usize], index: &CompactIndex, value: &[T], value_dim: &[usize]) {
    let mut to = ArrayStrider::new(dim);
    let mut from = ArrayStrider::new(value_dim);

    for _ in 0..to.shape_elem_n() {
        for (k, loc) in index.iter().enumerate() {
            if let Some(loc) = loc {
                buf[to.loc(loc)] = value[from.loc(k)].clone();
            }
        }
        to.increment();
        from.increment();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::{vec_init, vec_slice};
    use crate::v;
    use rand::seq::SliceRandom;

    #[test]
    fn every_index_form_assigns_the_same() {
        let x = v!("c(1L, 2L, 3L, 4L)");
        let value = v!("c(10L, 20L)");

        let explicit = vec_assign(&x, &CompactIndex::from(vec![2, 3]), &value, Ownership::Shared).unwrap();
        let seq = vec_assign(&x, &CompactIndex::from(1..3), &value, Ownership::Shared).unwrap();
        assert_eq!(explicit, seq);
        assert_eq!(seq, v!("c(1L, 10L, 20L, 4L)"));

        let rep = vec_assign(&x, &CompactIndex::rep(OptionNA::Some(4), 2), &value, Ownership::Shared).unwrap();
        assert_eq!(rep, v!("c(1L, 2L, 3L, 20L)"));
    }

    #[test]
    fn missing_positions_are_skipped() {
        let x = v!("c(1, 2)");
        let index = CompactIndex::Explicit(vec![OptionNA::NA, OptionNA::Some(1)]);
        let out = vec_assign(&x, &index, &v!("c(8, 9)"), Ownership::Shared).unwrap();
        assert_eq!(out, v!("c(9, 2)"));
    }

    #[test]
    fn decreasing_sequences_stop_at_the_first_location() {
        let x = v!("c(1L, 2L, 3L)");
        let index = CompactIndex::Sequence {
            start: 0,
            size: 2,
            step: -1,
        };
        assert_eq!(vec_slice(&x, &index).unwrap(), v!("c(1L, NA)"));

        let out = vec_assign(&x, &index, &v!("c(10L, 20L)"), Ownership::Shared).unwrap();
        assert_eq!(out, v!("c(10L, 2L, 3L)"));

        let index = CompactIndex::Sequence {
            start: 2,
            size: 3,
            step: -1,
        };
        let out = vec_assign(&x, &index, &v!("c(30L, 20L, 10L)"), Ownership::Shared).unwrap();
        assert_eq!(out, v!("c(10L, 20L, 30L)"));
    }

    #[test]
    fn size_and_bounds_are_checked() {
        let x = v!("c(1, 2)");
        assert_eq!(
            vec_assign(&x, &CompactIndex::from(vec![1, 2]), &v!("1"), Ownership::Shared),
            Err(Error::InternalSizeMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            vec_assign(&x, &CompactIndex::from(vec![3]), &v!("1"), Ownership::Shared),
            Err(Error::OutOfBounds { location: 3, size: 2 })
        );
        assert!(vec_assign(&x, &CompactIndex::from(vec![1]), &v!("\"a\""), Ownership::Shared).is_err());
    }

    #[test]
    fn total_ownership_writes_in_place() {
        let buf: CowObj<Vec<Integer>> = vec![OptionNA::Some(1), OptionNA::Some(2)].into();
        let x = Value::from(Vector::Integer(buf.view_mut()));

        vec_assign(&x, &CompactIndex::from(vec![2]), &v!("5L"), Ownership::Shared).unwrap();
        assert_eq!(buf.get(1), Some(OptionNA::Some(2)));

        vec_assign(&x, &CompactIndex::from(vec![2]), &v!("5L"), Ownership::Total).unwrap();
        assert_eq!(buf.get(1), Some(OptionNA::Some(5)));
        assert_eq!(x, v!("c(1L, 5L)"));
    }

    #[test]
    fn assigning_a_value_into_itself() {
        let buf: CowObj<Vec<Integer>> = vec![OptionNA::Some(1), OptionNA::Some(2)].into();
        let x = Value::from(Vector::Integer(buf.view_mut()));
        let reversed = CompactIndex::Sequence {
            start: 1,
            size: 2,
            step: -1,
        };

        let out = vec_assign(&x, &reversed, &x, Ownership::Total).unwrap();
        assert_eq!(out, v!("c(2L, 1L)"));
    }

    #[test]
    fn tables_assign_per_column() {
        let x = v!("data.frame(a = c(1L, 2L), b = c(\"x\", \"y\"))");
        let value = v!("data.frame(a = 9L, b = \"z\")");
        let out = vec_assign(&x, &CompactIndex::from(vec![2]), &value, Ownership::Shared).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1L, 9L), b = c(\"x\", \"z\"))"));
    }

    #[test]
    fn shaped_values_assign_rows() {
        let x = v!("array(c(1L, 2L, 3L, 4L), dim = c(2L, 2L))");
        let value = v!("array(c(7L, 8L), dim = c(1L, 2L))");
        let out = vec_assign(&x, &CompactIndex::from(vec![2]), &value, Ownership::Shared).unwrap();
        assert_eq!(out, v!("array(c(1L, 7L, 3L, 8L), dim = c(2L, 2L))"));
    }

    #[test]
    fn permutations_round_trip() {
        let mut rng = rand::thread_rng();
        let x = v!("c(1.5, NA, 3, NaN, -2, 0, 7)");

        for _ in 0..20 {
            let mut positions: Vec<i32> = (1..=7).collect();
            positions.shuffle(&mut rng);
            let index = CompactIndex::from(positions);

            let sliced = vec_slice(&x, &index).unwrap();
            let out = vec_assign(&vec_init(&x, 7).unwrap(), &index, &sliced, Ownership::Shared).unwrap();
            assert_eq!(out, x);
        }

        let all = CompactIndex::seq(0, 7);
        assert_eq!(vec_slice(&x, &all).unwrap(), x);
    }
}
