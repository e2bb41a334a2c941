use std::cmp::Ordering;

use crate::coercion::vec_cast_common;
use crate::equal::check_columns;
use crate::error::Error;
use crate::object::types::{classify, DoubleClass};
use crate::object::*;
use crate::proxy::vec_proxy_compare;
use crate::size::{vec_recycle_common, vec_size};

/// Three-way element comparison
///
/// Yields `-1`, `0` or `1`. With `na_equal`, missing values sort before every
/// other value (doubles additionally place `NaN` after every number). Without
/// it, comparisons involving a missing value are missing.
///
pub trait ScalarOrd {
    fn compare(&self, other: &Self, na_equal: bool) -> Integer;
}

fn ordering(x: Ordering) -> i32 {
    match x {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

macro_rules! register_scalar_ord {
    ( $($t:ty),* ) => {
        $(
            impl ScalarOrd for OptionNA<$t> {
                fn compare(&self, other: &Self, na_equal: bool) -> Integer {
                    match (self, other) {
                        (OptionNA::Some(l), OptionNA::Some(r)) => OptionNA::Some(ordering(l.cmp(r))),
                        _ if !na_equal => OptionNA::NA,
                        (OptionNA::NA, OptionNA::NA) => OptionNA::Some(0),
                        (OptionNA::NA, _) => OptionNA::Some(-1),
                        (_, OptionNA::NA) => OptionNA::Some(1),
                    }
                }
            }
        )*
    };
}

register_scalar_ord!(bool, i32, String);

impl ScalarOrd for Double {
    fn compare(&self, other: &Self, na_equal: bool) -> Integer {
        let rank = |c: DoubleClass| match c {
            DoubleClass::Missing => 0,
            DoubleClass::Number => 1,
            DoubleClass::NaN => 2,
        };

        match (self, other, classify(self), classify(other)) {
            (OptionNA::Some(l), OptionNA::Some(r), DoubleClass::Number, DoubleClass::Number) => {
                OptionNA::Some(ordering(l.partial_cmp(r).unwrap_or(Ordering::Equal)))
            }
            _ if !na_equal => OptionNA::NA,
            (.., l, r) => OptionNA::Some(ordering(rank(l).cmp(&rank(r)))),
        }
    }
}

impl ScalarOrd for Raw {
    fn compare(&self, other: &Self, _na_equal: bool) -> Integer {
        OptionNA::Some(ordering(self.cmp(other)))
    }
}

/// Compare one element of `x` with one element of `y`
///
/// Both values must be comparison proxies of the same kind. For table rows,
/// the first column that does not compare equal decides.
///
pub fn compare_scalar(x: &Value, i: usize, y: &Value, j: usize, na_equal: bool) -> Result<Integer, Error> {
    fn at<T: ScalarOrd>(l: &[T], i: usize, r: &[T], j: usize, na_equal: bool) -> Result<Integer, Error> {
        match (l.get(i), r.get(j)) {
            (Some(a), Some(b)) => Ok(a.compare(b, na_equal)),
            _ => crate::internal_err!("comparison location out of bounds"),
        }
    }

    match (x, y) {
        (Value::Vector(xv, _), Value::Vector(yv, _)) => match (xv, yv) {
            (Vector::Logical(l), Vector::Logical(r)) => at(&l.borrow(), i, &r.borrow(), j, na_equal),
            (Vector::Integer(l), Vector::Integer(r)) => at(&l.borrow(), i, &r.borrow(), j, na_equal),
            (Vector::Double(l), Vector::Double(r)) => at(&l.borrow(), i, &r.borrow(), j, na_equal),
            (Vector::Character(l), Vector::Character(r)) => at(&l.borrow(), i, &r.borrow(), j, na_equal),
            (Vector::Raw(l), Vector::Raw(r)) => at(&l.borrow(), i, &r.borrow(), j, na_equal),
            (Vector::Complex(_), _) | (Vector::List(_), _) => {
                Error::ScalarIncomparable(format!("{} vectors have no order", xv.kind())).into()
            }
            _ => crate::internal_err!("comparison proxies must share a kind"),
        },
        (Value::Table(xt), Value::Table(yt)) => {
            check_columns(xt, yt)?;
            for (l, r) in xt.columns.iter().zip(yt.columns.iter()) {
                let cmp = compare_scalar(l, i, r, j, na_equal)?;
                if cmp != OptionNA::Some(0) {
                    return Ok(cmp);
                }
            }
            Ok(OptionNA::Some(0))
        }
        (Value::Unspecified(_), Value::Unspecified(_)) if na_equal => Ok(OptionNA::Some(0)),
        (Value::Unspecified(_), Value::Unspecified(_)) => Ok(OptionNA::NA),
        (Value::Scalar(r), _) | (_, Value::Scalar(r)) => {
            Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into()
        }
        _ => crate::internal_err!("comparison proxies must share a kind"),
    }
}

/// Element-wise three-way comparison of two values
///
/// Lists are not comparable. Inputs are cast to their common type and
/// recycled to a common size first.
///
pub fn vec_compare(x: &Value, y: &Value, na_equal: bool) -> Result<Vec<Integer>, Error> {
    let cast = vec_cast_common(&[x.clone(), y.clone()], None)?;
    let recycled = vec_recycle_common(&cast, None)?;
    let (x, y) = (
        vec_proxy_compare(&recycled[0], false)?,
        vec_proxy_compare(&recycled[1], false)?,
    );
    let n = vec_size(&x)?;

    match (&x, &y) {
        (Value::Table(xt), Value::Table(yt)) => table_compare(xt, yt, n, na_equal),
        _ => (0..n).map(|i| compare_scalar(&x, i, &y, i, na_equal)).collect(),
    }
}

fn table_compare(x: &Table, y: &Table, n: usize, na_equal: bool) -> Result<Vec<Integer>, Error> {
    check_columns(x, y)?;

    let mut out = vec![OptionNA::Some(0); n];
    let mut row_known = vec![false; n];
    let mut remaining = n;

    for (l, r) in x.columns.iter().zip(y.columns.iter()) {
        if remaining == 0 {
            break;
        }

        for i in 0..n {
            if row_known[i] {
                continue;
            }

            let cmp = compare_scalar(l, i, r, i, na_equal)?;
            if cmp != OptionNA::Some(0) {
                out[i] = cmp;
                row_known[i] = true;
                remaining -= 1;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;

    fn dbl(class: DoubleClass) -> Double {
        match class {
            DoubleClass::Number => OptionNA::Some(0.0),
            DoubleClass::Missing => OptionNA::NA,
            DoubleClass::NaN => OptionNA::Some(f64::NAN),
        }
    }

    #[test]
    fn double_classes_pairwise() {
        use DoubleClass::*;
        let order = |c| match c {
            Missing => 0,
            Number => 1,
            NaN => 2,
        };

        for l in [Number, Missing, NaN] {
            for r in [Number, Missing, NaN] {
                let (a, b) = (dbl(l), dbl(r));

                let expected = OptionNA::Some(ordering(order(l).cmp(&order(r))));
                assert_eq!(a.compare(&b, true), expected, "{l} vs {r}, na_equal");

                let expected = match (l, r) {
                    (Number, Number) => OptionNA::Some(0),
                    _ => OptionNA::NA,
                };
                assert_eq!(a.compare(&b, false), expected, "{l} vs {r}, propagating");
            }
        }
    }

    #[test]
    fn missing_strings_sort_first() {
        let na: Character = OptionNA::NA;
        let a: Character = OptionNA::Some("a".to_string());
        assert_eq!(na.compare(&a, true), OptionNA::Some(-1));
        assert_eq!(a.compare(&na, false), OptionNA::NA);
    }

    #[test]
    fn vectorized_comparison() {
        let x = v!("c(1L, 5L, NA)");
        let y = v!("c(2, 5, 1)");
        assert_eq!(
            vec_compare(&x, &y, false).unwrap(),
            vec![OptionNA::Some(-1), OptionNA::Some(0), OptionNA::NA]
        );
    }

    #[test]
    fn first_differing_column_decides() {
        let x = v!("data.frame(a = c(1L, 1L), b = c(\"z\", \"a\"))");
        let y = v!("data.frame(a = c(2L, 1L), b = c(\"a\", \"b\"))");
        assert_eq!(
            vec_compare(&x, &y, true).unwrap(),
            vec![OptionNA::Some(-1), OptionNA::Some(-1)]
        );
    }

    #[test]
    fn complex_compares_by_parts() {
        let x = v!("c(1+2i, 1+1i)");
        let y = v!("c(1+3i, 1+1i)");
        assert_eq!(
            vec_compare(&x, &y, true).unwrap(),
            vec![OptionNA::Some(-1), OptionNA::Some(0)]
        );
    }

    #[test]
    fn lists_are_not_comparable() {
        let x = v!("list(1, 2)");
        assert!(matches!(
            vec_compare(&x, &x, true),
            Err(Error::ScalarIncomparable(_))
        ));
    }
}
