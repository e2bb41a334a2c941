use crate::coercion::vec_cast_common;
use crate::error::Error;
use crate::object::types::{classify, DoubleClass};
use crate::object::*;
use crate::proxy::vec_proxy_equal;
use crate::size::{vec_recycle_common, vec_size};
use crate::zip_vector;

/// Element equality
///
/// With `na_equal`, missing values equal each other and the result is never
/// missing. Without it, any comparison involving a missing value is itself
/// missing.
///
pub trait ScalarEq {
    fn equal(&self, other: &Self, na_equal: bool) -> Logical;
}

macro_rules! register_scalar_eq {
    ( $($t:ty),* ) => {
        $(
            impl ScalarEq for OptionNA<$t> {
                fn equal(&self, other: &Self, na_equal: bool) -> Logical {
                    match (self, other) {
                        (OptionNA::Some(l), OptionNA::Some(r)) => OptionNA::Some(l == r),
                        _ if !na_equal => OptionNA::NA,
                        (l, r) => OptionNA::Some(l.is_na() && r.is_na()),
                    }
                }
            }
        )*
    };
}

// character data is always UTF-8, so strings compare without re-encoding
register_scalar_eq!(bool, i32, String);

impl ScalarEq for Double {
    fn equal(&self, other: &Self, na_equal: bool) -> Logical {
        match (classify(self), classify(other)) {
            (DoubleClass::Number, DoubleClass::Number) => {
                OptionNA::Some(self.as_option() == other.as_option())
            }
            _ if !na_equal => OptionNA::NA,
            (l, r) => OptionNA::Some(l == r),
        }
    }
}

impl ScalarEq for Complex {
    fn equal(&self, other: &Self, na_equal: bool) -> Logical {
        if !na_equal && (self.is_missing() || other.is_missing()) {
            return OptionNA::NA;
        }

        let re = self.re.equal(&other.re, true);
        let im = self.im.equal(&other.im, true);
        OptionNA::Some(re == OptionNA::Some(true) && im == OptionNA::Some(true))
    }
}

impl ScalarEq for Raw {
    fn equal(&self, other: &Self, _na_equal: bool) -> Logical {
        OptionNA::Some(self == other)
    }
}

impl ScalarEq for Value {
    fn equal(&self, other: &Self, na_equal: bool) -> Logical {
        if !na_equal && (self.is_null() || other.is_null()) {
            return OptionNA::NA;
        }
        OptionNA::Some(self == other)
    }
}

/// Compare one element of `x` with one element of `y`
///
/// Both values must be equality proxies of the same kind. Table rows compare
/// column by column, stopping at the first column that is unequal or
/// missing.
///
pub fn equal_scalar(x: &Value, i: usize, y: &Value, j: usize, na_equal: bool) -> Result<Logical, Error> {
    match (x, y) {
        (Value::Vector(xv, _), Value::Vector(yv, _)) => zip_vector!(xv, yv, (l, r) => {
            let (l, r) = (l.borrow(), r.borrow());
            match (l.get(i), r.get(j)) {
                (Some(a), Some(b)) => Ok(a.equal(b, na_equal)),
                _ => crate::internal_err!("equality location out of bounds"),
            }
        }, _ => crate::internal_err!("equality proxies must share a kind")),
        (Value::Table(xt), Value::Table(yt)) => {
            check_columns(xt, yt)?;
            for (l, r) in xt.columns.iter().zip(yt.columns.iter()) {
                let eq = equal_scalar(l, i, r, j, na_equal)?;
                if eq != OptionNA::Some(true) {
                    return Ok(eq);
                }
            }
            Ok(OptionNA::Some(true))
        }
        (Value::Unspecified(_), Value::Unspecified(_)) if na_equal => Ok(OptionNA::Some(true)),
        (Value::Unspecified(_), Value::Unspecified(_)) => Ok(OptionNA::NA),
        (Value::Scalar(r), _) | (_, Value::Scalar(r)) => {
            Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into()
        }
        _ => crate::internal_err!("equality proxies must share a kind"),
    }
}

pub(crate) fn check_columns(x: &Table, y: &Table) -> Result<(), Error> {
    if x.ncol() == 0 || y.ncol() == 0 {
        return Error::ScalarIncomparable("data frames with no columns".to_string()).into();
    }
    if x.ncol() != y.ncol() {
        return Error::ScalarIncomparable("data frames with different numbers of columns".to_string()).into();
    }
    Ok(())
}

/// Element-wise equality of two values
///
/// Inputs are cast to their common type and recycled to a common size
/// before their equality proxies are compared.
///
pub fn vec_equal(x: &Value, y: &Value, na_equal: bool) -> Result<Vec<Logical>, Error> {
    let cast = vec_cast_common(&[x.clone(), y.clone()], None)?;
    let recycled = vec_recycle_common(&cast, None)?;
    let (x, y) = (vec_proxy_equal(&recycled[0])?, vec_proxy_equal(&recycled[1])?);
    let n = vec_size(&x)?;

    match (&x, &y) {
        (Value::Table(xt), Value::Table(yt)) => table_equal(xt, yt, n, na_equal),
        _ => (0..n).map(|i| equal_scalar(&x, i, &y, i, na_equal)).collect(),
    }
}

// Column-wise pass over tables, skipping rows already decided by an earlier
// column
fn table_equal(x: &Table, y: &Table, n: usize, na_equal: bool) -> Result<Vec<Logical>, Error> {
    check_columns(x, y)?;

    let mut out = vec![OptionNA::Some(true); n];
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

            let eq = equal_scalar(l, i, r, i, na_equal)?;
            if eq != OptionNA::Some(true) {
                out[i] = eq;
                row_known[i] = true;
                remaining -= 1;
            }
        }
    }

    Ok(out)
}

/// Per-element missingness
///
/// A table row is missing only when every one of its columns is missing.
///
pub fn vec_equal_na(x: &Value) -> Result<Vec<bool>, Error> {
    let proxy = vec_proxy_equal(x)?;
    proxy_missing(&proxy)
}

/// Whether the element at `i` is missing
pub fn equal_na(x: &Value, i: usize) -> Result<bool, Error> {
    let missing = vec_equal_na(x)?;
    match missing.get(i) {
        Some(m) => Ok(*m),
        None => Error::OutOfBounds {
            location: i + 1,
            size: missing.len(),
        }
        .into(),
    }
}

pub(crate) fn proxy_missing(proxy: &Value) -> Result<Vec<bool>, Error> {
    match proxy {
        Value::Null => Ok(vec![]),
        Value::Unspecified(n) => Ok(vec![true; *n]),
        Value::Vector(v, _) => Ok(v.missing()),
        Value::Table(t) => {
            let mut out = vec![true; t.size()];
            for col in t.columns.iter() {
                for (o, m) in out.iter_mut().zip(proxy_missing(col)?) {
                    *o = *o && m;
                }
            }
            Ok(out)
        }
        Value::Extension(_) => proxy_missing(&vec_proxy_equal(proxy)?),
        Value::Scalar(r) => Error::NotAVector(r.class.clone()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;

    fn dbl(class: DoubleClass, x: f64) -> Double {
        match class {
            DoubleClass::Number => OptionNA::Some(x),
            DoubleClass::Missing => OptionNA::NA,
            DoubleClass::NaN => OptionNA::Some(f64::NAN),
        }
    }

    #[test]
    fn double_classes_pairwise() {
        use DoubleClass::*;
        let classes = [Number, Missing, NaN];

        for l in classes {
            for r in classes {
                let (a, b) = (dbl(l, 1.0), dbl(r, 1.0));

                let expected = OptionNA::Some(l == r);
                assert_eq!(a.equal(&b, true), expected, "{l} vs {r}, na_equal");

                let expected = match (l, r) {
                    (Number, Number) => OptionNA::Some(true),
                    _ => OptionNA::NA,
                };
                assert_eq!(a.equal(&b, false), expected, "{l} vs {r}, propagating");
            }
        }
    }

    #[test]
    fn signed_zeros_are_equal() {
        assert_eq!(OptionNA::Some(0.0).equal(&OptionNA::Some(-0.0), false), OptionNA::Some(true));
    }

    #[test]
    fn complex_parts() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(1.0, 3.0);
        assert_eq!(a.equal(&b, true), OptionNA::Some(false));
        assert_eq!(a.equal(&Complex::default(), false), OptionNA::NA);
        assert_eq!(Complex::default().equal(&Complex::default(), true), OptionNA::Some(true));
    }

    #[test]
    fn list_elements_compare_deeply() {
        let x = v!("list(1, NULL)");
        let y = v!("list(1, NULL)");
        assert_eq!(equal_scalar(&x, 0, &y, 0, false).unwrap(), OptionNA::Some(true));
        assert_eq!(equal_scalar(&x, 1, &y, 1, false).unwrap(), OptionNA::NA);
        assert_eq!(equal_scalar(&x, 1, &y, 1, true).unwrap(), OptionNA::Some(true));
    }

    #[test]
    fn vectorized_equality_casts_and_recycles() {
        let x = v!("c(1L, 2L, NA)");
        let y = v!("2");
        assert_eq!(
            vec_equal(&x, &y, false).unwrap(),
            vec![OptionNA::Some(false), OptionNA::Some(true), OptionNA::NA]
        );
    }

    #[test]
    fn table_rows_stop_at_first_difference() {
        let x = v!("data.frame(a = c(1, 1, NA), b = c(\"x\", \"y\", \"z\"))");
        let y = v!("data.frame(a = c(1, 2, NA), b = c(\"x\", \"y\", NA))");
        assert_eq!(
            vec_equal(&x, &y, false).unwrap(),
            vec![OptionNA::Some(true), OptionNA::Some(false), OptionNA::NA]
        );
        assert_eq!(
            vec_equal(&x, &y, true).unwrap(),
            vec![OptionNA::Some(true), OptionNA::Some(false), OptionNA::Some(false)]
        );
    }

    #[test]
    fn tables_without_columns_are_incomparable() {
        let x = Value::Table(Table::with_size(vec![], vec![], 2));
        assert!(matches!(
            equal_scalar(&x, 0, &x, 1, true),
            Err(Error::ScalarIncomparable(_))
        ));
    }

    #[test]
    fn missing_rows() {
        let x = v!("data.frame(a = c(NA, NA, 1), b = c(NA, 2, NA))");
        assert_eq!(vec_equal_na(&x).unwrap(), vec![true, false, false]);
        assert!(equal_na(&v!("c(NaN, 1)"), 0).unwrap());
    }
}
