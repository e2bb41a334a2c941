use crate::error::{Action, Error};
use crate::object::vector::coercion::cast_atoms;
use crate::object::*;
use crate::slice::strides::broadcast;
use crate::slice::vec_init;

use super::ptype2::{incompatible, trailing};
use super::{arg_names, is_unspecified, ptype_common};

/// The result of a cast
///
/// `locations` holds the 0-based positions (along the first dimension) of
/// elements that could not be represented exactly. A cast can be lossy
/// without locations when it drops table columns.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub value: Value,
    pub lossy: bool,
    pub locations: Vec<usize>,
}

impl Cast {
    pub fn exact(value: Value) -> Self {
        Cast {
            value,
            lossy: false,
            locations: vec![],
        }
    }

    fn with_locations(value: Value, mut locations: Vec<usize>, dropped: bool) -> Self {
        locations.sort_unstable();
        locations.dedup();
        Cast {
            value,
            lossy: dropped || !locations.is_empty(),
            locations,
        }
    }
}

/// Convert `x` to the type of `to`
///
/// Names of `x` are kept. Lossy element conversions produce missing values
/// (or truncated values for fractional doubles) and are reported through
/// [`Cast::locations`] rather than failing.
///
pub fn vec_cast(x: &Value, to: &Value, x_arg: &str, to_arg: &str) -> Result<Cast, Error> {
    match (x, to) {
        (Value::Null, _) | (_, Value::Null) => Ok(Cast::exact(x.clone())),
        (Value::Scalar(_), _) | (_, Value::Scalar(_)) => {
            Error::NotAVector(super::arg_or(x_arg, "x")).into()
        }
        (Value::Extension(_), _) | (_, Value::Extension(_)) => cast_extension(x, to, x_arg, to_arg),
        (x, to) if is_unspecified(x) => Ok(Cast::exact(vec_init(to, crate::size::vec_size(x)?)?)),
        (Value::Vector(xv, xa), Value::Vector(tv, ta)) => {
            let value = cast_vector(xv, xa, tv.kind(), ta.dim.as_deref());
            value.ok_or_else(|| incompatible(x, to, x_arg, to_arg, Action::Convert))
        }
        (Value::Table(xt), Value::Table(tt)) => cast_table(xt, tt, x_arg),
        _ => incompatible(x, to, x_arg, to_arg, Action::Convert).into(),
    }
}

/// Convert `x` to the type of `to`, failing if any information is lost
pub fn vec_cast_strict(x: &Value, to: &Value, x_arg: &str, to_arg: &str) -> Result<Value, Error> {
    let cast = vec_cast(x, to, x_arg, to_arg)?;
    if cast.lossy {
        return Error::LossyCast {
            x_arg: x_arg.to_string(),
            from: x.type_name(),
            to: to.type_name(),
            locations: cast.locations.iter().map(|i| i + 1).collect(),
        }
        .into();
    }

    Ok(cast.value)
}

/// Cast every input to the common type, or to the type of `to`
pub fn vec_cast_common(xs: &[Value], to: Option<&Value>) -> Result<Vec<Value>, Error> {
    let args = arg_names(xs.len());
    let ptype = ptype_common(xs.iter().zip(args.iter().map(String::as_str)), to)?;

    match ptype {
        None => Ok(xs.to_vec()),
        Some(ptype) => xs
            .iter()
            .zip(args.iter())
            .map(|(x, arg)| vec_cast_strict(x, &ptype, arg, ""))
            .collect(),
    }
}

/// Element-wise conversion between base kinds
///
/// Returns `None` for pairs that have no conversion: character, raw and list
/// vectors only convert to themselves.
///
pub fn cast_atomic(x: &Vector, to: Kind) -> Option<(Vector, Vec<usize>)> {
    macro_rules! numeric_cast {
        ( $v:expr ) => {{
            let v = $v.borrow();
            match to {
                Kind::Logical => {
                    let (out, lossy) = cast_atoms::<_, Logical>(v.as_slice());
                    Some((Vector::from(out), lossy))
                }
                Kind::Integer => {
                    let (out, lossy) = cast_atoms::<_, Integer>(v.as_slice());
                    Some((Vector::from(out), lossy))
                }
                Kind::Double => {
                    let (out, lossy) = cast_atoms::<_, Double>(v.as_slice());
                    Some((Vector::from(out), lossy))
                }
                Kind::Complex => {
                    let (out, lossy) = cast_atoms::<_, Complex>(v.as_slice());
                    Some((Vector::from(out), lossy))
                }
                _ => None,
            }
        }};
    }

    if x.kind() == to {
        return Some((x.clone(), vec![]));
    }

    match x {
        Vector::Logical(v) => numeric_cast!(v),
        Vector::Integer(v) => numeric_cast!(v),
        Vector::Double(v) => numeric_cast!(v),
        Vector::Complex(v) => numeric_cast!(v),
        _ => None,
    }
}

fn cast_vector(x: &Vector, attrs: &Attributes, to: Kind, to_dim: Option<&[usize]>) -> Option<Cast> {
    let n = data_size(x, attrs);
    let x_trailing = trailing(attrs.dim.as_deref());
    let to_trailing = trailing(to_dim);

    // trailing dimensions of size 1 broadcast to the target shape
    let (data, dim) = if x_trailing == to_trailing {
        (x.clone(), attrs.dim.clone())
    } else {
        if x_trailing.len() > to_trailing.len() {
            return None;
        }
        let padded: Vec<usize> = (0..to_trailing.len())
            .map(|k| x_trailing.get(k).copied().unwrap_or(1))
            .collect();
        if padded.iter().zip(to_trailing).any(|(l, r)| l != r && *l != 1) {
            return None;
        }

        let from_dim: Vec<usize> = std::iter::once(n).chain(padded).collect();
        let to_dim: Vec<usize> = std::iter::once(n).chain(to_trailing.iter().copied()).collect();
        (broadcast(x, &from_dim, &to_dim), Some(to_dim))
    };

    let (out, lossy) = cast_atomic(&data, to)?;
    let locations = lossy.into_iter().map(|i| if n > 0 { i % n } else { i }).collect();
    let value = Value::Vector(
        out,
        Attributes {
            names: attrs.names.clone(),
            dim,
        },
    );

    Some(Cast::with_locations(value, locations, false))
}

// The result holds exactly the target's columns. Missing columns are filled
// with missing values and columns absent from the target are dropped, which
// makes the cast lossy.
fn cast_table(x: &Table, to: &Table, x_arg: &str) -> Result<Cast, Error> {
    let x_names = x.name_map();
    let mut columns = vec![];
    let mut locations = vec![];
    let mut dropped = false;

    for (name, col) in to.names.iter().zip(to.columns.iter()) {
        match x_names.get(name.as_str()) {
            Some(&i) => {
                let arg = match x_arg {
                    "" => name.clone(),
                    arg => format!("{arg}${name}"),
                };
                let cast = vec_cast(&x.columns[i], col, &arg, name)?;
                dropped |= cast.lossy && cast.locations.is_empty();
                locations.extend(cast.locations);
                columns.push(cast.value);
            }
            None => columns.push(vec_init(col, x.size())?),
        }
    }

    let to_names = to.name_map();
    dropped |= x.names.iter().any(|n| !to_names.contains_key(n.as_str()));

    let table = Table {
        names: to.names.clone(),
        columns,
        row_names: x.row_names.clone(),
        kind: to.kind,
    };

    Ok(Cast::with_locations(Value::Table(table), locations, dropped))
}

// The target's handler is asked first, then the handler of `x`. Without an
// answer, extensions of the same class convert their payloads.
fn cast_extension(x: &Value, to: &Value, x_arg: &str, to_arg: &str) -> Result<Cast, Error> {
    for side in [to, x] {
        if let Value::Extension(e) = side {
            if let Some(cast) = lookup(&e.class).and_then(|h| h.cast(x, to)) {
                return cast;
            }
        }
    }

    match (x, to) {
        (Value::Extension(l), Value::Extension(r)) if l.class == r.class => {
            let cast = vec_cast(&l.data, &r.data, x_arg, to_arg)?;
            Ok(Cast {
                value: r.rewrap(cast.value),
                ..cast
            })
        }
        (x, Value::Extension(r)) if is_unspecified(x) => {
            let value = vec_init(&r.data, crate::size::vec_size(x)?)?;
            Ok(Cast::exact(r.rewrap(value)))
        }
        _ => incompatible(x, to, x_arg, to_arg, Action::Convert).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;

    fn cast(x: &str, to: &str) -> Result<Cast, Error> {
        vec_cast(&v!(x), &v!(to), "x", "to")
    }

    #[test]
    fn integer_to_double_is_exact() {
        let c = cast("c(1L, NA)", "double(0)").unwrap();
        assert_eq!(c.value, v!("c(1, NA)"));
        assert!(!c.lossy);
    }

    #[test]
    fn double_to_integer_reports_locations() {
        let c = cast("c(1, 1.5, 3e10, NA)", "integer(0)").unwrap();
        assert_eq!(c.value, v!("c(1L, 1L, NA, NA)"));
        assert_eq!(c.locations, vec![1, 2]);

        let strict = vec_cast_strict(&v!("c(1, 1.5)"), &v!("integer(0)"), "x", "");
        assert_eq!(
            strict,
            Err(Error::LossyCast {
                x_arg: "x".to_string(),
                from: "double".to_string(),
                to: "integer".to_string(),
                locations: vec![2],
            })
        );
    }

    #[test]
    fn names_survive() {
        let c = cast("c(a = 1L)", "double(0)").unwrap();
        assert_eq!(c.value, v!("c(a = 1)"));
    }

    #[test]
    fn no_implicit_character_conversions() {
        assert!(matches!(
            cast("1", "character(0)"),
            Err(Error::IncompatibleType { action: Action::Convert, .. })
        ));
        assert!(cast("\"a\"", "double(0)").is_err());
    }

    #[test]
    fn unspecified_becomes_missing() {
        let c = cast("c(NA, NA)", "character(0)").unwrap();
        assert_eq!(c.value, v!("c(NA_character_, NA_character_)"));
        assert_eq!(cast("NULL", "1").unwrap().value, Value::Null);
    }

    #[test]
    fn casting_is_idempotent() {
        for (x, to) in [("c(1L, 2L)", "double(0)"), ("TRUE", "complex(0)"), ("c(0.5, 2)", "integer(0)")] {
            let once = cast(x, to).unwrap().value;
            let twice = vec_cast(&once, &v!(to), "", "").unwrap();
            assert_eq!(twice.value, once);
            assert!(!twice.lossy);
        }
    }

    #[test]
    fn tables_take_the_target_columns() {
        let x = v!("data.frame(a = c(1L, 2L), b = c(\"x\", \"y\"))");
        let to = v!("data.frame(a = double(0), c = logical(0))");
        let c = vec_cast(&x, &to, "", "").unwrap();

        assert_eq!(c.value, v!("data.frame(a = c(1, 2), c = c(NA, NA))"));
        assert!(c.lossy);
        assert!(c.locations.is_empty());

        let to = v!("data.frame(a = double(0), b = character(0), c = logical(0))");
        assert!(!vec_cast(&x, &to, "", "").unwrap().lossy);
    }

    #[test]
    fn shapes_broadcast_along_trailing_dimensions() {
        let x = v!("c(1L, 2L)");
        let to = v!("array(double(0), dim = c(0L, 3L))");
        let c = vec_cast(&x, &to, "", "").unwrap();
        assert_eq!(
            c.value,
            v!("array(c(1, 2, 1, 2, 1, 2), dim = c(2L, 3L))")
        );

        let x = v!("array(c(1L, 2L, 3L, 4L), dim = c(2L, 2L))");
        assert!(vec_cast(&x, &to, "", "").is_err());
    }

    #[test]
    fn common_cast() {
        let xs = vec![v!("1L"), v!("2.5"), Value::Null];
        let out = vec_cast_common(&xs, None).unwrap();
        assert_eq!(out, vec![v!("1"), v!("2.5"), Value::Null]);
    }
}
