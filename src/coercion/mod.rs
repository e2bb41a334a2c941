//! Type lattice and casting
//!
//! [`vec_ptype2`] joins two types into the smallest type both can be
//! represented in, and [`vec_cast`] converts a value into a given type,
//! reporting the elements that could not be represented exactly.
//!

mod cast;
pub use cast::*;

mod ptype2;
pub use ptype2::*;

use tracing::trace;

use crate::error::Error;
use crate::object::*;

/// Whether a value is untyped missing data
///
/// Besides explicit `Unspecified` values, a non-empty logical vector holding
/// only missing values and no attributes joins with any other type.
///
pub fn is_unspecified(x: &Value) -> bool {
    match x {
        Value::Unspecified(_) => true,
        Value::Vector(Vector::Logical(v), Attributes { names: None, dim: None }) => {
            !v.is_empty() && v.borrow().iter().all(|x| x.is_na())
        }
        _ => false,
    }
}

/// The empty prototype of a value
///
/// Returns `None` for `Null`. Names are dropped, shapes are kept with a
/// first dimension of zero.
///
pub fn vec_ptype(x: &Value, x_arg: &str) -> Result<Option<Value>, Error> {
    let ptype = match x {
        Value::Null => return Ok(None),
        x if is_unspecified(x) => Value::Unspecified(0),
        Value::Vector(v, attrs) => {
            let dim = attrs.dim.as_ref().filter(|d| d.len() > 1).map(|d| {
                let mut d = d.clone();
                d[0] = 0;
                d
            });
            Value::Vector(v.empty_like(), Attributes { names: None, dim })
        }
        Value::Table(t) => {
            let columns = t
                .names
                .iter()
                .zip(t.columns.iter())
                .map(|(name, col)| Ok(vec_ptype(col, name)?.unwrap_or(Value::Null)))
                .collect::<Result<Vec<_>, Error>>()?;

            Value::Table(Table::with_size(t.names.clone(), columns, 0).with_kind(t.kind))
        }
        Value::Extension(e) => e.rewrap(vec_ptype(&e.data, x_arg)?.unwrap_or(Value::Null)),
        Value::Scalar(_) => return Error::NotAVector(arg_or(x_arg, "x")).into(),
        Value::Unspecified(_) => Value::Unspecified(0),
    };

    Ok(Some(ptype))
}

/// Replace untyped missing data by logical vectors
pub fn vec_ptype_finalise(x: Value) -> Value {
    match x {
        Value::Unspecified(n) => Value::from(vec![Logical::NA; n]),
        Value::Table(t) => {
            let columns = t.columns.into_iter().map(vec_ptype_finalise).collect();
            Value::Table(Table { columns, ..t })
        }
        Value::Extension(e) => e.rewrap(vec_ptype_finalise(*e.data.clone())),
        x => x,
    }
}

/// The common type of all inputs
///
/// Types are joined from left to right. An explicit `ptype` takes precedence
/// over the inputs. Returns `None` when every input is `Null`.
///
pub fn vec_ptype_common(xs: &[Value], ptype: Option<&Value>) -> Result<Option<Value>, Error> {
    let args = arg_names(xs.len());
    ptype_common(xs.iter().zip(args.iter().map(String::as_str)), ptype)
}

pub(crate) fn ptype_common<'a, I>(xs: I, ptype: Option<&Value>) -> Result<Option<Value>, Error>
where
    I: IntoIterator<Item = (&'a Value, &'a str)>,
{
    if let Some(ptype) = ptype {
        return Ok(vec_ptype(ptype, ".ptype")?.map(vec_ptype_finalise));
    }

    let mut common = Value::Null;
    let mut common_arg = String::new();

    for (x, arg) in xs {
        let joined = vec_ptype2(&common, x, &common_arg, arg)?;
        if !joined.left_dominant {
            common_arg = arg.to_string();
        }
        common = joined.ptype.unwrap_or(Value::Null);
    }

    trace!(ptype = %common.type_name(), "common type");

    Ok(match common {
        Value::Null => None,
        x => Some(vec_ptype_finalise(x)),
    })
}

pub(crate) fn arg_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("..{i}")).collect()
}

pub(crate) fn arg_or(arg: &str, fallback: &str) -> String {
    if arg.is_empty() {
        fallback.to_string()
    } else {
        arg.to_string()
    }
}
