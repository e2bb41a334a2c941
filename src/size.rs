use crate::error::Error;
use crate::object::*;
use crate::proxy::vec_proxy;
use crate::slice::vec_slice;

/// Number of observations, the extent along the first dimension
pub fn vec_size(x: &Value) -> Result<usize, Error> {
    match x {
        Value::Null => Ok(0),
        Value::Unspecified(n) => Ok(*n),
        Value::Vector(v, attrs) => Ok(data_size(v, attrs)),
        Value::Table(t) => Ok(t.size()),
        Value::Extension(_) => vec_size(&vec_proxy(x)?),
        Value::Scalar(r) => Error::NotAVector(r.class.clone()).into(),
    }
}

/// The size all inputs recycle to
///
/// `Null` inputs are ignored and size-1 inputs recycle to any size. `absent`
/// is returned when every input is `Null`.
///
pub fn vec_size_common(xs: &[Value], absent: usize) -> Result<usize, Error> {
    let args: Vec<String> = (1..=xs.len()).map(|i| format!("..{i}")).collect();
    size_common(xs.iter().zip(args.iter().map(String::as_str)), absent)
}

pub(crate) fn size_common<'a, I>(xs: I, absent: usize) -> Result<usize, Error>
where
    I: IntoIterator<Item = (&'a Value, &'a str)>,
{
    let mut common: Option<usize> = None;

    for (x, arg) in xs {
        if x.is_null() {
            continue;
        }

        let n = vec_size(x)?;
        common = match common {
            None | Some(1) => Some(n),
            Some(size) if n == size || n == 1 => Some(size),
            Some(size) => {
                return Error::IncompatibleSize {
                    x_arg: arg.to_string(),
                    size: n,
                    target: size,
                }
                .into()
            }
        };
    }

    Ok(common.unwrap_or(absent))
}

/// Recycle a value to size `n`
///
/// Values of size `n` are returned as they are, values of size 1 are
/// repeated `n` times. Any other size is an error.
///
pub fn vec_recycle(x: &Value, n: usize, x_arg: &str) -> Result<Value, Error> {
    if x.is_null() {
        return Ok(Value::Null);
    }

    match vec_size(x)? {
        size if size == n => Ok(x.clone()),
        1 => vec_slice(x, &CompactIndex::rep(OptionNA::Some(1), n)),
        size => Error::IncompatibleSize {
            x_arg: x_arg.to_string(),
            size,
            target: n,
        }
        .into(),
    }
}

/// Recycle every input to their common size, or to `size` when given
pub fn vec_recycle_common(xs: &[Value], size: Option<usize>) -> Result<Vec<Value>, Error> {
    let n = match size {
        Some(n) => n,
        None => vec_size_common(xs, 0)?,
    };

    xs.iter()
        .enumerate()
        .map(|(i, x)| vec_recycle(x, n, &format!("..{}", i + 1)))
        .collect()
}
