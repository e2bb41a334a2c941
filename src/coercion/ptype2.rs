use crate::error::{Action, Error};
use crate::object::*;

use super::{arg_or, is_unspecified, vec_ptype};

/// The result of joining two types
///
/// `ptype` is `None` when both inputs are `Null`. `left_dominant` reports
/// that the joined type is exactly the type of the left input, which lets a
/// fold keep attributing errors to the input that set the type.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Ptype2 {
    pub ptype: Option<Value>,
    pub left_dominant: bool,
}

/// Join the types of two values
pub fn vec_ptype2(x: &Value, y: &Value, x_arg: &str, y_arg: &str) -> Result<Ptype2, Error> {
    let ptype = ptype2(x, y, x_arg, y_arg)?;
    let left_dominant = match (&ptype, vec_ptype(x, x_arg)?) {
        (None, None) => true,
        (Some(joined), Some(left)) => *joined == left,
        _ => false,
    };

    Ok(Ptype2 { ptype, left_dominant })
}

pub(crate) fn incompatible(x: &Value, y: &Value, x_arg: &str, y_arg: &str, action: Action) -> Error {
    Error::IncompatibleType {
        x_arg: x_arg.to_string(),
        y_arg: y_arg.to_string(),
        x_type: x.type_name(),
        y_type: y.type_name(),
        action,
    }
}

fn ptype2(x: &Value, y: &Value, x_arg: &str, y_arg: &str) -> Result<Option<Value>, Error> {
    match (x, y) {
        (Value::Scalar(_), _) => Error::NotAVector(arg_or(x_arg, "x")).into(),
        (_, Value::Scalar(_)) => Error::NotAVector(arg_or(y_arg, "y")).into(),
        (Value::Null, y) => vec_ptype(y, y_arg),
        (x, Value::Null) => vec_ptype(x, x_arg),
        (x, y) if is_unspecified(x) && is_unspecified(y) => Ok(Some(Value::Unspecified(0))),
        (x, y) if is_unspecified(x) => vec_ptype(y, y_arg),
        (x, y) if is_unspecified(y) => vec_ptype(x, x_arg),
        (Value::Extension(_), _) | (_, Value::Extension(_)) => ptype2_extension(x, y, x_arg, y_arg),
        (Value::Vector(xv, xa), Value::Vector(yv, ya)) => {
            let kind = join_kinds(xv.kind(), yv.kind());
            let dim = join_shapes(xa.dim.as_deref(), ya.dim.as_deref());
            match (kind.and_then(|k| Vector::na_of(k, 0)), dim) {
                (Some(v), Some(dim)) => Ok(Some(Value::Vector(v, Attributes { names: None, dim }))),
                _ => incompatible(x, y, x_arg, y_arg, Action::Combine).into(),
            }
        }
        (Value::Table(xt), Value::Table(yt)) => ptype2_table(xt, yt, x_arg, y_arg).map(Some),
        _ => incompatible(x, y, x_arg, y_arg, Action::Combine).into(),
    }
}

/// Join of two base kinds along logical < integer < double < complex
pub fn join_kinds(x: Kind, y: Kind) -> Option<Kind> {
    fn numeric_rank(x: Kind) -> Option<u8> {
        match x {
            Kind::Logical => Some(0),
            Kind::Integer => Some(1),
            Kind::Double => Some(2),
            Kind::Complex => Some(3),
            _ => None,
        }
    }

    if x == y {
        return Some(x);
    }

    match (numeric_rank(x), numeric_rank(y)) {
        (Some(l), Some(r)) if l >= r => Some(x),
        (Some(_), Some(_)) => Some(y),
        _ => None,
    }
}

pub(crate) fn trailing(dim: Option<&[usize]>) -> &[usize] {
    match dim {
        Some(d) if d.len() > 1 => &d[1..],
        _ => &[],
    }
}

// Broadcast of the trailing dimensions, or `None` if they are incompatible.
// The outer `Some(None)` is the join of two unshaped vectors.
fn join_shapes(x: Option<&[usize]>, y: Option<&[usize]>) -> Option<Option<Vec<usize>>> {
    let (x, y) = (trailing(x), trailing(y));
    if x.is_empty() && y.is_empty() {
        return Some(None);
    }

    let mut dim = vec![0];
    for k in 0..x.len().max(y.len()) {
        let (l, r) = (x.get(k).copied().unwrap_or(1), y.get(k).copied().unwrap_or(1));
        dim.push(match (l, r) {
            (l, r) if l == r || r == 1 => l,
            (1, r) => r,
            _ => return None,
        });
    }

    Some(Some(dim))
}

// Shared names in the same order join positionally. Otherwise the result
// holds x's columns followed by the columns only found in y.
fn ptype2_table(x: &Table, y: &Table, x_arg: &str, y_arg: &str) -> Result<Value, Error> {
    let column_arg = |arg: &str, name: &str| match arg {
        "" => name.to_string(),
        arg => format!("{arg}${name}"),
    };

    let (names, columns) = if x.names == y.names {
        let columns = x
            .names
            .iter()
            .zip(x.columns.iter().zip(y.columns.iter()))
            .map(|(name, (l, r))| {
                let joined = ptype2(l, r, &column_arg(x_arg, name), &column_arg(y_arg, name))?;
                Ok(joined.unwrap_or(Value::Null))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        (x.names.clone(), columns)
    } else {
        let y_names = y.name_map();
        let mut names = vec![];
        let mut columns = vec![];

        for (name, l) in x.names.iter().zip(x.columns.iter()) {
            let joined = match y_names.get(name.as_str()) {
                Some(&j) => ptype2(l, &y.columns[j], &column_arg(x_arg, name), &column_arg(y_arg, name))?,
                None => vec_ptype(l, name)?,
            };
            names.push(name.clone());
            columns.push(joined.unwrap_or(Value::Null));
        }

        let x_names = x.name_map();
        for (name, r) in y.names.iter().zip(y.columns.iter()) {
            if !x_names.contains_key(name.as_str()) {
                names.push(name.clone());
                columns.push(vec_ptype(r, name)?.unwrap_or(Value::Null));
            }
        }

        (names, columns)
    };

    let table = Table::with_size(names, columns, 0).with_kind(x.kind.join(y.kind));
    Ok(Value::Table(table))
}

// The left handler is asked first, then the right one. Without an answer,
// two extensions of the same class join through their payloads.
fn ptype2_extension(x: &Value, y: &Value, x_arg: &str, y_arg: &str) -> Result<Option<Value>, Error> {
    for side in [x, y] {
        if let Value::Extension(e) = side {
            if let Some(joined) = lookup(&e.class).and_then(|h| h.ptype2(x, y)) {
                return joined.map(Some);
            }
        }
    }

    match (x, y) {
        (Value::Extension(l), Value::Extension(r)) if l.class == r.class => {
            let joined = ptype2(&l.data, &r.data, x_arg, y_arg)?;
            Ok(Some(l.rewrap(joined.unwrap_or(Value::Null))))
        }
        _ => incompatible(x, y, x_arg, y_arg, Action::Combine).into(),
    }
}
