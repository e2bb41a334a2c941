use tracing::{debug, debug_span};

use crate::coercion::ptype_common;
use crate::err;
use crate::error::Error;
use crate::names::make_unique;
use crate::object::*;
use crate::size::{size_common, vec_recycle};

use super::{arg_names, outer_name, Arg, BindOptions};

/// Place inputs side by side as the columns of a table
///
/// Inputs are recycled to their common size (or `options.size`). Unnamed
/// tables and matrices contribute each of their columns, while named ones
/// are packed into a single column. Plain vectors become one column named
/// after the input. Column names are repaired to be unique.
///
/// The output is a tibble when any input (or `options.ptype`) is, and
/// inherits the row names of its table inputs, which must agree.
///
pub fn vec_cbind(xs: &[Arg], options: &BindOptions) -> Result<Value, Error> {
    let _span = debug_span!("vec_cbind", n = xs.len()).entered();
    let args = arg_names(xs);

    // containers are joined apart from their columns
    let mut row_names: Option<Vec<String>> = None;
    let mut containers = vec![];
    for x in xs.iter().map(|(_, x)| x).chain(options.ptype.iter()) {
        containers.push(container_type(x, &mut row_names)?);
    }
    let container_args: Vec<&str> = args.iter().map(String::as_str).chain(std::iter::once(".ptype")).collect();
    let kind = match ptype_common(containers.iter().zip(container_args), None)? {
        Some(Value::Table(t)) => t.kind,
        _ => TableKind::default(),
    };

    let size = match options.size {
        Some(size) => size,
        None => size_common(xs.iter().map(|(_, x)| x).zip(args.iter().map(String::as_str)), 0)?,
    };
    debug!(size, %kind, "binding columns");

    let row_names = match row_names {
        Some(rn) if rn.len() == size => Some(rn),
        Some(rn) if rn.len() == 1 => Some(make_unique(&vec![rn[0].clone(); size])),
        Some(rn) => {
            return Error::IncompatibleSize {
                x_arg: "row names".to_string(),
                size: rn.len(),
                target: size,
            }
            .into()
        }
        None => None,
    };

    let mut names = vec![];
    let mut columns = vec![];

    for ((name, x), arg) in xs.iter().zip(args.iter()) {
        if x.is_null() {
            continue;
        }

        let x = vec_recycle(x, size, arg)?;
        match (outer_name(name), as_columns(&x)?) {
            // named tables and matrices are packed
            (Some(outer), Some(_)) => {
                names.push(outer.to_string());
                columns.push(x);
            }
            (None, Some(table)) => {
                names.extend(table.names);
                columns.extend(table.columns);
            }
            (outer, None) => {
                names.push(outer.unwrap_or_default().to_string());
                columns.push(x);
            }
        }
    }

    let table = Table {
        names: make_unique(&names),
        columns,
        row_names: match row_names {
            Some(rn) => RowNames::Identifiers(rn),
            None => RowNames::Compact(size),
        },
        kind,
    };

    Ok(Value::Table(table))
}

// An empty table carrying only the container type of a table input, noting
// the first identifier row names seen
fn container_type(x: &Value, row_names: &mut Option<Vec<String>>) -> Result<Value, Error> {
    let Value::Table(t) = x else {
        return Ok(Value::Null);
    };

    if let RowNames::Identifiers(ids) = &t.row_names {
        match row_names {
            None => *row_names = Some(ids.clone()),
            Some(learned) if learned != ids => {
                return err!("Can't column-bind data frames with different row names.");
            }
            Some(_) => (),
        }
    }

    Ok(Value::Table(Table::with_size(vec![], vec![], 0).with_kind(t.kind)))
}

// The columns an input unpacks into, or `None` for a plain vector
fn as_columns(x: &Value) -> Result<Option<Table>, Error> {
    match x {
        Value::Table(t) => Ok(Some(t.clone())),
        Value::Vector(_, Attributes { dim: Some(d), .. }) if d.len() > 2 => err!("Can't bind arrays."),
        Value::Vector(v, Attributes { dim: Some(d), .. }) if d.len() == 2 => {
            // positional names are repaired once all columns are known
            let mut table = Table::from_shaped(v, d);
            table.names = vec![String::new(); table.ncol()];
            Ok(Some(table))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::unnamed;
    use crate::v;

    fn args(xs: Vec<(Option<&str>, Value)>) -> Vec<Arg> {
        xs.into_iter().map(|(n, x)| (n.map(String::from), x)).collect()
    }

    #[test]
    fn vectors_become_named_columns() {
        let xs = args(vec![(Some("a"), v!("c(1L, 2L)")), (Some("b"), v!("\"x\""))]);
        let out = vec_cbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1L, 2L), b = c(\"x\", \"x\"))"));
    }

    #[test]
    fn unnamed_inputs_get_repaired_names() {
        let xs = unnamed(vec![v!("c(1L, 2L)"), v!("data.frame(a = c(TRUE, FALSE))")]);
        let out = vec_cbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(`...1` = c(1L, 2L), a = c(TRUE, FALSE))"));
    }

    #[test]
    fn named_tables_are_packed() {
        let xs = args(vec![(Some("t"), v!("data.frame(a = 1L, b = 2L)")), (Some("c"), v!("3"))]);
        let out = vec_cbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(t = data.frame(a = 1L, b = 2L), c = 3)"));
    }

    #[test]
    fn unnamed_matrices_are_unpacked() {
        let xs = unnamed(vec![v!("array(c(1L, 2L, 3L, 4L), dim = c(2L, 2L))")]);
        let out = vec_cbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(`...1` = c(1L, 2L), `...2` = c(3L, 4L))"));
    }

    #[test]
    fn sizes_recycle() {
        let xs = args(vec![(Some("a"), v!("1")), (Some("b"), v!("c(1, 2, 3)")), (None, Value::Null)]);
        let out = vec_cbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1, 1, 1), b = c(1, 2, 3))"));

        let options = BindOptions {
            size: Some(2),
            ..BindOptions::default()
        };
        let xs = args(vec![(Some("a"), v!("1"))]);
        assert_eq!(vec_cbind(&xs, &options).unwrap(), v!("data.frame(a = c(1, 1))"));

        let xs = args(vec![(Some("a"), v!("c(1, 2)")), (Some("b"), v!("c(1, 2, 3)"))]);
        assert!(matches!(
            vec_cbind(&xs, &BindOptions::default()),
            Err(Error::IncompatibleSize { .. })
        ));
    }

    #[test]
    fn row_names_must_agree() {
        let x = v!("data.frame(a = c(1L, 2L), row.names = c(\"r\", \"s\"))");
        let y = v!("data.frame(b = c(3L, 4L), row.names = c(\"r\", \"t\"))");
        assert!(vec_cbind(&unnamed(vec![x.clone(), y]), &BindOptions::default()).is_err());

        let out = vec_cbind(&args(vec![(None, x), (Some("c"), v!("TRUE"))]), &BindOptions::default()).unwrap();
        assert_eq!(
            out,
            v!("data.frame(a = c(1L, 2L), c = c(TRUE, TRUE), row.names = c(\"r\", \"s\"))")
        );
    }

    #[test]
    fn tibble_containers_win() {
        let xs = unnamed(vec![v!("data.frame(a = 1L)"), v!("tibble(b = 2L)")]);
        match vec_cbind(&xs, &BindOptions::default()).unwrap() {
            Value::Table(t) => assert_eq!(t.kind, TableKind::Tibble),
            _ => unreachable!(),
        }

        let out = vec_cbind(&[], &BindOptions::default()).unwrap();
        assert_eq!(out, Value::Table(Table::with_size(vec![], vec![], 0)));
    }
}
