use tracing::{debug, debug_span};

use crate::coercion::{is_unspecified, ptype_common, vec_cast_strict};
use crate::err;
use crate::error::Error;
use crate::names::make_unique;
use crate::object::*;
use crate::size::vec_size;
use crate::slice::{vec_assign, vec_init, vec_slice_rep};

use super::{arg_names, outer_name, Arg, BindOptions};

/// Stack inputs as the rows of a table
///
/// Tables contribute their rows, plain vectors become a single row with one
/// column per element (named by the element names) and matrices contribute
/// one row per matrix row. Columns missing from an input are filled with
/// missing values.
///
/// When `options.names_to` is given, a column of that name records the name
/// (or 1-based position) of the input each row came from. Otherwise input
/// names become row names.
///
pub fn vec_rbind(xs: &[Arg], options: &BindOptions) -> Result<Value, Error> {
    let _span = debug_span!("vec_rbind", n = xs.len()).entered();

    let rows = xs
        .iter()
        .map(|(_, x)| as_row(x))
        .collect::<Result<Vec<_>, _>>()?;

    let args = arg_names(xs);
    let ptype = ptype_common(rows.iter().zip(args.iter().map(String::as_str)), options.ptype.as_ref())?;
    let ptype = match ptype {
        None => return Ok(Value::Table(Table::with_size(vec![], vec![], 0))),
        Some(Value::Vector(Vector::Logical(_), _)) => as_row_impl(&Value::from(vec![Logical::NA]))?,
        Some(ptype) => ptype,
    };

    if !matches!(ptype, Value::Table(_)) {
        return err!("Can't bind objects that are not coercible to a data frame.");
    }

    let sizes = rows.iter().map(vec_size).collect::<Result<Vec<_>, _>>()?;
    let size: usize = sizes.iter().sum();
    debug!(size, ptype = %ptype.type_name(), "binding rows");

    let has_names = xs.iter().any(|(name, _)| name.is_some());
    let has_row_names = (options.names_to.is_none() && has_names)
        || rows
            .iter()
            .any(|x| matches!(x, Value::Table(t) if t.row_names.is_identifiers()));

    let mut out = vec_init(&ptype, size)?;
    let mut row_names = vec![String::new(); if has_row_names { size } else { 0 }];
    let mut sources: Vec<usize> = vec![];
    let mut counter = 0;

    for (i, ((x, arg), n)) in rows.iter().zip(args.iter()).zip(sizes).enumerate() {
        if n == 0 {
            continue;
        }

        let row = vec_cast_strict(x, &ptype, arg, "")?;
        out = vec_assign(&out, &CompactIndex::seq(counter, n), &row, Ownership::Total)?;

        let name = &xs[i].0;
        if has_row_names {
            if let Some(rn) = input_row_names(x, name, n, options.names_to.is_some()) {
                row_names[counter..counter + n].clone_from_slice(&rn);
            }
        }

        if options.names_to.is_some() {
            sources.extend(std::iter::repeat(i).take(n));
        }

        counter += n;
    }

    let Value::Table(mut table) = out else {
        return crate::internal_err!("row binding must produce a table");
    };

    if has_row_names {
        table.row_names = RowNames::Identifiers(make_unique(&row_names));
    }

    if let Some(column) = &options.names_to {
        let ids = if has_names {
            let names: Vec<String> = sources.iter().map(|i| xs[*i].0.clone().unwrap_or_default()).collect();
            Value::from(names)
        } else {
            Value::from(sources.iter().map(|i| *i as i32 + 1).collect::<Vec<i32>>())
        };
        table.poke(column, ids);
    }

    Ok(Value::Table(table))
}

// Row names an input contributes, prefixed by the input's name
fn input_row_names(x: &Value, name: &Option<String>, n: usize, names_to: bool) -> Option<Vec<String>> {
    let identifiers = match x {
        Value::Table(Table {
            row_names: RowNames::Identifiers(ids),
            ..
        }) => Some(ids.clone()),
        _ => None,
    };

    match outer_name(name).filter(|_| !names_to) {
        Some(outer) => Some(match identifiers {
            Some(ids) => ids.iter().map(|id| format!("{outer}...{id}")).collect(),
            None if n > 1 => (1..=n).map(|k| format!("{outer}...{k}")).collect(),
            None => vec![outer.to_string()],
        }),
        None => identifiers,
    }
}

/// View an input as table rows
///
/// Missing inputs without names pass through so that they can be cast to
/// rows of missing values.
///
pub fn as_row(x: &Value) -> Result<Value, Error> {
    if is_unspecified(x) && x.names().is_none() {
        return Ok(x.clone());
    }
    as_row_impl(x)
}

fn as_row_impl(x: &Value) -> Result<Value, Error> {
    match x {
        Value::Null | Value::Table(_) => Ok(x.clone()),
        Value::Vector(_, Attributes { dim: Some(d), .. }) if d.len() > 2 => err!("Can't bind arrays."),
        Value::Vector(v, Attributes { dim: Some(d), names }) if d.len() == 2 => {
            let table = Table::from_shaped(v, d);
            let row_names = names.as_ref().map(|n| n.borrow().to_vec());
            Ok(Value::Table(table).with_names(row_names))
        }
        Value::Scalar(r) => Error::NotAVector(r.class.clone()).into(),
        x => {
            let n = vec_size(x)?;
            let names = match x.names() {
                Some(names) => make_unique(
                    &names
                        .into_iter()
                        .map(|n| n.as_option().unwrap_or_default())
                        .collect::<Vec<_>>(),
                ),
                None => make_unique(&vec![String::new(); n]),
            };

            let x = x.clone().with_names(None);
            let columns = (0..n)
                .map(|i| vec_slice_rep(&x, i, 1))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::Table(Table::with_size(names, columns, 1)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::unnamed;
    use crate::v;

    fn named(xs: Vec<(&str, Value)>) -> Vec<Arg> {
        xs.into_iter()
            .map(|(n, x)| (Some(n.to_string()), x))
            .collect()
    }

    #[test]
    fn vectors_become_rows() {
        assert_eq!(
            as_row(&v!("c(a = 1, b = 2)")).unwrap(),
            v!("data.frame(a = 1, b = 2)")
        );
        assert_eq!(
            as_row(&v!("c(1L, 2L)")).unwrap(),
            v!("data.frame(`...1` = 1L, `...2` = 2L)")
        );
        assert!(as_row(&v!("array(integer(0), dim = c(0L, 1L, 1L))")).is_err());
    }

    #[test]
    fn columns_are_unioned() {
        let xs = unnamed(vec![
            v!("data.frame(a = c(1L, 2L))"),
            v!("data.frame(b = \"x\", a = 3.5)"),
        ]);
        let out = vec_rbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(
            out,
            v!("data.frame(a = c(1, 2, 3.5), b = c(NA, NA, \"x\"))")
        );
    }

    #[test]
    fn named_vectors_and_tables_mix() {
        let xs = unnamed(vec![v!("c(a = 1L, b = 2L)"), v!("data.frame(a = 3L)")]);
        let out = vec_rbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1L, 3L), b = c(2L, NA))"));
    }

    #[test]
    fn missing_inputs_become_missing_rows() {
        let xs = unnamed(vec![v!("data.frame(a = 1L)"), v!("NA"), Value::Null]);
        let out = vec_rbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1L, NA))"));
    }

    #[test]
    fn names_become_row_names() {
        let xs = named(vec![
            ("x", v!("data.frame(a = c(1L, 2L))")),
            ("y", v!("data.frame(a = 3L)")),
        ]);
        let out = vec_rbind(&xs, &BindOptions::default()).unwrap();
        assert_eq!(
            out,
            v!("data.frame(a = c(1L, 2L, 3L), row.names = c(\"x...1\", \"x...2\", \"y\"))")
        );
    }

    #[test]
    fn names_to_records_the_source() {
        let options = BindOptions {
            names_to: Some("id".to_string()),
            ..BindOptions::default()
        };

        let xs = named(vec![("x", v!("data.frame(a = c(1L, 2L))")), ("y", v!("data.frame(a = 3L)"))]);
        let out = vec_rbind(&xs, &options).unwrap();
        assert_eq!(
            out,
            v!("data.frame(a = c(1L, 2L, 3L), id = c(\"x\", \"x\", \"y\"))")
        );

        let xs = unnamed(vec![v!("data.frame(a = 1L)"), v!("data.frame(a = 2L)")]);
        let out = vec_rbind(&xs, &options).unwrap();
        assert_eq!(out, v!("data.frame(a = c(1L, 2L), id = c(1L, 2L))"));
    }

    #[test]
    fn no_inputs_is_an_empty_table() {
        let out = vec_rbind(&[], &BindOptions::default()).unwrap();
        assert_eq!(out, Value::Table(Table::with_size(vec![], vec![], 0)));
    }

    #[test]
    fn tibbles_win() {
        let xs = unnamed(vec![v!("data.frame(a = 1L)"), v!("tibble(a = 2L)")]);
        match vec_rbind(&xs, &BindOptions::default()).unwrap() {
            Value::Table(t) => assert_eq!(t.kind, TableKind::Tibble),
            _ => unreachable!(),
        }
    }
}
