//! Value literal parser
//!
//! Values are written in a subset of R syntax, the same form their
//! [`Display`](std::fmt::Display) implementation produces. The grammar lives
//! in `grammar/values.pest`; constructor calls such as `c()`, `list()` or
//! `data.frame()` are evaluated while parsing.
//!

use pest::iterators::{Pair, Pairs};
use pest::Parser;

use crate::bind::{vec_c, Arg, BindOptions};
use crate::err;
use crate::error::Error;
use crate::internal_err;
use crate::object::*;
use crate::size::{size_common, vec_recycle};

#[derive(Parser)]
#[grammar = "grammar/values.pest"]
pub struct ValueParser;

pub type ParseResult = Result<Value, Error>;

/// Parse a single value literal
pub fn parse_value(s: &str) -> ParseResult {
    let mut pairs = ValueParser::parse(Rule::literal, s)?;
    let pair = pairs.next().map_or(internal_err!(), Ok)?;
    parse_expr(pair)
}

/// Parse a value literal, optionally prefixed by a name as in `a = c(1, 2)`
pub fn parse_arg(s: &str) -> Result<Arg, Error> {
    match s.split_once('=') {
        Some((name, value)) if is_name(name.trim()) => {
            Ok((Some(name.trim().to_string()), parse_value(value)?))
        }
        _ => Ok((None, parse_value(s)?)),
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '.' || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

fn parse_expr(pair: Pair<Rule>) -> ParseResult {
    match pair.as_rule() {
        // reserved values
        Rule::val_true => Ok(Value::from(vec![true])),
        Rule::val_false => Ok(Value::from(vec![false])),
        Rule::val_null => Ok(Value::Null),
        Rule::val_na => Ok(Value::from(vec![Logical::NA])),
        Rule::na_integer => Ok(Value::from(vec![Integer::NA])),
        Rule::na_real => Ok(Value::from(vec![Double::NA])),
        Rule::na_character => Ok(Value::from(vec![Character::NA])),
        Rule::val_nan => Ok(Value::from(vec![f64::NAN])),
        Rule::val_inf => Ok(Value::from(vec![f64::INFINITY])),

        // atomic values
        Rule::integer => {
            let digits = pair.as_str().trim_end_matches('L');
            match digits.parse::<i32>() {
                Ok(i) => Ok(Value::from(vec![i])),
                Err(_) => err!(format!("integer literal `{}` is out of range", pair.as_str())),
            }
        }
        Rule::number => Ok(Value::from(vec![parse_number(pair)?])),
        Rule::imaginary => {
            let im = parse_number(pair.into_inner().next().map_or(internal_err!(), Ok)?)?;
            Ok(Value::from(vec![Complex::new(0.0, im)]))
        }
        Rule::complex => parse_complex(pair.into_inner(), false),
        Rule::string => {
            let inner = pair.into_inner().next().map_or(internal_err!(), Ok)?;
            Ok(Value::from(vec![unescape(inner.as_str())]))
        }

        Rule::negative => {
            let inner = pair.into_inner().next().map_or(internal_err!(), Ok)?;
            match inner.as_rule() {
                // only the real part of `-1+2i` is negated
                Rule::complex => parse_complex(inner.into_inner(), true),
                _ => negate(parse_expr(inner)?),
            }
        }
        Rule::call => parse_call(pair),

        rule => Err(Error::ParseUnexpected(rule)),
    }
}

fn parse_number(pair: Pair<Rule>) -> Result<f64, Error> {
    pair.as_str().parse::<f64>().map_or(internal_err!(), Ok)
}

fn parse_complex(mut inner: Pairs<Rule>, negative: bool) -> ParseResult {
    let re = parse_number(inner.next().map_or(internal_err!(), Ok)?)?;
    let re = if negative { -re } else { re };
    let sign = inner.next().map_or(internal_err!(), Ok)?;
    let im = parse_number(inner.next().map_or(internal_err!(), Ok)?)?;

    let im = match sign.as_str() {
        "-" => -im,
        _ => im,
    };

    Ok(Value::from(vec![Complex::new(re, im)]))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }

    out
}

fn negate(x: Value) -> ParseResult {
    match x {
        Value::Vector(Vector::Integer(v), attrs) => Ok(Value::Vector(
            Vector::from(v.borrow().iter().map(|x| x.map(|x| -x)).collect::<Vec<Integer>>()),
            attrs,
        )),
        Value::Vector(Vector::Double(v), attrs) => Ok(Value::Vector(
            Vector::from(v.borrow().iter().map(|x| x.map(|x| -x)).collect::<Vec<Double>>()),
            attrs,
        )),
        Value::Vector(Vector::Complex(v), attrs) => Ok(Value::Vector(
            Vector::from(
                v.borrow()
                    .iter()
                    .map(|x| Complex {
                        re: x.re.map(|x| -x),
                        im: x.im.map(|x| -x),
                    })
                    .collect::<Vec<Complex>>(),
            ),
            attrs,
        )),
        x => err!(format!("invalid argument to unary operator: {}", x.type_name())),
    }
}

fn parse_args(pair: Pair<Rule>) -> Result<Vec<Arg>, Error> {
    pair.into_inner()
        .map(|arg| match arg.as_rule() {
            Rule::named => {
                let mut inner = arg.into_inner();
                let name = inner.next().map_or(internal_err!(), Ok)?;
                let name = match name.as_rule() {
                    Rule::backticked | Rule::string => {
                        name.into_inner().next().map_or(internal_err!(), Ok)?.as_str().to_string()
                    }
                    _ => name.as_str().to_string(),
                };
                let value = parse_expr(inner.next().map_or(internal_err!(), Ok)?)?;
                Ok((Some(name), value))
            }
            _ => Ok((None, parse_expr(arg)?)),
        })
        .collect()
}

fn parse_call(pair: Pair<Rule>) -> ParseResult {
    let mut inner = pair.into_inner();
    let name = inner.next().map_or(internal_err!(), |i| Ok(i.as_str()))?;
    let args = parse_args(inner.next().map_or(internal_err!(), Ok)?)?;

    match name {
        "c" => vec_c(&args, &BindOptions::default()),
        "list" => Ok(new_list(args)),
        "raw" => {
            let bytes = args
                .iter()
                .map(|(_, x)| match as_count(x)? {
                    b if b <= u8::MAX as usize => Ok(b as u8),
                    b => err!(format!("raw values must be bytes, found {b}")),
                })
                .collect::<Result<Vec<Raw>, Error>>()?;
            Ok(Value::from(bytes))
        }
        "logical" => Ok(Value::from(vec![false; count_arg(&args)?])),
        "integer" => Ok(Value::from(vec![0; count_arg(&args)?])),
        "double" | "numeric" => Ok(Value::from(vec![0.0; count_arg(&args)?])),
        "complex" => Ok(Value::from(vec![Complex::new(0.0, 0.0); count_arg(&args)?])),
        "character" => Ok(Value::from(vec![String::new(); count_arg(&args)?])),
        "unspecified" => Ok(Value::Unspecified(count_arg(&args)?)),
        "data.frame" => new_table(args, TableKind::DataFrame),
        "tibble" => new_table(args, TableKind::Tibble),
        "array" => new_array(args),
        "structure" => new_structure(args),
        name => err!(format!("unknown constructor `{name}()`")),
    }
}

fn as_count(x: &Value) -> Result<usize, Error> {
    let n = match x {
        Value::Vector(Vector::Integer(v), _) if v.len() == 1 => v.get(0).and_then(|x| x.as_option()).map(|x| x as f64),
        Value::Vector(Vector::Double(v), _) if v.len() == 1 => v.get(0).and_then(|x| x.as_option()),
        _ => None,
    };

    match n {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as usize),
        _ => err!(format!("expected a count, found {x}")),
    }
}

fn count_arg(args: &[Arg]) -> Result<usize, Error> {
    match args {
        [] => Ok(0),
        [(_, x)] => as_count(x),
        _ => err!("expected a single length argument"),
    }
}

fn new_list(args: Vec<Arg>) -> Value {
    let has_names = args.iter().any(|(name, _)| name.is_some());
    let (names, values): (Vec<Character>, Vec<Value>) = args
        .into_iter()
        .map(|(name, x)| (OptionNA::Some(name.unwrap_or_default()), x))
        .unzip();

    let list = Value::list(values);
    match has_names {
        true => list.with_names(Some(names)),
        false => list,
    }
}

fn new_table(args: Vec<Arg>, kind: TableKind) -> ParseResult {
    let mut names = vec![];
    let mut columns = vec![];
    let mut row_names = None;

    for (i, (name, x)) in args.into_iter().enumerate() {
        match name.as_deref() {
            Some("row.names") => row_names = Some(x),
            Some(name) => {
                names.push(name.to_string());
                columns.push(x);
            }
            None => {
                names.push(format!("...{}", i + 1));
                columns.push(x);
            }
        }
    }

    let row_names = match row_names {
        None => None,
        Some(Value::Vector(Vector::Character(ids), _)) => Some(RowNames::Identifiers(
            ids.borrow()
                .iter()
                .map(|id| id.clone().as_option().unwrap_or_default())
                .collect(),
        )),
        // integer row names are the automatic `1..n`, spelled out
        Some(Value::Vector(Vector::Integer(ids), _)) => {
            let ids: Vec<i32> = ids.borrow().iter().map(|i| i.as_option().unwrap_or(0)).collect();
            if ids.iter().zip(1..).any(|(i, k)| *i != k) {
                return err!("integer `row.names` must be `1..n`");
            }
            Some(RowNames::Expanded(ids))
        }
        Some(x) => return err!(format!("`row.names` must be a character or integer vector, not {}", x.type_name())),
    };

    let absent = row_names.as_ref().map_or(0, RowNames::size);
    let size = size_common(columns.iter().zip(names.iter().map(String::as_str)), absent)?;
    let columns = columns
        .iter()
        .zip(names.iter())
        .map(|(x, name)| vec_recycle(x, size, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::new(names, columns)?.with_kind(kind);
    table.row_names = RowNames::Compact(size);

    if let Some(row_names) = row_names {
        if row_names.size() != size {
            return Error::IncompatibleSize {
                x_arg: "row.names".to_string(),
                size: row_names.size(),
                target: size,
            }
            .into();
        }
        table.row_names = row_names;
    }

    Ok(Value::Table(table))
}

fn new_array(args: Vec<Arg>) -> ParseResult {
    let mut data = None;
    let mut dim = None;

    for (name, x) in args {
        match name.as_deref() {
            Some("dim") => dim = Some(x),
            _ if data.is_none() => data = Some(x),
            _ => return err!("unexpected argument to `array()`"),
        }
    }

    let (Some(Value::Vector(v, _)), Some(Value::Vector(d, _))) = (data, dim) else {
        return err!("`array()` requires data and a `dim` vector");
    };

    let dim = match d {
        Vector::Integer(d) => d
            .borrow()
            .iter()
            .map(|d| as_count(&Value::from(vec![*d])))
            .collect::<Result<Vec<_>, _>>()?,
        Vector::Double(d) => d
            .borrow()
            .iter()
            .map(|d| as_count(&Value::from(vec![*d])))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return err!("`dim` must be numeric"),
    };

    if dim.iter().product::<usize>() != v.len() {
        return err!(format!("dims [product {}] do not match the length of object [{}]", dim.iter().product::<usize>(), v.len()));
    }

    Ok(Value::Vector(v, Attributes::shaped(dim)))
}

fn new_structure(args: Vec<Arg>) -> ParseResult {
    let mut data = None;
    let mut class = None;

    for (name, x) in args {
        match name.as_deref() {
            Some("class") => class = Some(x),
            _ if data.is_none() => data = Some(x),
            _ => return err!("unexpected argument to `structure()`"),
        }
    }

    match (data, class) {
        (Some(data), Some(Value::Vector(Vector::Character(class), _))) => match class.get(0) {
            Some(OptionNA::Some(class)) => Ok(Value::Extension(Extension::new(&class, data))),
            _ => err!("`class` must be a string"),
        },
        _ => err!("`structure()` requires data and a `class` string"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(parse_value("TRUE").unwrap(), Value::from(vec![true]));
        assert_eq!(parse_value("NA_integer_").unwrap(), Value::from(vec![Integer::NA]));
        assert_eq!(parse_value("NULL").unwrap(), Value::Null);
        assert_eq!(parse_value("-Inf").unwrap(), Value::from(vec![f64::NEG_INFINITY]));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_value("12L").unwrap(), Value::from(vec![12]));
        assert_eq!(parse_value("-3L").unwrap(), Value::from(vec![-3]));
        assert_eq!(parse_value("3e10").unwrap(), Value::from(vec![3e10]));
        assert_eq!(parse_value("1-2i").unwrap(), Value::from(vec![Complex::new(1.0, -2.0)]));
        assert_eq!(parse_value("2i").unwrap(), Value::from(vec![Complex::new(0.0, 2.0)]));
        assert_eq!(parse_value("-1+2i").unwrap(), Value::from(vec![Complex::new(-1.0, 2.0)]));
        assert!(parse_value("raw(256)").is_err());
        assert!(parse_value("99999999999L").is_err());
    }

    #[test]
    fn strings_unescape() {
        assert_eq!(parse_value("\"a\\\"b\\n\"").unwrap(), Value::from(vec!["a\"b\n"]));
    }

    #[test]
    fn empty_constructors() {
        assert_eq!(parse_value("integer(0)").unwrap(), Value::from(Vec::<i32>::new()));
        assert_eq!(parse_value("character(2)").unwrap(), Value::from(vec!["", ""]));
        assert_eq!(parse_value("raw(1, 255)").unwrap(), Value::from(vec![1_u8, 255]));
        assert_eq!(parse_value("c()").unwrap(), Value::Null);
    }

    #[test]
    fn display_round_trips() {
        for literal in [
            "c(1L, NA, 3L)",
            "c(a = 1.5, `b c` = NaN)",
            "list(1, \"a\", NULL)",
            "list(x = TRUE)",
            "data.frame(a = c(1, 2), b = c(\"x\", \"y\"))",
            "tibble(a = data.frame(b = 1L))",
            "data.frame(a = 1L, row.names = c(\"r\"))",
            "data.frame(a = c(1L, 2L), row.names = c(1L, 2L))",
            "array(c(1L, 2L, 3L, 4L, 5L, 6L), dim = c(2L, 3L))",
            "structure(c(1, 2), class = \"money\")",
            "c(1+2i, 3-1i)",
            "raw(0, 7)",
        ] {
            let x = parse_value(literal).unwrap();
            assert_eq!(x.to_string(), literal);
        }
    }

    #[test]
    fn tables_recycle_columns() {
        let x = parse_value("data.frame(a = 1, b = c(1, 2))").unwrap();
        assert_eq!(x, parse_value("data.frame(a = c(1, 1), b = c(1, 2))").unwrap());
        assert!(parse_value("data.frame(a = c(1, 2), b = c(1, 2, 3))").is_err());
    }

    #[test]
    fn integer_row_names_are_automatic() {
        let x = parse_value("data.frame(a = c(1, 2), row.names = c(1L, 2L))").unwrap();
        assert_eq!(x, parse_value("data.frame(a = c(1, 2))").unwrap());
        assert!(parse_value("data.frame(a = c(1, 2), row.names = c(2L, 1L))").is_err());

        // slicing resets them to the compact form
        let y = crate::slice::vec_slice_seq(&x, 0, 1).unwrap();
        match y {
            Value::Table(t) => assert!(matches!(t.row_names, RowNames::Compact(1))),
            _ => unreachable!(),
        }
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(parse_value("c(1,"), Err(Error::ParseFailure(_))));
        assert!(parse_value("foo(1)").is_err());
        assert!(parse_value("array(c(1, 2), dim = c(3L, 1L))").is_err());
    }

    #[test]
    fn named_arguments() {
        assert_eq!(parse_arg("a = c(1, 2)").unwrap(), (Some("a".to_string()), parse_value("c(1, 2)").unwrap()));
        assert_eq!(parse_arg("c(a = 1)").unwrap(), (None, parse_value("c(a = 1)").unwrap()));
    }
}
