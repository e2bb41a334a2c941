use std::fmt::Display;

use crate::equal::ScalarEq;
use crate::with_vector;
use crate::zip_vector;

use super::*;

/// Kinds of values, as reported in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    Null,
    Unspecified,
    Logical,
    Integer,
    Double,
    Complex,
    Character,
    Raw,
    List,
    Table,
    Extension,
    Scalar,
}

/// Attributes of base vectors
///
/// `names` label elements along the first dimension. `dim` is present for
/// shaped (array) vectors, with `dim[0]` being the size.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub names: Option<CowObj<Vec<Character>>>,
    pub dim: Option<Vec<usize>>,
}

impl Attributes {
    pub fn named(names: Vec<Character>) -> Self {
        Attributes {
            names: Some(names.into()),
            dim: None,
        }
    }

    pub fn shaped(dim: Vec<usize>) -> Self {
        Attributes {
            names: None,
            dim: Some(dim),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Unspecified(usize),
    Vector(Vector, Attributes),
    Table(Table),
    Extension(Extension),
    Scalar(Record),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Unspecified(_) => Kind::Unspecified,
            Value::Vector(v, _) => v.kind(),
            Value::Table(_) => Kind::Table,
            Value::Extension(_) => Kind::Extension,
            Value::Scalar(_) => Kind::Scalar,
        }
    }

    pub fn list(values: Vec<Value>) -> Self {
        Value::Vector(Vector::List(values.into()), Attributes::default())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Dimensions of a shaped vector
    pub fn dim(&self) -> Option<&[usize]> {
        match self {
            Value::Vector(_, Attributes { dim: Some(d), .. }) => Some(d.as_slice()),
            _ => None,
        }
    }

    /// Whether the value is an array with more than one dimension
    pub fn is_shaped(&self) -> bool {
        self.dim().map_or(false, |d| d.len() > 1)
    }

    /// Element names along the first dimension
    ///
    /// Tables report identifier row names, extensions report the names of
    /// their payload.
    ///
    pub fn names(&self) -> Option<Vec<Character>> {
        match self {
            Value::Vector(_, Attributes { names: Some(n), .. }) => Some(n.borrow().to_vec()),
            Value::Table(t) => match &t.row_names {
                RowNames::Identifiers(ids) => {
                    Some(ids.iter().cloned().map(OptionNA::Some).collect())
                }
                _ => None,
            },
            Value::Extension(e) => e.data.names(),
            _ => None,
        }
    }

    /// Replace element names, dropping them when `None`
    pub fn with_names(self, names: Option<Vec<Character>>) -> Value {
        match self {
            Value::Vector(v, attrs) => Value::Vector(
                v,
                Attributes {
                    names: names.map(CowObj::from),
                    ..attrs
                },
            ),
            Value::Table(t) => {
                let row_names = match names {
                    Some(n) => RowNames::Identifiers(
                        n.into_iter().map(|s| s.as_option().unwrap_or_default()).collect(),
                    ),
                    None => RowNames::Compact(t.size()),
                };
                Value::Table(Table { row_names, ..t })
            }
            Value::Extension(e) => Value::Extension(Extension {
                data: Box::new(e.data.with_names(names)),
                ..e
            }),
            x => x,
        }
    }

    /// Type description used in diagnostics
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Vector(v, Attributes { dim: Some(d), .. }) if d.len() > 1 => {
                let commas: String = d[1..].iter().map(|k| format!(",{k}")).collect();
                format!("{}[{}]", v.kind(), commas)
            }
            Value::Vector(v, _) => v.kind().to_string(),
            Value::Table(t) => {
                let cols: Vec<String> = t
                    .names
                    .iter()
                    .zip(t.columns.iter())
                    .map(|(n, c)| format!("{n}:{}", c.type_name()))
                    .collect();
                format!("{}<{}>", t.kind, cols.join(", "))
            }
            Value::Extension(e) => e.class.clone(),
            Value::Scalar(r) => r.class.clone(),
            x => x.kind().to_string(),
        }
    }
}

impl Atomic for Value {
    fn na() -> Self {
        Value::Null
    }

    fn is_missing(&self) -> bool {
        self.is_null()
    }
}

/// Deep structural equality
///
/// Values are equal when they share a kind, attributes and elements, with
/// missing values considered equal to each other (a double `NA` is still
/// distinct from `NaN`).
///
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Unspecified(l), Value::Unspecified(r)) => l == r,
            (Value::Vector(lv, la), Value::Vector(rv, ra)) => la == ra && atoms_identical(lv, rv),
            (Value::Table(l), Value::Table(r)) => l == r,
            (Value::Extension(l), Value::Extension(r)) => l == r,
            (Value::Scalar(l), Value::Scalar(r)) => l == r,
            _ => false,
        }
    }
}

fn atoms_identical(x: &Vector, y: &Vector) -> bool {
    zip_vector!(x, y, (l, r) => {
        let lb = l.borrow();
        let rb = r.borrow();
        lb.len() == rb.len()
            && lb
                .iter()
                .zip(rb.iter())
                .all(|(a, b)| a.equal(b, true) == OptionNA::Some(true))
    }, _ => false)
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Unspecified(n) => write!(f, "unspecified({n})"),
            Value::Vector(v, attrs) => fmt_vector(f, v, attrs),
            Value::Table(t) => {
                write!(f, "{}(", t.kind)?;
                let mut args: Vec<String> = t
                    .names
                    .iter()
                    .zip(t.columns.iter())
                    .map(|(n, c)| format!("{} = {c}", fmt_name(n)))
                    .collect();
                match &t.row_names {
                    RowNames::Identifiers(ids) => {
                        let ids: Vec<String> = ids.iter().map(|s| format!("{s:?}")).collect();
                        args.push(format!("row.names = c({})", ids.join(", ")));
                    }
                    RowNames::Expanded(ids) => {
                        let ids: Vec<String> = ids.iter().map(|i| format!("{i}L")).collect();
                        args.push(format!("row.names = c({})", ids.join(", ")));
                    }
                    RowNames::Compact(_) => (),
                }
                write!(f, "{})", args.join(", "))
            }
            Value::Extension(e) => write!(f, "structure({}, class = {:?})", e.data, e.class),
            Value::Scalar(r) => write!(f, "<{}>", r.class),
        }
    }
}

fn fmt_name(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');

    if simple {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

fn fmt_vector(f: &mut std::fmt::Formatter<'_>, v: &Vector, attrs: &Attributes) -> std::fmt::Result {
    let elems: Vec<String> = match v {
        Vector::Logical(x) => x
            .borrow()
            .iter()
            .map(|x| match x {
                OptionNA::Some(true) => "TRUE".to_string(),
                OptionNA::Some(false) => "FALSE".to_string(),
                OptionNA::NA => "NA".to_string(),
            })
            .collect(),
        Vector::Integer(x) => x
            .borrow()
            .iter()
            .map(|x| match x {
                OptionNA::Some(i) => format!("{i}L"),
                OptionNA::NA => "NA".to_string(),
            })
            .collect(),
        Vector::Double(x) => x.borrow().iter().map(fmt_double).collect(),
        Vector::Complex(x) => x
            .borrow()
            .iter()
            .map(|x| match (x.re, x.im) {
                (OptionNA::NA, OptionNA::NA) => "NA".to_string(),
                (re, OptionNA::Some(im)) if im < 0.0 => {
                    format!("{}-{}i", fmt_double(&re), fmt_double(&OptionNA::Some(-im)))
                }
                (re, im) => format!("{}+{}i", fmt_double(&re), fmt_double(&im)),
            })
            .collect(),
        Vector::Character(x) => x
            .borrow()
            .iter()
            .map(|x| match x {
                OptionNA::Some(s) => format!("{s:?}"),
                OptionNA::NA => "NA".to_string(),
            })
            .collect(),
        Vector::Raw(x) => x.borrow().iter().map(|x| format!("{x}")).collect(),
        Vector::List(x) => x.borrow().iter().map(|x| format!("{x}")).collect(),
    };

    let elems: Vec<String> = match &attrs.names {
        Some(names) => names
            .borrow()
            .iter()
            .zip(elems)
            .map(|(n, e)| match n {
                OptionNA::Some(n) if !n.is_empty() => format!("{} = {e}", fmt_name(n)),
                _ => e,
            })
            .collect(),
        None => elems,
    };

    let body = match v {
        Vector::List(_) => format!("list({})", elems.join(", ")),
        Vector::Raw(_) => format!("raw({})", elems.join(", ")),
        _ if elems.is_empty() => format!("{}(0)", v.kind()),
        _ if elems.len() == 1 && attrs.names.is_none() && attrs.dim.is_none() => elems[0].clone(),
        _ => format!("c({})", elems.join(", ")),
    };

    match &attrs.dim {
        Some(dim) if dim.len() > 1 => {
            let dim: Vec<String> = dim.iter().map(|d| format!("{d}L")).collect();
            write!(f, "array({body}, dim = c({}))", dim.join(", "))
        }
        _ => write!(f, "{body}"),
    }
}

fn fmt_double(x: &Double) -> String {
    match x {
        OptionNA::NA => "NA".to_string(),
        OptionNA::Some(x) if x.is_nan() => "NaN".to_string(),
        OptionNA::Some(x) if x.is_infinite() && *x > 0.0 => "Inf".to_string(),
        OptionNA::Some(x) if x.is_infinite() => "-Inf".to_string(),
        OptionNA::Some(x) => format!("{x}"),
    }
}

impl From<Vector> for Value {
    fn from(x: Vector) -> Self {
        Value::Vector(x, Attributes::default())
    }
}

impl From<Table> for Value {
    fn from(x: Table) -> Self {
        Value::Table(x)
    }
}

impl From<Extension> for Value {
    fn from(x: Extension) -> Self {
        Value::Extension(x)
    }
}

macro_rules! register_from_vec {
    ( $($t:ty),* ) => {
        $(
            impl From<Vec<$t>> for Value {
                fn from(x: Vec<$t>) -> Self {
                    Value::from(Vector::from(x))
                }
            }
        )*
    };
}

register_from_vec!(
    bool, Logical, i32, Integer, f64, Double, Complex, String, &str, Character, Raw
);

/// Size of a value along its first dimension, where it is known without
/// consulting an extension's proxy
pub(crate) fn data_size(x: &Vector, attrs: &Attributes) -> usize {
    match &attrs.dim {
        Some(d) if !d.is_empty() => d[0],
        _ => with_vector!(x, v => v.len()),
    }
}
