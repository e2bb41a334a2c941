use crate::object::{CowObj, Kind, Value};

use super::types::*;

/// Vector storage for each of the base kinds
///
/// Each variant holds a copy-on-write buffer, so cloning a `Vector` is cheap
/// and never observes later writes to the original.
///
#[derive(Debug, Clone)]
pub enum Vector {
    Logical(CowObj<Vec<Logical>>),
    Integer(CowObj<Vec<Integer>>),
    Double(CowObj<Vec<Double>>),
    Complex(CowObj<Vec<Complex>>),
    Character(CowObj<Vec<Character>>),
    Raw(CowObj<Vec<Raw>>),
    List(CowObj<Vec<Value>>),
}

/// Apply an expression to the buffer of any vector variant, rebuilding the
/// same variant from its result.
#[macro_export]
macro_rules! map_vector {
    ( $x:expr, $v:ident => $body:expr ) => {{
        use $crate::object::Vector;
        match $x {
            Vector::Logical($v) => Vector::Logical($body),
            Vector::Integer($v) => Vector::Integer($body),
            Vector::Double($v) => Vector::Double($body),
            Vector::Complex($v) => Vector::Complex($body),
            Vector::Character($v) => Vector::Character($body),
            Vector::Raw($v) => Vector::Raw($body),
            Vector::List($v) => Vector::List($body),
        }
    }};
}

/// Evaluate an expression against the buffer of any vector variant.
#[macro_export]
macro_rules! with_vector {
    ( $x:expr, $v:ident => $body:expr ) => {{
        use $crate::object::Vector;
        match $x {
            Vector::Logical($v) => $body,
            Vector::Integer($v) => $body,
            Vector::Double($v) => $body,
            Vector::Complex($v) => $body,
            Vector::Character($v) => $body,
            Vector::Raw($v) => $body,
            Vector::List($v) => $body,
        }
    }};
}

/// Evaluate an expression against the buffers of two vectors of the same
/// variant, or fall through to a default expression when variants differ.
#[macro_export]
macro_rules! zip_vector {
    ( $x:expr, $y:expr, ($a:ident, $b:ident) => $body:expr, _ => $default:expr ) => {{
        use $crate::object::Vector;
        match ($x, $y) {
            (Vector::Logical($a), Vector::Logical($b)) => $body,
            (Vector::Integer($a), Vector::Integer($b)) => $body,
            (Vector::Double($a), Vector::Double($b)) => $body,
            (Vector::Complex($a), Vector::Complex($b)) => $body,
            (Vector::Character($a), Vector::Character($b)) => $body,
            (Vector::Raw($a), Vector::Raw($b)) => $body,
            (Vector::List($a), Vector::List($b)) => $body,
            _ => $default,
        }
    }};
}

impl Vector {
    pub fn kind(&self) -> Kind {
        match self {
            Vector::Logical(_) => Kind::Logical,
            Vector::Integer(_) => Kind::Integer,
            Vector::Double(_) => Kind::Double,
            Vector::Complex(_) => Kind::Complex,
            Vector::Character(_) => Kind::Character,
            Vector::Raw(_) => Kind::Raw,
            Vector::List(_) => Kind::List,
        }
    }

    /// Number of stored elements, regardless of shape
    pub fn len(&self) -> usize {
        with_vector!(self, v => v.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An all-missing vector of a base kind
    pub fn na_of(kind: Kind, n: usize) -> Option<Vector> {
        Some(match kind {
            Kind::Logical => Vector::Logical(vec![Logical::na(); n].into()),
            Kind::Integer => Vector::Integer(vec![Integer::na(); n].into()),
            Kind::Double => Vector::Double(vec![Double::na(); n].into()),
            Kind::Complex => Vector::Complex(vec![Complex::na(); n].into()),
            Kind::Character => Vector::Character(vec![Character::na(); n].into()),
            Kind::Raw => Vector::Raw(vec![Raw::na(); n].into()),
            Kind::List => Vector::List(vec![Value::na(); n].into()),
            _ => return None,
        })
    }

    /// A zero-length vector sharing this vector's kind
    pub fn empty_like(&self) -> Vector {
        map_vector!(self, _v => Vec::new().into())
    }

    /// Per-element missingness
    pub fn missing(&self) -> Vec<bool> {
        with_vector!(self, v => v.borrow().iter().map(|x| x.is_missing()).collect())
    }
}

impl From<Vec<bool>> for Vector {
    fn from(x: Vec<bool>) -> Self {
        Vector::Logical(x.into_iter().map(OptionNA::Some).collect::<Vec<_>>().into())
    }
}

impl From<Vec<Logical>> for Vector {
    fn from(x: Vec<Logical>) -> Self {
        Vector::Logical(x.into())
    }
}

impl From<Vec<i32>> for Vector {
    fn from(x: Vec<i32>) -> Self {
        Vector::Integer(x.into_iter().map(OptionNA::Some).collect::<Vec<_>>().into())
    }
}

impl From<Vec<Integer>> for Vector {
    fn from(x: Vec<Integer>) -> Self {
        Vector::Integer(x.into())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(x: Vec<f64>) -> Self {
        Vector::Double(x.into_iter().map(OptionNA::Some).collect::<Vec<_>>().into())
    }
}

impl From<Vec<Double>> for Vector {
    fn from(x: Vec<Double>) -> Self {
        Vector::Double(x.into())
    }
}

impl From<Vec<Complex>> for Vector {
    fn from(x: Vec<Complex>) -> Self {
        Vector::Complex(x.into())
    }
}

impl From<Vec<String>> for Vector {
    fn from(x: Vec<String>) -> Self {
        Vector::Character(x.into_iter().map(OptionNA::Some).collect::<Vec<_>>().into())
    }
}

impl From<Vec<&str>> for Vector {
    fn from(x: Vec<&str>) -> Self {
        Vector::Character(
            x.into_iter()
                .map(|s| OptionNA::Some(s.to_string()))
                .collect::<Vec<_>>()
                .into(),
        )
    }
}

impl From<Vec<Character>> for Vector {
    fn from(x: Vec<Character>) -> Self {
        Vector::Character(x.into())
    }
}

impl From<Vec<Raw>> for Vector {
    fn from(x: Vec<Raw>) -> Self {
        Vector::Raw(x.into())
    }
}

impl From<Vec<Value>> for Vector {
    fn from(x: Vec<Value>) -> Self {
        Vector::List(x.into())
    }
}
