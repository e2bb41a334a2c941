use std::fmt::{Debug, Display};

/// A value that may be missing
///
/// Base element types wrap their payload in `OptionNA` so that missingness
/// is explicit in the type rather than hidden in a sentinel payload. The one
/// exception is `Double`, where `Some(NaN)` is a distinct "not-a-number"
/// class next to the missing `NA` class (see [`DoubleClass`]).
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionNA<T> {
    #[default]
    NA,
    Some(T),
}

impl<T> OptionNA<T> {
    pub fn map<F, U>(self, f: F) -> OptionNA<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            OptionNA::Some(x) => OptionNA::Some(f(x)),
            OptionNA::NA => OptionNA::NA,
        }
    }

    pub fn as_option(self) -> Option<T> {
        match self {
            OptionNA::Some(x) => Option::Some(x),
            OptionNA::NA => Option::None,
        }
    }

    pub fn as_ref(&self) -> OptionNA<&T> {
        match self {
            OptionNA::Some(x) => OptionNA::Some(x),
            OptionNA::NA => OptionNA::NA,
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, OptionNA::NA)
    }
}

impl<T> From<Option<T>> for OptionNA<T> {
    fn from(x: Option<T>) -> Self {
        match x {
            Some(x) => OptionNA::Some(x),
            None => OptionNA::NA,
        }
    }
}

impl<T: Display> Display for OptionNA<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionNA::Some(x) => write!(f, "{x}"),
            OptionNA::NA => write!(f, "NA"),
        }
    }
}

pub type Logical = OptionNA<bool>;
pub type Integer = OptionNA<i32>;
pub type Double = OptionNA<f64>;
pub type Character = OptionNA<String>;
pub type Raw = u8;

/// Complex number, each part carrying its own missingness
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: Double,
    pub im: Double,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex {
            re: OptionNA::Some(re),
            im: OptionNA::Some(im),
        }
    }
}

/// The three classes a double can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DoubleClass {
    Number,
    Missing,
    NaN,
}

pub fn classify(x: &Double) -> DoubleClass {
    match x {
        OptionNA::NA => DoubleClass::Missing,
        OptionNA::Some(x) if x.is_nan() => DoubleClass::NaN,
        OptionNA::Some(_) => DoubleClass::Number,
    }
}

/// Element types that can live in a vector
///
/// Every element type has a missing value, used when slicing outside of a
/// vector and when initializing storage.
///
pub trait Atomic: Clone + Debug {
    fn na() -> Self;

    /// Whether the element counts as missing when detecting `NA`s
    fn is_missing(&self) -> bool;
}

macro_rules! register_atomic {
    ( $($t:ty),* ) => {
        $(
            impl Atomic for OptionNA<$t> {
                fn na() -> Self {
                    OptionNA::NA
                }

                fn is_missing(&self) -> bool {
                    self.is_na()
                }
            }
        )*
    };
}

register_atomic!(bool, i32, String);

impl Atomic for Double {
    fn na() -> Self {
        OptionNA::NA
    }

    fn is_missing(&self) -> bool {
        classify(self) != DoubleClass::Number
    }
}

impl Atomic for Complex {
    fn na() -> Self {
        Complex::default()
    }

    fn is_missing(&self) -> bool {
        self.re.is_missing() || self.im.is_missing()
    }
}

impl Atomic for Raw {
    fn na() -> Self {
        0
    }

    fn is_missing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_classes() {
        assert_eq!(classify(&OptionNA::Some(1.0)), DoubleClass::Number);
        assert_eq!(classify(&OptionNA::Some(f64::INFINITY)), DoubleClass::Number);
        assert_eq!(classify(&OptionNA::Some(f64::NAN)), DoubleClass::NaN);
        assert_eq!(classify(&OptionNA::NA), DoubleClass::Missing);
    }

    #[test]
    fn raw_has_no_missing_value() {
        assert!(!Raw::na().is_missing());
    }

    #[test]
    fn complex_missing_if_either_part_is() {
        let x = Complex {
            re: OptionNA::Some(1.0),
            im: OptionNA::NA,
        };
        assert!(x.is_missing());
        assert!(!Complex::new(1.0, 0.0).is_missing());
    }
}
