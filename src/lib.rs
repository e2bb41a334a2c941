#[macro_use]
extern crate pest_derive;

pub mod cli;
pub mod error;
pub mod object;
pub mod parser;

pub mod bind;
pub mod coercion;
pub mod compare;
pub mod dictionary;
pub mod equal;
pub mod hash;
pub mod names;
pub mod order;
pub mod proxy;
pub mod rank;
pub mod size;
pub mod slice;

/// Parse a value literal, panicking on malformed input
///
/// Intended for tests and documentation, where literals are known to be
/// well formed.
///
/// ```
/// use vctrs::v;
/// use vctrs::size::vec_size;
///
/// let x = v!("c(1L, NA, 3L)");
/// assert_eq!(vec_size(&x).unwrap(), 3);
/// ```
///
#[macro_export]
macro_rules! v {
    ( $x:expr ) => {
        $crate::parser::parse_value($x).expect("malformed value literal")
    };
}
