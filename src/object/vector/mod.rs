/// Vectors module
///
/// Storage for the base vector kinds, their element types, element-wise
/// conversions and the compact indices used to select from them.
///
pub mod coercion;
pub mod types;

mod subset;
pub use subset::*;

mod core;
pub use core::*;

pub use types::{Atomic, Character, Complex, Double, Integer, Logical, OptionNA, Raw};
