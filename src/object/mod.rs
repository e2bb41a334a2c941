mod core;
pub use core::*;

mod cow;
pub use cow::*;

mod table;
pub use table::*;

mod extension;
pub use extension::*;

pub mod vector;
pub use vector::*;
