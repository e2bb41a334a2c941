//! Combining many values into one
//!
//! [`vec_c`] concatenates observations, [`vec_rbind`] stacks inputs as the
//! rows of a table and [`vec_cbind`] places them side by side as columns.
//! Each computes the common type of its inputs, casts every input to it and
//! assigns the casts into a freshly allocated output.
//!

mod c;
pub use c::*;

mod cbind;
pub use cbind::*;

mod rbind;
pub use rbind::*;

use crate::object::*;

/// An input to a binding operation and its optional name
pub type Arg = (Option<String>, Value);

/// Options shared by the binding operations
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Output type, overriding the common type of the inputs
    pub ptype: Option<Value>,
    /// Name of a column recording which input each row came from
    pub names_to: Option<String>,
    /// Output size, overriding the common size of the inputs
    pub size: Option<usize>,
}

/// Inputs without names
pub fn unnamed(xs: Vec<Value>) -> Vec<Arg> {
    xs.into_iter().map(|x| (None, x)).collect()
}

// The name of an input as used in diagnostics
fn arg_name(name: &Option<String>, i: usize) -> String {
    match name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("..{}", i + 1),
    }
}

fn arg_names(xs: &[Arg]) -> Vec<String> {
    xs.iter().enumerate().map(|(i, (name, _))| arg_name(name, i)).collect()
}

fn outer_name(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.is_empty())
}
