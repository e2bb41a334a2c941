use tracing::{debug, debug_span};

use crate::coercion::{ptype_common, vec_cast_strict};
use crate::error::Error;
use crate::names::outer_names;
use crate::object::*;
use crate::proxy::{vec_proxy, vec_restore};
use crate::size::vec_size;
use crate::slice::{vec_assign, vec_init};

use super::{arg_names, outer_name, Arg, BindOptions};

/// Concatenate the observations of every input
///
/// Inputs are cast to their common type (or `options.ptype`), so the
/// result is `Null` only when every input is. Names combine the name of each
/// input with the names of its elements, as in `outer..inner`.
///
pub fn vec_c(xs: &[Arg], options: &BindOptions) -> Result<Value, Error> {
    let _span = debug_span!("vec_c", n = xs.len()).entered();

    let args = arg_names(xs);
    let inputs = xs.iter().map(|(_, x)| x).zip(args.iter().map(String::as_str));
    let Some(ptype) = ptype_common(inputs, options.ptype.as_ref())? else {
        return Ok(Value::Null);
    };

    let sizes = xs
        .iter()
        .map(|(_, x)| vec_size(x))
        .collect::<Result<Vec<_>, _>>()?;
    let size: usize = sizes.iter().sum();
    debug!(size, ptype = %ptype.type_name(), "combining");

    let has_names = xs
        .iter()
        .any(|(name, x)| outer_name(name).is_some() || x.names().is_some());

    let mut out = vec_proxy(&vec_init(&ptype, size)?)?;
    let mut names: Vec<Character> = vec![OptionNA::Some(String::new()); if has_names { size } else { 0 }];
    let mut counter = 0;

    for (((name, x), arg), n) in xs.iter().zip(args.iter()).zip(sizes) {
        if n == 0 {
            continue;
        }

        let elt = vec_proxy(&vec_cast_strict(x, &ptype, arg, "")?)?;
        out = vec_assign(&out, &CompactIndex::seq(counter, n), &elt, Ownership::Total)?;

        if has_names {
            if let Some(inner) = outer_names(outer_name(name), x.names(), n) {
                names[counter..counter + n].clone_from_slice(&inner);
            }
        }

        counter += n;
    }

    let out = vec_restore(out, &ptype)?;
    if has_names {
        return Ok(out.with_names(Some(names)));
    }

    Ok(out)
}
