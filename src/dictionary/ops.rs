use tracing::debug;

use crate::coercion::{ptype_common, vec_cast_strict};
use crate::equal::proxy_missing;
use crate::error::Error;
use crate::object::*;
use crate::proxy::vec_proxy_equal;
use crate::slice::vec_slice;
use crate::size::vec_size;

use super::Dictionary;

// Insert every element, returning the dictionary and each element's slot
fn fill(x: &Value) -> Result<(Dictionary, Vec<usize>), Error> {
    let mut d = Dictionary::new(x)?;
    let mut slots = Vec::with_capacity(d.len());

    for i in 0..d.len() {
        let slot = d.probe(i)?;
        if d.key(slot).is_none() {
            d.put(slot, i);
        }
        slots.push(slot);
    }

    Ok((d, slots))
}

fn positions(locations: &[usize]) -> CompactIndex {
    CompactIndex::Explicit(locations.iter().map(|i| OptionNA::Some(*i as i32 + 1)).collect())
}

/// Locations of the first occurrence of each distinct element
pub fn vec_unique_loc(x: &Value) -> Result<Vec<usize>, Error> {
    let (d, slots) = fill(x)?;
    Ok(slots
        .iter()
        .enumerate()
        .filter(|(i, slot)| d.key(**slot) == Some(*i))
        .map(|(i, _)| i)
        .collect())
}

/// Distinct elements, in order of first appearance
pub fn vec_unique(x: &Value) -> Result<Value, Error> {
    vec_slice(x, &positions(&vec_unique_loc(x)?))
}

/// Whether an earlier element has the same value
pub fn vec_duplicated(x: &Value) -> Result<Vec<bool>, Error> {
    let (d, slots) = fill(x)?;
    Ok(slots
        .iter()
        .enumerate()
        .map(|(i, slot)| d.key(*slot) != Some(i))
        .collect())
}

/// Whether each element's value appears more than once, first occurrences
/// included
pub fn vec_duplicate_detect(x: &Value) -> Result<Vec<bool>, Error> {
    let (d, slots) = fill(x)?;

    let mut counts = vec![0_usize; d.size()];
    for slot in slots.iter() {
        counts[*slot] += 1;
    }

    Ok(slots.iter().map(|slot| counts[*slot] > 1).collect())
}

/// Whether any value appears more than once
pub fn vec_duplicated_any(x: &Value) -> Result<bool, Error> {
    let mut d = Dictionary::new(x)?;
    for i in 0..d.len() {
        let slot = d.probe(i)?;
        if d.key(slot).is_some() {
            return Ok(true);
        }
        d.put(slot, i);
    }
    Ok(false)
}

/// Number of distinct values
pub fn vec_n_distinct(x: &Value) -> Result<usize, Error> {
    let (d, _) = fill(x)?;
    Ok(d.used)
}

/// For each element, the location of the first element equal to it
pub fn vec_id(x: &Value) -> Result<Vec<usize>, Error> {
    let (d, slots) = fill(x)?;
    slots
        .iter()
        .map(|slot| match d.key(*slot) {
            Some(loc) => Ok(loc),
            None => crate::internal_err!("element missing from its own dictionary"),
        })
        .collect()
}

/// 1-based group ids, numbered in order of first appearance
pub fn vec_group_id(x: &Value) -> Result<Vec<usize>, Error> {
    let mut d = Dictionary::new(x)?;
    let mut ids = vec![0; d.len()];

    for i in 0..d.len() {
        let slot = d.probe(i)?;
        ids[i] = match d.key(slot) {
            Some(first) => ids[first],
            None => {
                d.put(slot, i);
                d.used
            }
        };
    }

    Ok(ids)
}

// Cast both sides to their common type so their proxies can be compared
fn cast_pair(needles: &Value, haystack: &Value) -> Result<(Value, Value), Error> {
    let args = [(needles, "needles"), (haystack, "haystack")];
    match ptype_common(args, None)? {
        None => Ok((needles.clone(), haystack.clone())),
        Some(ptype) => Ok((
            vec_cast_strict(needles, &ptype, "needles", "")?,
            vec_cast_strict(haystack, &ptype, "haystack", "")?,
        )),
    }
}

/// Location in `haystack` of the first match of each needle
///
/// Without `na_equal`, missing needles never match.
///
pub fn vec_match(needles: &Value, haystack: &Value, na_equal: bool) -> Result<Vec<Option<usize>>, Error> {
    let (needles, haystack) = cast_pair(needles, haystack)?;

    let (d, _) = fill(&haystack)?;
    let partial = Dictionary::partial(&needles)?;
    debug!(needles = partial.len(), haystack = d.len(), "matching");

    let missing = if na_equal {
        vec![false; partial.len()]
    } else {
        proxy_missing(&vec_proxy_equal(&needles)?)?
    };

    (0..partial.len())
        .map(|j| {
            if missing[j] {
                return Ok(None);
            }
            Ok(d.key(d.probe_with(&partial, j)?))
        })
        .collect()
}

/// Whether each needle appears in `haystack`
///
/// Without `na_equal`, missing needles are reported as missing.
///
pub fn vec_in(needles: &Value, haystack: &Value, na_equal: bool) -> Result<Vec<Logical>, Error> {
    let missing = proxy_missing(&vec_proxy_equal(needles)?)?;
    let matches = vec_match(needles, haystack, true)?;

    Ok(matches
        .into_iter()
        .zip(missing)
        .map(|(m, missing)| match m {
            _ if missing && !na_equal => OptionNA::NA,
            m => OptionNA::Some(m.is_some()),
        })
        .collect())
}

/// Distinct values and their frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    pub key: Value,
    pub count: Vec<usize>,
}

/// Count each distinct value, in order of first appearance
pub fn vec_count(x: &Value) -> Result<Count, Error> {
    let (d, slots) = fill(x)?;

    let mut counts = vec![0_usize; d.size()];
    for slot in slots.iter() {
        counts[*slot] += 1;
    }

    let mut keys = vec![];
    let mut count = vec![];
    for (i, slot) in slots.iter().enumerate() {
        if d.key(*slot) == Some(i) {
            keys.push(i);
            count.push(counts[*slot]);
        }
    }

    Ok(Count {
        key: vec_slice(x, &positions(&keys))?,
        count,
    })
}

/// Groups of equal elements
///
/// `key` holds the location of each group's first element and `pos` the
/// locations of every member, both in order of appearance.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SplitId {
    pub key: Vec<usize>,
    pub pos: Vec<Vec<usize>>,
}

pub fn vec_split_id(x: &Value) -> Result<SplitId, Error> {
    let ids = vec_group_id(x)?;
    let n_groups = ids.iter().copied().max().unwrap_or(0);

    let mut key = Vec::with_capacity(n_groups);
    let mut pos = vec![vec![]; n_groups];
    for (i, id) in ids.iter().enumerate() {
        if pos[id - 1].is_empty() {
            key.push(i);
        }
        pos[id - 1].push(i);
    }

    Ok(SplitId { key, pos })
}

/// Split `x` by the distinct values of `by`
///
/// The result is a table with a `key` column of distinct values of `by` and
/// a `val` list column holding the matching slices of `x`.
///
pub fn vec_split(x: &Value, by: &Value) -> Result<Value, Error> {
    let (x_size, by_size) = (vec_size(x)?, vec_size(by)?);
    if x_size != by_size {
        return Error::IncompatibleSize {
            x_arg: "by".to_string(),
            size: by_size,
            target: x_size,
        }
        .into();
    }

    let split = vec_split_id(by)?;
    let key = vec_slice(by, &positions(&split.key))?;
    let val = split
        .pos
        .iter()
        .map(|pos| vec_slice(x, &positions(pos)))
        .collect::<Result<Vec<_>, _>>()?;

    let n = split.key.len();
    Ok(Value::Table(Table::with_size(
        vec!["key".to_string(), "val".to_string()],
        vec![key, Value::list(val)],
        n,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;

    #[test]
    fn unique_keeps_first_appearances() {
        let x = v!("c(3L, 1L, 3L, NA, 1L, NA)");
        assert_eq!(vec_unique_loc(&x).unwrap(), vec![0, 1, 3]);
        assert_eq!(vec_unique(&x).unwrap(), v!("c(3L, 1L, NA)"));
        assert_eq!(vec_n_distinct(&x).unwrap(), 3);
    }

    #[test]
    fn missing_and_nan_are_distinct_groups() {
        let x = v!("c(NA, NaN, NA, NaN, 0, -0)");
        assert_eq!(vec_group_id(&x).unwrap(), vec![1, 2, 1, 2, 3, 3]);
    }

    #[test]
    fn duplicated_marks_later_occurrences() {
        let x = v!("c(1, 2, 1, 3, 2)");
        assert_eq!(vec_duplicated(&x).unwrap(), vec![false, false, true, false, true]);
        assert_eq!(vec_duplicate_detect(&x).unwrap(), vec![true, true, true, false, true]);

        let x = v!("c(\"a\", \"b\", \"a\")");
        assert_eq!(vec_duplicated(&x).unwrap(), vec![false, false, true]);
        assert!(vec_duplicated_any(&x).unwrap());
        assert!(!vec_duplicated_any(&v!("c(1, 2)")).unwrap());
    }

    #[test]
    fn ids_point_at_first_occurrence() {
        let x = v!("c(2, 1, 2, 2)");
        assert_eq!(vec_id(&x).unwrap(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn table_rows_are_keys() {
        let x = v!("data.frame(a = c(1L, 1L, 2L), b = c(\"x\", \"x\", \"x\"))");
        assert_eq!(vec_unique_loc(&x).unwrap(), vec![0, 2]);
        assert_eq!(vec_unique(&x).unwrap(), v!("data.frame(a = c(1L, 2L), b = c(\"x\", \"x\"))"));
    }

    #[test]
    fn lists_compare_elements_deeply() {
        let x = v!("list(c(1, 2), \"a\", c(1, 2))");
        assert_eq!(vec_group_id(&x).unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn matching_casts_to_the_common_type() {
        let out = vec_match(&v!("c(2L, 5L, NA)"), &v!("c(1, 2, NA)"), true).unwrap();
        assert_eq!(out, vec![Some(1), None, Some(2)]);

        let out = vec_match(&v!("c(2L, NA)"), &v!("c(1, 2, NA)"), false).unwrap();
        assert_eq!(out, vec![Some(1), None]);

        assert!(vec_match(&v!("1"), &v!("\"a\""), true).is_err());
    }

    #[test]
    fn membership() {
        let out = vec_in(&v!("c(1, 3, NA)"), &v!("c(1, 2)"), false).unwrap();
        assert_eq!(out, vec![OptionNA::Some(true), OptionNA::Some(false), OptionNA::NA]);

        let out = vec_in(&v!("c(NA)"), &v!("c(1, NA)"), true).unwrap();
        assert_eq!(out, vec![OptionNA::Some(true)]);
    }

    #[test]
    fn counts_in_order_of_appearance() {
        let c = vec_count(&v!("c(\"b\", \"a\", \"b\", \"b\")")).unwrap();
        assert_eq!(c.key, v!("c(\"b\", \"a\")"));
        assert_eq!(c.count, vec![3, 1]);
    }

    #[test]
    fn splitting() {
        let s = vec_split_id(&v!("c(1L, 2L, 1L)")).unwrap();
        assert_eq!(s.key, vec![0, 1]);
        assert_eq!(s.pos, vec![vec![0, 2], vec![1]]);

        let out = vec_split(&v!("c(10, 20, 30)"), &v!("c(\"a\", \"b\", \"a\")")).unwrap();
        assert_eq!(
            out,
            v!("data.frame(key = c(\"a\", \"b\"), val = list(c(10, 30), 20))")
        );
        assert!(vec_split(&v!("c(1, 2)"), &v!("1")).is_err());
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(vec_unique_loc(&Value::Null).unwrap(), Vec::<usize>::new());
        assert_eq!(vec_n_distinct(&v!("integer(0)")).unwrap(), 0);
    }
}
