use hashbrown::HashMap;

use crate::object::*;

// strip a `...<digits>` suffix left by a previous repair
fn strip_position(name: &str) -> &str {
    match name.rfind("...") {
        Some(i) => {
            let suffix = &name[i + 3..];
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                &name[..i]
            } else {
                name
            }
        }
        None => name,
    }
}

/// Repair names so that every name is non-empty and unique
///
/// Empty names become `...i` and duplicated names become `name...i`, where
/// `i` is the 1-based position. Suffixes from an earlier repair are removed
/// first, so repairing is idempotent.
///
pub fn make_unique(names: &[String]) -> Vec<String> {
    let stripped: Vec<&str> = names.iter().map(|n| strip_position(n)).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in stripped.iter().copied() {
        *counts.entry(name).or_insert(0) += 1;
    }

    stripped
        .iter()
        .enumerate()
        .map(|(i, name)| match counts.get(name) {
            _ if name.is_empty() => format!("...{}", i + 1),
            Some(n) if *n > 1 => format!("{name}...{}", i + 1),
            _ => name.to_string(),
        })
        .collect()
}

/// `prefix1`, `prefix2`, ... `prefixN`
pub fn seq_names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

/// Combine an outer name with the names of an input of size `n`
///
/// Inner names are prefixed as `outer..inner`. Without inner names, the
/// outer name is used alone for a single element and numbered otherwise.
///
pub fn outer_names(outer: Option<&str>, inner: Option<Vec<Character>>, n: usize) -> Option<Vec<Character>> {
    let outer = match outer {
        Some(o) if !o.is_empty() => o,
        _ => return inner,
    };

    let inner_is_empty = inner.as_ref().map_or(true, |names| {
        names.iter().all(|n| matches!(n, OptionNA::Some(s) if s.is_empty()))
    });

    let names = if inner_is_empty {
        if n == 1 {
            vec![outer.to_string()]
        } else {
            seq_names(outer, n)
        }
    } else {
        inner
            .unwrap_or_default()
            .into_iter()
            .map(|n| format!("{outer}..{}", n.as_option().unwrap_or_default()))
            .collect()
    };

    Some(names.into_iter().map(OptionNA::Some).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(x: &[&str]) -> Vec<String> {
        x.iter().map(|s| s.to_string()).collect()
    }

    fn chars(x: &[&str]) -> Vec<Character> {
        x.iter().map(|s| OptionNA::Some(s.to_string())).collect()
    }

    #[test]
    fn unique_names() {
        let names = make_unique(&strings(&["a", "", "a", "b"]));
        assert_eq!(names, strings(&["a...1", "...2", "a...3", "b"]));
    }

    #[test]
    fn repair_is_idempotent() {
        let once = make_unique(&strings(&["x", "x", ""]));
        assert_eq!(make_unique(&once), once);
        assert_eq!(make_unique(&strings(&["a...9"])), strings(&["a"]));
    }

    #[test]
    fn outer_and_inner() {
        assert_eq!(
            outer_names(Some("a"), Some(chars(&["x", "y"])), 2),
            Some(chars(&["a..x", "a..y"]))
        );
        assert_eq!(outer_names(Some("a"), None, 1), Some(chars(&["a"])));
        assert_eq!(outer_names(Some("a"), None, 3), Some(chars(&["a1", "a2", "a3"])));
        assert_eq!(outer_names(None, Some(chars(&["x"])), 1), Some(chars(&["x"])));
        assert_eq!(outer_names(Some(""), None, 1), None);
    }
}
