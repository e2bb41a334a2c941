use crate::dictionary::vec_group_id;
use crate::error::Error;
use crate::object::*;

/// The storage representation of a value
///
/// Base values are their own proxy. Extensions are proxied by their
/// registered handler, or by their payload when no handler is registered.
///
pub fn vec_proxy(x: &Value) -> Result<Value, Error> {
    match x {
        Value::Extension(e) => match lookup(&e.class) {
            Some(handler) => handler.proxy(e),
            None => Ok((*e.data).clone()),
        },
        x => Ok(x.clone()),
    }
}

/// Re-wrap a proxy in the type of `to`
pub fn vec_restore(proxy: Value, to: &Value) -> Result<Value, Error> {
    match (proxy, to) {
        (proxy, Value::Extension(e)) => match lookup(&e.class) {
            Some(handler) => handler.restore(proxy, e),
            None => Ok(e.rewrap(proxy)),
        },
        (Value::Table(p), Value::Table(t)) => Ok(Value::Table(Table { kind: t.kind, ..p })),
        (proxy, _) => Ok(proxy),
    }
}

/// The representation used for equality and hashing
///
/// Table proxies are flattened so that no column is itself a table, and a
/// table left with a single column is replaced by that column. Shaped
/// vectors become one column per position along their trailing dimensions.
///
pub fn vec_proxy_equal(x: &Value) -> Result<Value, Error> {
    let proxy = proxy_equal_recursive(x)?;
    Ok(unwrap_table(proxy))
}

fn proxy_equal_recursive(x: &Value) -> Result<Value, Error> {
    match x {
        Value::Extension(e) => {
            let proxy = match lookup(&e.class) {
                Some(handler) => handler.proxy_equal(e)?,
                None => (*e.data).clone(),
            };
            proxy_equal_recursive(&proxy)
        }
        Value::Vector(v, Attributes { dim: Some(d), .. }) if d.len() > 1 => {
            proxy_equal_recursive(&Value::Table(Table::from_shaped(v, d)))
        }
        Value::Vector(v, _) => Ok(Value::from(v.clone())),
        Value::Table(t) => {
            let columns = t
                .columns
                .iter()
                .map(proxy_equal_recursive)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Table(Table { columns, ..t.clone() }.flatten()))
        }
        Value::Scalar(r) => Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into(),
        x => Ok(x.clone()),
    }
}

/// The representation used for ordering
///
/// Like [`vec_proxy_equal`], and additionally raw vectors become integers
/// and complex vectors become a table of their real and imaginary parts.
/// Lists have no order of their own. When `relax` is set (always the case for
/// table columns) they are replaced by the position of each element's first
/// appearance, otherwise they are an error.
///
pub fn vec_proxy_compare(x: &Value, relax: bool) -> Result<Value, Error> {
    let proxy = proxy_compare_recursive(x, relax)?;
    Ok(unwrap_table(proxy))
}

fn proxy_compare_recursive(x: &Value, relax: bool) -> Result<Value, Error> {
    match x {
        Value::Extension(e) => {
            let proxy = match lookup(&e.class) {
                Some(handler) => handler.proxy_compare(e)?,
                None => (*e.data).clone(),
            };
            proxy_compare_recursive(&proxy, relax)
        }
        Value::Vector(v, Attributes { dim: Some(d), .. }) if d.len() > 1 => {
            proxy_compare_recursive(&Value::Table(Table::from_shaped(v, d)), relax)
        }
        Value::Vector(Vector::Raw(v), _) => Ok(Value::from(
            v.borrow().iter().map(|x| *x as i32).collect::<Vec<i32>>(),
        )),
        Value::Vector(Vector::Complex(v), _) => {
            let (re, im): (Vec<Double>, Vec<Double>) = v.borrow().iter().map(|x| (x.re, x.im)).unzip();
            let n = re.len();
            Ok(Value::Table(Table::with_size(
                vec!["re".to_string(), "im".to_string()],
                vec![Value::from(re), Value::from(im)],
                n,
            )))
        }
        Value::Vector(Vector::List(_), _) if relax => {
            let ids = vec_group_id(&x.clone().with_names(None))?;
            Ok(Value::from(ids.into_iter().map(|i| i as i32).collect::<Vec<i32>>()))
        }
        Value::Vector(Vector::List(_), _) => {
            Error::ScalarIncomparable("lists have no order".to_string()).into()
        }
        Value::Vector(v, _) => Ok(Value::from(v.clone())),
        Value::Table(t) => {
            let columns = t
                .columns
                .iter()
                .map(|c| proxy_compare_recursive(c, true))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Table(Table { columns, ..t.clone() }.flatten()))
        }
        Value::Scalar(r) => Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into(),
        x => Ok(x.clone()),
    }
}

fn unwrap_table(x: Value) -> Value {
    match x {
        Value::Table(mut t) if t.ncol() == 1 => match t.columns.pop() {
            Some(col) => unwrap_table(col),
            None => Value::Table(t),
        },
        x => x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;
    use std::rc::Rc;

    #[test]
    fn base_values_are_their_own_proxy() {
        let x = v!("c(a = 1, b = 2)");
        assert_eq!(vec_proxy(&x).unwrap(), x);
    }

    #[test]
    fn equality_proxy_flattens_and_unwraps() {
        let x = v!("data.frame(a = data.frame(b = c(1L, 2L)))");
        assert_eq!(vec_proxy_equal(&x).unwrap(), v!("c(1L, 2L)"));

        let x = v!("data.frame(a = 1, b = data.frame(c = 2, d = 3))");
        match vec_proxy_equal(&x).unwrap() {
            Value::Table(t) => assert_eq!(t.names, vec!["a", "c", "d"]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn shaped_vectors_proxy_to_columns() {
        let x = v!("array(c(1L, 2L, 3L, 4L), dim = c(2L, 2L))");
        match vec_proxy_equal(&x).unwrap() {
            Value::Table(t) => {
                assert_eq!(t.size(), 2);
                assert_eq!(t.columns[1], v!("c(3L, 4L)"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn compare_proxy_of_raw_and_complex() {
        assert_eq!(vec_proxy_compare(&v!("raw(1, 255)"), false).unwrap(), v!("c(1L, 255L)"));
        match vec_proxy_compare(&v!("c(1+2i)"), false).unwrap() {
            Value::Table(t) => assert_eq!(t.names, vec!["re", "im"]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn lists_only_compare_when_relaxed() {
        let x = v!("list(\"b\", \"a\", \"b\")");
        assert!(vec_proxy_compare(&x, false).is_err());
        assert_eq!(vec_proxy_compare(&x, true).unwrap(), v!("c(1L, 2L, 1L)"));
    }

    struct Negated;

    impl ExtensionType for Negated {
        fn proxy_compare(&self, x: &Extension) -> Result<Value, Error> {
            match x.data.as_ref() {
                Value::Vector(Vector::Double(v), _) => Ok(Value::from(
                    v.borrow().iter().map(|x| x.map(|x| -x)).collect::<Vec<Double>>(),
                )),
                _ => Ok((*x.data).clone()),
            }
        }
    }

    #[test]
    fn extensions_use_their_handler() {
        register("negated", Rc::new(Negated));
        let x = Value::Extension(Extension::new("negated", v!("c(1, 2)")));

        assert_eq!(vec_proxy(&x).unwrap(), v!("c(1, 2)"));
        assert_eq!(vec_proxy_compare(&x, false).unwrap(), v!("c(-1, -2)"));

        let restored = vec_restore(v!("3"), &x).unwrap();
        assert_eq!(restored, Value::Extension(Extension::new("negated", v!("3"))));
        unregister("negated");
    }
}
