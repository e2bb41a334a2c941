use std::cmp::Ordering;

use tracing::trace;

use crate::compare::compare_scalar;
use crate::error::Error;
use crate::object::*;
use crate::proxy::vec_proxy_compare;
use crate::size::vec_size;
use crate::with_vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Where missing values sort, independent of direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NaValue {
    #[default]
    Largest,
    Smallest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderOptions {
    pub direction: Direction,
    pub na_value: NaValue,
}

/// A stable ordering and the runs of equal elements within it
///
/// `order` holds 0-based locations. `group_sizes` partitions `order` into
/// consecutive runs of elements that compare equal.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderInfo {
    pub order: Vec<usize>,
    pub group_sizes: Vec<usize>,
}

/// Stable sort order of `x`
///
/// Elements are ordered through their comparison proxy, table rows
/// lexicographically by column. `NA` and `NaN` tie with each other and sort
/// according to `na_value`. Lists order by first appearance.
///
pub fn vec_order(x: &Value, options: OrderOptions) -> Result<OrderInfo, Error> {
    let proxy = vec_proxy_compare(x, true)?;
    let n = vec_size(&proxy)?;
    trace!(n, direction = %options.direction, na_value = %options.na_value, "ordering");

    let mut failure = None;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| match compare_rows(&proxy, i, j, options) {
        Ok(o) => o,
        Err(e) => {
            failure.get_or_insert(e);
            Ordering::Equal
        }
    });

    if let Some(e) = failure {
        return Err(e);
    }

    let mut group_sizes = vec![];
    let mut run = 0;
    for k in 0..n {
        if k > 0 && compare_rows(&proxy, order[k - 1], order[k], options)? != Ordering::Equal {
            group_sizes.push(run);
            run = 0;
        }
        run += 1;
    }
    if run > 0 {
        group_sizes.push(run);
    }

    Ok(OrderInfo { order, group_sizes })
}

fn compare_rows(proxy: &Value, i: usize, j: usize, options: OrderOptions) -> Result<Ordering, Error> {
    match proxy {
        Value::Table(t) => {
            for col in t.columns.iter() {
                let o = compare_rows(col, i, j, options)?;
                if o != Ordering::Equal {
                    return Ok(o);
                }
            }
            Ok(Ordering::Equal)
        }
        Value::Unspecified(_) => Ok(Ordering::Equal),
        Value::Vector(v, _) => {
            let (mi, mj) = with_vector!(v, v => {
                let v = v.borrow();
                (v[i].is_missing(), v[j].is_missing())
            });

            let missing_order = match options.na_value {
                NaValue::Largest => Ordering::Greater,
                NaValue::Smallest => Ordering::Less,
            };

            match (mi, mj) {
                (true, true) => Ok(Ordering::Equal),
                (true, false) => Ok(missing_order),
                (false, true) => Ok(missing_order.reverse()),
                (false, false) => {
                    let o = match compare_scalar(proxy, i, proxy, j, true)? {
                        OptionNA::Some(c) => c.cmp(&0),
                        OptionNA::NA => Ordering::Equal,
                    };
                    Ok(match options.direction {
                        Direction::Asc => o,
                        Direction::Desc => o.reverse(),
                    })
                }
            }
        }
        _ => crate::internal_err!("ordering requires a comparison proxy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v;

    #[test]
    fn ascending_with_missing_last() {
        let info = vec_order(&v!("c(3, NA, 1, 3, NaN)"), OrderOptions::default()).unwrap();
        assert_eq!(info.order, vec![2, 0, 3, 1, 4]);
        assert_eq!(info.group_sizes, vec![1, 2, 2]);
    }

    #[test]
    fn descending_keeps_missing_placement() {
        let options = OrderOptions {
            direction: Direction::Desc,
            na_value: NaValue::Largest,
        };
        let info = vec_order(&v!("c(1L, NA, 2L)"), options).unwrap();
        assert_eq!(info.order, vec![2, 0, 1]);

        let options = OrderOptions {
            direction: Direction::Asc,
            na_value: NaValue::Smallest,
        };
        let info = vec_order(&v!("c(1L, NA, 2L)"), options).unwrap();
        assert_eq!(info.order, vec![1, 0, 2]);
    }

    #[test]
    fn table_rows_order_lexicographically() {
        let x = v!("data.frame(a = c(2L, 1L, 2L), b = c(\"b\", \"z\", \"a\"))");
        let info = vec_order(&x, OrderOptions::default()).unwrap();
        assert_eq!(info.order, vec![1, 2, 0]);
        assert_eq!(info.group_sizes, vec![1, 1, 1]);
    }

    #[test]
    fn complex_orders_by_parts() {
        let info = vec_order(&v!("c(2+0i, 1+5i, 1+1i)"), OrderOptions::default()).unwrap();
        assert_eq!(info.order, vec![2, 1, 0]);
    }

    #[test]
    fn option_names_parse() {
        assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Desc);
        assert_eq!(NaValue::Smallest.to_string(), "smallest");
    }
}
