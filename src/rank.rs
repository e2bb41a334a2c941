use crate::error::Error;
use crate::object::*;
use crate::order::{vec_order, Direction, NaValue, OrderOptions};
use crate::proxy::vec_proxy_equal;
use crate::slice::vec_slice;

/// How tied elements are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Ties {
    /// Every tie gets the smallest rank of its run
    #[default]
    Min,
    /// Every tie gets the largest rank of its run
    Max,
    /// Ties are ranked in order of appearance
    Sequential,
    /// Like `Min`, without gaps between runs
    Dense,
}

/// Treatment of incomplete observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Incomplete {
    /// Rank them like any other value
    #[default]
    Rank,
    /// Give them a missing rank
    Na,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankOptions {
    pub ties: Ties,
    pub incomplete: Incomplete,
    pub direction: Direction,
    pub na_value: NaValue,
}

/// 1-based ranks of the elements of `x`
///
/// With [`Incomplete::Na`], observations with any missing component are
/// removed before ranking and receive a missing rank.
///
pub fn vec_rank(x: &Value, options: RankOptions) -> Result<Vec<Integer>, Error> {
    let order_options = OrderOptions {
        direction: options.direction,
        na_value: options.na_value,
    };

    let incomplete = match options.incomplete {
        Incomplete::Rank => None,
        Incomplete::Na => Some(incomplete_rows(&vec_proxy_equal(x)?)?).filter(|m| m.iter().any(|m| *m)),
    };

    let Some(incomplete) = incomplete else {
        let info = vec_order(x, order_options)?;
        let ranks = rank_groups(&info.order, &info.group_sizes, options.ties);
        return Ok(ranks.into_iter().map(|r| OptionNA::Some(r as i32)).collect());
    };

    let complete: Vec<Integer> = incomplete
        .iter()
        .enumerate()
        .filter(|(_, m)| !**m)
        .map(|(i, _)| OptionNA::Some(i as i32 + 1))
        .collect();

    let info = vec_order(&vec_slice(x, &CompactIndex::Explicit(complete))?, order_options)?;
    let mut ranks = rank_groups(&info.order, &info.group_sizes, options.ties).into_iter();

    Ok(incomplete
        .iter()
        .map(|m| match *m {
            true => OptionNA::NA,
            false => ranks.next().map_or(OptionNA::NA, |r| OptionNA::Some(r as i32)),
        })
        .collect())
}

// Walk the runs of an ordering, handing out ranks to each location
fn rank_groups(order: &[usize], group_sizes: &[usize], ties: Ties) -> Vec<usize> {
    let mut ranks = vec![0; order.len()];
    let mut k = 0;
    let mut rank = 1;

    for (g, size) in group_sizes.iter().enumerate() {
        let run = &order[k..k + size];

        for (j, loc) in run.iter().enumerate() {
            ranks[*loc] = match ties {
                Ties::Min => rank,
                Ties::Max => rank + size - 1,
                Ties::Sequential => rank + j,
                Ties::Dense => g + 1,
            };
        }

        k += size;
        rank += size;
    }

    ranks
}

// A row is incomplete when any of its columns is missing
fn incomplete_rows(proxy: &Value) -> Result<Vec<bool>, Error> {
    match proxy {
        Value::Table(t) => {
            let mut out = vec![false; t.size()];
            for col in t.columns.iter() {
                for (o, m) in out.iter_mut().zip(incomplete_rows(col)?) {
                    *o = *o || m;
                }
            }
            Ok(out)
        }
        Value::Vector(v, _) => Ok(v.missing()),
        Value::Unspecified(n) => Ok(vec![true; *n]),
        Value::Null => Ok(vec![]),
        _ => crate::internal_err!("completeness requires an equality proxy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::vec_n_distinct;
    use crate::v;
    use rand::Rng;

    fn ranks(x: &str, ties: Ties, incomplete: Incomplete) -> Vec<Integer> {
        let options = RankOptions {
            ties,
            incomplete,
            ..RankOptions::default()
        };
        vec_rank(&v!(x), options).unwrap()
    }

    fn ints(x: &[Option<i32>]) -> Vec<Integer> {
        x.iter().map(|x| OptionNA::from(*x)).collect()
    }

    #[test]
    fn tie_methods() {
        let x = "c(3, 1, 3, NA)";
        assert_eq!(ranks(x, Ties::Min, Incomplete::Rank), ints(&[Some(2), Some(1), Some(2), Some(4)]));
        assert_eq!(ranks(x, Ties::Max, Incomplete::Rank), ints(&[Some(3), Some(1), Some(3), Some(4)]));
        assert_eq!(ranks(x, Ties::Sequential, Incomplete::Rank), ints(&[Some(2), Some(1), Some(3), Some(4)]));
        assert_eq!(ranks(x, Ties::Dense, Incomplete::Rank), ints(&[Some(2), Some(1), Some(2), Some(3)]));
    }

    #[test]
    fn incomplete_observations_get_missing_ranks() {
        let x = "c(3, 1, 3, NA)";
        assert_eq!(ranks(x, Ties::Min, Incomplete::Na), ints(&[Some(2), Some(1), Some(2), None]));

        let x = "data.frame(a = c(1L, NA, 2L), b = c(\"x\", \"y\", NA))";
        assert_eq!(ranks(x, Ties::Min, Incomplete::Na), ints(&[Some(1), None, None]));
    }

    #[test]
    fn rank_laws_on_random_input() {
        let mut rng = rand::thread_rng();

        for _ in 0..10 {
            let values: Vec<i32> = (0..50).map(|_| rng.gen_range(0..10)).collect();
            let x = Value::from(values.clone());
            let rank = |ties| -> Vec<i32> {
                let options = RankOptions {
                    ties,
                    ..RankOptions::default()
                };
                vec_rank(&x, options)
                    .unwrap()
                    .into_iter()
                    .map(|r| r.as_option().unwrap_or_default())
                    .collect()
            };

            let (min, max, seq, dense) = (rank(Ties::Min), rank(Ties::Max), rank(Ties::Sequential), rank(Ties::Dense));

            let mut sorted = seq.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (1..=50).collect::<Vec<i32>>());

            for i in 0..50 {
                assert!(min[i] <= seq[i] && seq[i] <= max[i]);
                for j in 0..50 {
                    assert_eq!(values[i] < values[j], min[i] < min[j]);
                    assert_eq!(values[i] == values[j], dense[i] == dense[j]);
                }
            }

            let distinct = vec_n_distinct(&x).unwrap() as i32;
            assert_eq!(dense.iter().copied().max(), Some(distinct));
        }
    }
}
