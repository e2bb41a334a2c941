use clap::{Args, Parser, Subcommand};

use crate::bind::{vec_c, vec_cbind, vec_rbind, BindOptions};
use crate::coercion::{vec_cast, vec_cast_strict, vec_ptype2};
use crate::dictionary::{vec_count, vec_duplicated, vec_match, vec_unique};
use crate::error::Error;
use crate::object::*;
use crate::order::{vec_order, Direction, NaValue, OrderOptions};
use crate::parser::{parse_arg, parse_value};
use crate::rank::{vec_rank, Incomplete, RankOptions, Ties};
use crate::size::vec_size_common;
use crate::slice::vec_slice;

/// Inspect how values combine
///
/// Values are written as literals, for example `c(1L, NA)`,
/// `data.frame(a = c("x", "y"))` or `list(1, "a")`. Inputs to binding
/// operations may be named as `name = value`.
///
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Log operations to stderr, overriding RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Common type of two values
    Ptype2 { x: String, y: String },

    /// Convert a value to the type of another
    Cast {
        x: String,
        to: String,

        /// Report lossy conversions instead of failing
        #[arg(long)]
        allow_lossy: bool,
    },

    /// Common size of the inputs
    Size { xs: Vec<String> },

    /// Concatenate values
    C {
        xs: Vec<String>,

        #[command(flatten)]
        bind: BindArgs,
    },

    /// Stack values as the rows of a table
    Rbind {
        xs: Vec<String>,

        #[command(flatten)]
        bind: BindArgs,
    },

    /// Place values side by side as table columns
    Cbind {
        xs: Vec<String>,

        #[command(flatten)]
        bind: BindArgs,
    },

    /// Select elements by 1-based location, `0` selecting a missing element
    Slice { x: String, locations: Vec<i32> },

    /// Distinct values, in order of first appearance
    Unique { x: String },

    /// Whether an earlier element has the same value
    Duplicated { x: String },

    /// 1-based location of each needle in the haystack
    Match {
        needles: String,
        haystack: String,

        /// Never match missing values
        #[arg(long)]
        na_unequal: bool,
    },

    /// Frequencies of distinct values
    Count { x: String },

    /// Ranks of the elements
    Rank {
        x: String,

        #[arg(long, default_value_t = Ties::default())]
        ties: Ties,

        #[arg(long, default_value_t = Incomplete::default())]
        incomplete: Incomplete,

        #[command(flatten)]
        order: OrderArgs,
    },

    /// 1-based sort order of the elements
    Order {
        x: String,

        #[command(flatten)]
        order: OrderArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct BindArgs {
    /// Output type, overriding the common type of the inputs
    #[arg(long)]
    pub ptype: Option<String>,

    /// Column recording the input each row came from
    #[arg(long)]
    pub names_to: Option<String>,

    /// Output size, overriding the common size of the inputs
    #[arg(long)]
    pub size: Option<usize>,
}

impl BindArgs {
    fn options(&self) -> Result<BindOptions, Error> {
        Ok(BindOptions {
            ptype: self.ptype.as_deref().map(parse_value).transpose()?,
            names_to: self.names_to.clone(),
            size: self.size,
        })
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OrderArgs {
    #[arg(long, default_value_t = Direction::default())]
    pub direction: Direction,

    #[arg(long, default_value_t = NaValue::default())]
    pub na_value: NaValue,
}

fn locations(x: impl IntoIterator<Item = usize>) -> Value {
    Value::from(x.into_iter().map(|i| i as i32 + 1).collect::<Vec<i32>>())
}

fn parse_args(xs: &[String]) -> Result<Vec<crate::bind::Arg>, Error> {
    xs.iter().map(|x| parse_arg(x)).collect()
}

impl Command {
    /// Evaluate the command, rendering its result as a value literal
    pub fn run(&self) -> Result<String, Error> {
        let out = match self {
            Command::Ptype2 { x, y } => {
                let joined = vec_ptype2(&parse_value(x)?, &parse_value(y)?, "x", "y")?;
                joined.ptype.unwrap_or_default()
            }
            Command::Cast { x, to, allow_lossy } => {
                let (x, to) = (parse_value(x)?, parse_value(to)?);
                if !allow_lossy {
                    vec_cast_strict(&x, &to, "x", "to")?
                } else {
                    let cast = vec_cast(&x, &to, "x", "to")?;
                    if cast.lossy {
                        tracing::warn!(locations = ?cast.locations, "lossy conversion");
                    }
                    cast.value
                }
            }
            Command::Size { xs } => {
                let xs = xs.iter().map(|x| parse_value(x)).collect::<Result<Vec<_>, _>>()?;
                Value::from(vec![vec_size_common(&xs, 0)? as i32])
            }
            Command::C { xs, bind } => vec_c(&parse_args(xs)?, &bind.options()?)?,
            Command::Rbind { xs, bind } => vec_rbind(&parse_args(xs)?, &bind.options()?)?,
            Command::Cbind { xs, bind } => vec_cbind(&parse_args(xs)?, &bind.options()?)?,
            Command::Slice { x, locations } => {
                vec_slice(&parse_value(x)?, &CompactIndex::from(locations.clone()))?
            }
            Command::Unique { x } => vec_unique(&parse_value(x)?)?,
            Command::Duplicated { x } => Value::from(vec_duplicated(&parse_value(x)?)?),
            Command::Match {
                needles,
                haystack,
                na_unequal,
            } => {
                let matched = vec_match(&parse_value(needles)?, &parse_value(haystack)?, !na_unequal)?;
                let matched: Vec<Integer> = matched
                    .into_iter()
                    .map(|i| i.map(|i| i as i32 + 1).into())
                    .collect();
                Value::from(matched)
            }
            Command::Count { x } => {
                let count = vec_count(&parse_value(x)?)?;
                let n = count.count.len();
                let freq = count.count.iter().map(|c| *c as i32).collect::<Vec<i32>>();
                let names = vec!["key".to_string(), "count".to_string()];
                Value::Table(Table::with_size(names, vec![count.key, Value::from(freq)], n))
            }
            Command::Rank {
                x,
                ties,
                incomplete,
                order,
            } => {
                let options = RankOptions {
                    ties: *ties,
                    incomplete: *incomplete,
                    direction: order.direction,
                    na_value: order.na_value,
                };
                Value::from(vec_rank(&parse_value(x)?, options)?)
            }
            Command::Order { x, order } => {
                let options = OrderOptions {
                    direction: order.direction,
                    na_value: order.na_value,
                };
                locations(vec_order(&parse_value(x)?, options)?.order)
            }
        };

        Ok(out.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<String, Error> {
        let cli = Cli::try_parse_from(std::iter::once("vctrs").chain(args.iter().copied()))
            .expect("valid arguments");
        cli.command.run()
    }

    #[test]
    fn common_type() {
        assert_eq!(run(&["ptype2", "1L", "2.5"]).unwrap(), "double(0)");
        assert_eq!(run(&["ptype2", "NULL", "NULL"]).unwrap(), "NULL");
        assert!(run(&["ptype2", "1", "\"a\""]).is_err());
    }

    #[test]
    fn casting() {
        assert_eq!(run(&["cast", "c(1, 2)", "integer(0)"]).unwrap(), "c(1L, 2L)");
        assert!(matches!(
            run(&["cast", "1.5", "integer(0)"]),
            Err(Error::LossyCast { .. })
        ));
        assert_eq!(run(&["cast", "1.5", "integer(0)", "--allow-lossy"]).unwrap(), "1L");
    }

    #[test]
    fn binding() {
        assert_eq!(run(&["c", "a = 1L", "c(2, 3)"]).unwrap(), "c(a = 1, 2, 3)");
        assert_eq!(run(&["size", "1", "c(1, 2, 3)", "NULL"]).unwrap(), "3L");
        assert!(run(&["c", "1", "\"a\""]).is_err());
        assert_eq!(
            run(&["rbind", "data.frame(x = 1L)", "data.frame(x = 2.5)"]).unwrap(),
            "data.frame(x = c(1, 2.5))"
        );
        assert_eq!(
            run(&["cbind", "x = c(1L, 2L)", "y = \"a\""]).unwrap(),
            "data.frame(x = c(1L, 2L), y = c(\"a\", \"a\"))"
        );
    }

    #[test]
    fn slicing() {
        assert_eq!(run(&["slice", "c(a = 1L, b = 2L)", "2", "0"]).unwrap(), "c(b = 2L, NA)");
    }

    #[test]
    fn dictionary_commands() {
        assert_eq!(run(&["unique", "c(1, 2, 1, NA, NA)"]).unwrap(), "c(1, 2, NA)");
        assert_eq!(
            run(&["duplicated", "c(1, 2, 1, 3, 2)"]).unwrap(),
            "c(FALSE, FALSE, TRUE, FALSE, TRUE)"
        );
        assert_eq!(run(&["match", "c(2L, NA, 5L)", "c(1L, 2L, NA)"]).unwrap(), "c(2L, 3L, NA)");
        assert_eq!(
            run(&["match", "c(2L, NA)", "c(1L, 2L, NA)", "--na-unequal"]).unwrap(),
            "c(2L, NA)"
        );
        assert_eq!(
            run(&["count", "c(\"b\", \"a\", \"b\")"]).unwrap(),
            "data.frame(key = c(\"b\", \"a\"), count = c(2L, 1L))"
        );
    }

    #[test]
    fn ordering() {
        assert_eq!(run(&["order", "c(3, NA, 1)"]).unwrap(), "c(3L, 1L, 2L)");
        assert_eq!(
            run(&["order", "c(3, NA, 1)", "--direction", "desc", "--na-value", "smallest"]).unwrap(),
            "c(2L, 1L, 3L)"
        );
        assert_eq!(run(&["rank", "c(2, 1, 2)"]).unwrap(), "c(2L, 1L, 2L)");
        assert_eq!(run(&["rank", "c(2, 1, 2)", "--ties", "sequential"]).unwrap(), "c(2L, 1L, 3L)");
        assert_eq!(run(&["rank", "c(2, NA)", "--incomplete", "na"]).unwrap(), "c(1L, NA)");
    }

    #[test]
    fn malformed_literals_are_errors() {
        assert!(matches!(run(&["unique", "c(1,"]), Err(Error::ParseFailure(_))));
    }
}
