use hashbrown::HashMap;

use crate::error::Error;
use crate::map_vector;
use crate::size::vec_size;

use super::*;

/// Table container flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
pub enum TableKind {
    #[default]
    #[strum(serialize = "data.frame")]
    DataFrame,
    #[strum(serialize = "tibble")]
    Tibble,
}

impl TableKind {
    /// Tibbles win over plain data frames when combined
    pub fn join(self, other: TableKind) -> TableKind {
        match (self, other) {
            (TableKind::DataFrame, TableKind::DataFrame) => TableKind::DataFrame,
            _ => TableKind::Tibble,
        }
    }
}

/// Row identity of a table
#[derive(Debug, Clone)]
pub enum RowNames {
    /// Automatic row names `1..n`, stored as their count
    Compact(usize),
    /// Automatic row names `1..n`, stored explicitly
    Expanded(Vec<i32>),
    /// User supplied identifiers, possibly repeated
    Identifiers(Vec<String>),
}

impl RowNames {
    pub fn size(&self) -> usize {
        match self {
            RowNames::Compact(n) => *n,
            RowNames::Expanded(x) => x.len(),
            RowNames::Identifiers(x) => x.len(),
        }
    }

    pub fn is_identifiers(&self) -> bool {
        matches!(self, RowNames::Identifiers(_))
    }
}

/// Automatic row names are equal however they are stored
impl PartialEq for RowNames {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RowNames::Identifiers(l), RowNames::Identifiers(r)) => l == r,
            (RowNames::Identifiers(_), _) | (_, RowNames::Identifiers(_)) => false,
            (l, r) => l.size() == r.size(),
        }
    }
}

/// Table
///
/// An ordered collection of uniquely named, equally sized columns. Columns
/// may themselves be tables ("df-cols") or shaped vectors.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub names: Vec<String>,
    pub columns: Vec<Value>,
    pub row_names: RowNames,
    pub kind: TableKind,
}

impl Table {
    /// Create a table, validating that all columns share one size
    pub fn new(names: Vec<String>, columns: Vec<Value>) -> Result<Table, Error> {
        if names.len() != columns.len() {
            return crate::internal_err!("every column must be named");
        }

        let size = match columns.first() {
            Some(first) => vec_size(first)?,
            None => 0,
        };

        for (name, col) in names.iter().zip(columns.iter()) {
            let n = vec_size(col)?;
            if n != size {
                return Error::IncompatibleSize {
                    x_arg: name.clone(),
                    size: n,
                    target: size,
                }
                .into();
            }
        }

        Ok(Table::with_size(names, columns, size))
    }

    /// Create a table of known size without validating its columns
    pub fn with_size(names: Vec<String>, columns: Vec<Value>, size: usize) -> Table {
        Table {
            names,
            columns,
            row_names: RowNames::Compact(size),
            kind: TableKind::default(),
        }
    }

    pub fn with_kind(self, kind: TableKind) -> Table {
        Table { kind, ..self }
    }

    pub fn size(&self) -> usize {
        self.row_names.size()
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Column positions keyed by name
    pub fn name_map(&self) -> HashMap<&str, usize> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&Value> {
        let i = self.names.iter().position(|n| n == name)?;
        self.columns.get(i)
    }

    /// Replace a column by name, appending it if absent
    pub fn poke(&mut self, name: &str, value: Value) {
        match self.names.iter().position(|n| n == name) {
            Some(i) => self.columns[i] = value,
            None => {
                self.names.push(name.to_string());
                self.columns.push(value);
            }
        }
    }

    /// Splice nested table columns into their parent
    ///
    /// The result has no table-valued columns. Spliced columns keep their
    /// inner names.
    ///
    pub fn flatten(&self) -> Table {
        if !self.has_table_columns() {
            return self.clone();
        }

        let mut names = vec![];
        let mut columns = vec![];

        for (name, col) in self.names.iter().zip(self.columns.iter()) {
            match col {
                Value::Table(inner) => {
                    let inner = inner.flatten();
                    names.extend(inner.names);
                    columns.extend(inner.columns);
                }
                _ => {
                    names.push(name.clone());
                    columns.push(col.clone());
                }
            }
        }

        Table {
            names,
            columns,
            row_names: self.row_names.clone(),
            kind: self.kind,
        }
    }

    /// Whether any column is itself a table
    pub fn has_table_columns(&self) -> bool {
        self.columns.iter().any(|c| matches!(c, Value::Table(_)))
    }

    /// Split a shaped vector into one column per position along its trailing
    /// dimensions
    pub fn from_shaped(x: &Vector, dim: &[usize]) -> Table {
        let n = dim.first().copied().unwrap_or(0);
        let ncol: usize = dim.iter().skip(1).product();

        let columns: Vec<Value> = (0..ncol)
            .map(|k| {
                let col = map_vector!(x, v => v.borrow()[k * n..(k + 1) * n].to_vec().into());
                Value::from(col)
            })
            .collect();

        let names = (1..=ncol).map(|k| format!("...{k}")).collect();
        Table::with_size(names, columns, n)
    }
}
