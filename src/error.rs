use crate::parser::Rule;

#[macro_export]
macro_rules! internal_err {
    () => {
        $crate::error::Error::Internal(None, std::file!(), std::line!()).into()
    };
    ( $x:expr ) => {
        $crate::error::Error::Internal(Some($x.to_string()), std::file!(), std::line!()).into()
    };
}

#[macro_export]
macro_rules! err {
    ( $x:expr ) => {
        $crate::error::Error::Other($x.to_string()).into()
    };
}

/// The verb reported by type errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Combine,
    Convert,
}

impl Action {
    fn conjunction(&self) -> &'static str {
        match self {
            Action::Combine => "and",
            Action::Convert => "to",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Can't {action} {} <{x_type}> {} {} <{y_type}>.",
        display_arg(.x_arg, "x"),
        .action.conjunction(),
        display_arg(.y_arg, "to"))]
    IncompatibleType {
        x_arg: String,
        y_arg: String,
        x_type: String,
        y_type: String,
        action: Action,
    },

    #[error("Can't convert from {} <{from}> to <{to}> due to loss of precision.\nLocations: {}",
        display_arg(.x_arg, "x"),
        display_locations(.locations))]
    LossyCast {
        x_arg: String,
        from: String,
        to: String,
        locations: Vec<usize>,
    },

    #[error("Can't recycle {} (size {size}) to size {target}.", display_arg(.x_arg, "input"))]
    IncompatibleSize {
        x_arg: String,
        size: usize,
        target: usize,
    },

    #[error("`value` should have size {expected}, not size {actual}.")]
    InternalSizeMismatch { expected: usize, actual: usize },

    #[error("Can't assign to location {location}, there are only {size} elements.")]
    OutOfBounds { location: usize, size: usize },

    #[error("Dictionary is full.")]
    DictionaryFull,

    #[error("Can't compare: {0}.")]
    ScalarIncomparable(String),

    #[error("`{0}` must be a vector, not a scalar record.")]
    NotAVector(String),

    #[error("{0}")]
    ParseFailure(Box<pest::error::Error<Rule>>),

    #[error("Parse failed. Found unexpected parsing rule '{0:?}'")]
    ParseUnexpected(Rule),

    #[error("{0}")]
    Other(String),

    #[error("Internal error ({1}:{2}){}", .0.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Internal(Option<String>, &'static str, u32),
}

fn display_arg(arg: &str, fallback: &str) -> String {
    if arg.is_empty() {
        format!("`{fallback}`")
    } else {
        format!("`{arg}`")
    }
}

fn display_locations(locations: &[usize]) -> String {
    let shown: Vec<String> = locations.iter().take(5).map(|l| l.to_string()).collect();
    match locations.len() {
        0 => "(dropped columns)".to_string(),
        n if n > 5 => format!("{}, ... and {} more", shown.join(", "), n - 5),
        _ => shown.join(", "),
    }
}

impl<T> From<Error> for Result<T, Error> {
    fn from(val: Error) -> Self {
        Err(val)
    }
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Error::ParseFailure(Box::new(e))
    }
}
