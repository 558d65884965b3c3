use crate::types::{list_to_vec, Value};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    UnprintableCallable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnprintableCallable => write!(f, "a callable has no printed representation"),
        }
    }
}

/// Renders a value to its canonical text.
pub fn pr_str(object: &Value) -> Result<String, Error> {
    match object {
        Value::Empty => Ok(String::from("()")),
        Value::Integer(value) => Ok(value.to_string()),
        Value::Bool(true) => Ok(String::from("#t")),
        Value::Bool(false) => Ok(String::from("#f")),
        Value::Symbol(name) => Ok(name.to_string()),
        Value::Pair(_) => pr_chain(object),
        Value::Builtin(_) | Value::Closure(_) => Err(Error::UnprintableCallable),
    }
}

fn pr_chain(object: &Value) -> Result<String, Error> {
    let mut items = list_to_vec(object);
    let terminal = items.pop().unwrap_or(Value::Empty);
    let heads: Result<Vec<_>, Error> = items.iter().map(pr_str).collect();
    let heads = heads?.iter().join(" ");
    match terminal {
        Value::Empty => Ok(format!("({})", heads)),
        tail => Ok(format!("({} . {})", heads, pr_str(&tail)?)),
    }
}
