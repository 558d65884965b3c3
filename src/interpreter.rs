use crate::environment::Environment;
use crate::{core, evaluator, printer, reader};
use std::fmt;
use std::rc::Rc;

pub type Result = std::result::Result<String, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
    Print(printer::Error),
}

/// The three public categories an error is reported under. Everything finer
/// grained stays internal; the message carries the detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Runtime,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read(_) => ErrorKind::Syntax,
            Error::Eval(evaluator::Error::UnknownSymbol(_)) => ErrorKind::Name,
            Error::Eval(evaluator::Error::BadForm(_)) => ErrorKind::Syntax,
            Error::Eval(_) => ErrorKind::Runtime,
            Error::Print(_) => ErrorKind::Runtime,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Name => "name error",
            ErrorKind::Runtime => "runtime error",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind())?;
        match self {
            Error::Read(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
            Error::Print(e) => write!(f, "{}", e),
        }
    }
}

/// A session: a user frame layered over the builtin namespace. Definitions
/// made by one `run` call are visible to later ones.
pub struct Interpreter {
    frame: Rc<Environment>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            frame: Environment::spawn_from(&core::namespace_frame()),
        }
    }

    /// Reads a single expression, evaluates it in the session frame and
    /// renders the result.
    pub fn run(&self, line: &str) -> Result {
        let form = reader::read_str(line).map_err(Error::Read)?;
        let value = evaluator::evaluate(&form, &self.frame).map_err(Error::Eval)?;
        printer::pr_str(&value).map_err(Error::Print)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
