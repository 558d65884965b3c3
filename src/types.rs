use crate::environment::Environment;
use crate::evaluator;
use derive_more::Deref;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

/// A cons cell with individually mutable slots. Cells are shared via `Rc`, so
/// mutation through one handle is observable through every alias.
#[derive(Debug)]
pub struct Pair {
    head: RefCell<Value>,
    tail: RefCell<Value>,
}

impl Pair {
    pub fn new(head: Value, tail: Value) -> Self {
        Pair {
            head: RefCell::new(head),
            tail: RefCell::new(tail),
        }
    }

    pub fn head(&self) -> Value {
        self.head.borrow().clone()
    }

    pub fn tail(&self) -> Value {
        self.tail.borrow().clone()
    }

    pub fn set_head(&self, value: Value) {
        self.head.replace(value);
    }

    pub fn set_tail(&self, value: Value) {
        self.tail.replace(value);
    }
}

/// How many argument forms a builtin admits, before its own logic runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Default,
    Unary,
    Binary,
    NonEmpty,
}

impl Arity {
    pub(crate) fn admits(&self, n: usize) -> bool {
        match self {
            Arity::Default => true,
            Arity::Unary => n == 1,
            Arity::Binary => n == 2,
            Arity::NonEmpty => n >= 1,
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.admits(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: *self,
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let description = match self {
            Arity::Default => "any number of",
            Arity::Unary => "exactly one",
            Arity::Binary => "exactly two",
            Arity::NonEmpty => "at least one",
        };
        write!(f, "{}", description)
    }
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expects {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

/// A host-implemented callable. The entry receives its raw argument forms and
/// applies its own evaluation policy; `int_args` requests the numeric pre-pass
/// that reduces every argument position to an integer before `fn_ptr` runs.
pub struct BuiltinFn {
    pub name: &'static str,
    pub arity: Arity,
    pub int_args: bool,
    pub fn_ptr: fn(&mut [Value], &Rc<Environment>) -> evaluator::Result,
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "builtin #<{}>", self.name)
    }
}

pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Vec<Value>,
    pub parent: Rc<Environment>,
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: the parent may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: {:?}, body: {:?}}}",
            self.parameters, self.body
        )
    }
}

impl Closure {
    /// Checks the parameter-list shape and that the body is non-empty; the
    /// parameter/argument count match is checked at every invocation instead.
    pub(crate) fn new(
        parameters: &Value,
        body: &[Value],
        parent: &Rc<Environment>,
    ) -> Result<Self, evaluator::Error> {
        let parameters = parameter_names(parameters)?;
        if body.is_empty() {
            return Err(evaluator::BadForm::MissingBody.into());
        }
        Ok(Closure {
            parameters,
            body: body.to_vec(),
            parent: parent.clone(),
        })
    }
}

fn parameter_names(form: &Value) -> Result<Vec<Symbol>, evaluator::Error> {
    let items = match form {
        Value::Empty => return Ok(Vec::new()),
        Value::Pair(_) => list_to_vec(form),
        _ => return Err(evaluator::BadForm::ParametersNotAList.into()),
    };
    let (terminal, names) = match items.split_last() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };
    if !matches!(terminal, Value::Empty) {
        return Err(evaluator::BadForm::ParametersNotAList.into());
    }
    names
        .iter()
        .map(|obj| match obj {
            Value::Symbol(s) => Ok(s.clone()),
            _ => Err(evaluator::BadForm::ParameterNotASymbol.into()),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Integer(Int),
    Bool(bool),
    Symbol(Symbol),
    Pair(Rc<Pair>),
    Builtin(&'static BuiltinFn),
    Closure(Rc<Closure>),
}

/// Only boolean false is falsy; 0, Empty and every pair are truthy.
pub(crate) fn truthy(obj: &Value) -> bool {
    !matches!(obj, Value::Bool(false))
}

#[derive(Debug, PartialEq)]
pub enum TypeMismatch {
    NotAnInt,
    NotAPair,
    NotAProperList,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let wanted = match self {
            TypeMismatch::NotAnInt => "an integer",
            TypeMismatch::NotAPair => "a pair",
            TypeMismatch::NotAProperList => "a proper list",
        };
        write!(f, "expected {}", wanted)
    }
}

impl Value {
    pub(crate) fn as_int(&self) -> Result<Int, TypeMismatch> {
        match self {
            Value::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt),
        }
    }

    pub(crate) fn as_pair(&self) -> Result<&Rc<Pair>, TypeMismatch> {
        match self {
            Value::Pair(p) => Ok(p),
            _ => Err(TypeMismatch::NotAPair),
        }
    }
}

/// Flattens a pair chain into its heads plus the terminal tail as the final
/// element. Properness is therefore decided by `last == Empty`, never by
/// length: `(1 2)` gives `[1, 2, Empty]` while `(1 . 2)` gives `[1, 2]`.
pub(crate) fn list_to_vec(obj: &Value) -> Vec<Value> {
    let mut items = Vec::new();
    let mut cursor = obj.clone();
    while let Value::Pair(pair) = cursor {
        items.push(pair.head());
        cursor = pair.tail();
    }
    items.push(cursor);
    items
}

/// Inverse of `list_to_vec`: the final element becomes the terminal tail.
pub(crate) fn vec_to_list(items: Vec<Value>) -> Value {
    let mut rest = items.into_iter().rev();
    let mut tail = match rest.next() {
        Some(terminal) => terminal,
        None => Value::Empty,
    };
    for head in rest {
        tail = Value::Pair(Rc::new(Pair::new(head, tail)));
    }
    tail
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Integer(x), Integer(y)) => x == y,
            (Bool(x), Bool(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (Pair(x), Pair(y)) => x.head() == y.head() && x.tail() == y.tail(),
            (Builtin(x), Builtin(y)) => std::ptr::eq(*x, *y),
            (Closure(x), Closure(y)) => Rc::ptr_eq(x, y),
            (_, _) => false,
        }
    }
}
