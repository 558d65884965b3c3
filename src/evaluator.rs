use crate::environment::{Environment, UnknownSymbol};
use crate::types::{list_to_vec, BadArgCount, BuiltinFn, Closure, Int, TypeMismatch, Value};
use crate::{environment, types};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnknownSymbol(environment::UnknownSymbol),
    EmptyCombination,
    NotCallable,
    UnknownExpression,
    ImproperCombination,
    BadArgCount(types::BadArgCount),
    ClosureArgCount { expected: usize, got: usize },
    TypeMismatch(types::TypeMismatch),
    BadIndex(Int, usize),
    DivideByZero,
    BadForm(BadForm),
}

/// A special form whose shape is malformed; reported as a syntax error.
#[derive(Debug, PartialEq)]
pub enum BadForm {
    IfArgCount(usize),
    DefineTarget,
    DefineArgCount(usize),
    MissingParameters,
    MissingBody,
    ParametersNotAList,
    ParameterNotASymbol,
    SetArgCount(usize),
    SetTarget,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(UnknownSymbol(s)) => write!(f, "unknown variable '{}'", s),
            Error::EmptyCombination => write!(f, "empty combination has no value"),
            Error::NotCallable => write!(f, "head of combination is not callable"),
            Error::UnknownExpression => write!(f, "unknown expression"),
            Error::ImproperCombination => write!(f, "combination must be a proper list"),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::ClosureArgCount { expected, got } => write!(
                f,
                "closure expects exactly {} arguments, but received {}",
                expected, got
            ),
            Error::TypeMismatch(e) => write!(f, "{}", e),
            Error::BadIndex(i, len) => {
                write!(f, "index {} is out of range for a list of {} elements", i, len)
            }
            Error::DivideByZero => write!(f, "cannot divide by zero"),
            Error::BadForm(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for BadForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadForm::IfArgCount(n) => {
                write!(f, "if requires two or three argument forms, got {}", n)
            }
            BadForm::DefineTarget => {
                write!(f, "define requires a name or a name-list as its first form")
            }
            BadForm::DefineArgCount(n) => {
                write!(f, "define requires exactly two argument forms, got {}", n)
            }
            BadForm::MissingParameters => write!(f, "lambda requires a parameter list and a body"),
            BadForm::MissingBody => write!(f, "lambda body must contain at least one expression"),
            BadForm::ParametersNotAList => write!(f, "parameters must be given as a proper list"),
            BadForm::ParameterNotASymbol => write!(f, "parameter list must only contain names"),
            BadForm::SetArgCount(n) => {
                write!(f, "set! requires exactly two argument forms, got {}", n)
            }
            BadForm::SetTarget => write!(f, "set! requires a name as its first form"),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Error::TypeMismatch(t)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Error::BadArgCount(e)
    }
}

impl From<BadForm> for Error {
    fn from(e: BadForm) -> Self {
        Error::BadForm(e)
    }
}

/// Reduces an expression to a value. A pair is a combination: its head is
/// evaluated to a callable, which then receives the whole combination
/// unevaluated and applies its own argument-evaluation policy.
pub fn evaluate(obj: &Value, env: &Rc<Environment>) -> Result {
    log::trace!("evaluate {:?}", obj);
    match obj {
        Value::Integer(_) | Value::Bool(_) => Ok(obj.clone()),
        Value::Symbol(s) => env.get(s).map_err(Error::UnknownSymbol),
        Value::Empty => Err(Error::EmptyCombination),
        Value::Pair(pair) => {
            let head = evaluate(&pair.head(), env)?;
            match head {
                Value::Builtin(func) => call_builtin(func, obj, env),
                Value::Closure(func) => call_closure(&func, obj, env),
                _ => Err(Error::NotCallable),
            }
        }
        Value::Builtin(_) | Value::Closure(_) => Err(Error::UnknownExpression),
    }
}

/// Flattens the combination, checks properness and the arity class, then runs
/// the numeric pre-pass if the entry requested one. Argument slots are
/// rewritten in place, so the entry sees already-reduced values.
fn call_builtin(func: &'static BuiltinFn, combination: &Value, env: &Rc<Environment>) -> Result {
    let mut forms = list_to_vec(combination);
    if !matches!(forms.last(), Some(Value::Empty)) {
        return Err(Error::ImproperCombination);
    }
    let argument_count = forms.len() - 2;
    func.arity.validate_for(argument_count, func.name)?;
    let args = &mut forms[1..=argument_count];
    if func.int_args {
        for slot in args.iter_mut() {
            *slot = evaluate(slot, env)?;
            slot.as_int()?;
        }
    }
    log::trace!("call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args, env);
    match &result {
        Ok(value) => log::trace!("call to {} resulted in {:?}", func.name, value),
        Err(e) => log::trace!("call to {} failed: {}", func.name, e),
    }
    result
}

/// Arguments are evaluated in the caller's environment; the body runs in a
/// fresh frame spawned from the environment the closure captured.
fn call_closure(func: &Rc<Closure>, combination: &Value, env: &Rc<Environment>) -> Result {
    let forms = list_to_vec(combination);
    if !matches!(forms.last(), Some(Value::Empty)) {
        return Err(Error::ImproperCombination);
    }
    let args = &forms[1..forms.len() - 1];
    if args.len() != func.parameters.len() {
        return Err(Error::ClosureArgCount {
            expected: func.parameters.len(),
            got: args.len(),
        });
    }
    log::trace!("call {:?} with {}", func, pretty_print_args(args));
    let frame = Environment::spawn_from(&func.parent);
    for (key, form) in func.parameters.iter().zip(args) {
        frame.define(key.clone(), evaluate(form, env)?);
    }
    let mut result = Value::Empty;
    for command in &func.body {
        result = evaluate(command, &frame)?;
    }
    Ok(result)
}

fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        _ => args.iter().map(|obj| format!("{:?}", obj)).join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;
    use crate::types::Symbol;

    fn global() -> Rc<Environment> {
        crate::core::namespace_frame()
    }

    fn eval_str(input: &str, env: &Rc<Environment>) -> Result {
        evaluate(&read_str(input).unwrap(), env)
    }

    #[test]
    fn atoms_self_evaluate() {
        let env = global();
        assert_eq!(eval_str("5", &env).unwrap(), Value::Integer(5));
        assert_eq!(eval_str("#t", &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn symbols_resolve_through_the_environment() {
        let env = global();
        env.define(Symbol::from("x"), Value::Integer(3));
        assert_eq!(eval_str("x", &env).unwrap(), Value::Integer(3));
        assert!(matches!(
            eval_str("missing", &env),
            Err(Error::UnknownSymbol(_))
        ));
    }

    #[test]
    fn empty_combination_is_an_error() {
        let env = global();
        assert!(matches!(eval_str("()", &env), Err(Error::EmptyCombination)));
    }

    #[test]
    fn head_must_be_callable() {
        let env = global();
        assert!(matches!(eval_str("(5 1 2)", &env), Err(Error::NotCallable)));
        assert!(matches!(
            eval_str("((quote (1 2)) 3)", &env),
            Err(Error::NotCallable)
        ));
    }

    #[test]
    fn improper_combination_is_rejected() {
        let env = global();
        assert!(matches!(
            eval_str("(+ 1 . 2)", &env),
            Err(Error::ImproperCombination)
        ));
    }

    #[test]
    fn closure_arity_is_exact() {
        let env = global();
        eval_str("(define (f x y) (+ x y))", &env).unwrap();
        assert_eq!(eval_str("(f 1 2)", &env).unwrap(), Value::Integer(3));
        assert!(matches!(
            eval_str("(f 1)", &env),
            Err(Error::ClosureArgCount {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn closure_body_runs_in_order_returning_the_last_result() {
        let env = global();
        eval_str("(define (f) (define local 1) (+ local 2))", &env).unwrap();
        assert_eq!(eval_str("(f)", &env).unwrap(), Value::Integer(3));
        // `local` lives in the invocation frame, not the global one.
        assert!(matches!(
            eval_str("local", &env),
            Err(Error::UnknownSymbol(_))
        ));
    }

    #[test]
    fn arguments_evaluate_in_the_callers_environment() {
        let env = global();
        eval_str("(define x 10)", &env).unwrap();
        eval_str("(define (f x) (+ x 1))", &env).unwrap();
        assert_eq!(eval_str("(f (+ x 1))", &env).unwrap(), Value::Integer(12));
    }
}
