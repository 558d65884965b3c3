use crate::environment::Environment;
use crate::evaluator::{self, evaluate, BadForm, Error};
use crate::types::{
    list_to_vec, truthy, vec_to_list, Arity, BuiltinFn, Closure, Int, Pair, Symbol, TypeMismatch,
    Value,
};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

fn grab_ints(args: &[Value]) -> evaluator::Result<Vec<Int>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(Value::as_int).collect();
    type_check.map_err(Error::TypeMismatch)
}

const QUOTE: BuiltinFn = BuiltinFn {
    name: "quote",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: quote_,
};

fn quote_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    Ok(args[0].clone())
}

const NUMBER_TEST: BuiltinFn = BuiltinFn {
    name: "number?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: number_test_,
};

fn number_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    Ok(Value::Bool(matches!(value, Value::Integer(_))))
}

// Adjacent evaluated arguments are compared pairwise; zero or one argument is
// trivially true. The numeric pre-pass has already reduced every slot.
fn chain_compare(args: &[Value], relation: fn(&Int, &Int) -> bool) -> evaluator::Result {
    let ints = grab_ints(args)?;
    Ok(Value::Bool(
        ints.windows(2).all(|pair| relation(&pair[0], &pair[1])),
    ))
}

macro_rules! comparison_builtin {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: BuiltinFn = BuiltinFn {
                name: stringify!($SYMBOL),
                arity: Arity::Default,
                int_args: true,
                fn_ptr: |args: &mut [Value], _env| chain_compare(args, Int::[<$NAME:lower>]),
            };
        }
    };
}

comparison_builtin!(=, EQ);
comparison_builtin!(>, GT);
comparison_builtin!(<, LT);
comparison_builtin!(<=, LE);
comparison_builtin!(>=, GE);

const SUM: BuiltinFn = BuiltinFn {
    name: "+",
    arity: Arity::Default,
    int_args: true,
    fn_ptr: sum_,
};

fn sum_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    let value = grab_ints(args)?
        .iter()
        .fold(0 as Int, |acc, &x| acc.wrapping_add(x));
    Ok(Value::Integer(value))
}

const SUB: BuiltinFn = BuiltinFn {
    name: "-",
    arity: Arity::NonEmpty,
    int_args: true,
    fn_ptr: sub_,
};

fn sub_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    match grab_ints(args)?.split_first() {
        Some((first, rest)) => {
            let value = rest.iter().fold(*first, |acc, &x| acc.wrapping_sub(x));
            Ok(Value::Integer(value))
        }
        None => unreachable!(), // arity is NonEmpty
    }
}

const MUL: BuiltinFn = BuiltinFn {
    name: "*",
    arity: Arity::Default,
    int_args: true,
    fn_ptr: mul_,
};

fn mul_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    let value = grab_ints(args)?
        .iter()
        .fold(1 as Int, |acc, &x| acc.wrapping_mul(x));
    Ok(Value::Integer(value))
}

const DIV: BuiltinFn = BuiltinFn {
    name: "/",
    arity: Arity::NonEmpty,
    int_args: true,
    fn_ptr: div_,
};

// Truncates toward zero, like the host's integer division.
fn div_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    match grab_ints(args)?.split_first() {
        Some((first, rest)) => {
            let mut value = *first;
            for &divisor in rest {
                if divisor == 0 {
                    return Err(Error::DivideByZero);
                }
                value = value.wrapping_div(divisor);
            }
            Ok(Value::Integer(value))
        }
        None => unreachable!(), // arity is NonEmpty
    }
}

const MAX: BuiltinFn = BuiltinFn {
    name: "max",
    arity: Arity::NonEmpty,
    int_args: true,
    fn_ptr: max_,
};

fn max_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    match grab_ints(args)?.split_first() {
        Some((first, rest)) => {
            let value = rest.iter().fold(*first, |acc, &x| acc.max(x));
            Ok(Value::Integer(value))
        }
        None => unreachable!(), // arity is NonEmpty
    }
}

const MIN: BuiltinFn = BuiltinFn {
    name: "min",
    arity: Arity::NonEmpty,
    int_args: true,
    fn_ptr: min_,
};

fn min_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    match grab_ints(args)?.split_first() {
        Some((first, rest)) => {
            let value = rest.iter().fold(*first, |acc, &x| acc.min(x));
            Ok(Value::Integer(value))
        }
        None => unreachable!(), // arity is NonEmpty
    }
}

const ABS: BuiltinFn = BuiltinFn {
    name: "abs",
    arity: Arity::Unary,
    int_args: true,
    fn_ptr: abs_,
};

fn abs_(args: &mut [Value], _env: &Rc<Environment>) -> evaluator::Result {
    Ok(Value::Integer(args[0].as_int()?.wrapping_abs()))
}

const PAIR_TEST: BuiltinFn = BuiltinFn {
    name: "pair?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: pair_test_,
};

// True only for a two-element chain, proper or dotted.
fn pair_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    let result = match &value {
        Value::Pair(_) => {
            let items = list_to_vec(&value);
            match items.len() {
                2 => !matches!(items[1], Value::Empty),
                3 => matches!(items[2], Value::Empty),
                _ => false,
            }
        }
        _ => false,
    };
    Ok(Value::Bool(result))
}

const NULL_TEST: BuiltinFn = BuiltinFn {
    name: "null?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: null_test_,
};

fn null_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    Ok(Value::Bool(matches!(value, Value::Empty)))
}

const LIST_TEST: BuiltinFn = BuiltinFn {
    name: "list?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: list_test_,
};

fn list_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    let result = match &value {
        Value::Empty => true,
        Value::Pair(_) => matches!(list_to_vec(&value).last(), Some(Value::Empty)),
        _ => false,
    };
    Ok(Value::Bool(result))
}

const CONS: BuiltinFn = BuiltinFn {
    name: "cons",
    arity: Arity::Binary,
    int_args: false,
    fn_ptr: cons_,
};

fn cons_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let head = evaluate(&args[0], env)?;
    let tail = evaluate(&args[1], env)?;
    Ok(Value::Pair(Rc::new(Pair::new(head, tail))))
}

const CAR: BuiltinFn = BuiltinFn {
    name: "car",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: car_,
};

fn car_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    let pair = value.as_pair()?;
    Ok(pair.head())
}

const CDR: BuiltinFn = BuiltinFn {
    name: "cdr",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: cdr_,
};

fn cdr_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    let pair = value.as_pair()?;
    Ok(pair.tail())
}

const LIST: BuiltinFn = BuiltinFn {
    name: "list",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: list_,
};

fn list_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let mut items = Vec::with_capacity(args.len() + 1);
    for form in args.iter() {
        items.push(evaluate(form, env)?);
    }
    items.push(Value::Empty);
    Ok(vec_to_list(items))
}

// Shared checks for list-ref and list-tail: a proper list and a non-negative
// index. Returns the flattened chain (terminal Empty included) and the index.
fn indexed_list(
    args: &mut [Value],
    env: &Rc<Environment>,
) -> evaluator::Result<(Vec<Value>, usize)> {
    args[0] = evaluate(&args[0], env)?;
    args[1] = evaluate(&args[1], env)?;
    if !matches!(args[0], Value::Pair(_)) {
        return Err(TypeMismatch::NotAProperList.into());
    }
    let items = list_to_vec(&args[0]);
    if !matches!(items.last(), Some(Value::Empty)) {
        return Err(TypeMismatch::NotAProperList.into());
    }
    let raw = args[1].as_int()?;
    let index = usize::try_from(raw).map_err(|_| Error::BadIndex(raw, items.len() - 1))?;
    Ok((items, index))
}

const LIST_REF: BuiltinFn = BuiltinFn {
    name: "list-ref",
    arity: Arity::Binary,
    int_args: false,
    fn_ptr: list_ref_,
};

fn list_ref_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let (items, index) = indexed_list(args, env)?;
    let elements = items.len() - 1;
    match index < elements {
        true => Ok(items[index].clone()),
        false => Err(Error::BadIndex(index as Int, elements)),
    }
}

const LIST_TAIL: BuiltinFn = BuiltinFn {
    name: "list-tail",
    arity: Arity::Binary,
    int_args: false,
    fn_ptr: list_tail_,
};

// An index equal to the length yields Empty.
fn list_tail_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let (items, index) = indexed_list(args, env)?;
    let elements = items.len() - 1;
    match index <= elements {
        true => Ok(vec_to_list(items[index..].to_vec())),
        false => Err(Error::BadIndex(index as Int, elements)),
    }
}

const BOOLEAN_TEST: BuiltinFn = BuiltinFn {
    name: "boolean?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: boolean_test_,
};

fn boolean_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    Ok(Value::Bool(matches!(value, Value::Bool(_))))
}

const NOT: BuiltinFn = BuiltinFn {
    name: "not",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: not_,
};

fn not_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    Ok(Value::Bool(matches!(value, Value::Bool(false))))
}

const AND: BuiltinFn = BuiltinFn {
    name: "and",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: and_,
};

// Left-to-right, rewriting each slot as it is reduced; stops at the first
// false value without evaluating the rest.
fn and_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let mut last = Value::Bool(true);
    for slot in args.iter_mut() {
        *slot = evaluate(slot, env)?;
        if matches!(slot, Value::Bool(false)) {
            return Ok(Value::Bool(false));
        }
        last = slot.clone();
    }
    Ok(last)
}

const OR: BuiltinFn = BuiltinFn {
    name: "or",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: or_,
};

fn or_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let mut last = Value::Bool(false);
    for slot in args.iter_mut() {
        *slot = evaluate(slot, env)?;
        if !matches!(slot, Value::Bool(false)) {
            return Ok(slot.clone());
        }
        last = slot.clone();
    }
    Ok(last)
}

const IF: BuiltinFn = BuiltinFn {
    name: "if",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: if_,
};

// A false condition with no else-branch yields Empty, which is an error only
// if the caller then evaluates it as an expression.
fn if_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    if args.len() != 2 && args.len() != 3 {
        return Err(BadForm::IfArgCount(args.len()).into());
    }
    args[0] = evaluate(&args[0], env)?;
    if truthy(&args[0]) {
        evaluate(&args[1], env)
    } else if args.len() == 3 {
        evaluate(&args[2], env)
    } else {
        Ok(Value::Empty)
    }
}

const DEFINE: BuiltinFn = BuiltinFn {
    name: "define",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: define_,
};

// Two shapes: (define name expr) and the sugar (define (name params) body...)
// which binds name to a closure. Both bind in the local frame only.
fn define_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    match args.first().cloned() {
        Some(Value::Symbol(name)) => {
            if args.len() != 2 {
                return Err(BadForm::DefineArgCount(args.len()).into());
            }
            let value = evaluate(&args[1], env)?;
            log::debug!("define {} as {:?}", name, value);
            env.define(name, value);
            Ok(Value::Empty)
        }
        Some(Value::Pair(signature)) => {
            let name = match signature.head() {
                Value::Symbol(s) => s,
                _ => return Err(BadForm::DefineTarget.into()),
            };
            let closure = Closure::new(&signature.tail(), &args[1..], env)?;
            log::debug!("define {} as {:?}", name, closure);
            env.define(name, Value::Closure(Rc::new(closure)));
            Ok(Value::Empty)
        }
        _ => Err(BadForm::DefineTarget.into()),
    }
}

const SET: BuiltinFn = BuiltinFn {
    name: "set!",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: set_,
};

fn set_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    if args.len() != 2 {
        return Err(BadForm::SetArgCount(args.len()).into());
    }
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        _ => return Err(BadForm::SetTarget.into()),
    };
    let value = evaluate(&args[1], env)?;
    env.set(&name, value).map_err(Error::UnknownSymbol)?;
    Ok(Value::Empty)
}

const SET_CAR: BuiltinFn = BuiltinFn {
    name: "set-car!",
    arity: Arity::Binary,
    int_args: false,
    fn_ptr: set_car_,
};

fn set_car_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let target = evaluate(&args[0], env)?;
    let pair = target.as_pair()?;
    pair.set_head(evaluate(&args[1], env)?);
    Ok(Value::Empty)
}

const SET_CDR: BuiltinFn = BuiltinFn {
    name: "set-cdr!",
    arity: Arity::Binary,
    int_args: false,
    fn_ptr: set_cdr_,
};

fn set_cdr_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let target = evaluate(&args[0], env)?;
    let pair = target.as_pair()?;
    pair.set_tail(evaluate(&args[1], env)?);
    Ok(Value::Empty)
}

const LAMBDA: BuiltinFn = BuiltinFn {
    name: "lambda",
    arity: Arity::Default,
    int_args: false,
    fn_ptr: lambda_,
};

fn lambda_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    match args {
        [] => Err(BadForm::MissingParameters.into()),
        [_] => Err(BadForm::MissingBody.into()),
        [parameters, body @ ..] => {
            let closure = Closure::new(parameters, body, env)?;
            Ok(Value::Closure(Rc::new(closure)))
        }
    }
}

const SYMBOL_TEST: BuiltinFn = BuiltinFn {
    name: "symbol?",
    arity: Arity::Unary,
    int_args: false,
    fn_ptr: symbol_test_,
};

fn symbol_test_(args: &mut [Value], env: &Rc<Environment>) -> evaluator::Result {
    let value = evaluate(&args[0], env)?;
    Ok(Value::Bool(matches!(value, Value::Symbol(_))))
}

static BUILTINS: [BuiltinFn; 34] = [
    // Special and binding forms
    QUOTE,
    IF,
    DEFINE,
    SET,
    LAMBDA,
    // Arithmetic
    SUM,
    SUB,
    MUL,
    DIV,
    MAX,
    MIN,
    ABS,
    // Comparisons
    EQ,
    GT,
    LT,
    LE,
    GE,
    // Working with pairs and lists
    CONS,
    CAR,
    CDR,
    LIST,
    LIST_REF,
    LIST_TAIL,
    SET_CAR,
    SET_CDR,
    // Booleans
    NOT,
    AND,
    OR,
    // Type tests
    NUMBER_TEST,
    PAIR_TEST,
    NULL_TEST,
    LIST_TEST,
    BOOLEAN_TEST,
    SYMBOL_TEST,
];

type Namespace = HashMap<&'static str, &'static BuiltinFn>;

lazy_static! {
    pub static ref NAMESPACE: Namespace = {
        let mut map = Namespace::new();
        for func in BUILTINS.iter() {
            map.insert(func.name, func);
        }
        map
    };
}

/// A fresh root frame with every builtin bound under its Scheme spelling.
pub fn namespace_frame() -> Rc<Environment> {
    let root = Environment::new_root();
    for (&name, &func) in NAMESPACE.iter() {
        root.define(Symbol::from(name), Value::Builtin(func));
    }
    root
}
