use crate::tokens::{self, Token, Tokenizer};
use crate::types::{Pair, Symbol, Value};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub enum Error {
    Tokenizer(tokens::Error),
    UnexpectedEnd,
    MisplacedDot,
    UnbalancedBracket,
    TrailingInput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "{}", e),
            Error::UnexpectedEnd => write!(f, "unexpected end of input"),
            Error::MisplacedDot => {
                write!(f, "a dot is only legal before the final element of a list")
            }
            Error::UnbalancedBracket => write!(f, "bracket sequence is not correct"),
            Error::TrailingInput => write!(f, "input is not a single form"),
        }
    }
}

/// Reads exactly one expression; trailing tokens are an error.
pub fn read_str(input: &str) -> Result<Value, Error> {
    let mut tokenizer = Tokenizer::new(input).map_err(Error::Tokenizer)?;
    let form = read_form(&mut tokenizer)?;
    match tokenizer.at_end() {
        true => Ok(form),
        false => Err(Error::TrailingInput),
    }
}

fn read_form(tokenizer: &mut Tokenizer) -> Result<Value, Error> {
    let token = match tokenizer.current() {
        Some(token) => token.clone(),
        None => return Err(Error::UnexpectedEnd),
    };
    tokenizer.advance().map_err(Error::Tokenizer)?;
    match token {
        Token::OpenBracket => read_list(tokenizer),
        Token::CloseBracket => Err(Error::UnbalancedBracket),
        Token::Dot => Err(Error::MisplacedDot),
        Token::QuoteMark => {
            let quoted = read_form(tokenizer)?;
            Ok(Value::Pair(Rc::new(Pair::new(
                Value::Symbol(Symbol::from("quote")),
                Value::Pair(Rc::new(Pair::new(quoted, Value::Empty))),
            ))))
        }
        Token::Constant(value) => Ok(Value::Integer(value)),
        Token::Symbol(name) => Ok(match name.as_str() {
            "#t" => Value::Bool(true),
            "#f" => Value::Bool(false),
            _ => Value::Symbol(Symbol(name)),
        }),
    }
}

// The opening bracket has already been consumed. Grow the chain one pair per
// element; a dot switches to reading the terminal tail.
fn read_list(tokenizer: &mut Tokenizer) -> Result<Value, Error> {
    if let Some(Token::CloseBracket) = tokenizer.current() {
        tokenizer.advance().map_err(Error::Tokenizer)?;
        return Ok(Value::Empty);
    }
    let root = Rc::new(Pair::new(Value::Empty, Value::Empty));
    let mut cursor = Rc::clone(&root);
    loop {
        cursor.set_head(read_form(tokenizer)?);
        match tokenizer.current() {
            None => return Err(Error::UnbalancedBracket),
            Some(Token::CloseBracket) | Some(Token::Dot) => break,
            Some(_) => {
                let next = Rc::new(Pair::new(Value::Empty, Value::Empty));
                cursor.set_tail(Value::Pair(Rc::clone(&next)));
                cursor = next;
            }
        }
    }
    if let Some(Token::Dot) = tokenizer.current() {
        tokenizer.advance().map_err(Error::Tokenizer)?;
        cursor.set_tail(read_form(tokenizer)?);
        if !matches!(tokenizer.current(), Some(Token::CloseBracket)) {
            return Err(Error::MisplacedDot);
        }
    }
    tokenizer.advance().map_err(Error::Tokenizer)?;
    Ok(Value::Pair(root))
}
