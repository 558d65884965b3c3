use crate::types::Int;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    OpenBracket,
    CloseBracket,
    Dot,
    QuoteMark,
    Constant(Int),
    Symbol(String),
}

#[derive(Debug, PartialEq)]
pub enum Error {
    UnrecognizedChar(char),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnrecognizedChar(c) => write!(f, "cannot read a token starting with {:?}", c),
        }
    }
}

fn is_symbol_begin(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '<' | '=' | '>' | '*' | '/' | '#')
}

fn is_symbol_middle(c: char) -> bool {
    is_symbol_begin(c) || c.is_ascii_digit() || matches!(c, '?' | '!' | '-')
}

/// Single-token-lookahead lexer. `current` holds the last token produced;
/// `advance` replaces it with the next one from the character stream.
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Result<Self, Error> {
        let mut tokenizer = Tokenizer {
            chars: input.chars().peekable(),
            current: None,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn advance(&mut self) -> Result<(), Error> {
        self.skip_blanks();
        self.current = match self.chars.next() {
            None => None,
            Some('\'') => Some(Token::QuoteMark),
            Some('.') => Some(Token::Dot),
            Some('(') => Some(Token::OpenBracket),
            Some(')') => Some(Token::CloseBracket),
            Some(sign) if sign == '+' || sign == '-' => Some(self.read_signed(sign)),
            Some(digit) if digit.is_ascii_digit() => {
                Some(Token::Constant(self.read_number(to_int(digit))))
            }
            Some(first) if is_symbol_begin(first) => Some(Token::Symbol(self.read_symbol(first))),
            Some(other) => return Err(Error::UnrecognizedChar(other)),
        };
        Ok(())
    }

    fn skip_blanks(&mut self) {
        while let Some(' ') | Some('\t') | Some('\n') = self.chars.peek() {
            self.chars.next();
        }
    }

    // A sign followed by a digit begins a number; a bare sign is a symbol.
    fn read_signed(&mut self, sign: char) -> Token {
        match self.chars.peek() {
            Some(digit) if digit.is_ascii_digit() => {
                let magnitude = self.read_number(0);
                Token::Constant(match sign {
                    '-' => magnitude.wrapping_neg(),
                    _ => magnitude,
                })
            }
            _ => Token::Symbol(sign.to_string()),
        }
    }

    fn read_number(&mut self, seed: Int) -> Int {
        let mut number = seed;
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            number = number.wrapping_mul(10).wrapping_add(to_int(c));
            self.chars.next();
        }
        number
    }

    fn read_symbol(&mut self, first: char) -> String {
        let mut name = String::new();
        name.push(first);
        while let Some(&c) = self.chars.peek() {
            if !is_symbol_middle(c) {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        name
    }
}

fn to_int(digit: char) -> Int {
    digit.to_digit(10).unwrap_or(0) as Int
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Result<Vec<Token>, Error> {
        let mut tokenizer = Tokenizer::new(input)?;
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.current() {
            tokens.push(token.clone());
            tokenizer.advance()?;
        }
        Ok(tokens)
    }

    #[test]
    fn punctuation_and_atoms() {
        let tokens = collect("(+ 1 -25)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenBracket,
                Token::Symbol("+".to_string()),
                Token::Constant(1),
                Token::Constant(-25),
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn signs_without_digits_are_symbols() {
        let tokens = collect("- +").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Symbol("-".to_string()),
                Token::Symbol("+".to_string())
            ]
        );
    }

    #[test]
    fn symbol_charset() {
        let tokens = collect("set-car! list? #t <=").unwrap();
        let names: Vec<_> = tokens
            .into_iter()
            .map(|t| match t {
                Token::Symbol(name) => name,
                other => panic!("expected a symbol, got {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["set-car!", "list?", "#t", "<="]);
    }

    #[test]
    fn quote_and_dot() {
        let tokens = collect("'(1 . 2)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::QuoteMark,
                Token::OpenBracket,
                Token::Constant(1),
                Token::Dot,
                Token::Constant(2),
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(collect(" \t\n42\n").unwrap(), vec![Token::Constant(42)]);
        assert!(collect("").unwrap().is_empty());
    }

    #[test]
    fn unrecognized_character() {
        assert_eq!(collect("(1 @)"), Err(Error::UnrecognizedChar('@')));
        assert_eq!(Tokenizer::new("%").err(), Some(Error::UnrecognizedChar('%')));
    }
}
