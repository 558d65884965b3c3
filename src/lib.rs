pub mod cmdline;
pub mod interpreter;
pub mod printer;
pub mod reader;

#[macro_use]
extern crate lazy_static;

pub mod core;
pub mod environment;
pub mod evaluator;
mod tokens;
pub mod types;

pub use types::Value;
