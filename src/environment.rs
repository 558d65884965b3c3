use crate::types::{Symbol, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variable '{}'", self.0)
    }
}

/// One frame of name bindings plus a link to the enclosing frame. Frames are
/// shared: closures keep their defining frame alive through `parent` chains.
pub struct Environment {
    data: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new_root() -> Rc<Self> {
        Rc::new(Environment {
            data: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    pub fn spawn_from(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Environment {
            data: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Searches this frame, then the parent chain.
    pub fn get(&self, key: &Symbol) -> Result<Value, UnknownSymbol> {
        match self.data.borrow().get(key) {
            Some(value) => Ok(value.clone()),
            None => match &self.parent {
                Some(parent) => parent.get(key),
                None => Err(UnknownSymbol(key.clone())),
            },
        }
    }

    /// Inserts or overwrites in this frame only, shadowing any ancestor.
    pub fn define(&self, key: Symbol, value: Value) {
        self.data.borrow_mut().insert(key, value);
    }

    /// Overwrites the nearest existing binding; never creates one.
    pub fn set(&self, key: &Symbol, value: Value) -> Result<(), UnknownSymbol> {
        {
            let mut data = self.data.borrow_mut();
            if let Some(slot) = data.get_mut(key) {
                *slot = value;
                return Ok(());
            }
        }
        match &self.parent {
            Some(parent) => parent.set(key, value),
            None => Err(UnknownSymbol(key.clone())),
        }
    }
}
