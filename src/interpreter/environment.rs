use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::object::Object;


/// Shared handle to an environment. Closures keep their defining environment alive through it.
pub type Env = Rc<RefCell<Environment>>;

/// A scope of name bindings, optionally nested inside an enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Looks the name up here first, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Binds the name in this scope only, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());
        value
    }
}
