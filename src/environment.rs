use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A lexical scope frame.
///
/// Frames chain outward through `outer`. Closures and macros hold `Rc`
/// references to their defining frame, so frames are shared between the
/// evaluator and any number of captured functions; a recursive `let` binds a
/// closure into the very frame it captures, which makes cycles normal.
#[derive(Debug, Default)]
pub struct Env {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Env>>>,
}

impl Env {
    pub fn new() -> Rc<RefCell<Env>> {
        Rc::new(RefCell::new(Env::default()))
    }

    /// A fresh innermost frame whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
        Rc::new(RefCell::new(Env {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Walk the chain outward until `name` resolves.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Bind `name` in this frame. Never touches outer frames, so inner
    /// bindings shadow rather than overwrite.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let outer = Env::new();
        outer.borrow_mut().set("x".to_string(), Value::Integer(1));

        let inner = Env::new_enclosed(Rc::clone(&outer));
        assert_eq!(inner.borrow().get("x"), Some(Value::Integer(1)));
        assert_eq!(inner.borrow().get("y"), None);
    }

    #[test]
    fn test_inner_binding_shadows() {
        let outer = Env::new();
        outer.borrow_mut().set("x".to_string(), Value::Integer(1));

        let inner = Env::new_enclosed(Rc::clone(&outer));
        inner.borrow_mut().set("x".to_string(), Value::Integer(2));

        assert_eq!(inner.borrow().get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.borrow().get("x"), Some(Value::Integer(1)));
    }
}
