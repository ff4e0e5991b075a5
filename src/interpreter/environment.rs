use std::{cell::RefCell, collections::HashMap, fmt, io::Write, rc::Rc};

use crate::interpreter::object::MObject;

/// Scopes are shared: every closure created in a scope holds the same `Env`,
/// so later `let`s in that scope are visible to it.
pub type Env = Rc<RefCell<Environment>>;

/// Where `puts` writes. Shared by every scope of a session.
pub type Output = Rc<RefCell<dyn Write>>;

#[derive(Default)]
pub struct Environment {
    store: HashMap<String, MObject>,
    outer: Option<Env>,
    output: Option<Output>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_output(output: Output) -> Env {
        Rc::new(RefCell::new(Self { output: Some(output), ..Self::default() }))
    }

    pub fn enclose(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
            output: None,
        }))
    }

    /// The nearest output set on this scope or one enclosing it.
    pub fn output(&self) -> Option<Output> {
        match (&self.output, &self.outer) {
            (Some(out), _) => Some(Rc::clone(out)),
            (None, Some(env)) => env.borrow().output(),
            (None, None) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<MObject> {
        if let Some(x) = self.store.get(key) {
            Some(x.clone())
        } else if let Some(env) = &self.outer {
            env.borrow().get(key)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: String, value: MObject) -> Option<MObject> {
        self.store.insert(key, value)
    }
}

// Stored closures point back at this scope; printing only the names keeps
// `Debug` finite.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&String> = self.store.keys().collect();
        names.sort();

        f.debug_struct("Environment")
            .field("store", &names)
            .field("outer", &self.outer.is_some())
            .field("output", &self.output.is_some())
            .finish()
    }
}
