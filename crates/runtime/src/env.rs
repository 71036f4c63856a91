use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fnv::FnvHashMap;
use smol_str::SmolStr;

use crate::Object;

/// A chain of name to value bindings.
///
/// Cloning an environment hands out another reference to the same bindings,
/// so functions that capture it see later updates.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<EnvData>>);

#[derive(Default)]
struct EnvData {
    outer: Option<Environment>,
    store: FnvHashMap<SmolStr, Object>,
}

impl Environment {
    pub fn new(outer: Option<Environment>) -> Environment {
        Environment(Rc::new(RefCell::new(EnvData {
            outer,
            store: FnvHashMap::default(),
        })))
    }

    /// A fresh environment whose lookups fall back to `self`.
    pub fn enclosed(&self) -> Environment {
        Environment::new(Some(self.clone()))
    }

    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    /// Look `name` up here, then in each outer environment in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        let data = self.0.borrow();
        match data.store.get(name) {
            Some(value) => Some(value.clone()),
            None => data.outer.as_ref()?.get(name),
        }
    }

    /// Bind `name` in this environment and return the value.
    ///
    /// The binding is always local, even if an outer environment already
    /// binds the same name.
    pub fn set(&self, name: impl Into<SmolStr>, value: Object) -> Object {
        let name = name.into();
        tracing::trace!(%name, "set");
        self.0.borrow_mut().store.insert(name, value.clone());
        value
    }

    pub fn is_bound_locally(&self, name: &str) -> bool {
        self.0.borrow().store.contains_key(name)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        let mut names = data.store.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &data.outer.is_some())
            .finish()
    }
}
