//! Helper functions available inside every template.
//!
//! A [`FuncMap`] holds named values that are installed as globals into each
//! compiled template set. Closures registered with [`FuncMap::insert`] become
//! callable helpers:
//!
//! ```rust
//! use template_manager::FuncMap;
//! use minijinja::Value;
//!
//! let mut funcs = FuncMap::new();
//! funcs.insert("shout", |args: &[Value]| {
//!     let text = args.first().and_then(Value::as_str).unwrap_or_default();
//!     Ok(Value::from(format!("{}!", text.to_uppercase())))
//! });
//! assert!(funcs.contains("shout"));
//! ```
//!
//! Any other MiniJinja value (constants, objects, `Value::from_function`) can be
//! installed with [`FuncMap::insert_value`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::{Object, ObjectRepr};
use minijinja::{Environment, Error, State, Value};

type HelperFn = dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync;

/// Named helpers bound into every template set.
#[derive(Debug, Clone, Default)]
pub struct FuncMap {
    entries: BTreeMap<String, Value>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callable helper. Returning an error from `func` fails the
    /// render that called it.
    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        let name = name.into();
        let helper = Helper {
            name: name.clone(),
            func: Arc::new(func),
        };
        self.entries.insert(name, Value::from_object(helper));
    }

    /// Registers an arbitrary value under `name`.
    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installs every entry as a global of `env`.
    pub(crate) fn register(&self, env: &mut Environment<'static>) {
        for (name, value) in &self.entries {
            env.add_global(name.clone(), value.clone());
        }
    }
}

struct Helper {
    name: String,
    func: Arc<HelperFn>,
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper").field("name", &self.name).finish()
    }
}

impl Object for Helper {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(self: &Arc<Self>, _state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
        (self.func)(args)
    }
}
