use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use slim_codec::SlimValue;
use slim_values::Value;

use crate::error::FixtureError;
use crate::instance::FixtureInstance;

pub type ConstructorFn =
    Arc<dyn Fn(&[SlimValue]) -> Result<Box<dyn FixtureInstance>, FixtureError> + Send + Sync>;

pub type MethodFn = Arc<
    dyn Fn(&mut dyn FixtureInstance, &[SlimValue]) -> Result<Value, FixtureError> + Send + Sync,
>;

/// A registered fixture class: a constructor and a table of its public
/// methods, keyed by the name exactly as declared by the registering crate.
///
/// A method name is only included here if it is public by SLIM's
/// convention (does not start with `_` and does not contain `__`) —
/// filtering happens once, at registration time, rather than on every
/// lookup.
#[derive(Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub constructor: ConstructorFn,
    pub methods: HashMap<String, MethodFn>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, constructor: ConstructorFn) -> Self {
        Self {
            name: name.into(),
            constructor,
            methods: HashMap::new(),
        }
    }

    pub fn with_method(mut self, name: impl Into<String>, method: MethodFn) -> Self {
        let name = name.into();
        debug_assert!(
            is_public_method_name(&name),
            "method {name} is not a publicly callable name"
        );
        self.methods.insert(name, method);
        self
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

pub fn is_public_method_name(name: &str) -> bool {
    !name.starts_with('_') && !name.contains("__")
}

/// Process-wide registry of fixture classes, keyed either by a dotted
/// module-like name (`"demos.echo"`) or by the literal filesystem path
/// string a client would `Import`. This is the "small registration API"
/// the spec calls for in place of real reflective class loading.
pub struct FixtureCatalog {
    modules: RwLock<HashMap<String, Vec<ClassDescriptor>>>,
}

static GLOBAL: Lazy<FixtureCatalog> = Lazy::new(FixtureCatalog::new);

impl FixtureCatalog {
    fn new() -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static FixtureCatalog {
        &GLOBAL
    }

    /// Registers (or replaces) the classes available under `key`. Safe to
    /// call more than once with the same key — re-registration simply
    /// overwrites the prior entry, which keeps `Import` idempotent.
    pub fn register(&self, key: impl Into<String>, classes: Vec<ClassDescriptor>) {
        let mut modules = self.modules.write().expect("fixture catalog lock poisoned");
        modules.insert(key.into(), classes);
    }

    pub fn classes_in(&self, key: &str) -> Option<Vec<ClassDescriptor>> {
        let modules = self.modules.read().expect("fixture catalog lock poisoned");
        modules.get(key).cloned()
    }

    pub fn find_class(&self, key: &str, class_name: &str) -> Option<ClassDescriptor> {
        self.classes_in(key)?
            .into_iter()
            .find(|c| c.name == class_name)
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Noop", Arc::new(|_args| Ok(Box::new(Noop) as Box<dyn FixtureInstance>)))
    }

    #[test]
    fn public_method_name_filter() {
        assert!(is_public_method_name("echo"));
        assert!(is_public_method_name("go_to_store"));
        assert!(!is_public_method_name("_private"));
        assert!(!is_public_method_name("__dunder__"));
    }

    #[test]
    fn registration_is_idempotent_under_the_same_key() {
        let catalog = FixtureCatalog::new();
        catalog.register("demos.noop", vec![descriptor()]);
        catalog.register("demos.noop", vec![descriptor()]);
        assert_eq!(catalog.classes_in("demos.noop").unwrap().len(), 1);
    }

    #[test]
    fn find_class_looks_up_by_short_name() {
        let catalog = FixtureCatalog::new();
        catalog.register("demos.noop", vec![descriptor()]);
        assert!(catalog.find_class("demos.noop", "Noop").is_some());
        assert!(catalog.find_class("demos.noop", "Other").is_none());
    }
}
