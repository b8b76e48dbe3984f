use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use slim_codec::SlimValue;
use slim_fixtures::{ClassDescriptor, FixtureCatalog, FixtureError, FixtureInstance};
use slim_values::{ConverterRegistry, Value};

use crate::alias::AliasMap;
use crate::error::ContextError;

static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z]\w*)").expect("symbol pattern is a valid regex"));

struct Instance {
    class_name: String,
    value: Box<dyn FixtureInstance>,
}

/// A failure from invoking a fixture method through [`ExecutionContext::call`].
///
/// Kept distinct from [`ContextError`] so callers (the instruction engine)
/// can tell a protocol-level failure (no such instance/method) apart from a
/// fixture-raised exception, which is the only case that can trigger batch
/// abort.
pub enum CallError {
    Context(ContextError),
    Fixture(FixtureError),
}

impl From<ContextError> for CallError {
    fn from(e: ContextError) -> Self {
        CallError::Context(e)
    }
}

/// Result of an instance-table lookup.
///
/// `Missing` is a distinct marker rather than `Option::None` folded into the
/// found case, so a caller can never confuse "no instance by this name" with
/// "an instance is stored here" — the sentinel spec.md §4.4 requires of
/// `getInstance` for unknown names, kept separate from whatever a fixture's
/// own state might look like.
pub enum InstanceRef<'a> {
    Missing,
    Found {
        class_name: &'a str,
        value: &'a dyn FixtureInstance,
    },
}

/// Per-connection state: the registered classes visible to this session,
/// its live instances, its symbol table, its import search path, and its
/// own `ConverterRegistry`.
///
/// Every field here is owned, not shared — two `ExecutionContext`s never
/// observe each other's instances, symbols, or converter bindings, which is
/// what gives sessions their isolation (see SPEC_FULL.md §4.4).
pub struct ExecutionContext {
    classes: HashMap<String, ClassDescriptor>,
    aliases: HashMap<String, AliasMap>,
    instances: HashMap<String, Instance>,
    symbols: HashMap<String, String>,
    import_paths: Vec<String>,
    type_prefixes: Vec<String>,
    loaded_keys: HashSet<String>,
    converters: ConverterRegistry,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            aliases: HashMap::new(),
            instances: HashMap::new(),
            symbols: HashMap::new(),
            import_paths: Vec::new(),
            type_prefixes: Vec::new(),
            loaded_keys: HashSet::new(),
            converters: ConverterRegistry::with_defaults(),
        }
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    /// Records a filesystem-path import and, the first time this exact path
    /// is seen, merges any catalog entries registered under it. Idempotent:
    /// importing the same path again is a no-op beyond the bookkeeping.
    pub fn add_import_path(&mut self, path: &str) {
        self.import_paths.push(path.to_string());
        if self.loaded_keys.insert(path.to_string()) {
            if let Some(classes) = FixtureCatalog::global().classes_in(path) {
                self.register_classes(classes);
            }
        }
    }

    /// Records a dotted module-like name as a search prefix consulted by
    /// `get_type` when a bare (dot-free) class name is requested.
    pub fn add_type_prefix(&mut self, prefix: &str) {
        if !self.type_prefixes.iter().any(|p| p == prefix) {
            self.type_prefixes.push(prefix.to_string());
        }
    }

    pub fn register_classes(&mut self, classes: Vec<ClassDescriptor>) {
        for class in classes {
            let alias_map = AliasMap::build(class.method_names());
            self.aliases.insert(class.name.clone(), alias_map);
            self.classes.insert(class.name.clone(), class);
        }
    }

    /// Resolves a (possibly dotted) class name to its descriptor.
    ///
    /// A dotted name (`module.Class`) is looked up directly in that module.
    /// A bare name is first checked against classes already registered in
    /// this session (e.g. from a filesystem-path import), then against
    /// each previously registered type prefix, in insertion order.
    pub fn get_type(&mut self, fully_qualified_name: &str) -> Result<ClassDescriptor, ContextError> {
        let (module, short_name) = match fully_qualified_name.rsplit_once('.') {
            Some((module, short)) => (Some(module.to_string()), short.to_string()),
            None => (None, fully_qualified_name.to_string()),
        };

        if let Some(found) = self.classes.get(&short_name) {
            return Ok(found.clone());
        }

        let candidate_modules: Vec<String> = match module {
            Some(module) => vec![module],
            None => self.type_prefixes.clone(),
        };

        for module in candidate_modules {
            if let Some(found) = FixtureCatalog::global().find_class(&module, &short_name) {
                self.register_classes(vec![found.clone()]);
                return Ok(found);
            }
        }

        Err(ContextError::NoSuchClass(fully_qualified_name.to_string()))
    }

    pub fn make(
        &mut self,
        instance_name: &str,
        class_name: &str,
        args: &[SlimValue],
    ) -> Result<(), ContextError> {
        let descriptor = self.get_type(class_name)?;
        let instance = (descriptor.constructor)(args).map_err(|e| ContextError::ConstructorFailed {
            class: class_name.to_string(),
            detail: e.detail().to_string(),
        })?;
        self.store_instance(instance_name, &descriptor.name, instance);
        Ok(())
    }

    /// Stores (or overwrites) a live instance under `name`. `make` is the
    /// usual caller, but the operation is exposed in its own right per
    /// spec.md §4.4's `storeInstance`/`getInstance` pair.
    pub fn store_instance(
        &mut self,
        name: &str,
        class_name: &str,
        value: Box<dyn FixtureInstance>,
    ) {
        self.instances.insert(
            name.to_string(),
            Instance {
                class_name: class_name.to_string(),
                value,
            },
        );
    }

    /// Looks up an instance by name. Unknown names yield `InstanceRef::Missing`
    /// rather than `None`, matching spec.md §4.4's sentinel requirement.
    pub fn get_instance(&self, name: &str) -> InstanceRef<'_> {
        match self.instances.get(name) {
            Some(instance) => InstanceRef::Found {
                class_name: &instance.class_name,
                value: instance.value.as_ref(),
            },
            None => InstanceRef::Missing,
        }
    }

    pub fn has_instance(&self, instance_name: &str) -> bool {
        matches!(self.get_instance(instance_name), InstanceRef::Found { .. })
    }

    pub fn call(
        &mut self,
        instance_name: &str,
        method_name: &str,
        args: &[SlimValue],
    ) -> Result<Value, CallError> {
        let class_name = match self.get_instance(instance_name) {
            InstanceRef::Found { class_name, .. } => class_name.to_string(),
            InstanceRef::Missing => {
                return Err(ContextError::NoInstance(instance_name.to_string()).into())
            }
        };

        let canonical_method = self
            .aliases
            .get(&class_name)
            .and_then(|aliases| aliases.resolve(method_name))
            .ok_or_else(|| ContextError::NoMethod {
                class: class_name.clone(),
                method: method_name.to_string(),
            })?
            .to_string();

        let method_fn = self
            .classes
            .get(&class_name)
            .and_then(|descriptor| descriptor.methods.get(&canonical_method))
            .cloned()
            .ok_or_else(|| ContextError::NoMethod {
                class: class_name.clone(),
                method: method_name.to_string(),
            })?;

        let instance = self
            .instances
            .get_mut(instance_name)
            .ok_or_else(|| ContextError::NoInstance(instance_name.to_string()))?;

        method_fn(instance.value.as_mut(), args).map_err(CallError::Fixture)
    }

    pub fn store_symbol(&mut self, name: &str, value: String) {
        self.symbols.insert(name.to_string(), value);
    }

    /// Looks up a stored symbol, returning the literal `$name` spelling
    /// when it has never been bound.
    pub fn get_symbol(&self, name: &str) -> String {
        self.symbols
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("${name}"))
    }

    /// Substitutes every `$identifier` occurrence in the given arguments
    /// (recursing into nested lists) with its bound symbol value, leaving
    /// unresolved references as the literal `$identifier` text.
    pub fn to_args(&self, params: &[SlimValue]) -> Vec<SlimValue> {
        params.iter().map(|p| self.substitute(p)).collect()
    }

    fn substitute(&self, value: &SlimValue) -> SlimValue {
        match value {
            SlimValue::List(items) => {
                SlimValue::List(items.iter().map(|i| self.substitute(i)).collect())
            }
            SlimValue::Str(s) => SlimValue::Str(self.substitute_string(s)),
        }
    }

    fn substitute_string(&self, input: &str) -> String {
        SYMBOL_PATTERN
            .replace_all(input, |caps: &Captures| self.get_symbol(&caps[1]))
            .into_owned()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Adder(i64);

    fn register_adder() {
        let descriptor = ClassDescriptor::new(
            "Adder",
            Arc::new(|args| {
                let seed = args
                    .first()
                    .and_then(SlimValue::as_str)
                    .and_then(|s| s.parse::<i64>().ok())
                    .unwrap_or(0);
                Ok(Box::new(Adder(seed)))
            }),
        )
        .with_method(
            "add",
            Arc::new(|instance, args| {
                let adder = instance.as_any_mut().downcast_mut::<Adder>().unwrap();
                let delta: i64 = args
                    .first()
                    .and_then(SlimValue::as_str)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                adder.0 += delta;
                Ok(Value::Int(adder.0))
            }),
        );
        FixtureCatalog::global().register("test.adder", vec![descriptor]);
    }

    #[test]
    fn make_and_call_round_trip() {
        register_adder();
        let mut ctx = ExecutionContext::new();
        ctx.add_type_prefix("test.adder");
        ctx.make("acc", "Adder", &[SlimValue::str("10")]).unwrap();
        let result = ctx
            .call("acc", "add", &[SlimValue::str("5")])
            .ok()
            .unwrap();
        assert_eq!(result, Value::Int(15));
    }

    #[test]
    fn symbol_substitution_covers_embedded_occurrences() {
        let mut ctx = ExecutionContext::new();
        ctx.store_symbol("id", "20".to_string());
        ctx.store_symbol("A", "X".to_string());
        ctx.store_symbol("b_", "Y".to_string());

        let args = vec![
            SlimValue::str("$A"),
            SlimValue::str("$b_"),
            SlimValue::str("C$"),
            SlimValue::str("id=$id"),
            SlimValue::str("$Z"),
        ];
        let substituted = ctx.to_args(&args);
        let as_strs: Vec<_> = substituted.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(as_strs, vec!["X", "Y", "C$", "id=20", "$Z"]);
    }

    #[test]
    fn unknown_class_reports_no_such_class() {
        let mut ctx = ExecutionContext::new();
        let err = ctx.make("x", "NoSuchThing", &[]).unwrap_err();
        assert_eq!(err, ContextError::NoSuchClass("NoSuchThing".to_string()));
    }

    #[test]
    fn get_instance_returns_missing_sentinel_for_unknown_name() {
        let ctx = ExecutionContext::new();
        assert!(matches!(ctx.get_instance("nope"), InstanceRef::Missing));
    }

    #[test]
    fn get_instance_finds_what_make_stored() {
        register_adder();
        let mut ctx = ExecutionContext::new();
        ctx.add_type_prefix("test.adder");
        ctx.make("acc", "Adder", &[SlimValue::str("1")]).unwrap();
        match ctx.get_instance("acc") {
            InstanceRef::Found { class_name, .. } => assert_eq!(class_name, "Adder"),
            InstanceRef::Missing => panic!("expected a found instance"),
        }
    }

    #[test]
    fn unknown_instance_reports_no_instance() {
        let mut ctx = ExecutionContext::new();
        let err = ctx.call("missing", "anything", &[]);
        assert!(matches!(err, Err(CallError::Context(ContextError::NoInstance(_)))));
    }
}
