use crate::catalog::{ClassDescriptor, FixtureCatalog};

/// Classifies an `Import` argument the way the wire protocol's rule does:
/// anything containing a path separator is a filesystem path, everything
/// else is a dotted module-like name.
pub fn is_filesystem_path(argument: &str) -> bool {
    argument.contains('/') || argument.contains('\\')
}

/// Thin wrapper over the process-wide `FixtureCatalog` that gives the
/// filesystem-path and dotted-module-name `Import` cases a single entry
/// point, matching the spec's `FixtureLoader` component even though both
/// cases are, underneath, the same registration lookup.
pub struct FixtureLoader;

impl FixtureLoader {
    pub fn load(&self, key: &str) -> Option<Vec<ClassDescriptor>> {
        FixtureCatalog::global().classes_in(key)
    }
}

impl Default for FixtureLoader {
    fn default() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_paths_and_module_names() {
        assert!(is_filesystem_path("./demos/fixtures"));
        assert!(is_filesystem_path("demos\\fixtures"));
        assert!(!is_filesystem_path("demos.echo"));
    }
}
