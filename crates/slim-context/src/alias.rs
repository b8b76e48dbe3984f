use std::collections::HashMap;

/// Converts an underscored name to `lowerCamel`. A name with no underscore
/// has nothing to join, so it is returned unchanged rather than having its
/// leading character forcibly re-cased — see [`upper_camel`] for why this
/// matters.
pub fn lower_camel(name: &str) -> String {
    camel_join(name, false)
}

/// Converts an underscored name to `UpperCamel`, under the same
/// single-segment no-op rule as [`lower_camel`].
///
/// This rule is what keeps a class that only declares `aMethod` from also
/// becoming callable as `AMethod`: `aMethod` has no underscore, so it is a
/// single segment, and both camel conversions leave it untouched.
pub fn upper_camel(name: &str) -> String {
    camel_join(name, true)
}

fn camel_join(name: &str, upper_first: bool) -> String {
    let segments: Vec<&str> = name.split('_').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 1 {
        return name.to_string();
    }
    let mut result = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        let cased_first = if index == 0 {
            if upper_first {
                first.to_ascii_uppercase()
            } else {
                first.to_ascii_lowercase()
            }
        } else {
            first.to_ascii_uppercase()
        };
        result.push(cased_first);
        result.push_str(chars.as_str());
    }
    result
}

/// Converts a camelCase name to its underscored form by inserting `_`
/// before each uppercase letter and lowercasing it. Provided for parity
/// with the original protocol's naming-convention helpers; `AliasMap`
/// itself does not use it (see module docs on why that would over-generate
/// aliases).
pub fn pythonic(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Maps every acceptable spelling of a class's methods back to the
/// canonical name a fixture actually registered.
///
/// For each canonical method name `m`, three aliases are registered:
/// `m`, `lowerCamel(m)`, and `UpperCamel(m)`. When `m` has no underscore
/// the latter two collapse back to `m` itself, so a single-word method
/// name ends up with exactly one spelling.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    pub fn build<'a>(method_names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut aliases = HashMap::new();
        for m in method_names {
            aliases.insert(m.to_string(), m.to_string());
            aliases.insert(lower_camel(m), m.to_string());
            aliases.insert(upper_camel(m), m.to_string());
        }
        Self { aliases }
    }

    pub fn resolve(&self, requested: &str) -> Option<&str> {
        self.aliases.get(requested).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscored_name_gets_all_three_spellings() {
        let map = AliasMap::build(["go_to_store"]);
        assert_eq!(map.resolve("go_to_store"), Some("go_to_store"));
        assert_eq!(map.resolve("goToStore"), Some("go_to_store"));
        assert_eq!(map.resolve("GoToStore"), Some("go_to_store"));
    }

    #[test]
    fn single_word_name_is_not_given_a_spurious_uppercase_alias() {
        let map = AliasMap::build(["aMethod"]);
        assert_eq!(map.resolve("aMethod"), Some("aMethod"));
        assert_eq!(map.resolve("a_method"), None);
        assert_eq!(map.resolve("AMethod"), None);
    }

    #[test]
    fn conversion_helpers_match_the_documented_examples() {
        assert_eq!(lower_camel("go_to_store"), "goToStore");
        assert_eq!(upper_camel("go_to_store"), "GoToStore");
        assert_eq!(pythonic("goToStore"), "go_to_store");
    }
}
