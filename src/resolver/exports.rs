//! Package.json `exports` field lookup.
//!
//! Supports the shapes most packages ship:
//! - `exports: "./index.js"` (root only)
//! - `exports: { ".": ..., "./sub": ... }` (subpath map)
//! - `exports: { "import": ..., "require": ... }` (root conditions)
//!
//! Condition objects are read in `import`, `require`, `default` order and
//! may nest. Wildcard patterns are not expanded.

use serde_json::Value;

/// Conditions consulted for a condition object, in priority order.
const CONDITIONS: &[&str] = &["import", "require", "default"];

/// Finds the target file for `subpath` (`"."` or `"./name"`).
///
/// Returns the target exactly as written in the manifest, usually a
/// `./`-relative path, or `None` when the package does not export it.
///
/// # Example
///
/// ```
/// use chainscope::resolver::exports::export_target;
/// use serde_json::json;
///
/// let exports = json!({ "./sub": { "import": "./dist/sub.mjs", "require": "./dist/sub.cjs" } });
/// assert_eq!(export_target(&exports, "./sub"), Some("./dist/sub.mjs".to_string()));
/// assert_eq!(export_target(&exports, "."), None);
/// ```
pub fn export_target(exports: &Value, subpath: &str) -> Option<String> {
    match exports {
        Value::String(target) if subpath == "." => Some(target.clone()),
        Value::Object(map) => match map.get(subpath) {
            Some(entry) => entry_target(entry),
            None if subpath == "." && !has_subpath_keys(exports) => entry_target(exports),
            None => None,
        },
        _ => None,
    }
}

/// Resolves one exports entry, following condition objects.
fn entry_target(entry: &Value) -> Option<String> {
    match entry {
        Value::String(target) => Some(target.clone()),
        Value::Object(conditions) => CONDITIONS
            .iter()
            .find_map(|c| conditions.get(*c))
            .and_then(entry_target),
        Value::Array(alternatives) => alternatives.iter().find_map(entry_target),
        _ => None,
    }
}

/// True if any key of an exports object is a subpath (`.`-prefixed).
fn has_subpath_keys(exports: &Value) -> bool {
    exports
        .as_object()
        .is_some_and(|map| map.keys().any(|k| k.starts_with('.')))
}
