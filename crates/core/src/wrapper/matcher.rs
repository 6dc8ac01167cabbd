use once_cell::sync::Lazy;
use regex::Regex;

/// `from <dotted-name> import *` at the start of a line, tolerant of spacing.
static WILDCARD_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*from[ \t]+([A-Za-z_][A-Za-z0-9_]*(?:[ \t]*\.[ \t]*[A-Za-z_][A-Za-z0-9_]*)*)[ \t]+import[ \t]*\*",
    )
    .expect("wildcard import pattern is valid")
});

/// Module names re-exported by wildcard imports in `source`, in textual order.
///
/// Whitespace inside the dotted name is dropped. Relative imports are not
/// matched; compiled modules are always imported by absolute name.
pub fn wildcard_imports(source: &str) -> Vec<String> {
    WILDCARD_IMPORT
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<String>())
        .collect()
}
