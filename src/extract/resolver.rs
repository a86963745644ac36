//! Property name resolution
//!
//! Maps the handful of names people actually type ("size", "modified") to
//! the fixed `file.*` references Bases understands. Anything unknown is
//! assumed to be a vault-defined property and passes through unchanged.

/// Fixed lookup table from common natural-language names to file properties.
const PROPERTY_TABLE: &[(&str, &str)] = &[
    ("name", "file.name"),
    ("file name", "file.name"),
    ("size", "file.size"),
    ("file size", "file.size"),
    ("folder", "file.folder"),
    ("created", "file.ctime"),
    ("modified", "file.mtime"),
    ("tags", "file.tags"),
    ("links", "file.links"),
    ("extension", "file.ext"),
    ("ext", "file.ext"),
];

/// Resolve a free-text property name to its canonical reference.
///
/// Lookup is case-insensitive. Unknown names pass through unchanged, and
/// already-canonical references are never in the table, so resolution is
/// idempotent: `resolve_property(resolve_property(x)) == resolve_property(x)`.
pub fn resolve_property(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    for (key, canonical) in PROPERTY_TABLE {
        if lower == *key {
            return (*canonical).to_string();
        }
    }
    trimmed.to_string()
}
