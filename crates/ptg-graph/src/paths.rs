//! Path and page-key normalization helpers.

use std::path::Path;

/// Extension of ArkTS source files, without the leading dot.
pub const SOURCE_EXTENSION: &str = "ets";

const SOURCE_SUFFIX: &str = ".ets";

const RESERVED_DEVICE_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Replace backslashes with forward slashes.
pub fn normalize_slashes(value: &str) -> String {
    value.replace('\\', "/")
}

/// Strip a trailing `.ets` extension (case-insensitive) and normalize separators.
///
/// ```
/// use ptg_graph::paths::strip_source_ext;
///
/// assert_eq!(strip_source_ext("pages/Index.ets"), "pages/Index");
/// assert_eq!(strip_source_ext("pages\\Detail"), "pages/Detail");
/// ```
pub fn strip_source_ext(value: &str) -> String {
    let normalized = normalize_slashes(value.trim());
    let len = normalized.len();
    if len >= SOURCE_SUFFIX.len()
        && normalized.is_char_boundary(len - SOURCE_SUFFIX.len())
        && normalized[len - SOURCE_SUFFIX.len()..].eq_ignore_ascii_case(SOURCE_SUFFIX)
    {
        normalized[..len - SOURCE_SUFFIX.len()].to_string()
    } else {
        normalized
    }
}

/// Append `.ets` unless the value already carries it.
pub fn ensure_source_ext(value: &str) -> String {
    let normalized = normalize_slashes(value.trim());
    if normalized.to_ascii_lowercase().ends_with(SOURCE_SUFFIX) {
        normalized
    } else {
        format!("{normalized}{SOURCE_SUFFIX}")
    }
}

/// Whether a path has the source extension.
pub fn has_source_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// String key for a filesystem path, with forward slashes.
pub fn path_key(path: &Path) -> String {
    normalize_slashes(&path.to_string_lossy())
}

/// Turn an arbitrary project name into a single safe directory component.
pub fn safe_dir_name(name: &str, fallback: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_end_matches(['.', ' ']);
    let mut safe = if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    };

    if RESERVED_DEVICE_NAMES.contains(&safe.to_ascii_lowercase().as_str()) {
        safe.insert(0, '_');
    }
    safe
}
