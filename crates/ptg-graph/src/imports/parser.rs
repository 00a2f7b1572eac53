//! Import statement parsing.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s+([^;'"]+?)\s+from\s+(?:'([^'\n]+)'|"([^"\n]+)")"#).ok()
});

/// Extract `alias -> module specifier` pairs from ArkTS/TS source text.
///
/// Recognized shapes:
///
/// - `import Foo from './Foo'`
/// - `import { A, B as C } from './mod'`
/// - `import Foo, { A, B as C } from './mod'`
/// - `import * as NS from './mod'`
///
/// `import type` forms and braced lists spanning several lines are accepted.
/// Several aliases may point at the same specifier; a later import of the same
/// alias overwrites an earlier one.
///
/// ```
/// use ptg_graph::imports::extract_imports;
///
/// let imports = extract_imports("import { Card as HomeCard } from '../components/Card';");
/// assert_eq!(imports["HomeCard"], "../components/Card");
/// ```
pub fn extract_imports(source: &str) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    let Some(re) = IMPORT_RE.as_ref() else {
        return out;
    };

    for caps in re.captures_iter(source) {
        let clause = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let specifier = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        if specifier.is_empty() {
            continue;
        }

        for alias in clause_aliases(clause) {
            out.insert(alias, specifier.to_string());
        }
    }

    out
}

/// Local binding names introduced by an import clause.
fn clause_aliases(clause: &str) -> Vec<String> {
    let clause = collapse_whitespace(clause);
    let clause = clause.strip_prefix("type ").unwrap_or(&clause).trim();
    let mut aliases = Vec::new();
    if clause.is_empty() {
        return aliases;
    }

    if let Some(rest) = clause.strip_prefix('*') {
        if let Some(alias) = renamed(rest) {
            aliases.push(alias);
        }
        return aliases;
    }

    let named = match clause.find('{') {
        Some(0) => clause,
        Some(open) => {
            let default = clause[..open].trim().trim_end_matches(',').trim();
            push_binding(&mut aliases, default);
            &clause[open..]
        }
        None => {
            // `Foo` or `Foo, * as NS`
            for part in clause.split(',') {
                let part = part.trim();
                match part.strip_prefix('*') {
                    Some(rest) => aliases.extend(renamed(rest)),
                    None => push_binding(&mut aliases, part),
                }
            }
            return aliases;
        }
    };

    let inner = named
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');
    for part in inner.split(',') {
        let part = part.trim();
        let part = part.strip_prefix("type ").unwrap_or(part).trim();
        push_binding(&mut aliases, part);
    }

    aliases
}

fn push_binding(aliases: &mut Vec<String>, binding: &str) {
    if binding.is_empty() {
        return;
    }
    let alias = renamed(binding).unwrap_or_else(|| binding.to_string());
    if is_identifier(&alias) {
        aliases.push(alias);
    }
}

/// The local name of an `x as y` binding.
fn renamed(binding: &str) -> Option<String> {
    let (_, alias) = binding.split_once(" as ")?;
    let alias = alias.trim();
    is_identifier(alias).then(|| alias.to_string())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
