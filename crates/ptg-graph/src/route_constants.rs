//! Static scanner for route-constant declarations.
//!
//! ArkTS projects rarely pass literal page paths to `router.pushUrl`. They
//! reference members of a route table instead (`RoutePath.Detail`), declared
//! as an enum, a `const` object literal, or a class with static fields. The
//! scanner finds those declarations for a fixed set of table names and builds
//! two lookup maps:
//!
//! - `full`: `Symbol.Member` to literal path, always safe to use.
//! - `short`: bare `Member` to literal path, kept only while the member name is
//!   unambiguous across every scanned table.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

use crate::paths::normalize_slashes;
use crate::runtime::{Runtime, read_text_limit};

/// Route table names recognized by the scanner.
pub const ROUTE_SYMBOLS: [&str; 4] = ["RoutePath", "RouterPath", "NavPath", "NavigationPath"];

/// Number of leading characters inspected when deciding whether a file is a candidate.
pub const CANDIDATE_HEAD_CHARS: usize = 8192;

const CANDIDATE_EXTENSIONS: [&str; 2] = ["ets", "ts"];

struct DeclarationPatterns {
    symbol: &'static str,
    enum_block: Regex,
    object_block: Regex,
    class_block: Regex,
}

struct Patterns {
    declarations: Vec<DeclarationPatterns>,
    enum_entry: Regex,
    object_entry: Regex,
    class_entry: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        let mut declarations = Vec::with_capacity(ROUTE_SYMBOLS.len());
        for symbol in ROUTE_SYMBOLS {
            let name = regex::escape(symbol);
            declarations.push(DeclarationPatterns {
                symbol,
                enum_block: Regex::new(&format!(
                    r"\b(?:export\s+)?(?:const\s+)?enum\s+{name}\s*\{{([\s\S]*?)\}}"
                ))?,
                object_block: Regex::new(&format!(
                    r"\b(?:export\s+)?const\s+{name}\s*(?::[^=]+)?=\s*\{{([\s\S]*?)\}}"
                ))?,
                class_block: Regex::new(&format!(
                    r"\b(?:export\s+(?:default\s+)?)?class\s+{name}\s*\{{([\s\S]*?)\}}"
                ))?,
            });
        }

        Ok(Self {
            declarations,
            enum_entry: Regex::new(r#"\b(\w+)\s*=\s*(?:'([^'\n]+?)'|"([^"\n]+?)")"#)?,
            object_entry: Regex::new(r#"\b(\w+)\s*:\s*(?:'([^'\n]+?)'|"([^"\n]+?)")"#)?,
            class_entry: Regex::new(
                r#"\bstatic\s+(?:readonly\s+)?(\w+)\s*(?::\s*\w+\s*)?=\s*(?:'([^'\n]+?)'|"([^"\n]+?)")"#,
            )?,
        })
    }
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| Patterns::compile().ok());

/// Lookup maps produced by the scanner.
#[derive(Debug, Clone, Default)]
pub struct RouteConstants {
    full: IndexMap<String, String>,
    short: IndexMap<String, String>,
    short_owner: IndexMap<String, (String, String)>,
    evicted: FxHashSet<String>,
}

impl RouteConstants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one `symbol.member = value` pair.
    ///
    /// The first sighting of a bare member name populates the short map. A
    /// later sighting under another symbol, or with another value, evicts it
    /// for the rest of the run.
    pub fn insert(&mut self, symbol: &str, member: &str, value: &str) {
        let value = normalize_slashes(value.trim());
        self.full
            .insert(format!("{symbol}.{member}"), value.clone());

        if self.evicted.contains(member) {
            return;
        }

        match self.short_owner.get(member) {
            None => {
                self.short_owner
                    .insert(member.to_string(), (symbol.to_string(), value.clone()));
                self.short.insert(member.to_string(), value);
            }
            Some((owner, owned_value)) if owner == symbol && *owned_value == value => {}
            Some(_) => {
                debug!(member, "Ambiguous route constant, dropping short form");
                self.short.shift_remove(member);
                self.short_owner.shift_remove(member);
                self.evicted.insert(member.to_string());
            }
        }
    }

    /// `Symbol.Member` to literal path.
    pub fn full(&self) -> &IndexMap<String, String> {
        &self.full
    }

    /// Unambiguous bare `Member` to literal path.
    pub fn short(&self) -> &IndexMap<String, String> {
        &self.short
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }
}

/// Budget for a scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanLimits {
    /// Maximum number of candidate files inspected.
    pub max_files: usize,
    /// Characters read from each candidate.
    pub max_chars_per_file: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_files: 120,
            max_chars_per_file: 40_000,
        }
    }
}

/// Scan `root` for route tables and build the lookup maps.
///
/// Never fails: a missing root yields empty maps, unreadable files are skipped.
pub async fn scan_route_constants(
    runtime: &dyn Runtime,
    root: &Path,
    limits: &ScanLimits,
) -> RouteConstants {
    let mut constants = RouteConstants::new();

    for file in find_candidate_files(runtime, root, limits.max_files).await {
        let source = read_text_limit(runtime, &file, limits.max_chars_per_file).await;
        if source.is_empty() {
            continue;
        }
        extract_route_constants(&source, &mut constants);
    }

    debug!(
        full = constants.full().len(),
        short = constants.short().len(),
        "Route constants scanned"
    );
    constants
}

/// Files under `root` whose head mentions one of the route table names.
pub async fn find_candidate_files(
    runtime: &dyn Runtime,
    root: &Path,
    max_files: usize,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if max_files == 0 {
        return candidates;
    }

    let Ok(files) = runtime.list_files(root) else {
        return candidates;
    };

    for file in files {
        let is_source = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                CANDIDATE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if !is_source {
            continue;
        }

        let head = read_text_limit(runtime, &file, CANDIDATE_HEAD_CHARS).await;
        if ROUTE_SYMBOLS.iter().any(|symbol| head.contains(symbol)) {
            candidates.push(file);
            if candidates.len() >= max_files {
                break;
            }
        }
    }

    candidates
}

/// Extract every route-table entry declared in `source` into `constants`.
pub fn extract_route_constants(source: &str, constants: &mut RouteConstants) {
    let Some(patterns) = PATTERNS.as_ref() else {
        return;
    };

    for decl in &patterns.declarations {
        if !source.contains(decl.symbol) {
            continue;
        }

        let shapes = [
            (&decl.enum_block, &patterns.enum_entry),
            (&decl.object_block, &patterns.object_entry),
            (&decl.class_block, &patterns.class_entry),
        ];
        for (block, entry) in shapes {
            for body in block.captures_iter(source) {
                let Some(body) = body.get(1) else { continue };
                for caps in entry.captures_iter(body.as_str()) {
                    let member = caps.get(1).map(|m| m.as_str());
                    let value = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
                    if let (Some(member), Some(value)) = (member, value) {
                        constants.insert(decl.symbol, member, value);
                    }
                }
            }
        }
    }
}
