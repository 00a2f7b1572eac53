//! Resolution of local import specifiers to source files.

use indexmap::IndexMap;
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::paths::{SOURCE_EXTENSION, has_source_ext, normalize_slashes};
use crate::runtime::Runtime;

/// Specifier prefixes that always denote packages or platform modules.
pub const EXTERNAL_PREFIXES: [&str; 4] = ["@", "ohos:", "arkui", "ets/"];

/// Check if a specifier names a package or framework module.
pub fn is_external(specifier: &str) -> bool {
    EXTERNAL_PREFIXES
        .iter()
        .any(|prefix| specifier.starts_with(prefix))
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Resolves import specifiers against the importing file and the source root.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    ets_root: PathBuf,
}

impl ModuleResolver {
    pub fn new(ets_root: impl Into<PathBuf>) -> Self {
        Self {
            ets_root: ets_root.into(),
        }
    }

    pub fn ets_root(&self) -> &Path {
        &self.ets_root
    }

    /// Resolve one specifier imported by `from`.
    ///
    /// Returns `None` for external specifiers and for anything that does not
    /// land on an existing `.ets` file.
    pub async fn resolve(
        &self,
        specifier: &str,
        from: &Path,
        runtime: &dyn Runtime,
    ) -> Option<PathBuf> {
        let specifier = normalize_slashes(specifier.trim());
        if specifier.is_empty() || is_external(&specifier) {
            return None;
        }

        let base = if is_relative(&specifier) {
            from.parent().unwrap_or(Path::new("")).join(&specifier)
        } else {
            self.ets_root.join(&specifier)
        };

        for candidate in candidate_paths(&base) {
            let candidate = candidate.clean();
            if !has_source_ext(&candidate) {
                continue;
            }
            match runtime.metadata(&candidate).await {
                Ok(meta) if meta.is_file => {
                    trace!(specifier, resolved = %candidate.display(), "Import resolved");
                    return Some(candidate);
                }
                _ => continue,
            }
        }

        None
    }

    /// Resolve every alias of a file's import map, dropping the ones that do not resolve.
    pub async fn resolve_imports(
        &self,
        imports: &IndexMap<String, String>,
        from: &Path,
        runtime: &dyn Runtime,
    ) -> IndexMap<String, PathBuf> {
        let mut resolved = IndexMap::new();
        for (alias, specifier) in imports {
            if let Some(path) = self.resolve(specifier, from, runtime).await {
                resolved.insert(alias.clone(), path);
            }
        }
        resolved
    }
}

/// Candidate files for a base path, in probing order.
fn candidate_paths(base: &Path) -> [PathBuf; 4] {
    let index = format!("index.{SOURCE_EXTENSION}");
    [
        base.to_path_buf(),
        append_extension(base),
        base.join(&index),
        base.with_extension("").join(&index),
    ]
}

fn append_extension(base: &Path) -> PathBuf {
    let mut raw = base.as_os_str().to_os_string();
    raw.push(".");
    raw.push(SOURCE_EXTENSION);
    PathBuf::from(raw)
}

/// Files to descend into: resolved imports ordered by alias, each path once.
pub fn nested_component_files(resolved: &IndexMap<String, PathBuf>) -> Vec<PathBuf> {
    let mut aliases: Vec<&String> = resolved.keys().collect();
    aliases.sort();

    let mut seen = FxHashSet::default();
    let mut files = Vec::new();
    for alias in aliases {
        let path = &resolved[alias];
        if seen.insert(path.clone()) {
            files.push(path.clone());
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::native::NativeRuntime;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("pages")).unwrap();
        std::fs::create_dir_all(root.join("components/list")).unwrap();
        std::fs::create_dir_all(root.join("widgets/Banner")).unwrap();
        std::fs::write(root.join("pages/Home.ets"), "").unwrap();
        std::fs::write(root.join("components/Card.ets"), "").unwrap();
        std::fs::write(root.join("components/list/index.ets"), "").unwrap();
        std::fs::write(root.join("widgets/Banner/index.ets"), "").unwrap();
        std::fs::write(root.join("components/helper.ts"), "").unwrap();
        temp
    }

    #[tokio::test]
    async fn relative_specifier_gets_extension() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let resolved = resolver
            .resolve("../components/Card", &from, &NativeRuntime)
            .await;
        assert_eq!(resolved, Some(temp.path().join("components/Card.ets")));
    }

    #[tokio::test]
    async fn literal_path_wins_when_it_exists() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let resolved = resolver
            .resolve("../components/Card.ets", &from, &NativeRuntime)
            .await;
        assert_eq!(resolved, Some(temp.path().join("components/Card.ets")));
    }

    #[tokio::test]
    async fn directory_index_is_found() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let resolved = resolver
            .resolve("../components/list", &from, &NativeRuntime)
            .await;
        assert_eq!(
            resolved,
            Some(temp.path().join("components/list/index.ets"))
        );
    }

    #[tokio::test]
    async fn index_inside_extension_stripped_directory() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let resolved = resolver
            .resolve("widgets/Banner.ets", &from, &NativeRuntime)
            .await;
        assert_eq!(resolved, Some(temp.path().join("widgets/Banner/index.ets")));
    }

    #[tokio::test]
    async fn bare_specifiers_are_rooted_at_the_source_root() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let resolved = resolver
            .resolve("components/Card", &from, &NativeRuntime)
            .await;
        assert_eq!(resolved, Some(temp.path().join("components/Card.ets")));
    }

    #[tokio::test]
    async fn external_and_missing_specifiers_are_dropped() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        for specifier in [
            "@ohos.router",
            "@kit.ArkUI",
            "ohos:router",
            "arkui/components",
            "ets/pages/Home",
            "./Missing",
            "../components/helper",
            "",
        ] {
            assert_eq!(
                resolver.resolve(specifier, &from, &NativeRuntime).await,
                None,
                "{specifier} should not resolve"
            );
        }
    }

    #[tokio::test]
    async fn resolve_imports_keeps_only_local_files() {
        let temp = project();
        let resolver = ModuleResolver::new(temp.path());
        let from = temp.path().join("pages/Home.ets");

        let mut imports = IndexMap::new();
        imports.insert("router".to_string(), "@ohos.router".to_string());
        imports.insert("Card".to_string(), "../components/Card".to_string());
        imports.insert("List".to_string(), "../components/list".to_string());

        let resolved = resolver
            .resolve_imports(&imports, &from, &NativeRuntime)
            .await;
        assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["Card", "List"]);
    }

    #[test]
    fn nested_files_sorted_by_alias_and_deduplicated() {
        let mut resolved = IndexMap::new();
        resolved.insert("Zeta".to_string(), PathBuf::from("/p/z.ets"));
        resolved.insert("Alpha".to_string(), PathBuf::from("/p/a.ets"));
        resolved.insert("Beta".to_string(), PathBuf::from("/p/a.ets"));

        let files = nested_component_files(&resolved);
        assert_eq!(
            files,
            vec![PathBuf::from("/p/a.ets"), PathBuf::from("/p/z.ets")]
        );
    }
}
