//! Dependency chains and the import record built during traversal.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Files traversed from a main page down to the file being analyzed.
///
/// The first element is the main page key; later elements are the file paths
/// visited on the way down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChain {
    /// The path from the main page to the current file's parent
    pub path: Vec<String>,
    /// Depth of this chain (path length - 1); the traversal's depth bound
    /// is checked against it
    pub depth: usize,
}

impl DependencyChain {
    /// Create a new dependency chain from a path.
    pub fn new(path: Vec<String>) -> Self {
        let depth = path.len().saturating_sub(1);
        Self { path, depth }
    }

    /// A chain holding just the main page key.
    pub fn root(main_page_key: impl Into<String>) -> Self {
        Self::new(vec![main_page_key.into()])
    }

    /// A copy of this chain with `file` appended.
    pub fn extended(&self, file: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(file.into());
        Self::new(path)
    }

    /// Format the chain as a human-readable string.
    ///
    /// Example: "pages/Home -> /app/pages/Home.ets -> /app/components/Card.ets"
    pub fn format_chain(&self) -> String {
        self.path.join(" -> ")
    }
}

/// Importing file to the local files it imports.
///
/// A diagnostic record; resolution never reads it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the resolved imports of `file`, replacing an earlier record.
    pub fn record(&mut self, file: impl Into<String>, imports: Vec<String>) {
        self.edges.insert(file.into(), imports);
    }

    pub fn imports_of(&self, file: &str) -> Option<&[String]> {
        self.edges.get(file).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_chain_tracks_depth() {
        let chain = DependencyChain::root("pages/Home");
        assert_eq!(chain.depth, 0);

        let child = chain.extended("/app/pages/Home.ets");
        assert_eq!(child.depth, 1);
        assert_eq!(child.format_chain(), "pages/Home -> /app/pages/Home.ets");
        assert_eq!(chain.path.len(), 1);
        assert_eq!(chain.format_chain(), "pages/Home");
    }

    #[test]
    fn dependency_graph_serializes_as_plain_map() {
        let mut graph = DependencyGraph::new();
        graph.record("/app/pages/Home.ets", vec!["/app/components/Card.ets".into()]);
        graph.record("/app/components/Card.ets", vec![]);

        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(
            json,
            r#"{"/app/pages/Home.ets":["/app/components/Card.ets"],"/app/components/Card.ets":[]}"#
        );
        assert_eq!(graph.files().count(), 2);
    }
}
