//! Page transition graph memory.
//!
//! `PtgMemory` owns the graph being built during a run: main page keys mapped
//! to de-duplicated, insertion-ordered edge lists. It also carries the route
//! constants of the run and a list of targets that could not be resolved.
//! The traversal engine is the only writer, so no locking is involved.

mod edge;
mod mutations;
mod serialization;

pub use edge::{ComponentRef, Edge, EdgeKey, RawEdge, UNKNOWN};

use indexmap::IndexMap;

use crate::paths::normalize_slashes;

/// Page key to ordered edge list.
pub type Ptg = IndexMap<String, Vec<Edge>>;

/// Mutable accumulator for the page transition graph.
#[derive(Debug, Clone, Default)]
pub struct PtgMemory {
    ptg: Ptg,
    route_constant_full: IndexMap<String, String>,
    route_constant_short: IndexMap<String, String>,
    unresolved_targets: Vec<String>,
}

impl PtgMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptg(&self) -> &Ptg {
        &self.ptg
    }

    pub fn into_ptg(self) -> Ptg {
        self.ptg
    }

    /// Edges recorded for a page, if the page is known.
    pub fn edges(&self, page: &str) -> Option<&[Edge]> {
        self.ptg.get(&normalize_page_key(page)).map(Vec::as_slice)
    }

    pub fn contains_page(&self, page: &str) -> bool {
        self.ptg.contains_key(&normalize_page_key(page))
    }

    pub fn page_count(&self) -> usize {
        self.ptg.len()
    }

    pub fn edge_count(&self) -> usize {
        self.ptg.values().map(Vec::len).sum()
    }

    pub fn route_constant_full(&self) -> &IndexMap<String, String> {
        &self.route_constant_full
    }

    pub fn route_constant_short(&self) -> &IndexMap<String, String> {
        &self.route_constant_short
    }

    pub fn unresolved_targets(&self) -> &[String] {
        &self.unresolved_targets
    }
}

pub(crate) fn normalize_page_key(page: &str) -> String {
    normalize_slashes(page).trim().to_string()
}
