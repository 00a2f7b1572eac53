//! Mutation methods for PtgMemory.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::edge::{Edge, RawEdge, UNKNOWN};
use super::{PtgMemory, normalize_page_key};

impl PtgMemory {
    /// Seed the graph with every main page, each with an empty edge list.
    pub fn init_from_main_pages<I, S>(&mut self, main_pages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for page in main_pages {
            self.ensure_page(page.as_ref());
        }
    }

    /// Create an empty edge list for `page` if it has none. Blank keys are ignored.
    pub fn ensure_page(&mut self, page: &str) {
        let key = normalize_page_key(page);
        if !key.is_empty() {
            self.ptg.entry(key).or_default();
        }
    }

    /// Append an edge under `source` unless its triple-key is already present.
    ///
    /// Blank component types and events become `"unknown"`. A blank target or
    /// source rejects the edge. Returns whether the edge was stored.
    pub fn add_edge(&mut self, source: &str, component_type: &str, event: &str, target: &str) -> bool {
        let source = normalize_page_key(source);
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            return false;
        }

        let edge = Edge::new(
            or_unknown(component_type),
            or_unknown(event),
            target.to_string(),
        );

        let edges = self.ptg.entry(source).or_default();
        if edges.iter().any(|existing| existing.key() == edge.key()) {
            return false;
        }
        edges.push(edge);
        true
    }

    /// Add a batch of extractor edges; returns how many were stored.
    pub fn merge_edges<I>(&mut self, source: &str, edges: I) -> usize
    where
        I: IntoIterator<Item = RawEdge>,
    {
        edges
            .into_iter()
            .filter(|raw| {
                self.add_edge(
                    source,
                    raw.component_type.as_deref().unwrap_or(UNKNOWN),
                    raw.event.as_deref().unwrap_or(UNKNOWN),
                    raw.target.as_deref().unwrap_or_default(),
                )
            })
            .count()
    }

    /// Rewrite every target through `resolver` and re-apply de-duplication.
    ///
    /// A blank rewrite keeps the original target. Returns the number of edges
    /// whose target changed, counted before duplicates are collapsed.
    pub fn rewrite_targets<F>(&mut self, mut resolver: F) -> usize
    where
        F: FnMut(&str) -> String,
    {
        let mut changed = 0;

        for edges in self.ptg.values_mut() {
            let mut seen = FxHashSet::default();
            let mut rewritten = Vec::with_capacity(edges.len());

            for mut edge in edges.drain(..) {
                let new_target = resolver(&edge.target).trim().to_string();
                if !new_target.is_empty() && new_target != edge.target {
                    edge.target = new_target;
                    changed += 1;
                }
                if seen.insert(edge.key()) {
                    rewritten.push(edge);
                }
            }

            *edges = rewritten;
        }

        changed
    }

    /// Replace the route-constant maps carried by the memory.
    pub fn update_route_constants(
        &mut self,
        full: &IndexMap<String, String>,
        short: &IndexMap<String, String>,
    ) {
        self.route_constant_full = full.clone();
        self.route_constant_short = short.clone();
    }

    /// Remember a target that could not be mapped to a page. Blank and repeated targets are ignored.
    pub fn record_unresolved_target(&mut self, target: &str) {
        let target = target.trim();
        if target.is_empty() || self.unresolved_targets.iter().any(|t| t == target) {
            return;
        }
        self.unresolved_targets.push(target.to_string());
    }
}

fn or_unknown(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}
