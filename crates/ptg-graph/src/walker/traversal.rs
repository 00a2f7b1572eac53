//! Depth-first walk below one main page.

use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{TraversalEngine, WalkerError};
use crate::dependency_chain::DependencyChain;
use crate::extraction::{
    ExtractionRequest, ExtractorError, ExtractorFailurePolicy, ParseOutcome, parse_response,
};
use crate::imports::{extract_imports, nested_component_files};
use crate::memory::UNKNOWN;
use crate::paths::path_key;
use crate::runtime::read_text;
use crate::target::resolve_target;

/// One pending file on the worklist.
struct Frame {
    path: PathBuf,
    /// Files above this one; its depth is the frame's depth.
    chain: DependencyChain,
}

impl TraversalEngine {
    /// Walk `page_file` and everything it imports, attributing edges to `main_page_key`.
    ///
    /// Files are visited in the order a recursive pre-order walk would visit
    /// them: each file before its imports, imports ordered by alias. A file
    /// already analyzed in this run, through any main page, is not analyzed again.
    pub async fn analyze_page(
        &mut self,
        main_page_key: &str,
        page_file: &Path,
        main_pages: &[String],
    ) -> Result<(), WalkerError> {
        let mut stack = vec![Frame {
            path: page_file.to_path_buf(),
            chain: DependencyChain::root(main_page_key),
        }];

        while let Some(frame) = stack.pop() {
            if self.stats.files_analyzed >= self.config.limits.max_files {
                debug!("File budget exhausted, stopping traversal of {main_page_key}");
                break;
            }
            if frame.chain.depth > self.config.limits.max_depth {
                continue;
            }

            let nested = self.visit(main_page_key, &frame, main_pages).await?;

            if frame.chain.depth < self.config.limits.max_depth {
                let chain = frame.chain.extended(path_key(&frame.path));
                for path in nested.into_iter().rev() {
                    stack.push(Frame {
                        path,
                        chain: chain.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Analyze one file. Returns the local component files it imports.
    async fn visit(
        &mut self,
        main_page_key: &str,
        frame: &Frame,
        main_pages: &[String],
    ) -> Result<Vec<PathBuf>, WalkerError> {
        let file = &frame.path;
        let visit_key = self.visit_key(file);
        if !self.visited.insert(visit_key) {
            return Ok(Vec::new());
        }
        self.stats.files_analyzed += 1;

        let code = match read_text(self.runtime.as_ref(), file).await {
            Ok(code) => code,
            Err(e) => {
                warn!("Skipping unreadable file {}: {e}", file.display());
                return Ok(Vec::new());
            }
        };
        if code.trim().is_empty() {
            return Ok(Vec::new());
        }

        let imports = extract_imports(&code);
        let resolved = self
            .resolver
            .resolve_imports(&imports, file, self.runtime.as_ref())
            .await;
        let resolved_files: Vec<String> = resolved.values().map(|p| path_key(p)).collect();
        self.dependency_graph
            .record(path_key(file), resolved_files.clone());

        info!("Reading & analyzing file: {}", file.display());
        debug!(depth = frame.chain.depth, "Reached via {}", frame.chain.format_chain());
        let request = ExtractionRequest {
            file_path: path_key(file),
            code,
            main_pages: main_pages.to_vec(),
            dependency_chain: frame.chain.path.clone(),
            resolved_import_files: resolved_files,
            route_constant_map: self.constants.full().clone(),
        };

        let answer = self.extract(file, &request).await?;
        let outcome = parse_response(&answer);
        match &outcome {
            ParseOutcome::Parsed { layer, edges } => {
                debug!(?layer, edges = edges.len(), "Extractor answer decoded for {}", file.display());
            }
            ParseOutcome::Empty(reason) => {
                debug!(?reason, "No edges decoded for {}", file.display());
            }
        }

        for raw in outcome.into_edges() {
            let target = resolve_target(raw.target.as_deref().unwrap_or_default(), &self.constants);
            if target.is_empty() {
                continue;
            }

            let added = self.memory.add_edge(
                main_page_key,
                raw.component_type.as_deref().unwrap_or(UNKNOWN),
                raw.event.as_deref().unwrap_or(UNKNOWN),
                &target,
            );
            if added {
                self.stats.edges_added += 1;
                info!("Found route: {main_page_key} -> {target}");
            }
        }

        Ok(nested_component_files(&resolved))
    }

    /// Call the extractor under the configured timeout and failure policy.
    async fn extract(
        &self,
        file: &Path,
        request: &ExtractionRequest,
    ) -> Result<String, WalkerError> {
        let result = match self.config.extract_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.extractor.extract(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(ExtractorError::Timeout {
                        seconds: limit.as_secs(),
                    }),
                }
            }
            None => self.extractor.extract(request).await,
        };

        match result {
            Ok(answer) => Ok(answer),
            Err(err @ ExtractorError::Timeout { .. }) => {
                warn!("{err} for {}, treating as no edges", file.display());
                Ok(String::new())
            }
            Err(err) => match self.config.failure_policy {
                ExtractorFailurePolicy::Skip => {
                    warn!(
                        extractor = self.extractor.name(),
                        "{err} for {}, skipping file",
                        file.display()
                    );
                    Ok(String::new())
                }
                ExtractorFailurePolicy::Abort => Err(WalkerError::ExtractionFailed {
                    path: file.to_path_buf(),
                    source: err,
                }),
            },
        }
    }

    /// Identity of a file for the visited set.
    fn visit_key(&self, file: &Path) -> String {
        match self.runtime.canonicalize(file) {
            Ok(canonical) => path_key(&canonical),
            Err(_) => path_key(&file.to_path_buf().clean()),
        }
    }
}
