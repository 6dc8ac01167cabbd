use super::matcher::wildcard_imports;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::util::list_sorted;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use stubweave_api::WrapperModule;
use tracing::{debug, info, warn};

/// Result of indexing: every target ends up in exactly one of the two halves.
#[derive(Debug, Default, Clone)]
pub struct IndexOutcome {
    /// Compiled module name to the wrapper that re-exports it, in match order.
    pub matched: IndexMap<String, WrapperModule>,
    /// Targets no wrapper re-exports, in target order.
    pub unmatched: Vec<String>,
}

impl IndexOutcome {
    pub fn wrapper_for(&self, name: &str) -> Option<&WrapperModule> {
        self.matched.get(name)
    }
}

pub struct WrapperIndexer {
    source_root: PathBuf,
    root_name: String,
    initializer_stem: String,
    source_extension: String,
}

impl WrapperIndexer {
    pub fn new(
        source_root: impl Into<PathBuf>,
        root_name: impl Into<String>,
        initializer_stem: impl Into<String>,
        source_extension: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            root_name: root_name.into(),
            initializer_stem: initializer_stem.into(),
            source_extension: source_extension.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.source_root(),
            config.package_name.clone(),
            config.initializer_stem.clone(),
            config.source_extension.clone(),
        )
    }

    /// Depth-first search of the package tree for wrappers of `targets`.
    ///
    /// Directories are visited pre-order in listing order, files of a directory
    /// before its subdirectories. Each file claims at most one pending name, the
    /// first in target order that it imports. The walk stops as soon as no
    /// target is pending.
    pub fn index<I, S>(&self, targets: I) -> Result<IndexOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pending: IndexSet<String> = targets.into_iter().map(Into::into).collect();
        let total = pending.len();
        let mut matched = IndexMap::new();
        let mut worklist = vec![self.source_root.clone()];
        // Linked directories can lead back into the tree.
        let mut visited = HashSet::new();

        while !pending.is_empty() {
            let Some(dir) = worklist.pop() else {
                break;
            };
            if let Ok(real) = fs::canonicalize(&dir) {
                if !visited.insert(real) {
                    debug!("{} already searched", dir.display());
                    continue;
                }
            }

            let mut subdirs = Vec::new();
            for entry in list_sorted(&dir)? {
                let path = entry.path();
                if entry.file_type().is_dir() {
                    subdirs.push(path.to_path_buf());
                    continue;
                }
                if pending.is_empty() || !self.is_source_file(path) {
                    continue;
                }
                if let Some((name, wrapper)) = self.claim(path, &pending) {
                    info!("Found {} binary module include in {}", name, path.display());
                    pending.shift_remove(&name);
                    matched.insert(name, wrapper);
                }
            }

            // Reverse so the first subdirectory is popped next.
            worklist.extend(subdirs.into_iter().rev());
            debug_assert_eq!(matched.len() + pending.len(), total);
        }

        let unmatched: Vec<String> = pending.into_iter().collect();
        if !unmatched.is_empty() {
            warn!(
                "Could not find imports within source modules for binaries: {}",
                unmatched.join(", ")
            );
        }

        Ok(IndexOutcome { matched, unmatched })
    }

    /// First pending name `path` re-exports, with its wrapper description.
    fn claim(&self, path: &Path, pending: &IndexSet<String>) -> Option<(String, WrapperModule)> {
        let source = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        let imports = wildcard_imports(&source);
        let name = pending
            .iter()
            .find(|name| imports.iter().any(|import| import == *name))?;

        let wrapper = WrapperModule::from_source_path(
            &self.source_root,
            path,
            &self.root_name,
            &self.initializer_stem,
        );
        if wrapper.is_none() {
            debug!("{} is not addressable as a module", path.display());
        }
        Some((name.clone(), wrapper?))
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == self.source_extension)
            .unwrap_or(false)
    }
}
