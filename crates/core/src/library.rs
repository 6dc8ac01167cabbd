//! Compiled module discovery.
//!
//! Binaries are recognised purely by filename: everything before the platform
//! tag is the canonical module name.

use crate::error::Result;
use crate::util::list_sorted;
use indexmap::IndexSet;
use std::path::Path;
use stubweave_api::CompiledModule;
use tracing::{debug, info};

pub struct LibraryScanner {
    platform_tag: String,
}

impl LibraryScanner {
    pub fn new(platform_tag: impl Into<String>) -> Self {
        Self {
            platform_tag: platform_tag.into(),
        }
    }

    /// Canonical compiled-module names in `library_dir`, in listing order,
    /// with differently-tagged builds of one module collapsed to one entry.
    pub fn scan(&self, library_dir: &Path) -> Result<IndexSet<CompiledModule>> {
        let mut modules = IndexSet::new();

        for entry in list_sorted(library_dir)? {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            match CompiledModule::from_file_name(&file_name, &self.platform_tag) {
                Some(module) => {
                    if !modules.insert(module) {
                        debug!("Duplicate tagged binary {} ignored", file_name);
                    }
                }
                None => debug!("Skipping untagged file {}", file_name),
            }
        }

        info!(
            "Found {} compiled modules in {}",
            modules.len(),
            library_dir.display()
        );
        Ok(modules)
    }
}
