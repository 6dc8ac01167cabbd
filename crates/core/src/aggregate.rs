//! Submodule re-exports for synthesized stub packages.
//!
//! The stub tool writes each submodule of a compiled package as a sibling file
//! or directory but does not import them from the package initializer, so
//! `pkg.sub` does not resolve statically. Each package directory gets a marked
//! block of `from . import <child>` lines.
//!
//! Running twice over the same tree appends a second block; the orchestrator
//! aggregates every synthesized package exactly once.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::util::{append_marked_block, list_sorted};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SUBMODULES_START: &str = "#   ---- start of includes of sub modules --- ";
pub const SUBMODULES_END: &str = "#   ---- end of includes of sub modules --- ";

pub struct SubmoduleAggregator {
    stub_extension: String,
    initializer_stub_name: String,
}

impl SubmoduleAggregator {
    pub fn new(stub_extension: impl Into<String>, initializer_stub_name: impl Into<String>) -> Self {
        Self {
            stub_extension: stub_extension.into(),
            initializer_stub_name: initializer_stub_name.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.stub_extension.clone(), config.initializer_stub_name())
    }

    /// Insert re-export blocks into `package_dir` and every directory below it.
    ///
    /// Returns the number of directories updated. A path that is not a
    /// directory is left alone.
    pub fn aggregate(&self, package_dir: &Path) -> Result<usize> {
        if !package_dir.is_dir() {
            return Ok(0);
        }

        let mut updated = 0;
        let mut worklist: Vec<PathBuf> = vec![package_dir.to_path_buf()];

        while let Some(dir) = worklist.pop() {
            let mut lines = String::new();
            let mut subdirs = Vec::new();

            for entry in list_sorted(&dir)? {
                let file_name = entry.file_name().to_string_lossy();
                let child = if entry.file_type().is_dir() {
                    subdirs.push(entry.path().to_path_buf());
                    Some(file_name.to_string())
                } else if file_name == self.initializer_stub_name.as_str() {
                    None
                } else {
                    self.module_name(&file_name)
                };

                if let Some(child) = child {
                    lines.push_str(&format!("from . import {child}\n"));
                }
            }

            append_marked_block(
                &dir.join(&self.initializer_stub_name),
                SUBMODULES_START,
                SUBMODULES_END,
                &lines,
            )?;
            debug!("Added submodule includes to {}", dir.display());
            updated += 1;

            worklist.extend(subdirs.into_iter().rev());
        }

        Ok(updated)
    }

    /// `sub.pyi` -> `sub`; non-declaration files are not submodules.
    fn module_name(&self, file_name: &str) -> Option<String> {
        let stem = file_name.strip_suffix(self.stub_extension.as_str())?;
        let stem = stem.strip_suffix('.')?;
        (!stem.is_empty()).then(|| stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn block_lines(content: &str) -> Vec<&str> {
        let start = content.find(SUBMODULES_START).unwrap() + SUBMODULES_START.len();
        let end = content.find(SUBMODULES_END).unwrap();
        content[start..end]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_children_listed_in_order_then_recurse() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("Core");
        fs::create_dir_all(pkg.join("sub")).unwrap();
        fs::write(pkg.join("__init__.pyi"), "class Model: ...\n").unwrap();
        fs::write(pkg.join("b.pyi"), "").unwrap();
        fs::write(pkg.join("a.pyi"), "").unwrap();
        fs::write(pkg.join("sub").join("leaf.pyi"), "").unwrap();

        let updated = SubmoduleAggregator::new("pyi", "__init__.pyi")
            .aggregate(&pkg)
            .unwrap();
        assert_eq!(updated, 2);

        let root = fs::read_to_string(pkg.join("__init__.pyi")).unwrap();
        assert!(root.starts_with("class Model: ...\n"));
        assert_eq!(
            block_lines(&root),
            vec!["from . import a", "from . import b", "from . import sub"]
        );

        let sub = fs::read_to_string(pkg.join("sub").join("__init__.pyi")).unwrap();
        assert_eq!(block_lines(&sub), vec!["from . import leaf"]);
    }

    #[test]
    fn test_second_run_duplicates_block() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("Core");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("a.pyi"), "").unwrap();

        let aggregator = SubmoduleAggregator::new("pyi", "__init__.pyi");
        aggregator.aggregate(&pkg).unwrap();
        aggregator.aggregate(&pkg).unwrap();

        let content = fs::read_to_string(pkg.join("__init__.pyi")).unwrap();
        assert_eq!(content.matches(SUBMODULES_START).count(), 2);
    }

    #[test]
    fn test_file_artifact_is_ignored() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Core.pyi");
        fs::write(&file, "x: int\n").unwrap();

        let updated = SubmoduleAggregator::new("pyi", "__init__.pyi")
            .aggregate(&file)
            .unwrap();
        assert_eq!(updated, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "x: int\n");
    }

    #[test]
    fn test_non_declaration_files_are_skipped() {
        let aggregator = SubmoduleAggregator::new("pyi", "__init__.pyi");
        assert_eq!(aggregator.module_name("mod.pyi").as_deref(), Some("mod"));
        assert_eq!(aggregator.module_name("py.typed"), None);
        assert_eq!(aggregator.module_name("notpyi"), None);
    }
}
