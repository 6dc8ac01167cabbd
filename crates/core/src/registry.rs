//! Installed extension registries.

use crate::config::PipelineConfig;
use crate::util::list_sorted;
use std::path::PathBuf;
use stubweave_api::{ApiError, ApiResult, ExtensionRegistry};

/// Extensions installed as subpackages of the source tree, e.g.
/// `KratosMultiphysics/FluidDynamicsApplication/`.
pub struct PackageTreeRegistry {
    source_root: PathBuf,
    suffix: String,
}

impl PackageTreeRegistry {
    pub fn new(source_root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.source_root(), config.extension_suffix.clone())
    }
}

impl ExtensionRegistry for PackageTreeRegistry {
    fn name(&self) -> &str {
        "package tree"
    }

    fn extensions(&self) -> ApiResult<Vec<String>> {
        let entries = list_sorted(&self.source_root)
            .map_err(|e| ApiError::Registry(e.to_string()))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| name.ends_with(&self.suffix) && name.len() > self.suffix.len())
            .collect())
    }
}

/// A fixed, caller-supplied list of extensions.
pub struct StaticRegistry {
    extensions: Vec<String>,
}

impl StaticRegistry {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }
}

impl ExtensionRegistry for StaticRegistry {
    fn name(&self) -> &str {
        "static"
    }

    fn extensions(&self) -> ApiResult<Vec<String>> {
        Ok(self.extensions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_package_tree_lists_suffixed_directories_in_order() {
        let temp = TempDir::new().unwrap();
        for dir in [
            "StructuralMechanicsApplication",
            "FluidDynamicsApplication",
            "utilities",
            "Application",
        ] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("FakeApplication"), "").unwrap();

        let registry = PackageTreeRegistry::new(temp.path(), "Application");
        assert_eq!(
            registry.extensions().unwrap(),
            vec!["FluidDynamicsApplication", "StructuralMechanicsApplication"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_package_tree_lists_linked_applications() {
        let temp = TempDir::new().unwrap();
        let tree = temp.path().join("Pkg");
        fs::create_dir_all(temp.path().join("real_src").join("FluidApplication")).unwrap();
        fs::create_dir(&tree).unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("real_src").join("FluidApplication"),
            tree.join("FluidApplication"),
        )
        .unwrap();

        let registry = PackageTreeRegistry::new(&tree, "Application");
        assert_eq!(registry.extensions().unwrap(), vec!["FluidApplication"]);
    }

    #[test]
    fn test_missing_tree_is_a_registry_error() {
        let temp = TempDir::new().unwrap();
        let registry = PackageTreeRegistry::new(temp.path().join("missing"), "Application");
        assert!(matches!(registry.extensions(), Err(ApiError::Registry(_))));
    }

    #[test]
    fn test_static_registry_keeps_order() {
        let registry = StaticRegistry::new(vec!["B".into(), "A".into()]);
        assert_eq!(registry.extensions().unwrap(), vec!["B", "A"]);
    }
}
