use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Namespace separator used in dotted paths.
pub const NAMESPACE_SEPARATOR: char = '.';

/// A platform-native binary module, known only by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledModule {
    pub canonical_name: String,
}

impl CompiledModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            canonical_name: name.into(),
        }
    }

    /// Derive the canonical name from a tagged binary filename.
    ///
    /// `Kratos.cpython-311-x86_64-linux-gnu.so` with tag `.cpython` yields `Kratos`.
    /// Files without the tag, or with nothing before it, are not compiled modules.
    pub fn from_file_name(file_name: &str, platform_tag: &str) -> Option<Self> {
        let location = file_name.find(platform_tag)?;
        let name = &file_name[..location];
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name))
    }

    pub fn name(&self) -> &str {
        &self.canonical_name
    }
}

impl fmt::Display for CompiledModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name)
    }
}

/// Namespace-qualified module name such as `KratosMultiphysics.FluidDynamicsApplication`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DottedPath(String);

impl DottedPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build a dotted path from a root name and relative path segments.
    pub fn from_segments<'a>(root: &str, segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut dotted = root.to_string();
        for segment in segments {
            dotted.push(NAMESPACE_SEPARATOR);
            dotted.push_str(segment);
        }
        Self(dotted)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAMESPACE_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Final segment, e.g. `mod` for `root.pkg.mod`.
    pub fn last_segment(&self) -> &str {
        self.segments().last().unwrap_or(self.0.as_str())
    }

    /// Segments below the reserved root name, as a relative filesystem path.
    pub fn relative_path(&self) -> PathBuf {
        self.segments().skip(1).collect()
    }

    /// All segments as a relative filesystem path, root name included.
    pub fn as_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape of the source file that re-exports a compiled module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperKind {
    /// A package initializer (`pkg/__init__.py`).
    Package,
    /// A flat module file (`pkg/mod.py`).
    Module,
}

/// Source-language file re-exporting a compiled module via a wildcard import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperModule {
    pub file_path: PathBuf,
    pub kind: WrapperKind,
    pub dotted_path: DottedPath,
}

impl WrapperModule {
    /// Classify a wrapper file and compute its dotted path.
    ///
    /// The source root maps to `root_name`. Returns `None` when the file does not
    /// live under `source_root` or has a non-UTF-8 component.
    pub fn from_source_path(
        source_root: &Path,
        file_path: &Path,
        root_name: &str,
        initializer_stem: &str,
    ) -> Option<Self> {
        let relative = file_path.strip_prefix(source_root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?),
                _ => return None,
            }
        }

        let file_name = segments.pop()?;
        let stem = Path::new(file_name).file_stem()?.to_str()?;

        let kind = if stem == initializer_stem {
            WrapperKind::Package
        } else {
            segments.push(stem);
            WrapperKind::Module
        };

        Some(Self {
            file_path: file_path.to_path_buf(),
            kind,
            dotted_path: DottedPath::from_segments(root_name, segments),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_truncates_at_tag() {
        let module =
            CompiledModule::from_file_name("KratosCore.cpython-311-x86_64-linux-gnu.so", ".cpython")
                .unwrap();
        assert_eq!(module.name(), "KratosCore");
        assert!(CompiledModule::from_file_name("libKratosCore.so", ".cpython").is_none());
        assert!(CompiledModule::from_file_name(".cpython-311.so", ".cpython").is_none());
    }

    #[test]
    fn test_package_initializer_at_root_maps_to_root_name() {
        let root = Path::new("/install/KratosMultiphysics");
        let wrapper = WrapperModule::from_source_path(
            root,
            &root.join("__init__.py"),
            "KratosMultiphysics",
            "__init__",
        )
        .unwrap();
        assert_eq!(wrapper.kind, WrapperKind::Package);
        assert_eq!(wrapper.dotted_path.as_str(), "KratosMultiphysics");
        assert_eq!(wrapper.dotted_path.relative_path(), PathBuf::new());
    }

    #[test]
    fn test_nested_package_and_flat_module() {
        let root = Path::new("/install/KratosMultiphysics");
        let package = WrapperModule::from_source_path(
            root,
            &root.join("FluidApplication").join("__init__.py"),
            "KratosMultiphysics",
            "__init__",
        )
        .unwrap();
        assert_eq!(
            package.dotted_path.as_str(),
            "KratosMultiphysics.FluidApplication"
        );

        let module = WrapperModule::from_source_path(
            root,
            &root.join("FluidApplication").join("extras.py"),
            "KratosMultiphysics",
            "__init__",
        )
        .unwrap();
        assert_eq!(module.kind, WrapperKind::Module);
        assert_eq!(
            module.dotted_path.as_str(),
            "KratosMultiphysics.FluidApplication.extras"
        );
        assert_eq!(module.dotted_path.last_segment(), "extras");
        assert_eq!(
            module.dotted_path.relative_path(),
            Path::new("FluidApplication").join("extras")
        );
    }

    #[test]
    fn test_file_outside_root_is_rejected() {
        let wrapper = WrapperModule::from_source_path(
            Path::new("/install/pkg"),
            Path::new("/elsewhere/mod.py"),
            "pkg",
            "__init__",
        );
        assert!(wrapper.is_none());
    }
}
