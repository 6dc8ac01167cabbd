//! Pipeline configuration.
//!
//! Every naming convention of the installation layout lives here, with defaults
//! matching a standard installation (`<root>/libs` holding `*.cpython-*` binaries
//! and `<root>/KratosMultiphysics` holding the wrapper package).

use crate::error::{Result, StubweaveError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PACKAGE_NAME: &str = "KratosMultiphysics";
pub const DEFAULT_LIBRARY_DIR: &str = "libs";
pub const DEFAULT_PLATFORM_TAG: &str = ".cpython";
pub const DEFAULT_SOURCE_EXTENSION: &str = "py";
pub const DEFAULT_STUB_EXTENSION: &str = "pyi";
pub const DEFAULT_INITIALIZER_STEM: &str = "__init__";
pub const DEFAULT_CORE_MODULE: &str = "Kratos";
pub const DEFAULT_EXTENSION_PREFIX: &str = "Kratos";
pub const DEFAULT_EXTENSION_SUFFIX: &str = "Application";
pub const DEFAULT_TOOL_COMMAND: &str = "stubgen";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub installation_root: PathBuf,
    pub library_dir: Option<PathBuf>,
    pub scratch_dir: Option<PathBuf>,
    pub package_name: String,
    pub platform_tag: String,
    pub source_extension: String,
    pub stub_extension: String,
    pub initializer_stem: String,
    pub core_module: String,
    pub extension_prefix: String,
    pub extension_suffix: String,
    pub tool_command: String,
    /// Explicit extension list; `None` means scan the package tree.
    pub extensions: Option<Vec<String>>,
    pub quiet: bool,
}

impl PipelineConfig {
    pub fn new(installation_root: impl Into<PathBuf>) -> Self {
        Self {
            installation_root: installation_root.into(),
            library_dir: None,
            scratch_dir: None,
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            platform_tag: DEFAULT_PLATFORM_TAG.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            stub_extension: DEFAULT_STUB_EXTENSION.to_string(),
            initializer_stem: DEFAULT_INITIALIZER_STEM.to_string(),
            core_module: DEFAULT_CORE_MODULE.to_string(),
            extension_prefix: DEFAULT_EXTENSION_PREFIX.to_string(),
            extension_suffix: DEFAULT_EXTENSION_SUFFIX.to_string(),
            tool_command: DEFAULT_TOOL_COMMAND.to_string(),
            extensions: None,
            quiet: false,
        }
    }

    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn with_core_module(mut self, name: impl Into<String>) -> Self {
        self.core_module = name.into();
        self
    }

    pub fn with_tool_command(mut self, command: impl Into<String>) -> Self {
        self.tool_command = command.into();
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn library_dir(&self) -> PathBuf {
        self.library_dir
            .clone()
            .unwrap_or_else(|| self.installation_root.join(DEFAULT_LIBRARY_DIR))
    }

    /// Root of the wrapper package tree; its dotted name is `package_name`.
    pub fn source_root(&self) -> PathBuf {
        self.installation_root.join(&self.package_name)
    }

    /// Where the stub tool writes raw output. Defaults to the library directory.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(|| self.library_dir())
    }

    /// `__init__.pyi`
    pub fn initializer_stub_name(&self) -> String {
        format!("{}.{}", self.initializer_stem, self.stub_extension)
    }

    /// Compiled-module name for a registry extension name.
    pub fn extension_module_name(&self, extension: &str) -> String {
        format!("{}{}", self.extension_prefix, extension)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.installation_root.is_dir() {
            return Err(StubweaveError::Config(format!(
                "installation root {} is not a directory",
                self.installation_root.display()
            )));
        }
        for (field, value) in [
            ("package name", &self.package_name),
            ("platform tag", &self.platform_tag),
            ("source extension", &self.source_extension),
            ("stub extension", &self.stub_extension),
            ("initializer stem", &self.initializer_stem),
            ("tool command", &self.tool_command),
        ] {
            if value.trim().is_empty() {
                return Err(StubweaveError::Config(format!("{field} must not be empty")));
            }
        }
        let scratch = self.scratch_dir();
        if scratch == self.installation_root || scratch.starts_with(self.source_root()) {
            return Err(StubweaveError::Config(format!(
                "scratch directory {} must be outside the package tree",
                scratch.display()
            )));
        }
        Ok(())
    }
}
