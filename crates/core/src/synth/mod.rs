//! Raw stub synthesis through the external tool.

pub mod command;

pub use command::CommandStubTool;

use crate::config::PipelineConfig;
use crate::error::{Result, StubweaveError};
use std::path::PathBuf;
use std::sync::Arc;
use stubweave_api::{DottedPath, StubArtifact, StubTool, SynthesisMode, WrapperKind};
use tracing::debug;

const BINARY_MODES: &[SynthesisMode] = &[SynthesisMode::Package];
const WRAPPER_MODES: &[SynthesisMode] = &[
    SynthesisMode::ParseOnly,
    SynthesisMode::ExportLess,
    SynthesisMode::Module,
];

pub struct StubSynthesizer {
    tool: Arc<dyn StubTool>,
    output_dir: PathBuf,
    stub_extension: String,
    initializer_stub_name: String,
}

impl StubSynthesizer {
    pub fn new(
        tool: Arc<dyn StubTool>,
        output_dir: impl Into<PathBuf>,
        stub_extension: impl Into<String>,
        initializer_stub_name: impl Into<String>,
    ) -> Self {
        Self {
            tool,
            output_dir: output_dir.into(),
            stub_extension: stub_extension.into(),
            initializer_stub_name: initializer_stub_name.into(),
        }
    }

    pub fn from_config(tool: Arc<dyn StubTool>, config: &PipelineConfig) -> Self {
        Self::new(
            tool,
            config.scratch_dir(),
            config.stub_extension.clone(),
            config.initializer_stub_name(),
        )
    }

    /// Fail fast if the tool cannot run.
    pub fn ensure_available(&self) -> Result<()> {
        self.tool.probe()?;
        debug!("Stub tool {} is available", self.tool.name());
        Ok(())
    }

    /// Full synthesis of a compiled module. Yields a file, or a directory tree
    /// when the module exposes submodules.
    pub fn synthesize_binary(&self, module_name: &str) -> Result<StubArtifact> {
        self.tool
            .generate(&self.output_dir, BINARY_MODES, module_name)?;

        StubArtifact::locate(&self.output_dir, module_name, &self.stub_extension)
            .ok_or_else(|| StubweaveError::MissingArtifact(module_name.to_string()))
    }

    /// Parse-only, export-less synthesis of a wrapper's dotted module.
    ///
    /// Returns the declarations file the tool wrote for it.
    pub fn synthesize_wrapper(&self, dotted_path: &DottedPath, kind: WrapperKind) -> Result<PathBuf> {
        self.tool
            .generate(&self.output_dir, WRAPPER_MODES, dotted_path.as_str())?;

        let output = self.wrapper_output_path(dotted_path, kind);
        if output.is_file() {
            Ok(output)
        } else {
            Err(StubweaveError::MissingArtifact(dotted_path.to_string()))
        }
    }

    /// Where the tool places declarations for a dotted module.
    pub fn wrapper_output_path(&self, dotted_path: &DottedPath, kind: WrapperKind) -> PathBuf {
        let base = self.output_dir.join(dotted_path.as_path());
        match kind {
            WrapperKind::Package => base.join(&self.initializer_stub_name),
            WrapperKind::Module => base.with_extension(&self.stub_extension),
        }
    }
}
