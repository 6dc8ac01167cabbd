use crate::ApiResult;
use std::path::Path;

/// Mode flags understood by the external stub-generation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisMode {
    /// Treat the target as a package and recurse into its submodules.
    Package,
    /// Parse sources only, do not import them.
    ParseOnly,
    /// Do not emit `__all__`-driven re-exports.
    ExportLess,
    /// Treat the target as a single dotted module.
    Module,
}

impl SynthesisMode {
    /// Command-line flag for this mode.
    pub fn flag(&self) -> &'static str {
        match self {
            SynthesisMode::Package => "-p",
            SynthesisMode::ParseOnly => "--parse-only",
            SynthesisMode::ExportLess => "--export-less",
            SynthesisMode::Module => "-m",
        }
    }
}

/// External stub generator, treated as a black box.
pub trait StubTool: Send + Sync {
    /// Tool name (for logging/diagnostics)
    fn name(&self) -> &str;

    /// Check once that the tool can run at all.
    fn probe(&self) -> ApiResult<()>;

    /// Write declarations for `target` under `output_dir`.
    fn generate(&self, output_dir: &Path, modes: &[SynthesisMode], target: &str) -> ApiResult<()>;
}
