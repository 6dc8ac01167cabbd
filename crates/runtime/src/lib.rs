use std::path::Path;
use std::sync::Arc;
use stubweave_core::synth::CommandStubTool;
use stubweave_core::{Orchestrator, PipelineConfig, Result};

/// Bootstraps a ready-to-run pipeline for an installation.
///
/// The configuration is validated, the stub tool is the configured external
/// command, and extensions come from the explicit list or the package tree.
pub fn build_default_pipeline(config: PipelineConfig) -> Result<Orchestrator> {
    config.validate()?;
    let tool = CommandStubTool::from_config(&config)?;
    tracing::debug!("Using stub tool command: {}", config.tool_command);
    Ok(Orchestrator::with_default_registry(config, Arc::new(tool)))
}

/// Initializes the logging system for a specific component, with the log file
/// named after the installation being processed.
pub fn init_logging(
    component: &str,
    installation: Option<&Path>,
    to_stderr: bool,
) -> Option<impl Drop> {
    Some(stubweave_core::logging::init_logging(
        component,
        installation,
        to_stderr,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_is_rejected_before_building() {
        let result = build_default_pipeline(PipelineConfig::new("/no/such/installation"));
        assert!(result.is_err());
    }

    #[test]
    fn test_builds_for_valid_installation() {
        let temp = tempfile::tempdir().unwrap();
        let pipeline = build_default_pipeline(
            PipelineConfig::new(temp.path()).with_tool_command("python3 -m mypy.stubgen"),
        )
        .unwrap();
        assert_eq!(pipeline.config().tool_command, "python3 -m mypy.stubgen");
    }
}
