//! Stub tool backed by an external command (mypy's `stubgen` by default).

use crate::config::PipelineConfig;
use crate::error::{Result, StubweaveError};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use stubweave_api::{ApiError, ApiResult, StubTool, SynthesisMode};
use tracing::debug;

const SEARCH_PATH_VAR: &str = "PYTHONPATH";

pub struct CommandStubTool {
    program: String,
    leading_args: Vec<String>,
    /// Prepended to the child's module search path so binaries can be imported.
    search_paths: Vec<PathBuf>,
    quiet: bool,
}

impl CommandStubTool {
    /// Parse a shell-style command line such as `python3 -m mypy.stubgen`.
    pub fn new(command_line: &str) -> Result<Self> {
        let mut words = shlex::split(command_line)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| {
                StubweaveError::Config(format!("invalid tool command: {command_line:?}"))
            })?;
        let program = words.remove(0);

        Ok(Self {
            program,
            leading_args: words,
            search_paths: Vec::new(),
            quiet: false,
        })
    }

    /// Tool for an installation: library dir, then root, go on the search path.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(&config.tool_command)?
            .with_search_paths(search_paths_for(config))
            .with_quiet(config.quiet))
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Capture the child's output instead of passing it through.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn command(&self) -> ApiResult<Command> {
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args);

        if !self.search_paths.is_empty() {
            command.env(SEARCH_PATH_VAR, self.search_path_value()?);
        }
        Ok(command)
    }

    fn search_path_value(&self) -> ApiResult<OsString> {
        let inherited = std::env::var_os(SEARCH_PATH_VAR)
            .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
            .unwrap_or_default();

        std::env::join_paths(self.search_paths.iter().cloned().chain(inherited))
            .map_err(|e| ApiError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))
    }

    fn generate_args(output_dir: &Path, modes: &[SynthesisMode], target: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-o".into(), output_dir.as_os_str().to_owned()];
        args.extend(modes.iter().map(|mode| OsString::from(mode.flag())));
        args.push(target.into());
        args
    }
}

/// Binaries shadow same-named modules at the installation root.
fn search_paths_for(config: &PipelineConfig) -> Vec<PathBuf> {
    vec![config.library_dir(), config.installation_root.clone()]
}

impl StubTool for CommandStubTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn probe(&self) -> ApiResult<()> {
        let status = self
            .command()?
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                debug!("{} --help exited with {}", self.program, status);
                Err(ApiError::ToolMissing(self.program.clone()))
            }
            Err(e) => {
                debug!("Failed to spawn {}: {}", self.program, e);
                Err(ApiError::ToolMissing(self.program.clone()))
            }
        }
    }

    fn generate(&self, output_dir: &Path, modes: &[SynthesisMode], target: &str) -> ApiResult<()> {
        let mut command = self.command()?;
        command.args(Self::generate_args(output_dir, modes, target));
        debug!("Running {:?}", command);

        let (status, stderr) = if self.quiet {
            let output = command.stdin(Stdio::null()).output()?;
            (
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )
        } else {
            (command.stdin(Stdio::null()).status()?, String::new())
        };

        if status.success() {
            Ok(())
        } else {
            Err(ApiError::ToolFailed {
                target: target.to_string(),
                status,
                stderr,
            })
        }
    }
}
