mod generate;
mod summary;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stubweave",
    version,
    about = "Generate and place type stubs for compiled extension modules",
    long_about = "Synthesizes declaration stubs for every compiled binary module of an installation, \
                  merges in the hints of the source wrapper that re-exports each binary, and places \
                  the result next to that wrapper so the binary's API resolves under its package name."
)]
pub struct Cli {
    /// Absolute path to the installation root (containing `libs/` and the package tree)
    #[arg(value_name = "INSTALL_ROOT")]
    pub installation_root: PathBuf,

    /// Suppress console output from this run and from the stub tool
    #[arg(long)]
    pub quiet: bool,

    /// Directory holding the compiled binaries [default: <INSTALL_ROOT>/libs]
    #[arg(long, value_name = "DIR")]
    pub library_dir: Option<PathBuf>,

    /// Directory the stub tool writes raw output to [default: the library directory]
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Name of the top-level source package under the installation root
    #[arg(long, value_name = "NAME", default_value = stubweave_core::config::DEFAULT_PACKAGE_NAME)]
    pub package: String,

    /// Compiled name of the core library module
    #[arg(long, value_name = "NAME", default_value = stubweave_core::config::DEFAULT_CORE_MODULE)]
    pub core_module: String,

    /// Stub tool command line
    #[arg(long, value_name = "COMMAND", default_value = stubweave_core::config::DEFAULT_TOOL_COMMAND)]
    pub stubgen: String,

    /// Installed extension to process (repeatable); replaces package-tree discovery
    #[arg(long = "extension", value_name = "NAME")]
    pub extensions: Vec<String>,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// The installation root made absolute against the working directory.
    pub fn installation_root(&self) -> PathBuf {
        std::path::absolute(&self.installation_root)
            .unwrap_or_else(|_| self.installation_root.clone())
    }

    pub fn to_config(&self) -> stubweave_core::PipelineConfig {
        let mut config = stubweave_core::PipelineConfig::new(self.installation_root())
            .with_package_name(&self.package)
            .with_core_module(&self.core_module)
            .with_tool_command(&self.stubgen)
            .with_quiet(self.quiet);

        if let Some(dir) = &self.library_dir {
            config = config.with_library_dir(dir);
        }
        if let Some(dir) = &self.scratch_dir {
            config = config.with_scratch_dir(dir);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions.clone());
        }
        config
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Quiet runs still log to file
    let installation_root = cli.installation_root();
    let _guard = stubweave_runtime::init_logging("cli", Some(&installation_root), !cli.quiet);

    generate::run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_standard_layout() {
        let cli = Cli::parse_from(["stubweave", "/opt/install"]);
        let config = cli.to_config();
        assert!(!config.quiet);
        assert_eq!(config.package_name, "KratosMultiphysics");
        assert_eq!(config.core_module, "Kratos");
        assert_eq!(config.tool_command, "stubgen");
        assert_eq!(config.library_dir(), PathBuf::from("/opt/install/libs"));
        assert!(config.extensions.is_none());
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let cli = Cli::parse_from(["stubweave", "build/install"]);
        let config = cli.to_config();
        let expected = std::env::current_dir().unwrap().join("build/install");
        assert!(config.installation_root.is_absolute());
        assert_eq!(config.installation_root, expected);
        assert_eq!(config.library_dir(), expected.join("libs"));
    }

    #[test]
    fn test_flags_override_configuration() {
        let cli = Cli::parse_from([
            "stubweave",
            "/opt/install",
            "--quiet",
            "--scratch-dir",
            "/tmp/stubs",
            "--stubgen",
            "python3 -m mypy.stubgen",
            "--extension",
            "FluidDynamicsApplication",
            "--extension",
            "StructuralMechanicsApplication",
        ]);
        let config = cli.to_config();
        assert!(config.quiet);
        assert_eq!(config.scratch_dir(), PathBuf::from("/tmp/stubs"));
        assert_eq!(config.tool_command, "python3 -m mypy.stubgen");
        assert_eq!(
            config.extensions.unwrap(),
            vec!["FluidDynamicsApplication", "StructuralMechanicsApplication"]
        );
    }
}
