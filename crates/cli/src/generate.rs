use crate::Cli;
use crate::summary;
use std::fs;
use tracing::info;

const INSTALL_HINT: &str =
    "Please install mypy using \"pip install mypy\" to generate stub files for compiled modules.";

pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = stubweave_runtime::build_default_pipeline(cli.to_config())?;

    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) if e.is_tool_missing() => {
            eprintln!("{INSTALL_HINT}");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = &cli.report {
        fs::write(path, report.to_json()?)?;
        info!("Report written to {}", path.display());
    }

    if !cli.quiet {
        summary::print(&report);
    }

    Ok(())
}
