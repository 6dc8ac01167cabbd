use std::path::Path;
use stubweave_api::{ModuleOutcome, RunReport};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
}

fn display(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn rows(report: &RunReport) -> Vec<ModuleRow> {
    report
        .processed
        .iter()
        .map(|module| {
            let (status, location) = match &module.outcome {
                ModuleOutcome::Relocated { destination, case } => {
                    (format!("relocated ({case})"), display(Some(destination)))
                }
                ModuleOutcome::BinaryOnly { location } => {
                    ("no source hints".to_string(), display(location.as_deref()))
                }
                ModuleOutcome::Failed { reason } => ("failed".to_string(), reason.clone()),
            };
            ModuleRow {
                name: module.name.clone(),
                status,
                location,
            }
        })
        .collect()
}

pub fn print(report: &RunReport) {
    let rows = rows(report);
    if rows.is_empty() {
        println!("No compiled modules found.");
        return;
    }

    println!("{}", Table::new(rows));

    if !report.unmatched.is_empty() {
        println!("\nNo wrapper module imports these binaries:");
        for name in &report.unmatched {
            println!("  {}", name);
        }
    }
    if !report.skipped_extensions.is_empty() {
        println!("\nExtensions without a compiled module:");
        for name in &report.skipped_extensions {
            println!("  {}", name);
        }
    }
}
