use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which relocation handler moved an artifact, keyed by (artifact shape, wrapper kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationCase {
    /// Directory artifact merged into a package directory.
    DirectoryIntoPackage,
    /// Directory artifact for a flat-module wrapper; the destination becomes a package.
    DirectoryAsPackage,
    /// File artifact becomes the package initializer declaration.
    FileAsInitializer,
    /// File artifact becomes a sibling declaration of the wrapper module.
    FileAsSibling,
}

impl fmt::Display for RelocationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelocationCase::DirectoryIntoPackage => "directory into package",
            RelocationCase::DirectoryAsPackage => "directory as package",
            RelocationCase::FileAsInitializer => "file as initializer",
            RelocationCase::FileAsSibling => "file as sibling",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleOutcome {
    /// Merged with wrapper hints and moved into the package tree.
    Relocated {
        destination: PathBuf,
        case: RelocationCase,
    },
    /// No wrapper found; the raw stub stays in the scratch location.
    BinaryOnly { location: Option<PathBuf> },
    /// Synthesis or relocation failed; the run continued.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ModuleOutcome,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Modules in processing order.
    pub processed: Vec<ModuleReport>,
    /// Compiled modules no wrapper file re-exports.
    pub unmatched: Vec<String>,
    /// Registry entries whose compiled module is not installed.
    pub skipped_extensions: Vec<String>,
}

impl RunReport {
    pub fn record(&mut self, name: impl Into<String>, outcome: ModuleOutcome) {
        self.processed.push(ModuleReport {
            name: name.into(),
            outcome,
        });
    }

    pub fn failures(&self) -> usize {
        self.processed
            .iter()
            .filter(|m| matches!(m.outcome, ModuleOutcome::Failed { .. }))
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_outcome_inline() {
        let mut report = RunReport::default();
        report.record(
            "Kratos",
            ModuleOutcome::Relocated {
                destination: PathBuf::from("/pkg/__init__.pyi"),
                case: RelocationCase::FileAsInitializer,
            },
        );
        report.record(
            "Broken",
            ModuleOutcome::Failed {
                reason: "boom".into(),
            },
        );

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["processed"][0]["name"], "Kratos");
        assert_eq!(json["processed"][0]["status"], "relocated");
        assert_eq!(json["processed"][0]["case"], "file_as_initializer");
        assert_eq!(report.failures(), 1);
    }
}
