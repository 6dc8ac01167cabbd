//! Merging wrapper hints into binary stubs and moving the result into the
//! package tree.
//!
//! Where an artifact ends up depends on two things: whether the tool produced a
//! file or a package directory, and whether the wrapper is a package
//! initializer or a flat module. Each combination has its own handler.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::util::{append_marked_block, copy_merge, move_file, prune_empty_dirs};
use std::fs;
use std::path::{Path, PathBuf};
use stubweave_api::{
    ArtifactShape, DottedPath, RelocationCase, StubArtifact, WrapperKind, WrapperModule,
};
use tracing::{debug, info};

pub const HINTS_START: &str = "#   ---- start of includes of python modules --- ";
pub const HINTS_END: &str = "#   ---- end of includes of python modules --- ";

/// Appends wrapper-derived declarations to a binary-derived artifact.
pub struct ArtifactMerger {
    initializer_stub_name: String,
    scratch_root: PathBuf,
}

impl ArtifactMerger {
    pub fn new(initializer_stub_name: impl Into<String>, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            initializer_stub_name: initializer_stub_name.into(),
            scratch_root: scratch_root.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.initializer_stub_name(), config.scratch_dir())
    }

    /// Move the contents of `wrapper_stub` into the artifact's primary
    /// declaration file between provenance markers. The wrapper stub is deleted,
    /// along with any scratch directories it leaves empty.
    ///
    /// Returns the file that received the declarations.
    pub fn merge(&self, artifact: &StubArtifact, wrapper_stub: &Path) -> Result<PathBuf> {
        let hints = fs::read_to_string(wrapper_stub)?;
        fs::remove_file(wrapper_stub)?;
        if let Some(parent) = wrapper_stub.parent() {
            prune_empty_dirs(parent, &self.scratch_root)?;
        }

        let target = artifact.primary_declaration(&self.initializer_stub_name);
        append_marked_block(&target, HINTS_START, HINTS_END, &hints)?;
        debug!(
            "Appended {} to {}",
            wrapper_stub.display(),
            target.display()
        );
        Ok(target)
    }
}

/// One relocation, fully resolved to source and destination paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationPlan {
    DirectoryIntoPackage { source: PathBuf, destination: PathBuf },
    DirectoryAsPackage { source: PathBuf, destination: PathBuf },
    FileAsInitializer { source: PathBuf, destination: PathBuf },
    FileAsSibling { source: PathBuf, destination: PathBuf },
}

impl RelocationPlan {
    pub fn case(&self) -> RelocationCase {
        match self {
            RelocationPlan::DirectoryIntoPackage { .. } => RelocationCase::DirectoryIntoPackage,
            RelocationPlan::DirectoryAsPackage { .. } => RelocationCase::DirectoryAsPackage,
            RelocationPlan::FileAsInitializer { .. } => RelocationCase::FileAsInitializer,
            RelocationPlan::FileAsSibling { .. } => RelocationCase::FileAsSibling,
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            RelocationPlan::DirectoryIntoPackage { source, .. }
            | RelocationPlan::DirectoryAsPackage { source, .. }
            | RelocationPlan::FileAsInitializer { source, .. }
            | RelocationPlan::FileAsSibling { source, .. } => source,
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            RelocationPlan::DirectoryIntoPackage { destination, .. }
            | RelocationPlan::DirectoryAsPackage { destination, .. }
            | RelocationPlan::FileAsInitializer { destination, .. }
            | RelocationPlan::FileAsSibling { destination, .. } => destination,
        }
    }
}

/// Moves merged artifacts to the path implied by the wrapper's dotted name.
pub struct Relocator {
    source_root: PathBuf,
    scratch_root: PathBuf,
    stub_extension: String,
    initializer_stub_name: String,
}

impl Relocator {
    pub fn new(
        source_root: impl Into<PathBuf>,
        scratch_root: impl Into<PathBuf>,
        stub_extension: impl Into<String>,
        initializer_stub_name: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            scratch_root: scratch_root.into(),
            stub_extension: stub_extension.into(),
            initializer_stub_name: initializer_stub_name.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.source_root(),
            config.scratch_dir(),
            config.stub_extension.clone(),
            config.initializer_stub_name(),
        )
    }

    /// Package-tree path of a dotted name. The root name maps to the source root.
    pub fn destination_base(&self, dotted_path: &DottedPath) -> PathBuf {
        self.source_root.join(dotted_path.relative_path())
    }

    pub fn plan(&self, artifact: &StubArtifact, wrapper: &WrapperModule) -> RelocationPlan {
        let base = self.destination_base(&wrapper.dotted_path);
        let source = artifact.root_path.clone();

        match (artifact.shape, wrapper.kind) {
            (ArtifactShape::Directory, WrapperKind::Package) => RelocationPlan::DirectoryIntoPackage {
                source,
                destination: base,
            },
            (ArtifactShape::Directory, WrapperKind::Module) => RelocationPlan::DirectoryAsPackage {
                source,
                destination: base,
            },
            (ArtifactShape::File, WrapperKind::Package) => RelocationPlan::FileAsInitializer {
                source,
                destination: base.join(&self.initializer_stub_name),
            },
            (ArtifactShape::File, WrapperKind::Module) => {
                let file_name = format!(
                    "{}.{}",
                    wrapper.dotted_path.last_segment(),
                    self.stub_extension
                );
                let destination = match base.parent() {
                    Some(parent) => parent.join(file_name),
                    None => self.source_root.join(file_name),
                };
                RelocationPlan::FileAsSibling {
                    source,
                    destination,
                }
            }
        }
    }

    /// Carry out a plan, then drop scratch directories it left empty.
    pub fn execute(&self, plan: &RelocationPlan) -> Result<()> {
        match plan {
            RelocationPlan::DirectoryIntoPackage {
                source,
                destination,
            } => self.merge_directory(source, destination)?,
            RelocationPlan::DirectoryAsPackage {
                source,
                destination,
            } => {
                debug!(
                    "Flat-module wrapper received a package artifact; {} becomes a package",
                    destination.display()
                );
                self.merge_directory(source, destination)?
            }
            RelocationPlan::FileAsInitializer {
                source,
                destination,
            }
            | RelocationPlan::FileAsSibling {
                source,
                destination,
            } => move_file(source, destination)?,
        }

        if let Some(parent) = plan.source().parent() {
            prune_empty_dirs(parent, &self.scratch_root)?;
        }

        info!(
            "Moved {} to {} ({})",
            plan.source().display(),
            plan.destination().display(),
            plan.case()
        );
        Ok(())
    }

    /// Plan and execute in one step.
    pub fn relocate(&self, artifact: &StubArtifact, wrapper: &WrapperModule) -> Result<RelocationPlan> {
        let plan = self.plan(artifact, wrapper);
        self.execute(&plan)?;
        Ok(plan)
    }

    fn merge_directory(&self, source: &Path, destination: &Path) -> Result<()> {
        fs::create_dir_all(destination)?;
        let copied = copy_merge(source, destination)?;
        fs::remove_dir_all(source)?;
        debug!("Copied {} declaration files", copied);
        Ok(())
    }
}
