use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether the stub tool produced a single declarations file or a package tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactShape {
    File,
    Directory,
}

/// A synthesized declarations artifact sitting in the scratch location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubArtifact {
    pub root_path: PathBuf,
    pub shape: ArtifactShape,
}

impl StubArtifact {
    /// Find the artifact the stub tool wrote for `name` under `output_dir`.
    ///
    /// A package directory takes precedence over a `<name>.<ext>` file.
    pub fn locate(output_dir: &Path, name: &str, stub_extension: &str) -> Option<Self> {
        let directory = output_dir.join(name);
        if directory.is_dir() {
            return Some(Self {
                root_path: directory,
                shape: ArtifactShape::Directory,
            });
        }

        let file = output_dir.join(format!("{name}.{stub_extension}"));
        if file.is_file() {
            return Some(Self {
                root_path: file,
                shape: ArtifactShape::File,
            });
        }

        None
    }

    /// The file that receives appended declarations: the artifact itself, or the
    /// directory's initializer declaration file.
    pub fn primary_declaration(&self, initializer_file_name: &str) -> PathBuf {
        match self.shape {
            ArtifactShape::File => self.root_path.clone(),
            ArtifactShape::Directory => self.root_path.join(initializer_file_name),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.shape == ArtifactShape::Directory
    }
}
