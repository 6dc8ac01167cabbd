#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use stubweave_api::{ApiError, ApiResult, StubTool, SynthesisMode};
use tempfile::TempDir;

pub const TAG: &str = ".cpython-311-x86_64-linux-gnu.so";

/// Declarations a fake binary module expands to.
#[derive(Clone)]
pub enum BinaryShape {
    File(&'static str),
    /// Relative file paths and contents under the package directory.
    Directory(Vec<(&'static str, &'static str)>),
}

/// Stand-in for the external stub tool.
///
/// Binary targets produce the configured shape. Dotted targets produce
/// `<out>/a/b/__init__.pyi` when `<source>/b/__init__.py` exists and
/// `<out>/a/b.pyi` otherwise, like the real tool.
pub struct FakeStubTool {
    pub source_parent: PathBuf,
    pub binaries: HashMap<String, BinaryShape>,
    pub failing: HashSet<String>,
    pub missing: bool,
    pub calls: Mutex<Vec<(Vec<SynthesisMode>, String)>>,
}

impl FakeStubTool {
    pub fn new(installation_root: &Path) -> Self {
        Self {
            source_parent: installation_root.to_path_buf(),
            binaries: HashMap::new(),
            failing: HashSet::new(),
            missing: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_binary(mut self, name: &str, shape: BinaryShape) -> Self {
        self.binaries.insert(name.to_string(), shape);
        self
    }

    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing.insert(target.to_string());
        self
    }

    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn binary_calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(modes, target)| modes.contains(&SynthesisMode::Package) && target == name)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn write(path: &Path, content: &str) -> ApiResult<()> {
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl StubTool for FakeStubTool {
    fn name(&self) -> &str {
        "fake-stubgen"
    }

    fn probe(&self) -> ApiResult<()> {
        if self.missing {
            Err(ApiError::ToolMissing("fake-stubgen".into()))
        } else {
            Ok(())
        }
    }

    fn generate(&self, output_dir: &Path, modes: &[SynthesisMode], target: &str) -> ApiResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((modes.to_vec(), target.to_string()));

        if self.failing.contains(target) {
            return Err(ApiError::Io(std::io::Error::other(format!(
                "cannot import {target}"
            ))));
        }

        if modes.contains(&SynthesisMode::Module) {
            let relative: PathBuf = target.split('.').collect();
            let content = format!("def hint_from_{}() -> None: ...\n", target.replace('.', "_"));
            if self.source_parent.join(&relative).join("__init__.py").is_file() {
                return Self::write(&output_dir.join(relative).join("__init__.pyi"), &content);
            }
            return Self::write(&output_dir.join(relative).with_extension("pyi"), &content);
        }

        match self.binaries.get(target) {
            Some(BinaryShape::File(content)) => {
                Self::write(&output_dir.join(format!("{target}.pyi")), content)
            }
            Some(BinaryShape::Directory(files)) => {
                for (path, content) in files {
                    Self::write(&output_dir.join(target).join(path), content)?;
                }
                Ok(())
            }
            None => Self::write(
                &output_dir.join(format!("{target}.pyi")),
                &format!("class {target}Binary: ...\n"),
            ),
        }
    }
}

/// Installation root with `libs/` and the wrapper package.
pub struct Installation {
    pub dir: TempDir,
}

impl Installation {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("libs")).unwrap();
        fs::create_dir_all(dir.path().join("KratosMultiphysics")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn libs(&self) -> PathBuf {
        self.root().join("libs")
    }

    pub fn package(&self) -> PathBuf {
        self.root().join("KratosMultiphysics")
    }

    pub fn binary(&self, name: &str) -> &Self {
        fs::write(self.libs().join(format!("{name}{TAG}")), b"\x7fELF").unwrap();
        self
    }

    pub fn source(&self, relative: &str, content: &str) -> &Self {
        let path = self.package().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.package().join(relative)).unwrap()
    }
}
