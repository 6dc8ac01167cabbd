use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Immediate children of `dir`, in file-name order.
///
/// Every traversal in the pipeline goes through this so the listing order, and
/// therefore first-match and re-export order, is deterministic. Symbolic links
/// are followed, so an entry's file type is that of its target. Dangling links
/// and links back to an ancestor are skipped.
pub fn list_sorted(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) if e.depth() > 0 && is_unusable_link(&e) => {
                warn!("Skipping unusable link: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(entries)
}

fn is_unusable_link(error: &walkdir::Error) -> bool {
    error.loop_ancestor().is_some()
        || error
            .io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// Append `body` to `path` between a start and end marker line.
pub fn append_marked_block(path: &Path, start: &str, end: &str, body: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "\n\n{start}\n\n{body}")?;
    if !body.is_empty() && !body.ends_with('\n') {
        writeln!(file)?;
    }
    write!(file, "\n{end}\n\n")?;
    Ok(())
}

/// Copy the tree under `src` into `dest`, creating directories as needed and
/// overwriting same-named files. Existing files in `dest` not present in `src`
/// are kept.
pub fn copy_merge(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Move a file, falling back to copy-then-delete across filesystems.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(src, dest).is_err() {
        fs::copy(src, dest)?;
        fs::remove_file(src)?;
    }
    Ok(())
}

/// Remove empty directories from `start` upwards, stopping before `stop`.
///
/// Returns the directories that were removed.
pub fn prune_empty_dirs(start: &Path, stop: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir == stop || !dir.starts_with(stop) || !dir.is_dir() {
            break;
        }
        if fs::read_dir(dir)?.next().is_some() {
            break;
        }
        fs::remove_dir(dir)?;
        removed.push(dir.to_path_buf());
        current = dir.parent();
    }

    Ok(removed)
}
