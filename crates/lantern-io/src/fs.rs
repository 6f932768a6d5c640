// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! File operations behind the content browser.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors raised by file operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// The destination is taken.
    #[error("'{0}' already exists")]
    AlreadyExists(PathBuf),
    /// The source does not exist.
    #[error("'{0}' does not exist")]
    NotFound(PathBuf),
    /// The name is empty or contains a path separator.
    #[error("invalid file name '{0}'")]
    InvalidName(String),
    /// A directory cannot be copied or moved into itself.
    #[error("cannot place '{0}' inside itself")]
    IntoItself(PathBuf),
    /// The underlying filesystem call failed.
    #[error("'{path}': {source}")]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Walking a directory tree failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FsError + '_ {
    move |source| FsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Full path.
    pub path: PathBuf,
    /// File name.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Lowercase extension without the dot; empty for none.
    pub extension: String,
}

/// Lists a directory: folders first, then case-insensitive by name. Dotfiles are skipped.
pub fn list_directory(path: &Path) -> Result<Vec<DirEntryInfo>, FsError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error(path))? {
        let entry = entry.map_err(io_error(path))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let entry_path = entry.path();
        let extension = entry_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        entries.push(DirEntryInfo {
            is_dir: entry_path.is_dir(),
            path: entry_path,
            name,
            extension,
        });
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

/// A single path component: not empty, no separators, not `.` or `..`.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

fn checked_target(parent: &Path, name: &str) -> Result<PathBuf, FsError> {
    let name = name.trim();
    if !is_plain_name(name) {
        return Err(FsError::InvalidName(name.to_owned()));
    }
    let target = parent.join(name);
    if target.exists() {
        return Err(FsError::AlreadyExists(target));
    }
    Ok(target)
}

/// Creates `parent/name` as a directory.
pub fn create_folder(parent: &Path, name: &str) -> Result<PathBuf, FsError> {
    let target = checked_target(parent, name)?;
    fs::create_dir(&target).map_err(io_error(&target))?;
    Ok(target)
}

/// Creates `parent/name` as an empty file.
pub fn create_file(parent: &Path, name: &str) -> Result<PathBuf, FsError> {
    let target = checked_target(parent, name)?;
    fs::File::create_new(&target).map_err(io_error(&target))?;
    Ok(target)
}

/// Deletes a file, or a directory with everything in it.
pub fn delete_path(path: &Path) -> Result<(), FsError> {
    if path.is_dir() {
        fs::remove_dir_all(path).map_err(io_error(path))
    } else if path.exists() {
        fs::remove_file(path).map_err(io_error(path))
    } else {
        Err(FsError::NotFound(path.to_path_buf()))
    }
}

fn check_copy(from: &Path, to: &Path) -> Result<(), FsError> {
    if !from.exists() {
        return Err(FsError::NotFound(from.to_path_buf()));
    }
    if to.exists() {
        return Err(FsError::AlreadyExists(to.to_path_buf()));
    }
    if from.is_dir() && to.starts_with(from) {
        return Err(FsError::IntoItself(from.to_path_buf()));
    }
    Ok(())
}

fn copy_recursive(from: &Path, to: &Path) -> Result<(), FsError> {
    if from.is_file() {
        fs::copy(from, to).map_err(io_error(from))?;
        return Ok(());
    }
    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_error(entry.path()))?;
        }
    }
    Ok(())
}

/// Copies a file or directory tree to `to`, which must not exist.
pub fn copy_path(from: &Path, to: &Path) -> Result<(), FsError> {
    check_copy(from, to)?;
    copy_recursive(from, to)
}

/// Moves a file or directory tree to `to`, which must not exist.
///
/// Falls back to copy and delete when a rename is not possible.
pub fn move_path(from: &Path, to: &Path) -> Result<(), FsError> {
    check_copy(from, to)?;
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_recursive(from, to)?;
    delete_path(from)
}

/// The first free `name_copy.ext`, `name_copy2.ext`, ... next to `path`.
pub fn duplicate_name(path: &Path) -> Result<PathBuf, FsError> {
    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| FsError::InvalidName(path.display().to_string()))?;
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|n| {
            let suffix = if n == 1 {
                String::from("_copy")
            } else {
                format!("_copy{n}")
            };
            parent.join(format!("{stem}{suffix}{ext}"))
        })
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| FsError::AlreadyExists(path.to_path_buf()))
}

/// Copies `path` to its [`duplicate_name`] and returns the new path.
pub fn duplicate_path(path: &Path) -> Result<PathBuf, FsError> {
    if !path.exists() {
        return Err(FsError::NotFound(path.to_path_buf()));
    }
    let target = duplicate_name(path)?;
    copy_recursive(path, &target)?;
    Ok(target)
}

/// `path` relative to `root` with forward slashes, or `None` outside the root.
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Every file under `root` with the given extension (case-insensitive), sorted.
pub fn walk_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, FsError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let matches = entry
            .path()
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension));
        if entry.file_type().is_file() && matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
