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

use super::{io_error, ProjectError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How many projects the list remembers.
pub const MAX_RECENT_PROJECTS: usize = 10;

/// Recently opened `.lproj` files, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProjects {
    recent: Vec<PathBuf>,
}

impl RecentProjects {
    /// Reads the list. A missing file gives an empty list.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the list as `{"recent": [...]}`.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_error(path))
    }

    /// Moves `project` to the front, dropping duplicates and the oldest overflow.
    pub fn push(&mut self, project: impl Into<PathBuf>) {
        let project = project.into();
        self.recent.retain(|p| p != &project);
        self.recent.insert(0, project);
        self.recent.truncate(MAX_RECENT_PROJECTS);
    }

    /// Forgets a project. Returns `true` if it was listed.
    pub fn remove(&mut self, project: &Path) -> bool {
        let before = self.recent.len();
        self.recent.retain(|p| p != project);
        before != self.recent.len()
    }

    /// Drops entries whose file no longer exists. Returns how many were dropped.
    pub fn prune_missing(&mut self) -> usize {
        let before = self.recent.len();
        self.recent.retain(|p| p.is_file());
        before - self.recent.len()
    }

    /// The most recent project.
    pub fn latest(&self) -> Option<&Path> {
        self.recent.first().map(PathBuf::as_path)
    }

    /// Every entry, most recent first.
    pub fn entries(&self) -> &[PathBuf] {
        &self.recent
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}
