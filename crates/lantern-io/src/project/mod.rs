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

//! Project files (`.lproj`) and the recently opened projects list.

mod config;
mod module;
mod recent;

pub use config::{validate_project_name, ProjectConfig, DEFAULT_START_WORLD, PROJECT_EXTENSION};
pub use module::ProjectModule;
pub use recent::{RecentProjects, MAX_RECENT_PROJECTS};

use std::path::PathBuf;

/// Errors raised by project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The proposed project name is not acceptable.
    #[error("invalid project name: {0}")]
    InvalidName(String),
    /// The project directory already exists.
    #[error("'{0}' already exists")]
    AlreadyExists(PathBuf),
    /// The file is not a `.lproj`.
    #[error("'{0}' is not a project file")]
    NotAProjectFile(PathBuf),
    /// A directory the project refers to is missing.
    #[error("project directory '{0}' is missing")]
    MissingDirectory(PathBuf),
    /// No project is open.
    #[error("no project is loaded")]
    NotLoaded,
    /// Reading or writing failed.
    #[error("'{path}': {source}")]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The project file is not valid JSON or lacks a required key.
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> ProjectError {
    let path = path.into();
    move |source| ProjectError::Io { path, source }
}
