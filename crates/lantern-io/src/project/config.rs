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

use super::ProjectError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension of project files.
pub const PROJECT_EXTENSION: &str = "lproj";

/// Start world of a fresh project; the editor builds a basic world for it.
pub const DEFAULT_START_WORLD: &str = "default";

const MAX_NAME_LEN: usize = 64;
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Contents of a `.lproj` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project root directory.
    pub project_path: PathBuf,
    /// Project name; also the `.lproj` file stem.
    pub project_name: String,
    /// Root of the project's resources.
    pub resources_path: PathBuf,
    /// Per-project configuration directory.
    pub config_path: PathBuf,
    /// Where log files go.
    pub logs_path: PathBuf,
    /// Build output directory.
    pub build_path: PathBuf,
    /// World the editor opens, relative to the resources path.
    pub editor_start_world: String,
    /// World the game opens, relative to the resources path.
    pub game_start_world: String,
}

impl ProjectConfig {
    /// The standard layout for a project named `name` inside `parent`.
    pub fn scaffold(parent: &Path, name: &str) -> Self {
        let project_path = parent.join(name);
        Self {
            resources_path: project_path.join("Resources"),
            config_path: project_path.join("Config"),
            logs_path: project_path.join("Saved").join("Logs"),
            build_path: project_path.join("Build"),
            project_name: name.to_owned(),
            editor_start_world: DEFAULT_START_WORLD.to_owned(),
            game_start_world: DEFAULT_START_WORLD.to_owned(),
            project_path,
        }
    }

    /// `<projectPath>/<projectName>.lproj`.
    pub fn file_path(&self) -> PathBuf {
        self.project_path
            .join(format!("{}.{PROJECT_EXTENSION}", self.project_name))
    }

    /// Absolute path of the editor start world, or `None` for the default world.
    pub fn editor_start_world_path(&self) -> Option<PathBuf> {
        (self.editor_start_world != DEFAULT_START_WORLD)
            .then(|| self.resources_path.join(&self.editor_start_world))
    }

    /// Directories that must exist for the project to open.
    pub fn required_directories(&self) -> [&Path; 3] {
        [&self.project_path, &self.resources_path, &self.config_path]
    }

    /// Parses a `.lproj` document. Every key is required.
    pub fn from_json_str(text: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty JSON form.
    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Checks a proposed project name against the rules and the target directory.
pub fn validate_project_name(name: &str, parent: &Path) -> Result<(), ProjectError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProjectError::InvalidName("name is empty".into()));
    }
    if trimmed.starts_with('.') {
        return Err(ProjectError::InvalidName("name cannot start with '.'".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ProjectError::InvalidName(format!(
            "name is longer than {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(ProjectError::InvalidName(format!(
            "name cannot contain '{c}'"
        )));
    }
    let target = parent.join(trimmed);
    if target.exists() {
        return Err(ProjectError::AlreadyExists(target));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_camel_case_keys() {
        let config = ProjectConfig::scaffold(Path::new("/projects"), "Demo");
        let value: serde_json::Value =
            serde_json::from_str(&config.to_json_string().unwrap()).unwrap();
        for key in [
            "projectPath",
            "projectName",
            "resourcesPath",
            "configPath",
            "logsPath",
            "buildPath",
            "editorStartWorld",
            "gameStartWorld",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["editorStartWorld"], "default");
        assert_eq!(config.file_path(), Path::new("/projects/Demo/Demo.lproj"));
    }

    #[test]
    fn missing_keys_are_rejected() {
        let err = ProjectConfig::from_json_str(r#"{"projectName": "x"}"#).unwrap_err();
        assert!(matches!(err, ProjectError::Json(_)));
    }

    #[test]
    fn default_start_world_has_no_path() {
        let mut config = ProjectConfig::scaffold(Path::new("/p"), "Demo");
        assert!(config.editor_start_world_path().is_none());
        config.editor_start_world = "Worlds/level.lworld".into();
        assert_eq!(
            config.editor_start_world_path().unwrap(),
            Path::new("/p/Demo/Resources/Worlds/level.lworld")
        );
    }

    #[test]
    fn names_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path();
        assert!(validate_project_name("Game", parent).is_ok());
        assert!(validate_project_name("   ", parent).is_err());
        assert!(validate_project_name(".hidden", parent).is_err());
        assert!(validate_project_name(&"x".repeat(65), parent).is_err());
        assert!(validate_project_name(&"x".repeat(64), parent).is_ok());
        for bad in ["a/b", "a\\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            assert!(validate_project_name(bad, parent).is_err(), "{bad} accepted");
        }

        std::fs::create_dir(parent.join("Taken")).unwrap();
        assert!(matches!(
            validate_project_name("Taken", parent),
            Err(ProjectError::AlreadyExists(_))
        ));
    }
}
