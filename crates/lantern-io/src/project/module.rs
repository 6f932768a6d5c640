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

use super::config::{validate_project_name, ProjectConfig, PROJECT_EXTENSION};
use super::{io_error, ProjectError};
use lantern_core::{Module, ModuleError};
use std::any::Any;
use std::fs;
use std::path::Path;

/// Holds the open project.
#[derive(Debug, Default)]
pub struct ProjectModule {
    config: Option<ProjectConfig>,
}

impl ProjectModule {
    /// A module with no project open.
    pub fn new() -> Self {
        Self::default()
    }

    /// A module with `config` already open.
    pub fn with_config(config: ProjectConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Creates the directory layout and `.lproj` for a new project, and opens it.
    pub fn create_project(
        &mut self,
        parent: &Path,
        name: &str,
    ) -> Result<&ProjectConfig, ProjectError> {
        validate_project_name(name, parent)?;
        let config = ProjectConfig::scaffold(parent, name.trim());
        for dir in [
            &config.project_path,
            &config.resources_path,
            &config.build_path,
            &config.config_path,
            &config.logs_path,
        ] {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        write_config(&config)?;
        log::info!(
            "Created project '{}' at {}",
            config.project_name,
            config.project_path.display()
        );
        Ok(self.config.insert(config))
    }

    /// Opens an existing `.lproj` file.
    pub fn open_project(&mut self, path: &Path) -> Result<&ProjectConfig, ProjectError> {
        if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
            return Err(ProjectError::NotAProjectFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        let config = ProjectConfig::from_json_str(&text)?;
        if let Some(missing) = config.required_directories().into_iter().find(|d| !d.is_dir()) {
            return Err(ProjectError::MissingDirectory(missing.to_path_buf()));
        }
        log::info!("Opened project '{}'", config.project_name);
        Ok(self.config.insert(config))
    }

    /// Writes the open project back to its `.lproj`.
    pub fn save(&self) -> Result<(), ProjectError> {
        write_config(self.config()?)
    }

    /// The open project.
    pub fn config(&self) -> Result<&ProjectConfig, ProjectError> {
        self.config.as_ref().ok_or(ProjectError::NotLoaded)
    }

    /// The open project, mutably.
    pub fn config_mut(&mut self) -> Result<&mut ProjectConfig, ProjectError> {
        self.config.as_mut().ok_or(ProjectError::NotLoaded)
    }

    /// Sets the world the editor opens, relative to the resources path.
    pub fn set_editor_start_world(&mut self, world: impl Into<String>) -> Result<(), ProjectError> {
        self.config_mut()?.editor_start_world = world.into();
        Ok(())
    }

    /// Sets the world the game opens, relative to the resources path.
    pub fn set_game_start_world(&mut self, world: impl Into<String>) -> Result<(), ProjectError> {
        self.config_mut()?.game_start_world = world.into();
        Ok(())
    }

    /// Returns `true` if a project is open.
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// The resources root of the open project.
    pub fn resources_path(&self) -> Option<&Path> {
        self.config.as_ref().map(|c| c.resources_path.as_path())
    }
}

fn write_config(config: &ProjectConfig) -> Result<(), ProjectError> {
    let path = config.file_path();
    fs::write(&path, config.to_json_string()?).map_err(io_error(&path))
}

impl Module for ProjectModule {
    fn name(&self) -> &'static str {
        "project"
    }

    fn startup(&mut self) -> Result<(), ModuleError> {
        match &self.config {
            Some(config) => log::info!("Project '{}' ready", config.project_name),
            None => log::warn!("Starting without a project"),
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ModuleError> {
        if self.is_loaded() {
            self.save().map_err(|e| ModuleError::failed("project", e))?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_scaffolds_directories_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut projects = ProjectModule::new();
        let config = projects.create_project(dir.path(), "Demo").unwrap().clone();

        for sub in ["Resources", "Build", "Config", "Saved", "Saved/Logs"] {
            assert!(dir.path().join("Demo").join(sub).is_dir(), "{sub} missing");
        }
        assert!(config.file_path().is_file());
        assert_eq!(config.editor_start_world, "default");
        assert_eq!(config.game_start_world, "default");
        assert!(projects.is_loaded());
    }

    #[test]
    fn created_project_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let mut created = ProjectModule::new();
        let file = created.create_project(dir.path(), "Demo").unwrap().file_path();
        created.set_editor_start_world("Worlds/a.lworld").unwrap();
        created.save().unwrap();

        let mut opened = ProjectModule::new();
        let config = opened.open_project(&file).unwrap();
        assert_eq!(config.editor_start_world, "Worlds/a.lworld");
        assert_eq!(opened.resources_path(), Some(dir.path().join("Demo/Resources").as_path()));
    }

    #[test]
    fn open_requires_lproj_extension() {
        let mut projects = ProjectModule::new();
        assert!(matches!(
            projects.open_project(Path::new("game.json")),
            Err(ProjectError::NotAProjectFile(_))
        ));
    }

    #[test]
    fn open_requires_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut created = ProjectModule::new();
        let config = created.create_project(dir.path(), "Demo").unwrap().clone();
        fs::remove_dir_all(&config.resources_path).unwrap();

        let mut opened = ProjectModule::new();
        assert!(matches!(
            opened.open_project(&config.file_path()),
            Err(ProjectError::MissingDirectory(p)) if p == config.resources_path
        ));
        assert!(!opened.is_loaded());
    }

    #[test]
    fn setters_need_a_project() {
        let mut projects = ProjectModule::new();
        assert!(matches!(
            projects.set_game_start_world("x"),
            Err(ProjectError::NotLoaded)
        ));
    }
}
