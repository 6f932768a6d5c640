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

use anyhow::Result;
use lantern_io::fs::{copy_path, create_folder, duplicate_path, walk_files};
use lantern_io::project::DEFAULT_START_WORLD;
use lantern_io::{ProjectModule, RecentProjects, ResourceModule};
use std::sync::Arc;
use tempfile::tempdir;

const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

#[test]
fn create_reopen_and_remember_a_project() -> Result<()> {
    // --- 1. Create a project on disk ---
    let dir = tempdir()?;
    let mut projects = ProjectModule::new();
    let created = projects.create_project(dir.path(), "Demo")?.clone();
    assert_eq!(created.editor_start_world, DEFAULT_START_WORLD);
    for sub in ["Resources", "Build", "Config", "Saved/Logs"] {
        assert!(created.project_path.join(sub).is_dir(), "missing {sub}");
    }

    // --- 2. Change the start world and reopen from the .lproj ---
    projects.set_editor_start_world("Worlds/main.lworld")?;
    projects.save()?;
    let mut reopened = ProjectModule::new();
    let config = reopened.open_project(&created.file_path())?;
    assert_eq!(config.editor_start_world, "Worlds/main.lworld");
    assert_eq!(config.resources_path, created.resources_path);

    // --- 3. Remember it in the recent list ---
    let recent_path = dir.path().join("settings").join("recent.json");
    let mut recent = RecentProjects::load(&recent_path)?;
    assert!(recent.is_empty());
    recent.push(created.file_path());
    recent.save(&recent_path)?;
    let recent = RecentProjects::load(&recent_path)?;
    assert_eq!(recent.latest(), Some(created.file_path().as_path()));
    Ok(())
}

#[test]
fn resources_of_a_project_load_and_cache() -> Result<()> {
    let dir = tempdir()?;
    let config = ProjectModule::new().create_project(dir.path(), "Meshes")?.clone();
    let meshes = create_folder(&config.resources_path, "Meshes")?;
    std::fs::write(meshes.join("tri.obj"), TRIANGLE_OBJ)?;

    let mut resources = ResourceModule::new(&config.resources_path);
    let first = resources.load_mesh("Meshes/tri.obj")?;
    assert_eq!(first.data.triangle_count(), 1);
    let second = resources.load_mesh("Meshes/tri.obj")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn content_operations_inside_resources() -> Result<()> {
    let dir = tempdir()?;
    let config = ProjectModule::new().create_project(dir.path(), "Files")?.clone();
    let root = &config.resources_path;
    let props = create_folder(root, "Props")?;
    std::fs::write(props.join("crate.obj"), TRIANGLE_OBJ)?;

    let copy = duplicate_path(&props.join("crate.obj"))?;
    assert_eq!(copy, props.join("crate_copy.obj"));
    copy_path(&props, &root.join("Backup"))?;

    let found = walk_files(root, "OBJ")?;
    assert_eq!(found.len(), 4);
    assert!(found.contains(&root.join("Backup").join("crate_copy.obj")));
    Ok(())
}
