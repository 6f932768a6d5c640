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

use anyhow::Context;
use clap::Parser;
use lantern_core::logging::init_logger;
use lantern_core::EngineConfig;
use lantern_editor::{Editor, EditorApp};
use lantern_io::project::PROJECT_EXTENSION;
use lantern_io::{ProjectModule, RecentProjects};
use std::path::PathBuf;

/// Lantern Engine level editor.
#[derive(Parser, Debug)]
#[command(name = "lantern-editor", version)]
struct Cli {
    /// The `.lproj` file to open. Defaults to the most recent project.
    project: Option<PathBuf>,

    /// Create a new project with this name instead of opening one.
    #[arg(long, value_name = "NAME", conflicts_with = "project")]
    new: Option<String>,

    /// Where `--new` creates the project.
    #[arg(long, value_name = "DIR", default_value = ".")]
    location: PathBuf,

    /// Engine configuration file (RON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn recent_projects_path() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".lantern"))
        .unwrap_or_default()
        .join("recent_projects.json")
}

fn pick_project_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Lantern project")
        .add_filter("Lantern project", &[PROJECT_EXTENSION])
        .pick_file()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    init_logger(&config.log_filter);

    let recent_path = recent_projects_path();
    let mut recent = RecentProjects::load(&recent_path).unwrap_or_else(|e| {
        log::warn!("Ignoring recent projects list: {e}");
        RecentProjects::default()
    });
    recent.prune_missing();

    let mut projects = ProjectModule::new();
    let project = if let Some(name) = &cli.new {
        projects.create_project(&cli.location, name)?.clone()
    } else {
        let file = cli
            .project
            .clone()
            .or_else(|| recent.latest().map(PathBuf::from))
            .or_else(pick_project_file);
        let Some(file) = file else {
            log::info!("No project selected");
            return Ok(());
        };
        projects
            .open_project(&file)
            .with_context(|| format!("opening {}", file.display()))?
            .clone()
    };

    recent.push(project.file_path());
    if let Err(e) = recent.save(&recent_path) {
        log::warn!("Cannot save recent projects: {e}");
    }

    let title = format!("Lantern Editor - {}", project.project_name);
    let app = EditorApp::new(config, Editor::new(project))?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([1600.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(&title, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("editor window failed: {e}"))
}
