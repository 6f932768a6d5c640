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

//! Engine configuration and the typed per-module configuration store.

use crate::renderer::RenderConfig;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors raised while reading or writing configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid RON for [`EngineConfig`].
    #[error("invalid engine config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The config could not be serialized.
    #[error("could not serialize engine config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Window creation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    /// Whether the user may resize the window.
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lantern Engine".to_owned(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Audio output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Open an output device at all.
    pub enabled: bool,
    /// Fail engine startup when no device can be opened.
    pub required: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            required: false,
        }
    }
}

/// Top-level engine configuration, stored as RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Renderer settings.
    pub render: RenderConfig,
    /// Audio settings.
    pub audio: AudioConfig,
    /// Fallback `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            audio: AudioConfig::default(),
            log_filter: "info".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Number of frames the CPU may record ahead of the GPU.
    pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

    /// Parses a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Loads a config file, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "No engine config at '{}', using defaults.",
                path.display()
            );
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Writes the config as pretty RON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_ron_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the per-module configuration store from this config.
    pub fn module_configs(&self) -> ModuleConfigRegistry {
        let mut registry = ModuleConfigRegistry::new();
        registry.insert(self.window.clone());
        registry.insert(self.render.clone());
        registry.insert(self.audio.clone());
        registry
    }
}

/// A configuration value a module can be set up from.
pub trait Configurable: Any + Send + Sync + Clone + Default {}

impl<T: Any + Send + Sync + Clone + Default> Configurable for T {}

/// A module whose behaviour is parameterised by a [`Configurable`] value.
pub trait ConfigurableModule {
    /// The configuration type this module reads.
    type Config: Configurable;

    /// Applies the configuration. Called before startup.
    fn apply_config(&mut self, config: &Self::Config);
}

/// A type-keyed store of module configuration values.
#[derive(Default)]
pub struct ModuleConfigRegistry {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ModuleConfigRegistry {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous value of the same type.
    pub fn insert<T: Configurable>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns the stored value of type `T`.
    #[must_use]
    pub fn get<T: Configurable>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Returns the stored value or `T::default()`.
    #[must_use]
    pub fn get_or_default<T: Configurable>(&self) -> T {
        self.get::<T>().cloned().unwrap_or_default()
    }

    /// Applies the matching configuration to a module.
    pub fn apply_config<M: ConfigurableModule>(&self, module: &mut M) {
        let config = self.get_or_default::<M::Config>();
        module.apply_config(&config);
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.render.max_frames_in_flight, EngineConfig::MAX_FRAMES_IN_FLIGHT);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = EngineConfig::from_ron_str(
            r#"(window: (title: "Sandbox", width: 800), log_filter: "debug")"#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Sandbox");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.log_filter, "debug");
        assert!(config.audio.enabled);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        let mut config = EngineConfig::default();
        config.render.vsync = false;
        config.audio.required = true;
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_ron_str("(window: 12"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[derive(Default)]
    struct Volume {
        gain: f32,
    }

    #[derive(Clone, Default)]
    struct VolumeConfig {
        gain: f32,
    }

    impl ConfigurableModule for Volume {
        type Config = VolumeConfig;
        fn apply_config(&mut self, config: &VolumeConfig) {
            self.gain = config.gain;
        }
    }

    #[test]
    fn registry_applies_typed_config() {
        let mut registry = ModuleConfigRegistry::new();
        let mut module = Volume::default();

        registry.apply_config(&mut module);
        assert_eq!(module.gain, 0.0);

        registry.insert(VolumeConfig { gain: 0.75 });
        registry.apply_config(&mut module);
        assert_eq!(module.gain, 0.75);
    }

    #[test]
    fn engine_config_populates_module_store() {
        let registry = EngineConfig::default().module_configs();
        assert_eq!(registry.len(), 3);
        assert!(registry.get::<AudioConfig>().is_some());
    }
}
