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

//! Shader resources: WGSL text or precompiled SPIR-V.

use super::ResourceError;
use lantern_core::AssetId;
use std::fs;
use std::path::{Path, PathBuf};

/// First word of every SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Pipeline stage a shader file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `.vert`
    Vertex,
    /// `.frag`
    Fragment,
    /// `.comp`
    Compute,
    /// A `.wgsl` module holding several entry points.
    Combined,
}

impl ShaderStage {
    /// Infers the stage from a file name. `name.vert.spv` counts as `.vert`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mut ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == "spv" {
            ext = Path::new(path.file_stem()?)
                .extension()?
                .to_str()?
                .to_ascii_lowercase();
        }
        match ext.as_str() {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            "comp" => Some(ShaderStage::Compute),
            "wgsl" => Some(ShaderStage::Combined),
            _ => None,
        }
    }
}

/// Shader code as handed to the GPU backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// WGSL source text.
    Wgsl(String),
    /// SPIR-V words.
    SpirV(Vec<u32>),
}

/// A loaded shader.
#[derive(Debug, Clone)]
pub struct RShader {
    /// Asset id derived from [`RShader::path`].
    pub id: AssetId,
    /// Path relative to the resources root.
    pub path: String,
    /// Stage inferred from the extension.
    pub stage: ShaderStage,
    /// The code.
    pub source: ShaderSource,
}

/// Reads shader files and recognizes their encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderLoader;

impl ShaderLoader {
    /// Reads a shader file and detects its stage and encoding.
    pub fn load(&self, path: &Path) -> Result<(ShaderStage, ShaderSource), ResourceError> {
        let stage = ShaderStage::from_path(path)
            .ok_or_else(|| ResourceError::Unsupported(path.to_path_buf()))?;
        let bytes = fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = self.decode(path, &bytes)?;
        Ok((stage, source))
    }

    /// Decodes shader bytes. SPIR-V is recognized by its magic number.
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<ShaderSource, ResourceError> {
        if is_spirv(bytes) {
            if bytes.len() % 4 != 0 {
                return Err(ResourceError::Invalid {
                    path: PathBuf::from(path),
                    reason: format!("SPIR-V length {} is not a multiple of 4", bytes.len()),
                });
            }
            let words = bytes
                .chunks_exact(4)
                .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
                .collect();
            return Ok(ShaderSource::SpirV(words));
        }
        if ShaderStage::from_path(path) != Some(ShaderStage::Combined) {
            return Err(ResourceError::Invalid {
                path: PathBuf::from(path),
                reason: "expected compiled SPIR-V".to_owned(),
            });
        }
        String::from_utf8(bytes.to_vec())
            .map(ShaderSource::Wgsl)
            .map_err(|e| ResourceError::Invalid {
                path: PathBuf::from(path),
                reason: e.to_string(),
            })
    }
}

fn is_spirv(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) == SPIRV_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spirv_header() -> Vec<u8> {
        [SPIRV_MAGIC, 0x0001_0000, 0, 1, 0]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect()
    }

    #[test]
    fn stage_follows_the_extension() {
        assert_eq!(ShaderStage::from_path(Path::new("a.vert")), Some(ShaderStage::Vertex));
        assert_eq!(ShaderStage::from_path(Path::new("a.FRAG")), Some(ShaderStage::Fragment));
        assert_eq!(ShaderStage::from_path(Path::new("a.comp.spv")), Some(ShaderStage::Compute));
        assert_eq!(ShaderStage::from_path(Path::new("a.wgsl")), Some(ShaderStage::Combined));
        assert_eq!(ShaderStage::from_path(Path::new("a.glsl")), None);
    }

    #[test]
    fn spirv_is_detected_by_magic() {
        let source = ShaderLoader.decode(Path::new("x.vert"), &spirv_header()).unwrap();
        match source {
            ShaderSource::SpirV(words) => {
                assert_eq!(words[0], SPIRV_MAGIC);
                assert_eq!(words.len(), 5);
            }
            other => panic!("expected SPIR-V, got {other:?}"),
        }
    }

    #[test]
    fn truncated_spirv_is_rejected() {
        let mut bytes = spirv_header();
        bytes.pop();
        assert!(matches!(
            ShaderLoader.decode(Path::new("x.frag"), &bytes),
            Err(ResourceError::Invalid { .. })
        ));
    }

    #[test]
    fn wgsl_is_read_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.wgsl");
        std::fs::write(&path, "@vertex fn vs_main() {}").unwrap();
        let (stage, source) = ShaderLoader.load(&path).unwrap();
        assert_eq!(stage, ShaderStage::Combined);
        assert_eq!(source, ShaderSource::Wgsl("@vertex fn vs_main() {}".into()));
    }

    #[test]
    fn glsl_text_in_a_stage_file_is_rejected() {
        assert!(ShaderLoader
            .decode(Path::new("x.vert"), b"#version 450\nvoid main() {}")
            .is_err());
    }
}
