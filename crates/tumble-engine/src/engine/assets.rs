use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};

use crate::geometry::CUBE_VERTICES;

pub const VERTEX_SHADER_FILE: &str = "shader.v.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "shader.f.wgsl";
pub const TEXTURE_FILE: &str = "texture.png";

/// Inputs the engine loads at start: one shader pair, one texture, one mesh.
#[derive(Debug, Clone)]
pub struct EngineAssets {
    pub vertex_source: Cow<'static, str>,
    pub fragment_source: Cow<'static, str>,
    /// Encoded image bytes (PNG or JPEG).
    pub texture_bytes: Cow<'static, [u8]>,
    /// Interleaved position/texcoord/normal floats.
    pub geometry: &'static [f32],
}

impl EngineAssets {
    /// Shaders, texture and cube compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            vertex_source: Cow::Borrowed(include_str!("../../assets/shader.v.wgsl")),
            fragment_source: Cow::Borrowed(include_str!("../../assets/shader.f.wgsl")),
            texture_bytes: Cow::Borrowed(include_bytes!("../../assets/texture.png")),
            geometry: &CUBE_VERTICES,
        }
    }

    /// Loads `shader.v.wgsl`, `shader.f.wgsl` and `texture.png` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read_text = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
        };

        let vertex_source = read_text(VERTEX_SHADER_FILE)?;
        let fragment_source = read_text(FRAGMENT_SHADER_FILE)?;

        let texture_path = dir.join(TEXTURE_FILE);
        let texture_bytes = std::fs::read(&texture_path)
            .with_context(|| format!("failed to read {}", texture_path.display()))?;

        log::debug!("loaded assets from {}", dir.display());

        Ok(Self {
            vertex_source: Cow::Owned(vertex_source),
            fragment_source: Cow::Owned(fragment_source),
            texture_bytes: Cow::Owned(texture_bytes),
            geometry: &CUBE_VERTICES,
        })
    }

    /// Replaces the texture with the contents of `path`.
    pub fn with_texture_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read texture {}", path.display()))?;
        self.texture_bytes = Cow::Owned(bytes);
        Ok(self)
    }
}

impl Default for EngineAssets {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("tumble-assets-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn builtin_assets_are_populated() {
        let a = EngineAssets::builtin();
        assert!(a.vertex_source.contains("@vertex"));
        assert!(a.fragment_source.contains("@fragment"));
        assert!(a.texture_bytes.starts_with(b"\x89PNG"));
        assert_eq!(a.geometry.len(), 288);
    }

    #[test]
    fn from_dir_reads_all_three_files() {
        let dir = scratch_dir("full");
        std::fs::write(dir.join(VERTEX_SHADER_FILE), "vs").unwrap();
        std::fs::write(dir.join(FRAGMENT_SHADER_FILE), "fs").unwrap();
        std::fs::write(dir.join(TEXTURE_FILE), [1u8, 2, 3]).unwrap();

        let a = EngineAssets::from_dir(&dir).unwrap();
        assert_eq!(a.vertex_source, "vs");
        assert_eq!(a.fragment_source, "fs");
        assert_eq!(&*a.texture_bytes, &[1, 2, 3]);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn from_dir_names_the_missing_file() {
        let dir = scratch_dir("missing");
        std::fs::write(dir.join(VERTEX_SHADER_FILE), "vs").unwrap();

        let err = EngineAssets::from_dir(&dir).unwrap_err();
        assert!(format!("{err:#}").contains(FRAGMENT_SHADER_FILE));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn texture_override() {
        let dir = scratch_dir("override");
        let path = dir.join("other.jpg");
        std::fs::write(&path, [9u8; 4]).unwrap();

        let a = EngineAssets::builtin().with_texture_file(&path).unwrap();
        assert_eq!(&*a.texture_bytes, &[9; 4]);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
