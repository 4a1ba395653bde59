use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::assets::pool::{PoolRef, ResourcePool};
use crate::assets::source::AssetSource;
use crate::errors::{EncoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
    MipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureWrap {
    Clamp,
    #[default]
    Repeat,
    ClampToEdge,
}

/// Decoded RGBA8 image plus its sampling state.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Decodes an encoded image (PNG) into RGBA8.
    pub fn decode(name: &str, bytes: &[u8], filter: TextureFilter, wrap: TextureWrap) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|err| EncoError::ResourceLoad {
                path: PathBuf::from(name),
                reason: err.to_string(),
            })?
            .to_rgba8();

        Ok(Self {
            name: name.to_string(),
            width: image.width(),
            height: image.height(),
            filter,
            wrap,
            pixels: image.into_raw(),
        })
    }

    /// RGBA value at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels.get(i..i + 4).and_then(|p| p.try_into().ok())
    }
}

/// Identifies one pooled texture. The same file sampled differently is a
/// different texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub name: String,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
}

/// Textures memoized by (name, filter, wrap).
pub struct TexturePool {
    source: Rc<dyn AssetSource>,
    pool: ResourcePool<TextureKey, Texture>,
}

impl TexturePool {
    pub fn new(source: Rc<dyn AssetSource>) -> Self {
        Self {
            source,
            pool: ResourcePool::new(),
        }
    }

    pub fn get_texture(&mut self, name: &str, filter: TextureFilter, wrap: TextureWrap) -> Result<PoolRef<Texture>> {
        let key = TextureKey {
            name: name.to_string(),
            filter,
            wrap,
        };
        let source = &self.source;
        self.pool.get_or_load(key, |key| {
            let bytes = source.read(Path::new(&key.name))?;
            Texture::decode(&key.name, &bytes, key.filter, key.wrap)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn release(&mut self) {
        self.pool.release();
    }
}
