use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::assets::pool::{PoolRef, ResourcePool};
use crate::assets::source::AssetSource;
use crate::assets::texture::{Texture, TextureFilter, TextureWrap};
use crate::errors::{EncoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontType {
    #[default]
    Default,
    Italic,
    Bold,
    BoldAndItalic,
}

impl FontType {
    /// File-name suffix of this style's atlas and metrics.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            FontType::Default => "",
            FontType::Italic => "_i",
            FontType::Bold => "_b",
            FontType::BoldAndItalic => "_bi",
        }
    }
}

/// Placement of one glyph inside the font atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterData {
    pub start_u: f32,
    pub start_v: f32,
    pub end_u: f32,
    pub end_v: f32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub advance_x: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct FontMetrics {
    font_size: u32,
    characters: Vec<CharacterData>,
}

/// A bitmap font: glyph atlas plus per-character metrics.
#[derive(Debug, Clone)]
pub struct Font {
    texture: Texture,
    characters: Vec<CharacterData>,
    font_size: u32,
}

impl Font {
    /// Loads `<name><suffix>.png` and `<name><suffix>.json` from `source`.
    pub fn load(source: &dyn AssetSource, name: &str, font_type: FontType) -> Result<Self> {
        let stem = format!("{name}{}", font_type.suffix());
        let atlas_path = PathBuf::from(format!("{stem}.png"));
        let metrics_path = PathBuf::from(format!("{stem}.json"));

        let atlas = source.read(&atlas_path)?;
        let texture = Texture::decode(&stem, &atlas, TextureFilter::Linear, TextureWrap::ClampToEdge)?;

        let metrics = source.read(&metrics_path)?;
        let metrics: FontMetrics = serde_json::from_slice(&metrics).map_err(|err| EncoError::ResourceLoad {
            path: metrics_path,
            reason: err.to_string(),
        })?;

        Ok(Self {
            texture,
            characters: metrics.characters,
            font_size: metrics.font_size,
        })
    }

    #[must_use]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Metrics of the glyph at `index` (the character code).
    #[must_use]
    pub fn character_data(&self, index: usize) -> Option<&CharacterData> {
        self.characters.get(index)
    }

    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }
}

/// Fonts memoized by (name, style).
pub struct FontPool {
    source: Rc<dyn AssetSource>,
    pool: ResourcePool<(String, FontType), Font>,
}

impl FontPool {
    pub fn new(source: Rc<dyn AssetSource>) -> Self {
        Self {
            source,
            pool: ResourcePool::new(),
        }
    }

    pub fn get_font(&mut self, name: &str, font_type: FontType) -> Result<PoolRef<Font>> {
        let source = self.source.as_ref();
        self.pool
            .get_or_load((name.to_string(), font_type), |(name, font_type)| {
                Font::load(source, name, *font_type)
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
