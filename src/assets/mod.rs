//! Resource Pools
//!
//! Memoizing caches for textures and fonts. Each pool keys its entries by a
//! composite key and loads through an [`AssetSource`]; handing out
//! [`PoolRef`]s keeps ownership inside the pool so [`release`](ResourcePool::release)
//! frees everything at once.

pub mod font;
pub mod pool;
pub mod source;
pub mod texture;

pub use font::{CharacterData, Font, FontPool, FontType};
pub use pool::{PoolRef, ResourcePool};
pub use source::{AssetSource, FileSystemSource, MemorySource};
pub use texture::{Texture, TextureFilter, TextureKey, TexturePool, TextureWrap};
