//! Resource Pool Tests
//!
//! Tests for:
//! - ResourcePool: memoization, distinct keys, release invalidation
//! - TexturePool: PNG decoding through an AssetSource, (name, filter, wrap) keys
//! - FontPool: atlas + JSON metrics, (name, style) keys
//! - Load failures surface as ResourceLoad and cache nothing

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use image::{ImageFormat, Rgba, RgbaImage};

use enco::assets::{
    AssetSource, FileSystemSource, FontPool, FontType, MemorySource, ResourcePool, TextureFilter, TexturePool,
    TextureWrap,
};
use enco::errors::EncoError;

// ============================================================================
// Helpers
// ============================================================================

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

fn memory_source() -> Rc<dyn AssetSource> {
    let mut source = MemorySource::new();
    source.insert("red.png", png_bytes(4, 2, [255, 0, 0, 255]));
    source.insert("blue.png", png_bytes(1, 1, [0, 0, 255, 255]));
    source.insert("broken.png", b"definitely not a png".to_vec());

    source.insert("mono.png", png_bytes(16, 16, [255, 255, 255, 255]));
    source.insert(
        "mono.json",
        br#"{
            "font_size": 12,
            "characters": [
                { "start_u": 0.0, "start_v": 0.0, "end_u": 0.5, "end_v": 0.5,
                  "offset_x": 0, "offset_y": -2, "advance_x": 7, "width": 6, "height": 9 }
            ]
        }"#
        .to_vec(),
    );
    source.insert("mono_b.png", png_bytes(16, 16, [255, 255, 255, 255]));
    source.insert("mono_b.json", br#"{ "font_size": 14, "characters": [] }"#.to_vec());
    Rc::new(source)
}

// ============================================================================
// ResourcePool
// ============================================================================

#[test]
fn pool_loads_each_key_once() {
    let loads = Cell::new(0);
    let mut pool: ResourcePool<String, String> = ResourcePool::new();

    let first = pool
        .get_or_load("a".to_string(), |key| {
            loads.set(loads.get() + 1);
            Ok(key.to_uppercase())
        })
        .unwrap();
    let second = pool
        .get_or_load("a".to_string(), |_| {
            loads.set(loads.get() + 1);
            Ok("unused".to_string())
        })
        .unwrap();

    assert_eq!(loads.get(), 1);
    assert!(first.ptr_eq(&second));
    assert_eq!(first.get().as_deref().map(String::as_str), Some("A"));
}

#[test]
fn pool_distinct_keys_are_distinct_instances() {
    let mut pool: ResourcePool<u32, u32> = ResourcePool::new();
    let a = pool.get_or_load(1, |k| Ok(*k)).unwrap();
    let b = pool.get_or_load(2, |k| Ok(*k)).unwrap();

    assert!(!a.ptr_eq(&b));
    assert_eq!(pool.len(), 2);
}

#[test]
fn pool_release_invalidates_references() {
    let mut pool: ResourcePool<u32, u32> = ResourcePool::new();
    let reference = pool.get_or_load(1, |k| Ok(*k)).unwrap();
    assert!(reference.is_valid());

    pool.release();

    assert!(pool.is_empty());
    assert!(!reference.is_valid());
    assert!(reference.get().is_none());

    // Reloads after release
    let again = pool.get_or_load(1, |k| Ok(*k + 1)).unwrap();
    assert_eq!(again.get().map(|v| *v), Some(2));
}

// ============================================================================
// TexturePool
// ============================================================================

#[test]
fn texture_pool_decodes_png() {
    let mut textures = TexturePool::new(memory_source());
    let red = textures
        .get_texture("red.png", TextureFilter::Linear, TextureWrap::Repeat)
        .unwrap();

    let texture = red.get().unwrap();
    assert_eq!((texture.width, texture.height), (4, 2));
    assert_eq!(texture.pixel(3, 1), Some([255, 0, 0, 255]));
    assert_eq!(texture.pixel(4, 0), None);
}

#[test]
fn texture_pool_keys_include_sampling_state() {
    let mut textures = TexturePool::new(memory_source());
    let a = textures
        .get_texture("blue.png", TextureFilter::Linear, TextureWrap::Repeat)
        .unwrap();
    let b = textures
        .get_texture("blue.png", TextureFilter::Linear, TextureWrap::Repeat)
        .unwrap();
    let c = textures
        .get_texture("blue.png", TextureFilter::Nearest, TextureWrap::Repeat)
        .unwrap();
    let d = textures
        .get_texture("blue.png", TextureFilter::Linear, TextureWrap::ClampToEdge)
        .unwrap();

    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));
    assert!(!a.ptr_eq(&d));
    assert_eq!(textures.len(), 3);
}

#[test]
fn texture_load_failures_are_recoverable() {
    let mut textures = TexturePool::new(memory_source());

    let missing = textures.get_texture("nope.png", TextureFilter::Linear, TextureWrap::Repeat);
    assert!(matches!(missing, Err(EncoError::ResourceLoad { .. })));

    let broken = textures.get_texture("broken.png", TextureFilter::Linear, TextureWrap::Repeat);
    assert!(matches!(broken, Err(EncoError::ResourceLoad { .. })));

    assert!(textures.is_empty());
}

#[test]
fn undecodable_texture_reports_its_name() {
    let mut textures = TexturePool::new(memory_source());
    let err = textures
        .get_texture("broken.png", TextureFilter::Nearest, TextureWrap::Clamp)
        .unwrap_err();
    match err {
        EncoError::ResourceLoad { path, reason } => {
            assert_eq!(path, std::path::Path::new("broken.png"));
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_system_source_reports_full_path() {
    let source = FileSystemSource::new("does-not-exist");
    let err = source.read(std::path::Path::new("tex.png")).unwrap_err();
    match err {
        EncoError::ResourceLoad { path, .. } => assert!(path.ends_with("tex.png")),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// FontPool
// ============================================================================

#[test]
fn font_pool_loads_atlas_and_metrics() {
    let mut fonts = FontPool::new(memory_source());
    let mono = fonts.get_font("mono", FontType::Default).unwrap();

    let font = mono.get().unwrap();
    assert_eq!(font.font_size(), 12);
    assert_eq!(font.texture().width, 16);
    let glyph = font.character_data(0).unwrap();
    assert_eq!(glyph.advance_x, 7);
    assert_eq!(glyph.offset_y, -2);
    assert!(font.character_data(1).is_none());
}

#[test]
fn font_pool_keys_include_style() {
    let mut fonts = FontPool::new(memory_source());
    let regular = fonts.get_font("mono", FontType::Default).unwrap();
    let bold = fonts.get_font("mono", FontType::Bold).unwrap();
    let regular_again = fonts.get_font("mono", FontType::Default).unwrap();

    assert!(regular.ptr_eq(&regular_again));
    assert!(!regular.ptr_eq(&bold));
    assert_eq!(bold.get().unwrap().font_size(), 14);

    // No italic variant shipped
    assert!(fonts.get_font("mono", FontType::Italic).is_err());
    assert_eq!(fonts.len(), 2);

    fonts.release();
    assert!(!bold.is_valid());
}
