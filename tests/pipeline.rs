use std::{io::Cursor, path::Path, path::PathBuf};

use birbmeme::{MemeConfig, MemeError, MemePaths, MemePipeline, SpriteInstance};
use image::{Rgba, RgbaImage};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "birbmeme_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, img: &RgbaImage) {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

/// Two-variant sheet covering every action/direction row, with a
/// position-dependent pattern so frames are distinguishable.
fn patterned_sheet() -> RgbaImage {
    RgbaImage::from_fn(96, 384, |x, y| {
        Rgba([x as u8, (y % 256) as u8, (x ^ y) as u8, 255])
    })
}

fn classic_config() -> MemeConfig {
    MemeConfig {
        background: "hills.png".to_string(),
        foreground: None,
        birds: vec![SpriteInstance {
            style: "walk_north_2".parse().unwrap(),
            x: 8,
            y: 4,
            size: 48,
            rotate: Some(30.0),
        }],
    }
}

/// Lay out a data root with a config, a background, and sheets for the given
/// subjects.
fn fixture_root(name: &str, subjects: &[i64]) -> (PathBuf, MemePaths) {
    let root = temp_dir(name);
    let paths = MemePaths::from_root(&root);
    for dir in [
        &paths.configs,
        &paths.backgrounds,
        &paths.foregrounds,
        &paths.sprites,
    ] {
        std::fs::create_dir_all(dir).unwrap();
    }

    std::fs::write(
        paths.config_file("classic"),
        serde_json::to_string_pretty(&classic_config()).unwrap(),
    )
    .unwrap();

    let background = RgbaImage::from_pixel(80, 60, Rgba([40, 90, 160, 255]));
    write_png(&paths.backgrounds.join("hills.png"), &background);

    let sheet = patterned_sheet();
    for &raw in subjects {
        let subject = birbmeme::SubjectId::new(raw).unwrap();
        write_png(&paths.sprite_sheet_file(subject), &sheet);
    }

    (root, paths)
}

#[test]
fn render_then_serve_is_byte_identical() {
    let (root, paths) = fixture_root("idempotent", &[42]);
    let pipeline = MemePipeline::new(&paths);

    let first = pipeline.render_or_serve("classic", 42).unwrap();
    assert!(!first.from_cache);
    assert!(!first.bytes.is_empty());
    assert_eq!(first.content_type, "image/png");

    let second = pipeline.render_or_serve("classic", 42).unwrap();
    assert!(second.from_cache);
    assert_eq!(first.bytes, second.bytes);

    let key = pipeline.cache_key("classic", 42).unwrap();
    let artifact_file = paths.artifacts.join(format!("{key}.png"));
    assert_eq!(std::fs::read(artifact_file).unwrap(), first.bytes);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn output_dimensions_match_background() {
    let (root, paths) = fixture_root("dimensions", &[3]);
    let pipeline = MemePipeline::new(&paths);

    let artifact = pipeline.render_or_serve("classic", 3).unwrap();
    let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (80, 60));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn subject_boundaries() {
    let (root, paths) = fixture_root("boundaries", &[0, 9999]);
    let pipeline = MemePipeline::new(&paths);

    assert!(matches!(
        pipeline.render_or_serve("classic", -1),
        Err(MemeError::InvalidSubject(-1))
    ));
    assert!(matches!(
        pipeline.render_or_serve("classic", 10_000),
        Err(MemeError::InvalidSubject(10_000))
    ));

    assert!(pipeline.render_or_serve("classic", 0).is_ok());
    assert!(pipeline.render_or_serve("classic", 9999).is_ok());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_config_fails_without_asset_loads_or_cache_writes() {
    // Bare root: no config record and no asset files anywhere. An errant
    // asset load would surface as ImageLoad instead of MemeNotFound, and the
    // artifact cache directory is created lazily on first write, so it must
    // not exist after a config miss.
    let root = temp_dir("missing_config");
    let paths = MemePaths::from_root(&root);
    std::fs::create_dir_all(&paths.configs).unwrap();
    let pipeline = MemePipeline::new(&paths);

    assert!(matches!(
        pipeline.render_or_serve("does-not-exist", 5),
        Err(MemeError::MemeNotFound(_))
    ));
    assert!(!paths.artifacts.exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn oversized_variant_fails_at_config_load_not_in_rendering() {
    let (root, paths) = fixture_root("huge_variant", &[5]);

    // Large enough that (variant - 1) * 48 would overflow u32 if it ever
    // reached the frame math; it must be rejected while loading the record.
    std::fs::write(
        paths.config_file("classic"),
        r#"{
            "background": "hills.png",
            "birds": [{ "style": "idle_south_89478486", "x": 8, "y": 4, "size": 48 }]
        }"#,
    )
    .unwrap();

    let pipeline = MemePipeline::new(&paths);
    assert!(matches!(
        pipeline.render_or_serve("classic", 5),
        Err(MemeError::ConfigInvalid(_))
    ));
    assert!(!paths.artifacts.exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn invalid_subject_is_rejected_before_config_lookup() {
    let (root, paths) = fixture_root("subject_first", &[]);
    let pipeline = MemePipeline::new(&paths);

    assert!(matches!(
        pipeline.render_or_serve("does-not-exist", -1),
        Err(MemeError::InvalidSubject(-1))
    ));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn stale_artifact_survives_config_edit() {
    let (root, paths) = fixture_root("stale", &[7]);
    let pipeline = MemePipeline::new(&paths);

    let before = pipeline.render_or_serve("classic", 7).unwrap();

    // Repoint the config at a different background. The cache key only sees
    // identifiers, so the old artifact keeps being served.
    let swapped = RgbaImage::from_pixel(80, 60, Rgba([200, 10, 10, 255]));
    write_png(&paths.backgrounds.join("lava.png"), &swapped);
    let mut edited = classic_config();
    edited.background = "lava.png".to_string();
    std::fs::write(
        paths.config_file("classic"),
        serde_json::to_string_pretty(&edited).unwrap(),
    )
    .unwrap();

    let after = pipeline.render_or_serve("classic", 7).unwrap();
    assert!(after.from_cache);
    assert_eq!(before.bytes, after.bytes);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cache_keys_are_collision_free_across_pairs() {
    let (root, paths) = fixture_root("keys", &[]);
    let pipeline = MemePipeline::new(&paths);

    let mut seen = std::collections::HashSet::new();
    for meme_id in ["classic", "other", "a:b"] {
        for subject in [0, 1, 42, 9999] {
            let key = pipeline.cache_key(meme_id, subject).unwrap();
            assert_eq!(key.as_str().len(), 64);
            assert!(seen.insert(key), "collision for ({meme_id}, {subject})");
        }
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn foreground_layer_is_composited_on_top() {
    let (root, paths) = fixture_root("foreground", &[11]);

    // Opaque corner pixel over an otherwise transparent overlay.
    let mut overlay = RgbaImage::from_pixel(80, 60, Rgba([0, 0, 0, 0]));
    overlay.put_pixel(0, 0, Rgba([250, 250, 250, 255]));
    write_png(&paths.foregrounds.join("frame.png"), &overlay);

    let mut config = classic_config();
    config.foreground = Some("frame.png".to_string());
    std::fs::write(
        paths.config_file("classic"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();

    let pipeline = MemePipeline::new(&paths);
    let artifact = pipeline.render_or_serve("classic", 11).unwrap();
    let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(*decoded.get_pixel(0, 0), Rgba([250, 250, 250, 255]));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_sprite_sheet_is_an_image_load_error() {
    let (root, paths) = fixture_root("no_sheet", &[]);
    let pipeline = MemePipeline::new(&paths);

    assert!(matches!(
        pipeline.render_or_serve("classic", 123),
        Err(MemeError::ImageLoad(_))
    ));
    assert!(!paths.artifacts.exists());

    std::fs::remove_dir_all(&root).ok();
}
