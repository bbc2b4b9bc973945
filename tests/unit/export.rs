use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("export_test").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample() -> RgbImage {
    RgbImage::from_pixel(8, 6, image::Rgb([200, 30, 60]))
}

#[test]
fn existing_files_get_numbered_suffixes() {
    let dir = scratch("suffix");
    let opts = ExportOptions::default();
    let first = save_raster(&sample(), &dir.join("out.png"), &opts).unwrap();
    let second = save_raster(&sample(), &dir.join("out.png"), &opts).unwrap();
    let third = save_raster(&sample(), &dir.join("out.png"), &opts).unwrap();
    assert_eq!(first, dir.join("out.png"));
    assert_eq!(second, dir.join("out (1).png"));
    assert_eq!(third, dir.join("out (2).png"));
}

#[test]
fn overwrite_reuses_path() {
    let dir = scratch("overwrite");
    let opts = ExportOptions {
        overwrite: true,
        ..ExportOptions::default()
    };
    save_raster(&sample(), &dir.join("a.png"), &opts).unwrap();
    let again = save_raster(&sample(), &dir.join("a.png"), &opts).unwrap();
    assert_eq!(again, dir.join("a.png"));
    assert!(!dir.join("a (1).png").exists());
}

#[test]
fn png_roundtrip_is_lossless() {
    let dir = scratch("png");
    let path = save_raster(&sample(), &dir.join("x.png"), &ExportOptions::default()).unwrap();
    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back, sample());
}

#[test]
fn jpeg_quality_changes_size() {
    let dir = scratch("jpeg");
    let img = RgbImage::from_fn(64, 64, |x, y| image::Rgb([(x * 4) as u8, (y * 4) as u8, (x ^ y) as u8]));
    let hi = save_raster(
        &img,
        &dir.join("hi.jpg"),
        &ExportOptions {
            quality: 95,
            overwrite: true,
        },
    )
    .unwrap();
    let lo = save_raster(
        &img,
        &dir.join("lo.jpg"),
        &ExportOptions {
            quality: 10,
            overwrite: true,
        },
    )
    .unwrap();
    let size = |p: &Path| std::fs::metadata(p).unwrap().len();
    assert!(size(&hi) > size(&lo));
}

#[test]
fn missing_extension_writes_png_and_creates_parents() {
    let dir = scratch("noext");
    let path = save_raster(&sample(), &dir.join("nested").join("plain"), &ExportOptions::default())
        .unwrap();
    let bytes = std::fs::read(path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = scratch("unknown");
    assert!(save_raster(&sample(), &dir.join("x.notaformat"), &ExportOptions::default()).is_err());
}
