use super::*;

#[test]
fn canvas_validate_rejects_degenerate_sizes() {
    assert!(CanvasSize::new(1080, 1080).validate().is_ok());
    assert!(CanvasSize::new(0, 10).validate().is_err());
    assert!(CanvasSize::new(10, 0).validate().is_err());
    assert!(
        CanvasSize::new(MAX_CANVAS_SIDE + 1, 10)
            .validate()
            .is_err()
    );
}

#[test]
fn premul_scales_color_by_alpha() {
    assert_eq!(Rgba8::rgb(10, 20, 30).premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::new(0, 0, 0, 180).premul(), [0, 0, 0, 180]);
    assert_eq!(Rgba8::new(255, 255, 255, 0).premul(), [0, 0, 0, 0]);
}

#[test]
fn from_premul_bytes_checks_length() {
    assert!(Surface::from_premul_bytes(2, 2, vec![0; 16]).is_ok());
    assert!(Surface::from_premul_bytes(2, 2, vec![0; 15]).is_err());
}

#[test]
fn crop_pads_out_of_bounds_with_transparency() {
    let s = Surface::filled(4, 4, Rgba8::rgb(9, 9, 9));
    let c = s.crop(2, 2, 4, 4);
    assert_eq!(c.width(), 4);
    assert_eq!(c.pixel(0, 0), [9, 9, 9, 255]);
    assert_eq!(c.pixel(1, 1), [9, 9, 9, 255]);
    assert_eq!(c.pixel(2, 2), [0, 0, 0, 0]);
    assert_eq!(c.pixel(3, 0), [0, 0, 0, 0]);
}

#[test]
fn into_rgb_image_drops_alpha() {
    let s = Surface::filled(3, 2, Rgba8::rgb(18, 18, 24));
    let rgb = s.into_rgb_image();
    assert_eq!(rgb.dimensions(), (3, 2));
    assert!(rgb.pixels().all(|p| p.0 == [18, 18, 24]));
}

#[test]
fn rgba_image_roundtrip_keeps_straight_colors() {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, image::Rgba([100, 150, 200, 255]));
    img.put_pixel(1, 0, image::Rgba([1, 2, 3, 0]));
    let s = Surface::from_rgba_image(&img);
    assert_eq!(s.pixel(1, 0), [0, 0, 0, 0]);
    let back = s.to_rgba_image();
    assert_eq!(back.get_pixel(0, 0).0, [100, 150, 200, 255]);
}
