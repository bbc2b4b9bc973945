use super::*;

#[test]
fn sigma_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = gaussian_blur(&src, 1, 2, 4, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = gaussian_blur(&src, w, h, 4, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(4 * w + 4) as usize] = 255;

    let out = gaussian_blur(&src, w, h, 1, 1.0).unwrap();

    let nonzero = out.iter().filter(|&&a| a != 0).count();
    assert!(nonzero > 1);

    let sum: u32 = out.iter().map(|&a| u32::from(a)).sum();
    assert!((sum as i32 - 255).abs() <= 8);
}

#[test]
fn rejects_mismatched_length() {
    assert!(gaussian_blur(&[0u8; 3], 2, 2, 1, 1.0).is_err());
    assert!(gaussian_blur(&[], 0, 0, 0, 1.0).is_err());
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(10.0), 30);
    assert_eq!(radius_for_sigma(0.5), 2);
}
