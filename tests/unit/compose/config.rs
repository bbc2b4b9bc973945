use super::*;

#[test]
fn defaults_match_template_defaults() {
    let c = CompositionConfig::default();
    assert_eq!(c.font_family, FontFamily::ArialBold);
    assert_eq!(c.title_style, TitleStyle::Simple);
    assert_eq!(c.image_shape, ImageShape::Rounded);
    assert_eq!(c.logo, LogoPlacement::default());
    assert_eq!(c.emoji_size, 0.45);
    assert_eq!((c.emoji_x_offset, c.emoji_y_offset), (0, 0));
    assert_eq!(c.num_slots, 3);
}

#[test]
fn partial_json_keeps_defaults() {
    let c = CompositionConfig::from_json_str(
        r#"{ "title_style": "impacto", "num_slots": 4, "logo": { "max_width": 0.3 } }"#,
    )
    .unwrap();
    assert_eq!(c.title_style, TitleStyle::Impact);
    assert_eq!(c.num_slots, 4);
    assert_eq!(c.logo.max_width, 0.3);
    assert_eq!(c.logo.center_x, 0.5);
    assert_eq!(c.image_shape, ImageShape::Rounded);
}

#[test]
fn unknown_names_fall_back() {
    let c = CompositionConfig::from_json_str(r#"{ "font_family": "x", "title_style": "y" }"#)
        .unwrap();
    assert_eq!(c.font_family, FontFamily::ArialBold);
    assert_eq!(c.title_style, TitleStyle::Simple);
}

#[test]
fn malformed_json_is_an_error() {
    let err = CompositionConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("parse composition config JSON"));
}

#[test]
fn json_roundtrip_preserves_config() {
    let c = CompositionConfig {
        image_shape: ImageShape::Circle,
        emoji_y_offset: -12,
        ..CompositionConfig::default()
    }
    .with_num_slots(2);
    let s = serde_json::to_string(&c).unwrap();
    assert_eq!(CompositionConfig::from_json_str(&s).unwrap(), c);
}

#[test]
fn overlay_text_size_scales_with_emoji_size() {
    let mut c = CompositionConfig::default();
    assert_eq!(c.overlay_text_px(1080), 86);
    c.emoji_size = 0.9;
    assert_eq!(c.overlay_text_px(1080), 172);
    c.emoji_size = 0.0;
    assert_eq!(c.overlay_text_px(1080), 1);
}
