use super::*;
use crate::text::layout::TextMetrics;

const BG: Rgba8 = Rgba8::rgb(18, 18, 24);

fn block_mask(w: u32, h: u32) -> TextMask {
    TextMask::from_coverage(
        w,
        h,
        vec![255; (w * h) as usize],
        (0, 0),
        TextMetrics {
            advance: w as f32,
            line_height: h as f32,
        },
    )
    .unwrap()
}

fn is_bg(px: [u8; 4]) -> bool {
    px == BG.premul()
}

#[test]
fn preset_table() {
    let simple = TitleStyle::Simple.text_style();
    assert_eq!(simple.outline, None);
    assert_eq!(simple.shadow, Some(ShadowStyle::new(4, 0.0)));

    let outline = TitleStyle::Outline.text_style();
    assert_eq!(outline.outline.map(|o| o.width), Some(4));
    assert_eq!(outline.shadow, None);

    let soft = TitleStyle::SoftShadow.text_style();
    assert_eq!(soft.shadow, Some(ShadowStyle::new(6, 10.0)));

    let impact = TitleStyle::Impact.text_style();
    assert_eq!(impact.outline.map(|o| o.width), Some(6));
    assert_eq!(impact.shadow.map(|s| s.offset), Some(4));
}

#[test]
fn style_names_and_aliases() {
    for style in TitleStyle::ALL {
        assert_eq!(TitleStyle::from_key(style.key()), Some(style));
    }
    assert_eq!(TitleStyle::from_key("soft_shadow"), Some(TitleStyle::SoftShadow));
    assert_eq!(TitleStyle::from_key("Impact"), Some(TitleStyle::Impact));
    assert_eq!(TitleStyle::from_key_or_default("neon"), TitleStyle::Simple);

    let s: TitleStyle = serde_json::from_str("\"contorno\"").unwrap();
    assert_eq!(s, TitleStyle::Outline);
    let s: TitleStyle = serde_json::from_str("\"glitter\"").unwrap();
    assert_eq!(s, TitleStyle::Simple);
}

#[test]
fn hard_shadow_is_offset_exactly() {
    let mut surface = Surface::filled(40, 40, BG);
    let style = TitleStyle::Simple.text_style();
    draw_styled_mask(&mut surface, &block_mask(10, 10), 10, 10, Rgba8::WHITE, &style).unwrap();

    // Fill on top.
    assert_eq!(surface.pixel(10, 10), [255, 255, 255, 255]);
    assert_eq!(surface.pixel(19, 19), [255, 255, 255, 255]);
    // Shadow exposed exactly 4px right and below the fill.
    let shadow = surface.pixel(23, 23);
    assert!(shadow[0] < BG.r && shadow[3] == 255);
    assert_eq!(surface.pixel(21, 14), shadow);
    assert!(is_bg(surface.pixel(24, 24)));
    assert!(is_bg(surface.pixel(13, 9)));
    assert!(is_bg(surface.pixel(9, 13)));
}

#[test]
fn blurred_shadow_has_soft_edges() {
    let mut surface = Surface::filled(80, 80, BG);
    let style = TitleStyle::SoftShadow.text_style();
    draw_styled_mask(&mut surface, &block_mask(20, 20), 20, 20, Rgba8::WHITE, &style).unwrap();

    // Walking right from the fill along a row inside the shadow, darkness fades gradually.
    let row = 30;
    let mut distinct = Vec::new();
    for x in 40..70 {
        let r = surface.pixel(x, row)[0];
        if r != BG.r && !distinct.contains(&r) {
            distinct.push(r);
        }
    }
    assert!(distinct.len() > 2, "edge gradient {distinct:?}");
    // Light spills past the hard-shadow extent.
    assert!(!is_bg(surface.pixel(20 + 20 + 6 + 3, row)));
}

#[test]
fn blurred_shadow_is_not_clipped_near_surface_origin() {
    let mut surface = Surface::filled(60, 60, BG);
    let style = TextStyle {
        outline: None,
        shadow: Some(ShadowStyle::new(0, 4.0)),
    };
    draw_styled_mask(&mut surface, &block_mask(10, 10), 5, 5, Rgba8::WHITE, &style).unwrap();
    // Falloff reaches above and left of the text box.
    assert!(!is_bg(surface.pixel(3, 10)));
    assert!(!is_bg(surface.pixel(10, 3)));
}

#[test]
fn outline_surrounds_fill() {
    let mut surface = Surface::filled(40, 40, BG);
    let style = TitleStyle::Outline.text_style();
    draw_styled_mask(&mut surface, &block_mask(10, 10), 15, 15, Rgba8::WHITE, &style).unwrap();

    assert_eq!(surface.pixel(15, 15), [255, 255, 255, 255]);
    assert_eq!(surface.pixel(11, 11), [0, 0, 0, 255]);
    assert_eq!(surface.pixel(28, 20), [0, 0, 0, 255]);
    assert!(is_bg(surface.pixel(10, 10)));
    assert!(is_bg(surface.pixel(29, 20)));
}

#[test]
fn impact_layers_shadow_under_outline() {
    let mut surface = Surface::filled(60, 60, BG);
    let style = TitleStyle::Impact.text_style();
    draw_styled_mask(&mut surface, &block_mask(10, 10), 20, 20, Rgba8::WHITE, &style).unwrap();
    // Outline is opaque black where both overlap.
    assert_eq!(surface.pixel(31, 31), [0, 0, 0, 255]);
    // Fill is untouched by either.
    assert_eq!(surface.pixel(25, 25), [255, 255, 255, 255]);
}

#[test]
fn empty_mask_draws_nothing() {
    let mut surface = Surface::filled(10, 10, BG);
    let before = surface.clone();
    let style = TitleStyle::Impact.text_style();
    draw_styled_mask(&mut surface, &TextMask::empty(), 2, 2, Rgba8::WHITE, &style).unwrap();
    assert_eq!(surface, before);
}

fn system_font(size_px: f32) -> Option<Font> {
    let face = crate::text::font::FontFace::system_fallback()?;
    Some(Font::new(
        Some(face),
        size_px,
        crate::text::font::FontFamily::ArialBold,
        crate::text::font::FontOrigin::Fallback,
    ))
}

fn full_pixels(surface: &Surface, color: [u8; 4]) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.pixel(x, y) == color {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn styled_text_layers_hard_shadow_under_fill() {
    let Some(font) = system_font(40.0) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let shadow = ShadowStyle::new(3, 0.0);

    let mut fill_only = Surface::filled(200, 80, BG);
    draw_styled_text(
        &mut fill_only,
        &mut engine,
        "HI",
        (10, 10),
        &font,
        Rgba8::WHITE,
        &TextStyle::default(),
    )
    .unwrap();
    let solid = full_pixels(&fill_only, Rgba8::WHITE.premul());
    assert!(!solid.is_empty());

    let mut shadow_only = Surface::filled(200, 80, BG);
    let style = TextStyle {
        outline: None,
        shadow: Some(shadow),
    };
    draw_styled_text(
        &mut shadow_only,
        &mut engine,
        "HI",
        (10, 10),
        &font,
        Rgba8::TRANSPARENT,
        &style,
    )
    .unwrap();
    // Every fully inked pixel casts a shadow exactly `offset` pixels down and right.
    let shadowed = BG.premul();
    for &(x, y) in &solid {
        let px = shadow_only.pixel(x + 3, y + 3);
        assert!(px[0] < shadowed[0] && px[2] < shadowed[2], "no shadow at {x},{y}");
    }

    let mut both = Surface::filled(200, 80, BG);
    draw_styled_text(&mut both, &mut engine, "HI", (10, 10), &font, Rgba8::WHITE, &style)
        .unwrap();
    for &(x, y) in &solid {
        assert_eq!(both.pixel(x, y), Rgba8::WHITE.premul(), "fill covered at {x},{y}");
    }
}

#[test]
fn styled_text_is_clipped_to_the_surface() {
    let Some(font) = system_font(40.0) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let long = "W".repeat(3000);
    let mut surface = Surface::filled(120, 60, BG);
    draw_styled_text(
        &mut surface,
        &mut engine,
        &long,
        (-50_000, 5),
        &font,
        Rgba8::WHITE,
        &TextStyle::default(),
    )
    .unwrap();
    assert!(!full_pixels(&surface, Rgba8::WHITE.premul()).is_empty());
}
