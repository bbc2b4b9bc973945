use super::*;

#[test]
fn family_keys_roundtrip() {
    for family in FontFamily::ALL {
        assert_eq!(FontFamily::from_key(family.key()), Some(family));
        assert!(!family.candidates().is_empty());
        assert_eq!(family.scale_factor(), 1.0);
    }
    assert_eq!(FontFamily::from_key("IMPACT"), Some(FontFamily::Impact));
}

#[test]
fn unknown_key_falls_back_to_default_family() {
    assert_eq!(FontFamily::from_key("papyrus"), None);
    assert_eq!(
        FontFamily::from_key_or_default("papyrus"),
        FontFamily::ArialBold
    );
}

#[test]
fn family_deserializes_leniently() {
    let f: FontFamily = serde_json::from_str("\"times\"").unwrap();
    assert_eq!(f, FontFamily::Times);
    let f: FontFamily = serde_json::from_str("\"wingdings\"").unwrap();
    assert_eq!(f, FontFamily::ArialBold);
    assert_eq!(serde_json::to_string(&FontFamily::Comic).unwrap(), "\"comic\"");
}

#[test]
fn garbage_bytes_are_not_a_font() {
    assert!(FontFace::from_bytes(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn missing_everything_degrades_without_panicking() {
    let resolver = FontResolver::new(MemoryFontSource::new(), None);
    let font = resolver.resolve(FontFamily::Impact, 40, 1.5);
    assert!(font.face().is_none());
    assert_eq!(font.origin(), FontOrigin::Missing);
    assert_eq!(font.size_px(), 40.0);
    assert_eq!(font.family(), FontFamily::Impact);
}

#[test]
fn unloadable_candidates_are_skipped() {
    let mut source = MemoryFontSource::new();
    source.insert("impact.ttf", b"broken".to_vec());
    let resolver = FontResolver::new(source, None);
    let font = resolver.resolve_key("impact", 10, 1.0);
    assert_eq!(font.origin(), FontOrigin::Missing);
}

#[test]
fn fs_source_reads_from_priority_root_first() {
    let dir = std::path::PathBuf::from("target").join("font_source_test");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("probe.ttf"), b"abc").unwrap();

    let source = FsFontSource::new(vec![PathBuf::from("/nonexistent-font-root")])
        .with_priority_root(&dir);
    assert_eq!(source.roots()[0], dir);
    assert_eq!(source.load("probe.ttf"), Some(b"abc".to_vec()));
    assert_eq!(source.load("absent.ttf"), None);
}

#[test]
fn system_resolver_is_deterministic() {
    let resolver = FontResolver::system();
    let a = resolver.resolve(FontFamily::ArialBold, 30, 1.0);
    let b = resolver.resolve(FontFamily::ArialBold, 30, 1.0);
    assert_eq!(a.origin(), b.origin());
    assert_eq!(a.size_px(), b.size_px());
    assert_eq!(
        a.face().map(|f| f.family_name().to_string()),
        b.face().map(|f| f.family_name().to_string())
    );
}

fn system_face_bytes() -> Option<Vec<u8>> {
    FontFace::system_fallback().map(|face| face.data().as_ref().clone())
}

#[test]
fn first_loadable_candidate_is_used_at_scaled_size() {
    let Some(bytes) = system_face_bytes() else {
        return;
    };
    let mut source = MemoryFontSource::new();
    source.insert("impact.ttf", b"broken".to_vec());
    source.insert("Impact.ttf", bytes);
    let resolver = FontResolver::new(source, None);

    let font = resolver.resolve(FontFamily::Impact, 40, 1.3);
    assert_eq!(font.origin(), FontOrigin::Family);
    assert_eq!(font.size_px(), 52.0);
    assert_eq!(font.family(), FontFamily::Impact);
    assert!(font.face().is_some());

    // Other families have no candidates in the table.
    let other = resolver.resolve(FontFamily::Times, 40, 1.3);
    assert_eq!(other.origin(), FontOrigin::Missing);
}

#[test]
fn scaled_size_never_rounds_to_zero() {
    let Some(bytes) = system_face_bytes() else {
        return;
    };
    let mut source = MemoryFontSource::new();
    source.insert("Burbank.ttf", bytes);
    let resolver = FontResolver::new(source, None);
    assert_eq!(resolver.resolve(FontFamily::Burbank, 10, 1.25).size_px(), 13.0);
    assert_eq!(resolver.resolve(FontFamily::Burbank, 1, 0.1).size_px(), 1.0);
}

#[test]
fn fallback_face_keeps_unscaled_size() {
    let Some(fallback) = FontFace::system_fallback() else {
        return;
    };
    let resolver = FontResolver::new(MemoryFontSource::new(), Some(fallback.clone()));
    let font = resolver.resolve(FontFamily::Times, 40, 1.5);
    assert_eq!(font.origin(), FontOrigin::Fallback);
    assert_eq!(font.size_px(), 40.0);
    assert_eq!(
        font.face().map(|f| f.family_name().to_string()),
        Some(fallback.family_name().to_string())
    );
}
