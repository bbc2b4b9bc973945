use super::*;

#[test]
fn populated_slots_counts_present_images() {
    let img = RgbaImage::new(2, 2);
    let inputs = CompositionInputs::new(CanvasSize::new(10, 10))
        .slot(Some(&img))
        .slot(None)
        .slot(Some(&img));
    assert_eq!(inputs.populated_slots(), 2);
    assert_eq!(CompositionInputs::new(CanvasSize::new(10, 10)).populated_slots(), 0);
}

#[test]
fn out_of_range_and_blank_entries_are_absent() {
    let inputs = CompositionInputs::new(CanvasSize::new(10, 10))
        .overlay(Some(OverlayMark::Text("  ")))
        .overlay(Some(OverlayMark::Text("ok")));
    assert!(inputs.slot_image(5).is_none());
    assert!(inputs.overlay_mark(0).is_none());
    assert!(matches!(inputs.overlay_mark(1), Some(OverlayMark::Text("ok"))));
    assert!(inputs.overlay_mark(2).is_none());
}
