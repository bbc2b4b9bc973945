use super::*;
use crate::compose::inputs::OverlayMark;
use crate::text::font::MemoryFontSource;

fn img(r: u8) -> RgbaImage {
    RgbaImage::from_pixel(8, 8, image::Rgba([r, 0, 0, 255]))
}

fn job(n: usize) -> BatchJob {
    BatchJob {
        slots: (0..n).map(|i| img(100 + i as u8)).collect(),
        ..BatchJob::default()
    }
}

#[test]
fn slot_precondition() {
    for n in [0, 1, 5] {
        let err = require_populated_slots(&job(n)).unwrap_err();
        assert!(matches!(err, CollageError::Precondition(_)), "{n}");
    }
    for n in [2, 3, 4] {
        require_populated_slots(&job(n)).unwrap();
    }
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let fonts = FontResolver::new(MemoryFontSource::new(), None);
    let shared = BatchShared {
        canvas: CanvasSize::new(120, 120),
        ..BatchShared::default()
    };
    let jobs = vec![job(2), job(1), job(4)];
    let results = render_batch(&shared, &jobs, &fonts, BatchOptions { threads: Some(2) }).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(CollageError::Precondition(_))));
    assert!(results[2].is_ok());
}

#[test]
fn batch_matches_sequential_compose() {
    let fonts = FontResolver::new(MemoryFontSource::new(), None);
    let shared = BatchShared {
        canvas: CanvasSize::new(160, 90),
        overlays: vec![Some(Overlay::Image(img(9))), None],
        ..BatchShared::default()
    };
    let jobs = vec![job(3), job(2)];
    let results = render_batch(&shared, &jobs, &fonts, BatchOptions::default()).unwrap();

    for (job, result) in jobs.iter().zip(results) {
        let config = shared.config.clone().with_num_slots(job.slots.len());
        let mut inputs = CompositionInputs::new(shared.canvas);
        inputs.slots = job.slots.iter().map(Some).collect();
        inputs.overlays = vec![Some(OverlayMark::Image(match &shared.overlays[0] {
            Some(Overlay::Image(i)) => i,
            _ => unreachable!(),
        }))];
        let expected = compose(&inputs, &config, &fonts).unwrap();
        assert_eq!(result.unwrap(), expected);
    }
}

#[test]
fn zero_threads_is_rejected() {
    let fonts = FontResolver::new(MemoryFontSource::new(), None);
    let err = render_batch(
        &BatchShared::default(),
        &[],
        &fonts,
        BatchOptions { threads: Some(0) },
    )
    .unwrap_err();
    assert!(matches!(err, CollageError::Validation(_)));
}
