use image::{RgbImage, RgbaImage};
use rayon::prelude::*;

use crate::assets::Overlay;
use crate::compose::config::CompositionConfig;
use crate::compose::engine::compose;
use crate::compose::inputs::CompositionInputs;
use crate::foundation::core::CanvasSize;
use crate::foundation::error::{CollageError, CollageResult};
use crate::layout::SUPPORTED_SLOT_COUNTS;
use crate::text::font::FontResolver;

/// One group of subject images rendered as its own template.
#[derive(Clone, Debug, Default)]
pub struct BatchJob {
    /// Subject images, one per slot.
    pub slots: Vec<RgbaImage>,
    /// Title overriding [`BatchShared::title`].
    pub title: Option<String>,
    /// Config overriding [`BatchShared::config`].
    pub config: Option<CompositionConfig>,
}

/// Inputs every job of a batch has in common.
#[derive(Clone, Debug, Default)]
pub struct BatchShared {
    /// Output size.
    pub canvas: CanvasSize,
    /// Background for every job.
    pub background: Option<RgbaImage>,
    /// Logo for every job.
    pub logo: Option<RgbaImage>,
    /// Overlay per slot index.
    pub overlays: Vec<Option<Overlay>>,
    /// Default title.
    pub title: String,
    /// Default config; `num_slots` is replaced by each job's slot count.
    pub config: CompositionConfig,
}

/// Batch execution knobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// A job must bring between two and four subject images.
pub fn require_populated_slots(job: &BatchJob) -> CollageResult<()> {
    let n = job.slots.len();
    if SUPPORTED_SLOT_COUNTS.contains(&n) {
        return Ok(());
    }
    Err(CollageError::precondition(format!(
        "a group needs 2 to 4 images, got {n}"
    )))
}

/// Render every job in parallel; results come back in job order.
///
/// Per-job failures (including an unmet slot precondition) are reported in that job's entry
/// and do not stop the other jobs. The outer error only covers pool setup.
#[tracing::instrument(skip(shared, jobs, fonts), fields(jobs = jobs.len()))]
pub fn render_batch(
    shared: &BatchShared,
    jobs: &[BatchJob],
    fonts: &FontResolver,
    options: BatchOptions,
) -> CollageResult<Vec<CollageResult<RgbImage>>> {
    let pool = build_thread_pool(options.threads)?;
    let results = pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(i, job)| {
                let out = render_job(shared, job, fonts);
                if let Err(err) = &out {
                    tracing::warn!(job = i + 1, %err, "batch job failed");
                }
                out
            })
            .collect()
    });
    Ok(results)
}

fn render_job(shared: &BatchShared, job: &BatchJob, fonts: &FontResolver) -> CollageResult<RgbImage> {
    require_populated_slots(job)?;
    let config = job
        .config
        .clone()
        .unwrap_or_else(|| shared.config.clone())
        .with_num_slots(job.slots.len());

    let mut inputs = CompositionInputs::new(shared.canvas)
        .title(job.title.as_deref().unwrap_or(&shared.title));
    inputs.background = shared.background.as_ref();
    inputs.logo = shared.logo.as_ref();
    inputs.slots = job.slots.iter().map(Some).collect();
    inputs.overlays = shared
        .overlays
        .iter()
        .map(|o| o.as_ref().map(Overlay::as_mark))
        .collect();

    compose(&inputs, &config, fonts)
}

fn build_thread_pool(threads: Option<usize>) -> CollageResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CollageError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CollageError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/batch.rs"]
mod tests;
