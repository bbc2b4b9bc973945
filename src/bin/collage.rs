use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use collage::{
    BatchJob, BatchOptions, BatchShared, CanvasSize, CollageError, CompositionConfig,
    CompositionInputs, DEFAULT_JPEG_QUALITY, ExportOptions, FontFamily, FontResolver,
    DEFAULT_OVERLAY_PREFIX, FsFontSource, ImageShape, Overlay, OverlaySource, TitleStyle, compose,
    load_image, load_overlay_dir, render_batch, save_raster,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "collage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one template.
    Render(RenderArgs),
    /// Render one template per group of images, in parallel.
    Batch(BatchArgs),
}

#[derive(clap::Args, Debug)]
struct StyleArgs {
    /// Output size as WxH, or a single number for a square.
    #[arg(long, value_parser = parse_canvas, default_value = "1080x1080")]
    size: CanvasSize,

    /// Background image, cover-fitted to the canvas.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Logo image.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Overlay per slot: an image path or literal text (repeatable, positional).
    #[arg(long = "overlay")]
    overlays: Vec<String>,

    /// Directory of default overlay images filling slots without an --overlay.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// File-name prefix of the PNGs picked from --overlay-dir.
    #[arg(long, default_value = DEFAULT_OVERLAY_PREFIX)]
    overlay_prefix: String,

    /// Title text.
    #[arg(long, default_value = "")]
    title: String,

    /// Composition config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title font family key.
    #[arg(long)]
    font_family: Option<String>,

    /// Title style preset.
    #[arg(long)]
    title_style: Option<String>,

    /// Slot shape: square, rounded or circle.
    #[arg(long)]
    shape: Option<ImageShape>,

    /// Extra font directory searched before the system ones (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Replace existing output files instead of adding a " (n)" suffix.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output image path; the extension picks the format.
    #[arg(long)]
    out: PathBuf,

    /// Subject image per slot (repeatable, positional).
    #[arg(long = "slot")]
    slot_paths: Vec<PathBuf>,

    /// Slot count; defaults to the number of --slot flags.
    #[arg(long = "slots")]
    slot_count: Option<usize>,

    /// Export even when some slots have no image.
    #[arg(long, default_value_t = false)]
    allow_placeholders: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Comma-separated image paths of one group (repeatable).
    #[arg(long = "group", required = true)]
    groups: Vec<String>,

    /// Worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Output file name prefix.
    #[arg(long, default_value = "collage")]
    prefix: String,

    /// Output file extension.
    #[arg(long, default_value = "png")]
    ext: String,

    #[command(flatten)]
    style: StyleArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let slot_count = args.slot_count.unwrap_or(args.slot_paths.len());
    let config = resolve_config(&args.style)?.with_num_slots(slot_count);
    let fonts = font_resolver(&args.style);
    let background = load_optional(args.style.background.as_ref())?;
    let logo = load_optional(args.style.logo.as_ref())?;
    let overlays = load_overlays(&args.style)?;
    let slots = args
        .slot_paths
        .iter()
        .map(|p| load_image(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut inputs = CompositionInputs::new(args.style.size).title(&args.style.title);
    inputs.background = background.as_ref();
    inputs.logo = logo.as_ref();
    inputs.slots = slots.iter().map(Some).collect();
    inputs.overlays = overlays
        .iter()
        .map(|o| o.as_ref().map(Overlay::as_mark))
        .collect();

    let populated = inputs.populated_slots();
    if !args.allow_placeholders && populated < slot_count {
        return Err(CollageError::precondition(format!(
            "{slot_count} slots but only {populated} images; pass --allow-placeholders to export anyway"
        ))
        .into());
    }

    let img = compose(&inputs, &config, &fonts)?;
    let written = save_raster(&img, &args.out, &export_options(&args.style))?;
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let jobs = args
        .groups
        .iter()
        .map(|group| -> anyhow::Result<BatchJob> {
            let slots = group
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| load_image(std::path::Path::new(p)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BatchJob {
                slots,
                ..BatchJob::default()
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let shared = BatchShared {
        canvas: args.style.size,
        background: load_optional(args.style.background.as_ref())?,
        logo: load_optional(args.style.logo.as_ref())?,
        overlays: load_overlays(&args.style)?,
        title: args.style.title.clone(),
        config: resolve_config(&args.style)?,
    };
    let fonts = font_resolver(&args.style);
    let results = render_batch(
        &shared,
        &jobs,
        &fonts,
        BatchOptions {
            threads: args.threads,
        },
    )?;

    let options = export_options(&args.style);
    let mut failed = 0usize;
    for (i, result) in results.into_iter().enumerate() {
        let index = i + 1;
        match result {
            Ok(img) => {
                let path = args
                    .out_dir
                    .join(format!("{}_{index}.{}", args.prefix, args.ext));
                let written = save_raster(&img, &path, &options)?;
                eprintln!("wrote {}", written.display());
            }
            Err(err) => {
                failed += 1;
                eprintln!("group {index} skipped: {err}");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} groups failed", jobs.len());
    }
    Ok(())
}

fn resolve_config(style: &StyleArgs) -> anyhow::Result<CompositionConfig> {
    let mut config = match &style.config {
        Some(path) => CompositionConfig::from_json_path(path)?,
        None => CompositionConfig::default(),
    };
    if let Some(key) = &style.font_family {
        config.font_family = FontFamily::from_key_or_default(key);
    }
    if let Some(key) = &style.title_style {
        config.title_style = TitleStyle::from_key_or_default(key);
    }
    if let Some(shape) = style.shape {
        config.image_shape = shape;
    }
    Ok(config)
}

fn font_resolver(style: &StyleArgs) -> FontResolver {
    let source = style
        .font_dirs
        .iter()
        .rev()
        .fold(FsFontSource::platform_default(), |source, dir| {
            source.with_priority_root(dir.clone())
        });
    FontResolver::with_system_fallback(source)
}

fn load_optional(path: Option<&PathBuf>) -> anyhow::Result<Option<image::RgbaImage>> {
    path.map(|p| load_image(p).with_context(|| format!("load '{}'", p.display())))
        .transpose()
}

fn load_overlays(style: &StyleArgs) -> anyhow::Result<Vec<Option<Overlay>>> {
    let mut overlays = style
        .overlays
        .iter()
        .map(|arg| {
            OverlaySource::parse(arg)
                .map(|source| source.load())
                .transpose()
                .map_err(anyhow::Error::from)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let Some(dir) = &style.overlay_dir else {
        return Ok(overlays);
    };
    // Directory overlays fill the slots that have no explicit one, in file-name order.
    let defaults = load_overlay_dir(dir, &style.overlay_prefix)?;
    if overlays.len() < defaults.len() {
        overlays.resize(defaults.len(), None);
    }
    for (slot, default) in overlays.iter_mut().zip(defaults) {
        if slot.is_none() {
            *slot = Some(default);
        }
    }
    Ok(overlays)
}

fn export_options(style: &StyleArgs) -> ExportOptions {
    ExportOptions {
        quality: style.quality,
        overwrite: style.overwrite,
    }
}

fn parse_canvas(s: &str) -> Result<CanvasSize, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size '{s}': {e}"))
    };
    let size = match s.split_once(['x', 'X']) {
        Some((w, h)) => CanvasSize::new(parse(w)?, parse(h)?),
        None => {
            let side = parse(s)?;
            CanvasSize::new(side, side)
        }
    };
    size.validate().map_err(|e| e.to_string())?;
    Ok(size)
}
