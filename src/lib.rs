//! Collage renders image templates: a background, a title, two to four shaped photo slots with
//! overlay marks, and a logo, layered into one fixed-size raster.
//!
//! # Pipeline overview
//!
//! 1. **Fill**: solid default color, or a cover-fitted background image.
//! 2. **Title**: centered near the top, decorated with a [`TitleStyle`] preset.
//! 3. **Tiles**: every slot is shape-masked (or replaced by a placeholder) and pasted over a
//!    blurred drop shadow at its [`positions_for`] placement.
//! 4. **Overlays**: drawn only after all tiles, glued to each tile's bottom edge.
//! 5. **Logo**: scaled down to fit, never up, and centered on its anchor.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce byte-identical rasters.
//! - **No IO in the engine**: [`compose`] only reads borrowed, already-decoded images; file
//!   access lives in [`load_image`] and [`save_raster`].
//! - **Premultiplied RGBA8** internally: every imaging helper works on [`Surface`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod export;
mod foundation;
mod imaging;
mod layout;
mod text;

pub use assets::{
    DEFAULT_OVERLAY_PREFIX, Overlay, OverlaySource, decode_image, load_image, load_overlay_dir,
};
pub use compose::batch::{
    BatchJob, BatchOptions, BatchShared, render_batch, require_populated_slots,
};
pub use compose::config::{
    CORNER_RADIUS, CompositionConfig, DEFAULT_BACKGROUND, LogoPlacement,
    OVERLAY_TEXT_REFERENCE_SIZE, OVERLAY_TEXT_SHADOW_OFFSET, PLACEHOLDER_FILL, PLACEHOLDER_GLYPH,
    PLACEHOLDER_GLYPH_COLOR, PLACEHOLDER_GLYPH_SIZE, TITLE_COLOR, TITLE_SIZE, TITLE_TOP,
};
pub use compose::engine::compose;
pub use compose::inputs::{CompositionInputs, OverlayMark};
pub use export::{DEFAULT_JPEG_QUALITY, ExportOptions, save_raster, unique_output_path};
pub use foundation::core::{CanvasSize, MAX_CANVAS_SIDE, Rgba8, Surface};
pub use foundation::error::{CollageError, CollageResult};
pub use imaging::blur::{gaussian_blur, radius_for_sigma};
pub use imaging::composite::{PremulRgba8, over, paste, stamp_coverage};
pub use imaging::cover::{apply_cover_background, fit_cover};
pub use imaging::resize::resize_exact;
pub use imaging::shadow::{DropShadow, paste_with_shadow};
pub use imaging::shape::{ImageShape, apply_shape, pad_to_square, shape_mask};
pub use layout::{SUPPORTED_SLOT_COUNTS, SlotPlacement, SlotRect, positions_for};
pub use text::font::{
    Font, FontFace, FontFamily, FontOrigin, FontResolver, FontSource, FsFontSource,
    MemoryFontSource,
};
pub use text::layout::{InkBounds, TextLayoutEngine, TextMask, TextMetrics};
pub use text::styled::{
    OutlineStyle, SHADOW_COLOR, ShadowStyle, TextStyle, TitleStyle, draw_styled_mask,
    draw_styled_text,
};
