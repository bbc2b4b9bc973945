//! Decoding of caller-supplied images and overlay arguments.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

use crate::compose::inputs::OverlayMark;
use crate::foundation::error::{CollageError, CollageResult};

/// Decode encoded image bytes (any format the `image` crate knows) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> CollageResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> CollageResult<RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| CollageError::asset(format!("{}: {e}", path.display())))
}

/// Overlay as given on the command line: an image file or literal text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlaySource {
    /// Path to an existing file.
    Image(PathBuf),
    /// Text drawn verbatim.
    Text(String),
}

impl OverlaySource {
    /// An argument naming an existing file is an image; any other non-blank string is text.
    pub fn parse(arg: &str) -> Option<Self> {
        if arg.trim().is_empty() {
            return None;
        }
        let path = Path::new(arg);
        if path.is_file() {
            Some(Self::Image(path.to_path_buf()))
        } else {
            Some(Self::Text(arg.to_string()))
        }
    }

    /// Decode image overlays; text passes through.
    pub fn load(&self) -> CollageResult<Overlay> {
        match self {
            Self::Image(path) => Ok(Overlay::Image(load_image(path)?)),
            Self::Text(text) => Ok(Overlay::Text(text.clone())),
        }
    }
}

/// Owned, decoded overlay.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    /// Decoded image.
    Image(RgbaImage),
    /// Literal text.
    Text(String),
}

impl Overlay {
    /// Borrow as a composition input.
    pub fn as_mark(&self) -> OverlayMark<'_> {
        match self {
            Self::Image(img) => OverlayMark::Image(img),
            Self::Text(text) => OverlayMark::Text(text),
        }
    }
}

/// File-name prefix of the bundled reaction overlays.
pub const DEFAULT_OVERLAY_PREFIX: &str = "fc_reaccion";

/// Decode every `<prefix>*.png` in `dir`, sorted by file name, as image overlays.
///
/// A missing directory yields no overlays; files that fail to decode are skipped with a
/// warning.
pub fn load_overlay_dir(dir: &Path, prefix: &str) -> CollageResult<Vec<Overlay>> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "overlay directory not found");
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list overlays in '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("list overlays in '{}'", dir.display()))?
            .path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(".png") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut overlays = Vec::with_capacity(paths.len());
    for path in paths {
        match load_image(&path) {
            Ok(img) => overlays.push(Overlay::Image(img)),
            Err(err) => tracing::warn!(%err, "skipping overlay"),
        }
    }
    Ok(overlays)
}

#[cfg(test)]
#[path = "../tests/unit/assets.rs"]
mod tests;
