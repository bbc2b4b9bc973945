//! Writing finished rasters to disk.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{ImageFormat, RgbImage};

use crate::foundation::error::{CollageError, CollageResult};

/// JPEG quality used unless told otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// How to write an output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Encoder quality 1-100; only JPEG honors it.
    pub quality: u8,
    /// Replace an existing file instead of picking a free ` (n)` name.
    pub overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            overwrite: false,
        }
    }
}

/// `path` if free, else the first free `stem (n).ext` next to it.
pub fn unique_output_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (1u32..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Encode `img` by the extension of `path` (PNG when there is none) and return the written path.
pub fn save_raster(img: &RgbImage, path: &Path, options: &ExportOptions) -> CollageResult<PathBuf> {
    let format = match path.extension() {
        None => ImageFormat::Png,
        Some(_) => ImageFormat::from_path(path).map_err(|e| {
            CollageError::validation(format!(
                "unsupported output format '{}': {e}",
                path.display()
            ))
        })?,
    };

    let target = if options.overwrite {
        path.to_path_buf()
    } else {
        unique_output_path(path)
    };
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }

    if format == ImageFormat::Jpeg {
        let quality = options.quality.clamp(1, 100);
        let file = std::fs::File::create(&target)
            .with_context(|| format!("create '{}'", target.display()))?;
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(BufWriter::new(file), quality);
        encoder
            .encode_image(img)
            .with_context(|| format!("encode jpeg '{}'", target.display()))?;
    } else {
        img.save_with_format(&target, format)
            .with_context(|| format!("write '{}'", target.display()))?;
    }

    tracing::debug!(path = %target.display(), "wrote image");
    Ok(target)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
