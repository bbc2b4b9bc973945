use image::RgbaImage;

use crate::foundation::core::CanvasSize;

/// Decoration glued to the bottom edge of a slot tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayMark<'a> {
    /// Image scaled to a fraction of the tile side.
    Image(&'a RgbaImage),
    /// Short white text with a hard shadow.
    Text(&'a str),
}

impl OverlayMark<'_> {
    /// `true` for blank text, which draws nothing.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Image(_) => false,
            Self::Text(t) => t.trim().is_empty(),
        }
    }
}

/// Borrowed visual inputs of one composition.
///
/// Slots and overlays are positional; indices past the end of either list are absent.
#[derive(Clone, Debug, Default)]
pub struct CompositionInputs<'a> {
    /// Output size.
    pub canvas: CanvasSize,
    /// Cover-fitted background.
    pub background: Option<&'a RgbaImage>,
    /// Subject images; `None` yields a placeholder tile.
    pub slots: Vec<Option<&'a RgbaImage>>,
    /// Overlay per slot.
    pub overlays: Vec<Option<OverlayMark<'a>>>,
    /// Title text; blank titles are skipped.
    pub title: &'a str,
    /// Logo image.
    pub logo: Option<&'a RgbaImage>,
}

impl<'a> CompositionInputs<'a> {
    /// No images, no title, on a canvas of the given size.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// Set the background.
    pub fn background(mut self, image: &'a RgbaImage) -> Self {
        self.background = Some(image);
        self
    }

    /// Append a slot.
    pub fn slot(mut self, image: Option<&'a RgbaImage>) -> Self {
        self.slots.push(image);
        self
    }

    /// Append an overlay.
    pub fn overlay(mut self, mark: Option<OverlayMark<'a>>) -> Self {
        self.overlays.push(mark);
        self
    }

    /// Set the title.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Set the logo.
    pub fn logo(mut self, image: &'a RgbaImage) -> Self {
        self.logo = Some(image);
        self
    }

    /// Image of slot `i`, if any.
    pub fn slot_image(&self, i: usize) -> Option<&'a RgbaImage> {
        self.slots.get(i).copied().flatten()
    }

    /// Non-blank overlay of slot `i`, if any.
    pub fn overlay_mark(&self, i: usize) -> Option<OverlayMark<'a>> {
        self.overlays
            .get(i)
            .copied()
            .flatten()
            .filter(|m| !m.is_blank())
    }

    /// Number of slots that carry an image.
    pub fn populated_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/inputs.rs"]
mod tests;
