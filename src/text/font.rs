//! Logical font families and their resolution to concrete font faces.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use crate::foundation::error::{CollageError, CollageResult};

/// Closed set of logical font families selectable for titles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    /// Heavy sans-serif; also the family used for placeholders and overlay text.
    #[default]
    ArialBold,
    /// Condensed display face.
    Impact,
    /// Rounded casual face.
    Comic,
    /// Bold serif.
    Times,
    /// Display face popular for thumbnails.
    Burbank,
    /// Geometric sans-serif.
    Montserrat,
}

impl FontFamily {
    /// Every family, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::ArialBold,
        Self::Impact,
        Self::Comic,
        Self::Times,
        Self::Burbank,
        Self::Montserrat,
    ];

    /// Stable configuration key.
    pub fn key(self) -> &'static str {
        match self {
            Self::ArialBold => "arial_bold",
            Self::Impact => "impact",
            Self::Comic => "comic",
            Self::Times => "times",
            Self::Burbank => "burbank",
            Self::Montserrat => "montserrat",
        }
    }

    /// Exact key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|f| f.key().eq_ignore_ascii_case(key))
    }

    /// Key lookup that falls back to the default family for unknown keys.
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::debug!(key, "unknown font family, using default");
            Self::default()
        })
    }

    /// Candidate font files relative to a font root, in priority order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::ArialBold => &[
                "arialbd.ttf",
                "Supplemental/Arial Bold.ttf",
                "Arial Bold.ttf",
                "truetype/liberation/LiberationSans-Bold.ttf",
                "truetype/liberation2/LiberationSans-Bold.ttf",
            ],
            Self::Impact => &[
                "impact.ttf",
                "Impact.ttf",
                "Supplemental/Impact.ttf",
                "truetype/msttcorefonts/Impact.ttf",
            ],
            Self::Comic => &[
                "comicbd.ttf",
                "Comic Sans MS Bold.ttf",
                "Supplemental/Comic Sans MS Bold.ttf",
                "truetype/liberation/LiberationSans-Bold.ttf",
            ],
            Self::Times => &[
                "timesbd.ttf",
                "Times New Roman Bold.ttf",
                "Supplemental/Times New Roman Bold.ttf",
                "truetype/liberation/LiberationSerif-Bold.ttf",
            ],
            Self::Burbank => &["Burbank.ttf", "truetype/Burbank/Burbank.ttf"],
            Self::Montserrat => &[
                "Montserrat-Regular.ttf",
                "truetype/Montserrat/Montserrat-Regular.ttf",
            ],
        }
    }

    /// Size correction applied on top of the requested pixel size.
    pub fn scale_factor(self) -> f32 {
        1.0
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl From<String> for FontFamily {
    fn from(key: String) -> Self {
        Self::from_key_or_default(&key)
    }
}

impl From<FontFamily> for String {
    fn from(family: FontFamily) -> Self {
        family.key().to_string()
    }
}

/// Where font bytes come from.
pub trait FontSource: Send + Sync {
    /// Bytes for a candidate path, or `None` when it does not exist or cannot be read.
    fn load(&self, candidate: &str) -> Option<Vec<u8>>;
}

/// Font files under an ordered list of root directories.
#[derive(Clone, Debug, Default)]
pub struct FsFontSource {
    roots: Vec<PathBuf>,
}

impl FsFontSource {
    /// Source over explicit roots, searched in order.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// The usual font directories of the current platform.
    pub fn platform_default() -> Self {
        Self::new(platform_font_dirs())
    }

    /// Search `root` before every existing root.
    pub fn with_priority_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(0, root.into());
        self
    }

    /// Roots in search order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl FontSource for FsFontSource {
    fn load(&self, candidate: &str) -> Option<Vec<u8>> {
        self.roots.iter().find_map(|root| {
            let path = root.join(Path::new(candidate));
            if !path.is_file() {
                return None;
            }
            match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "unreadable font file");
                    None
                }
            }
        })
    }
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);
    let mut dirs = Vec::new();
    if cfg!(target_os = "windows") {
        let root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(root).join("Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.extend(home.map(|h| h.join("Library").join("Fonts")));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        dirs.extend(home.map(|h| h.join(".fonts")));
    }
    dirs
}

/// In-memory font table keyed by candidate path.
#[derive(Clone, Debug, Default)]
pub struct MemoryFontSource {
    files: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryFontSource {
    /// Empty table: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a candidate path.
    pub fn insert(&mut self, candidate: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(candidate.into(), Arc::new(bytes));
    }
}

impl FontSource for MemoryFontSource {
    fn load(&self, candidate: &str) -> Option<Vec<u8>> {
        self.files.get(candidate).map(|b| b.as_ref().clone())
    }
}

/// Parsed font file: raw bytes plus the face index and family name found in them.
#[derive(Clone)]
pub struct FontFace {
    family_name: String,
    data: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family_name", &self.family_name)
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Parse font bytes; fails when they contain no usable face.
    pub fn from_bytes(bytes: Vec<u8>) -> CollageResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes.clone());
        let face = db
            .faces()
            .next()
            .ok_or_else(|| CollageError::font("no font faces found in font data"))?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self {
            family_name,
            index: face.index,
            data: Arc::new(bytes),
        })
    }

    /// Sans-serif face from the system font database, else its first face.
    pub fn system_fallback() -> Option<Self> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let families = [Family::SansSerif];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))?;
        let family_name = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(Self {
            family_name,
            data: Arc::new(data),
            index,
        })
    }

    /// Family name recorded in the font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Raw font file bytes.
    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Face index inside a collection file.
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// How a [`Font`] was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// One of the family's candidate files.
    Family,
    /// The built-in fallback face.
    Fallback,
    /// Nothing was available; text drawn with this font renders nothing.
    Missing,
}

/// A face bound to a pixel size.
#[derive(Clone, Debug)]
pub struct Font {
    face: Option<FontFace>,
    size_px: f32,
    family: FontFamily,
    origin: FontOrigin,
}

impl Font {
    /// Bind `face` to `size_px`.
    pub fn new(face: Option<FontFace>, size_px: f32, family: FontFamily, origin: FontOrigin) -> Self {
        Self {
            face,
            size_px,
            family,
            origin,
        }
    }

    /// Concrete face, if any could be loaded.
    pub fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }

    /// Pixel size glyphs are rendered at.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Family that was requested.
    pub fn family(&self) -> FontFamily {
        self.family
    }

    /// How the face was obtained.
    pub fn origin(&self) -> FontOrigin {
        self.origin
    }
}

/// Maps logical families to concrete fonts with deterministic fallback.
///
/// Family faces are loaded lazily, at most once each, and then shared; the resolver is `Sync`
/// so batch workers can use one instance concurrently.
pub struct FontResolver {
    source: Box<dyn FontSource>,
    fallback: Option<FontFace>,
    loaded: [OnceLock<Option<FontFace>>; FontFamily::ALL.len()],
}

impl std::fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl FontResolver {
    /// Resolver over `source` with an explicit fallback face.
    pub fn new(source: impl FontSource + 'static, fallback: Option<FontFace>) -> Self {
        Self {
            source: Box::new(source),
            fallback,
            loaded: std::array::from_fn(|_| OnceLock::new()),
        }
    }

    /// Resolver over `source` whose fallback comes from the system font database.
    pub fn with_system_fallback(source: impl FontSource + 'static) -> Self {
        Self::new(source, FontFace::system_fallback())
    }

    /// Platform font directories plus the system fallback.
    pub fn system() -> Self {
        Self::with_system_fallback(FsFontSource::platform_default())
    }

    /// Resolve `family` at `round(pixel_size * scale_factor)` pixels.
    ///
    /// Never fails: if no candidate loads, the fallback face is used at the unscaled
    /// `pixel_size`, and without a fallback the returned font has no face.
    pub fn resolve(&self, family: FontFamily, pixel_size: u32, scale_factor: f32) -> Font {
        let scaled = (pixel_size as f32 * scale_factor).round().max(1.0);
        if let Some(face) = self.family_face(family) {
            return Font::new(Some(face), scaled, family, FontOrigin::Family);
        }

        let unscaled = (pixel_size as f32).max(1.0);
        match &self.fallback {
            Some(face) => {
                tracing::warn!(
                    family = family.key(),
                    fallback = face.family_name(),
                    "no candidate font loaded, using fallback"
                );
                Font::new(Some(face.clone()), unscaled, family, FontOrigin::Fallback)
            }
            None => {
                tracing::warn!(
                    family = family.key(),
                    "no candidate font and no fallback, text will not render"
                );
                Font::new(None, unscaled, family, FontOrigin::Missing)
            }
        }
    }

    /// [`FontResolver::resolve`] for a string key; unknown keys use the default family.
    pub fn resolve_key(&self, key: &str, pixel_size: u32, scale_factor: f32) -> Font {
        self.resolve(FontFamily::from_key_or_default(key), pixel_size, scale_factor)
    }

    fn family_face(&self, family: FontFamily) -> Option<FontFace> {
        self.loaded[family.slot()]
            .get_or_init(|| self.load_first_candidate(family))
            .clone()
    }

    fn load_first_candidate(&self, family: FontFamily) -> Option<FontFace> {
        family.candidates().iter().find_map(|candidate| {
            let bytes = self.source.load(candidate)?;
            match FontFace::from_bytes(bytes) {
                Ok(face) => {
                    tracing::debug!(family = family.key(), candidate, "loaded font");
                    Some(face)
                }
                Err(err) => {
                    tracing::warn!(family = family.key(), candidate, %err, "skipping font");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
