//! Font loading and text measurement for the compositor.
//!
//! No font ships with the crate: callers either point at a TTF explicitly or
//! let [`FontStore::discover`] probe the usual system locations for a bold +
//! regular sans pair.

use std::path::Path;

use rusttype::{point, Font, Scale};

use crate::compositor::layout::TextMeasure;
use crate::error::{Error, Result};

/// Bold/regular sans pair used for all card text. Headlines, the sticker
/// label and the watermark use the bold face; the source byline uses the
/// regular face.
pub struct FontStore {
    bold: Font<'static>,
    regular: Font<'static>,
}

/// (bold, regular) candidates probed by `discover`, most common first.
const SYSTEM_FONT_CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    ),
    (
        "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ),
    ("C:\\Windows\\Fonts\\arialbd.ttf", "C:\\Windows\\Fonts\\arial.ttf"),
];

fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::FontError(format!("failed to read {}: {e}", path.display())))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| Error::FontError(format!("not a usable TTF: {}", path.display())))
}

impl FontStore {
    /// Load a bold/regular pair from explicit paths.
    pub fn from_paths(bold: &Path, regular: &Path) -> Result<Self> {
        Ok(Self { bold: load_font(bold)?, regular: load_font(regular)? })
    }

    /// Load a single TTF and use it for both weights.
    pub fn from_path(path: &Path) -> Result<Self> {
        let font = load_font(path)?;
        Ok(Self { bold: font.clone(), regular: font })
    }

    /// Build from in-memory TTF data (one face for both weights).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| Error::FontError("not a usable TTF".into()))?;
        Ok(Self { bold: font.clone(), regular: font })
    }

    /// Probe well-known system font locations for a sans pair.
    pub fn discover() -> Result<Self> {
        for (bold, regular) in SYSTEM_FONT_CANDIDATES {
            let bold_path = Path::new(bold);
            if !bold_path.exists() {
                continue;
            }
            let regular_path = Path::new(regular);
            log::debug!("using system font pair: {bold} / {regular}");
            return if regular_path.exists() {
                Self::from_paths(bold_path, regular_path)
            } else {
                Self::from_path(bold_path)
            };
        }
        Err(Error::FontError(
            "no system sans font found; pass an explicit TTF path".into(),
        ))
    }

    pub fn bold(&self) -> &Font<'static> {
        &self.bold
    }

    pub fn regular(&self) -> &Font<'static> {
        &self.regular
    }
}

/// Advance width of `text` in a given face, kerning included.
pub fn advance_width(font: &Font<'static>, text: &str, px: f32) -> f32 {
    let scale = Scale::uniform(px);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

// Headlines are wrapped against the bold face.
impl TextMeasure for FontStore {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        advance_width(&self.bold, text, px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::layout::TextMeasure;

    #[test]
    fn missing_font_path_is_an_error() {
        let err = FontStore::from_path(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(err, Err(Error::FontError(_))));
    }

    #[test]
    fn measured_width_grows_with_text() {
        // Needs a system font; skip quietly on bare machines, the same way
        // network tests skip without network.
        let Ok(fonts) = FontStore::discover() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let short = fonts.text_width("hi", 70.0);
        let long = fonts.text_width("hi there, reader", 70.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert_eq!(fonts.text_width("", 70.0), 0.0);
    }
}
