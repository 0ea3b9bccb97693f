//! Card Compositor
//!
//! Turns a caption record plus an optional base image into a finished
//! 1080x1920 social-media card: base layer, legibility scrim, fitted text,
//! source byline and like sticker on the lead card, rotated watermark, JPEG
//! output.
//!
//! Compositing itself cannot fail: an undecodable base image falls back to
//! the neutral fill and is logged, never surfaced. Each call owns its canvas
//! exclusively; layout depends only on the caption and card kind.

pub mod font;
pub mod layout;
pub mod paint;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbaImage};
use log::warn;

use crate::card::{Card, CardKind, CompositeImage};
use crate::error::{Error, Result};
use font::FontStore;
use layout::{apply_overflow, fit_text, lead_block, FitParams, OverflowPolicy, FOLLOW_TOP_Y};

/// Canvas width: 9:16 portrait matching short-form video UIs.
pub const CANVAS_WIDTH: u32 = 1080;
/// Canvas height.
pub const CANVAS_HEIGHT: u32 = 1920;

/// Neutral fill used when no base image is available (#374151).
pub const NEUTRAL_FILL: [u8; 3] = [0x37, 0x41, 0x51];
/// Accent color for the source byline (#fb923c).
pub const ACCENT: [u8; 3] = [0xfb, 0x92, 0x3c];
const WHITE: [u8; 3] = [0xff, 0xff, 0xff];
const STICKER_RED: [u8; 3] = [0xef, 0x44, 0x44];

/// Text may occupy 85% of the canvas width.
const TEXT_WIDTH_FRAC: f32 = 0.85;

/// Scrim alpha stops: opaque dark at the top, clear at mid-canvas, lighter
/// dark at the bottom.
const SCRIM_STOPS: [(f32, f32); 4] = [(0.0, 0.8), (0.3, 0.4), (0.5, 0.0), (1.0, 0.4)];

/// Compositor tuning. The defaults reproduce the original card look.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Behavior when text still overflows the line maximum at the minimum
    /// font size.
    pub overflow: OverflowPolicy,
    /// Account handle drawn rotated along the left edge of every card.
    pub watermark: String,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Allow,
            watermark: "@noticiasemimagens".to_string(),
            jpeg_quality: 90,
        }
    }
}

/// The card compositor. One instance is cheap to share; every `compose` call
/// draws on its own canvas.
pub struct Compositor {
    fonts: FontStore,
    config: CompositorConfig,
}

impl Compositor {
    pub fn new(fonts: FontStore, config: CompositorConfig) -> Self {
        Self { fonts, config }
    }

    pub fn with_defaults(fonts: FontStore) -> Self {
        Self::new(fonts, CompositorConfig::default())
    }

    /// Composite a card over `base` (encoded image bytes, or `None` for the
    /// neutral fill) and encode it as JPEG.
    ///
    /// Decode failure is not an error: the card is drawn over the neutral
    /// fill instead. The only fallible step is the final encode.
    pub fn compose(&self, base: Option<&[u8]>, card: &Card) -> Result<CompositeImage> {
        let raster = self.render(base, card);
        let jpeg_data = encode_jpeg(&raster, self.config.jpeg_quality)?;
        Ok(CompositeImage { width: CANVAS_WIDTH, height: CANVAS_HEIGHT, jpeg_data })
    }

    /// Composite using the card's own `base_image`.
    pub fn compose_card(&self, card: &Card) -> Result<CompositeImage> {
        self.compose(card.base_image.as_deref(), card)
    }

    /// Draw the full card and return the raw canvas. Infallible; exposed for
    /// pixel-level tests and golden hashing.
    pub fn render(&self, base: Option<&[u8]>, card: &Card) -> RgbaImage {
        let (mut canvas, has_image) = self.base_layer(base);

        if has_image {
            paint::gradient_scrim(&mut canvas, &SCRIM_STOPS);
        }

        let params = match card.kind {
            CardKind::Lead { .. } => FitParams::lead(),
            CardKind::Follow => FitParams::follow(),
        };
        let max_width = CANVAS_WIDTH as f32 * TEXT_WIDTH_FRAC;
        let fit = fit_text(&card.text, max_width, params, &self.fonts);
        let fit = apply_overflow(fit, params, self.config.overflow, max_width, &self.fonts);

        let center_x = CANVAS_WIDTH as f32 / 2.0;
        let bold = self.fonts.bold().clone();

        let draw_line = |canvas: &mut RgbaImage, px: f32, top_y: f32, text: &str, color: [u8; 3]| {
            if has_image {
                // legibility shadow under the glyphs (stands in for the
                // original's blurred canvas shadow)
                paint::draw_text_top(canvas, &bold, px, center_x + 3.0, top_y + 3.0, [0, 0, 0], 0.6, text);
            }
            paint::draw_text_top(canvas, &bold, px, center_x, top_y, color, 1.0, text);
        };

        match &card.kind {
            CardKind::Lead { source } => {
                let block = lead_block(&fit, CANVAS_HEIGHT as f32);
                for (i, line) in fit.lines.iter().enumerate() {
                    draw_line(&mut canvas, fit.px, block.start_y + i as f32 * fit.line_height, line, WHITE);
                }
                let regular = self.fonts.regular().clone();
                if has_image {
                    paint::draw_text_top(
                        &mut canvas,
                        &regular,
                        block.source_px,
                        center_x + 3.0,
                        block.source_y + 3.0,
                        [0, 0, 0],
                        0.6,
                        source,
                    );
                }
                paint::draw_text_top(
                    &mut canvas,
                    &regular,
                    block.source_px,
                    center_x,
                    block.source_y,
                    ACCENT,
                    1.0,
                    source,
                );
                self.draw_like_sticker(&mut canvas);
            }
            CardKind::Follow => {
                for (i, line) in fit.lines.iter().enumerate() {
                    draw_line(&mut canvas, fit.px, FOLLOW_TOP_Y + i as f32 * fit.line_height, line, WHITE);
                }
            }
        }

        self.draw_watermark(&mut canvas);
        canvas
    }

    fn base_layer(&self, base: Option<&[u8]>) -> (RgbaImage, bool) {
        if let Some(bytes) = base {
            match image::load_from_memory(bytes) {
                Ok(img) => {
                    let scaled = imageops::resize(
                        &img.to_rgba8(),
                        CANVAS_WIDTH,
                        CANVAS_HEIGHT,
                        imageops::FilterType::Lanczos3,
                    );
                    return (scaled, true);
                }
                Err(e) => {
                    warn!("base image decode failed, using neutral fill: {e}");
                }
            }
        }
        let mut canvas = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        paint::fill(&mut canvas, NEUTRAL_FILL);
        (canvas, false)
    }

    /// Circular "like" sticker near the top-right corner, offset from center
    /// so it never sits on the headline.
    fn draw_like_sticker(&self, canvas: &mut RgbaImage) {
        let cx = CANVAS_WIDTH as f32 - 140.0;
        let cy = 180.0;
        let radius = 80.0;

        // soft drop shadow, then the white disc
        paint::fill_circle(canvas, cx + 4.0, cy + 4.0, radius, [0, 0, 0], 0.35);
        paint::fill_circle(canvas, cx, cy, radius, WHITE, 1.0);
        paint::fill_heart(canvas, cx, cy - 15.0, 32.0, STICKER_RED);
        paint::draw_text_middle(canvas, self.fonts.bold(), 24.0, cx, cy + 35.0, STICKER_RED, 1.0, "CURTA!");
    }

    /// Account handle rotated 90 degrees CCW along the left edge, vertically
    /// centered, at 25% opacity.
    fn draw_watermark(&self, canvas: &mut RgbaImage) {
        if self.config.watermark.is_empty() {
            return;
        }
        let mask = paint::text_mask(self.fonts.bold(), 80.0, &self.config.watermark, WHITE, 0.25);
        let rotated = imageops::rotate270(&mask);
        let x = 60 - rotated.width() as i32 / 2;
        let y = CANVAS_HEIGHT as i32 / 2 - rotated.height() as i32 / 2;
        paint::overlay(canvas, &rotated, x, y);
    }
}

/// Decode an image payload that may be raw base64 or a full data URI.
pub fn decode_image_payload(payload: &str) -> Option<Vec<u8>> {
    use base64::Engine as _;
    let b64 = if payload.starts_with("data:") {
        payload.split_once("base64,").map(|(_, rest)| rest)?
    } else {
        payload
    };
    base64::engine::general_purpose::STANDARD.decode(b64.trim()).ok()
}

fn encode_jpeg(raster: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|e| Error::EncodeError(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn compositor() -> Option<Compositor> {
        // Pixel tests need a real font; skip quietly on machines without one
        match FontStore::discover() {
            Ok(fonts) => Some(Compositor::with_defaults(fonts)),
            Err(_) => {
                eprintln!("no system font available, skipping");
                None
            }
        }
    }

    #[test]
    fn output_is_always_canvas_sized() {
        let Some(c) = compositor() else { return };
        let card = Card::follow("Hello world", "");
        let composite = c.compose(None, &card).unwrap();
        assert_eq!(composite.width, 1080);
        assert_eq!(composite.height, 1920);
        // JPEG magic
        assert_eq!(&composite.jpeg_data[0..2], &[0xFF, 0xD8]);

        let raster = c.render(None, &card);
        assert_eq!((raster.width(), raster.height()), (1080, 1920));
    }

    #[test]
    fn missing_base_image_uses_neutral_fill() {
        let Some(c) = compositor() else { return };
        let raster = c.render(None, &Card::follow("text", ""));
        // far from text and watermark
        assert_eq!(raster.get_pixel(1000, 1800).0, [0x37, 0x41, 0x51, 255]);
    }

    #[test]
    fn undecodable_base_image_uses_neutral_fill() {
        let Some(c) = compositor() else { return };
        let garbage = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let raster = c.render(Some(&garbage), &Card::follow("text", ""));
        assert_eq!(raster.get_pixel(1000, 1800).0, [0x37, 0x41, 0x51, 255]);
    }

    #[test]
    fn empty_caption_still_renders() {
        let Some(c) = compositor() else { return };
        let composite = c.compose(None, &Card::follow("", "")).unwrap();
        assert_eq!(composite.width, 1080);
        let raster = c.render(None, &Card::follow("", ""));
        // watermark is still present along the left edge
        let mut watermark_pixels = 0;
        for y in 0..1920 {
            let p = raster.get_pixel(60, y);
            if p.0[0] > 0x37 + 10 {
                watermark_pixels += 1;
            }
        }
        assert!(watermark_pixels > 0, "expected watermark pixels on the left edge");
    }

    #[test]
    fn follow_text_starts_at_safe_zone() {
        let Some(c) = compositor() else { return };
        let raster = c.render(None, &Card::follow("Hello", ""));
        // nothing but background above the 260px safe zone, away from the
        // watermark column
        for y in 0..260 {
            for x in (200..1000).step_by(8) {
                assert_eq!(raster.get_pixel(x, y).0, [0x37, 0x41, 0x51, 255], "pixel at ({x}, {y})");
            }
        }
        // and white glyph pixels shortly below it
        let mut found = false;
        'scan: for y in 260..400 {
            for x in 200..900 {
                if raster.get_pixel(x, y).0 == [255, 255, 255, 255] {
                    found = true;
                    break 'scan;
                }
            }
        }
        assert!(found, "expected headline pixels below the safe zone");
    }

    #[test]
    fn lead_card_draws_source_and_sticker() {
        let Some(c) = compositor() else { return };
        let card = Card::lead("Breaking: Market hits record high today", "", "Reuters");
        let raster = c.render(None, &card);

        // sticker disc is white below the label
        assert_eq!(raster.get_pixel(940, 250).0, [255, 255, 255, 255]);
        // heart above the label is red
        assert_eq!(raster.get_pixel(940, 165).0, [0xef, 0x44, 0x44, 255]);
        // the source byline appears somewhere in accent color
        let found = raster.pixels().any(|p| p.0 == [0xfb, 0x92, 0x3c, 255]);
        assert!(found, "expected accent-colored source byline");
    }

    #[test]
    fn base_image_is_scaled_to_canvas() {
        let Some(c) = compositor() else { return };
        // tiny solid red PNG, nothing like 1080x1920
        let red = RgbaImage::from_pixel(3, 3, image::Rgba([200, 0, 0, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(red)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();

        let raster = c.render(Some(&png), &Card::follow("x", ""));
        assert_eq!((raster.width(), raster.height()), (1080, 1920));
        // mid-canvas sits in the scrim's clear zone, so the base shows through
        let p = raster.get_pixel(900, 960);
        assert!(p.0[0] > 150 && p.0[1] < 60, "expected red base at mid-canvas, got {:?}", p.0);
    }

    #[test]
    fn data_uri_payloads_decode() {
        use base64::Engine as _;
        let b64 = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        assert_eq!(decode_image_payload(&b64), Some(vec![1, 2, 3]));
        let uri = format!("data:image/jpeg;base64,{b64}");
        assert_eq!(decode_image_payload(&uri), Some(vec![1, 2, 3]));
        assert_eq!(decode_image_payload("data:image/jpeg;base65,zzz"), None);
    }
}
