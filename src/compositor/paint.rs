//! Pixel-level drawing primitives for card compositing.
//!
//! All blending is straight source-over onto an opaque canvas; glyph
//! coverage from rusttype is treated as the source alpha.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::compositor::font::advance_width;

/// Blend `color` over the pixel at (x, y) with the given alpha, ignoring
/// out-of-bounds coordinates.
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || alpha <= 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    let a = alpha.min(1.0);
    let inv = 1.0 - a;
    let dst = img.get_pixel_mut(x, y);
    dst.0[0] = (color[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = 255;
}

/// Fill the whole canvas with an opaque color.
pub fn fill(img: &mut RgbaImage, color: [u8; 3]) {
    for p in img.pixels_mut() {
        *p = Rgba([color[0], color[1], color[2], 255]);
    }
}

/// Vertical black gradient scrim. `stops` are (position, alpha) pairs with
/// positions in 0..=1 sorted ascending; alpha is linearly interpolated
/// between neighboring stops and applied per row.
pub fn gradient_scrim(img: &mut RgbaImage, stops: &[(f32, f32)]) {
    if stops.is_empty() {
        return;
    }
    let h = img.height();
    let w = img.width();
    for y in 0..h {
        let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
        let alpha = interpolate_stops(stops, t);
        if alpha <= 0.0 {
            continue;
        }
        for x in 0..w {
            blend_pixel(img, x as i32, y as i32, [0, 0, 0], alpha);
        }
    }
}

fn interpolate_stops(stops: &[(f32, f32)], t: f32) -> f32 {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (p0, a0) = pair[0];
        let (p1, a1) = pair[1];
        if t <= p1 {
            if p1 - p0 <= f32::EPSILON {
                return a1;
            }
            let f = (t - p0) / (p1 - p0);
            return a0 + (a1 - a0) * f;
        }
    }
    stops[stops.len() - 1].1
}

/// Draw a line of text with its top edge at `top_y`, horizontally centered
/// on `center_x` (canvas `textAlign: center`, `textBaseline: top`).
pub fn draw_text_top(
    img: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    center_x: f32,
    top_y: f32,
    color: [u8; 3],
    alpha: f32,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    let scale = Scale::uniform(px);
    let v = font.v_metrics(scale);
    let width = advance_width(font, text, px);
    let origin_x = center_x - width / 2.0;
    let baseline_y = top_y + v.ascent;

    for glyph in font.layout(text, scale, point(origin_x, baseline_y)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                blend_pixel(img, x, y, color, coverage * alpha);
            });
        }
    }
}

/// Draw a line of text vertically centered on `center_y` (canvas
/// `textBaseline: middle`).
pub fn draw_text_middle(
    img: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    center_x: f32,
    center_y: f32,
    color: [u8; 3],
    alpha: f32,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v = font.v_metrics(scale);
    let height = (v.ascent - v.descent).max(1.0);
    draw_text_top(img, font, px, center_x, center_y - height / 2.0, color, alpha, text);
}

/// Filled circle with a 1px feathered edge.
pub fn fill_circle(img: &mut RgbaImage, cx: f32, cy: f32, r: f32, color: [u8; 3], alpha: f32) {
    let x0 = (cx - r - 1.0).floor() as i32;
    let x1 = (cx + r + 1.0).ceil() as i32;
    let y0 = (cy - r - 1.0).floor() as i32;
    let y1 = (cy + r + 1.0).ceil() as i32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_pixel(img, x, y, color, coverage * alpha);
            }
        }
    }
}

/// Filled heart centered on (cx, cy), `size` being roughly its half-width.
/// Rasterizes the classic implicit heart curve (x^2 + y^2 - 1)^3 = x^2 y^3.
pub fn fill_heart(img: &mut RgbaImage, cx: f32, cy: f32, size: f32, color: [u8; 3]) {
    let span = (size * 1.4).ceil() as i32;
    for dy in -span..=span {
        for dx in -span..=span {
            // normalized heart space, +y up
            let nx = dx as f32 / size;
            let ny = -(dy as f32) / size;
            let a = nx * nx + ny * ny - 1.0;
            if a * a * a - nx * nx * ny * ny * ny <= 0.0 {
                blend_pixel(img, cx as i32 + dx, cy as i32 + dy, color, 1.0);
            }
        }
    }
}

/// Render one line of text into a fresh transparent buffer, with glyph
/// coverage scaled by `alpha` stored in the alpha channel. Lets the caller
/// rotate the text before compositing (the watermark path).
pub fn text_mask(font: &Font<'static>, px: f32, text: &str, color: [u8; 3], alpha: f32) -> RgbaImage {
    let scale = Scale::uniform(px);
    let v = font.v_metrics(scale);
    let width = advance_width(font, text, px).ceil() as u32 + 2;
    let height = (v.ascent - v.descent).ceil() as u32 + 2;
    let mut buf = RgbaImage::new(width.max(1), height.max(1));
    let baseline = v.ascent + 1.0;

    for glyph in font.layout(text, scale, point(1.0, baseline)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x < 0 || y < 0 {
                    return;
                }
                let (x, y) = (x as u32, y as u32);
                if x >= buf.width() || y >= buf.height() {
                    return;
                }
                let a = (coverage * alpha * 255.0) as u8;
                let p = buf.get_pixel_mut(x, y);
                if a > p.0[3] {
                    *p = Rgba([color[0], color[1], color[2], a]);
                }
            });
        }
    }
    buf
}

/// Alpha-blend `over` onto `base` with its top-left corner at (x, y).
pub fn overlay(base: &mut RgbaImage, over: &RgbaImage, x: i32, y: i32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let a = p.0[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            blend_pixel(base, x + ox as i32, y + oy as i32, [p.0[0], p.0[1], p.0[2]], a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel_opaque() {
        let mut img = RgbaImage::new(4, 4);
        fill(&mut img, [0x37, 0x41, 0x51]);
        for p in img.pixels() {
            assert_eq!(p.0, [0x37, 0x41, 0x51, 255]);
        }
    }

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut img = RgbaImage::new(2, 2);
        blend_pixel(&mut img, -1, 0, [255, 255, 255], 1.0);
        blend_pixel(&mut img, 0, 5, [255, 255, 255], 1.0);
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn scrim_interpolation_hits_the_stops() {
        let stops = [(0.0, 0.8), (0.3, 0.4), (0.5, 0.0), (1.0, 0.4)];
        assert!((interpolate_stops(&stops, 0.0) - 0.8).abs() < 1e-6);
        assert!((interpolate_stops(&stops, 0.3) - 0.4).abs() < 1e-6);
        assert!((interpolate_stops(&stops, 0.5) - 0.0).abs() < 1e-6);
        assert!((interpolate_stops(&stops, 1.0) - 0.4).abs() < 1e-6);
        // midway between the last two stops
        assert!((interpolate_stops(&stops, 0.75) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn scrim_darkens_top_leaves_middle() {
        let mut img = RgbaImage::new(2, 100);
        fill(&mut img, [200, 200, 200]);
        gradient_scrim(&mut img, &[(0.0, 0.8), (0.3, 0.4), (0.5, 0.0), (1.0, 0.4)]);
        let top = img.get_pixel(0, 0).0[0];
        let middle = img.get_pixel(0, 49).0[0];
        assert!(top < 60);
        assert!(middle > 190);
    }

    #[test]
    fn circle_covers_center_not_corner() {
        let mut img = RgbaImage::new(40, 40);
        fill(&mut img, [0, 0, 0]);
        fill_circle(&mut img, 20.0, 20.0, 10.0, [255, 255, 255], 1.0);
        assert_eq!(img.get_pixel(20, 20).0[0], 255);
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn heart_covers_center() {
        let mut img = RgbaImage::new(60, 60);
        fill(&mut img, [0, 0, 0]);
        fill_heart(&mut img, 30.0, 30.0, 15.0, [255, 0, 0]);
        assert_eq!(img.get_pixel(30, 30).0[0], 255);
    }

    #[test]
    fn overlay_respects_transparency() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        let mut over = RgbaImage::new(2, 2);
        over.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        // (1, 1) stays fully transparent
        overlay(&mut base, &over, 1, 1);
        assert_eq!(base.get_pixel(1, 1).0[0], 255);
        assert_eq!(base.get_pixel(2, 2).0[0], 10);
    }
}
