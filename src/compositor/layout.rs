//! Text layout for card compositing: greedy word wrap, the font-shrink fit
//! loop and vertical block placement.
//!
//! Everything here is pure math over a [`TextMeasure`], so layout behavior is
//! testable without any font file on disk.

/// Measures rendered text width at a given pixel size.
///
/// Implemented by the font store for real glyph metrics; tests substitute a
/// fixed-advance measurer.
pub trait TextMeasure {
    fn text_width(&self, text: &str, px: f32) -> f32;
}

/// Per-card-kind fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Starting font size in pixels.
    pub start_px: f32,
    /// Minimum font size floor.
    pub min_px: f32,
    /// Maximum line count before shrinking.
    pub max_lines: usize,
}

impl FitParams {
    /// Lead card: big opening type.
    pub fn lead() -> Self {
        Self { start_px: 85.0, min_px: 50.0, max_lines: 5 }
    }

    /// Follow cards: denser body type.
    pub fn follow() -> Self {
        Self { start_px: 70.0, min_px: 40.0, max_lines: 6 }
    }
}

/// What to do when the caption still exceeds `max_lines` at the minimum
/// font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Accept the overflowing line count (the original behavior).
    #[default]
    Allow,
    /// Cut at `max_lines` and ellipsize the last kept line.
    Truncate,
}

/// A fitted text block: final font size, wrapped lines and line height.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFit {
    pub px: f32,
    pub line_height: f32,
    pub lines: Vec<String>,
}

impl TextFit {
    /// Height of the wrapped block.
    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

/// Greedy word wrap against a pixel budget.
///
/// Splits on single spaces (not `split_whitespace`) so an empty caption
/// yields exactly one empty line, matching the upstream contract. A word
/// wider than `max_width` gets its own overflowing line.
pub fn wrap_words<M: TextMeasure>(text: &str, max_width: f32, px: f32, measure: &M) -> Vec<String> {
    let mut words = text.split(' ');
    // `split` always yields at least one item, empty input included
    let mut current = words.next().unwrap_or("").to_string();
    let mut lines = Vec::new();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure.text_width(&candidate, px) < max_width {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    lines.push(current);
    lines
}

/// The font-shrink loop: wrap at the starting size, and while the line count
/// exceeds the maximum shrink by 2px and re-wrap, stopping at the floor.
///
/// Terminates for any input: each iteration strictly reduces the font size
/// until the floor is reached.
pub fn fit_text<M: TextMeasure>(
    text: &str,
    max_width: f32,
    params: FitParams,
    measure: &M,
) -> TextFit {
    let mut px = params.start_px;
    loop {
        let lines = wrap_words(text, max_width, px, measure);
        if lines.len() <= params.max_lines || px <= params.min_px {
            return TextFit { px, line_height: px * 1.2, lines };
        }
        px = (px - 2.0).max(params.min_px);
    }
}

/// Apply the overflow policy to a fitted block that may exceed `max_lines`.
pub fn apply_overflow<M: TextMeasure>(
    mut fit: TextFit,
    params: FitParams,
    policy: OverflowPolicy,
    max_width: f32,
    measure: &M,
) -> TextFit {
    if policy == OverflowPolicy::Allow || fit.lines.len() <= params.max_lines {
        return fit;
    }

    fit.lines.truncate(params.max_lines);
    if let Some(last) = fit.lines.last_mut() {
        let mut kept = last.clone();
        while !kept.is_empty() && measure.text_width(&format!("{kept}..."), fit.px) >= max_width {
            match kept.rsplit_once(' ') {
                Some((head, _)) => kept = head.to_string(),
                None => {
                    kept.pop();
                }
            }
        }
        *last = if kept.is_empty() { "...".to_string() } else { format!("{kept}...") };
    }
    fit
}

/// Fixed top offset for follow-card text: an empirical safe zone below host
/// app chrome (camera cutouts, notification bars), not computed from content.
pub const FOLLOW_TOP_Y: f32 = 260.0;

/// Gap between the lead headline block and the source byline.
pub const SOURCE_GAP: f32 = 30.0;

/// Source byline size relative to the fitted headline size.
pub const SOURCE_SCALE: f32 = 0.7;

/// Vertical geometry of the lead card's combined headline + source block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadBlock {
    /// Top of the first headline line.
    pub start_y: f32,
    /// Top of the source byline.
    pub source_y: f32,
    /// Source byline font size.
    pub source_px: f32,
}

/// Center the headline block plus gap plus one source line on the canvas.
pub fn lead_block(fit: &TextFit, canvas_height: f32) -> LeadBlock {
    let source_px = fit.px * SOURCE_SCALE;
    let source_line_height = source_px * 1.2;
    let headline_height = fit.block_height();
    let total = headline_height + SOURCE_GAP + source_line_height;
    let start_y = (canvas_height - total) / 2.0;
    LeadBlock {
        start_y,
        source_y: start_y + headline_height + SOURCE_GAP,
        source_px,
    }
}
