//! Card data model
//!
//! A [`Card`] is one unit of generated caption + image in a story sequence.
//! The original frontend passed duck-typed objects around (`isFirstCard`
//! plus a sometimes-present `source`); here the lead/follow distinction is a
//! tagged variant so a lead card cannot lose its byline and a follow card
//! cannot carry one.

/// Lead (first) vs follow card. Only the lead card carries a source byline
/// and the like sticker, and it uses larger type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardKind {
    /// The opening card of a story, with the news source byline.
    Lead { source: String },
    /// Any subsequent card.
    Follow,
}

/// One generated flashcard, ready for compositing.
///
/// Immutable once composited: regenerating produces a new [`Card`] and a new
/// composite, never a mutation of an existing one.
#[derive(Debug, Clone)]
pub struct Card {
    /// Caption text to overlay. May contain arbitrary whitespace; may be empty.
    pub text: String,
    /// Prompt that was (or will be) sent to the image backend for this card.
    pub image_prompt: String,
    /// Lead or follow variant.
    pub kind: CardKind,
    /// Raw bytes of the generated base image, if any. `None` composites over
    /// the neutral fill.
    pub base_image: Option<Vec<u8>>,
    /// Which backend produced the base image (e.g. "diffusers"), when known.
    pub image_source: Option<String>,
}

impl Card {
    /// Build the lead card of a story.
    pub fn lead(text: impl Into<String>, image_prompt: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_prompt: image_prompt.into(),
            kind: CardKind::Lead { source: source.into() },
            base_image: None,
            image_source: None,
        }
    }

    /// Build a follow-up card.
    pub fn follow(text: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_prompt: image_prompt.into(),
            kind: CardKind::Follow,
            base_image: None,
            image_source: None,
        }
    }

    pub fn is_lead(&self) -> bool {
        matches!(self.kind, CardKind::Lead { .. })
    }

    /// The source byline, present only on lead cards.
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            CardKind::Lead { source } => Some(source.as_str()),
            CardKind::Follow => None,
        }
    }
}

/// A finished 1080x1920 card image, JPEG-encoded.
///
/// Ephemeral: held for display/export only; persistence belongs to the
/// backend.
#[derive(Debug, Clone)]
pub struct CompositeImage {
    pub width: u32,
    pub height: u32,
    pub jpeg_data: Vec<u8>,
}
