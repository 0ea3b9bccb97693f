//! FlashNews engine
//!
//! Core of a news-to-social-media flashcard generator: a typed client for
//! the remote generation backend (headlines, LLM captions, image synthesis,
//! post persistence), the story generation pipeline, and the card
//! compositor that turns each caption + base image into a finished
//! 1080x1920 JPEG story card.
//!
//! # Example
//!
//! ```no_run
//! use flashnews::compositor::{font::FontStore, Compositor};
//! use flashnews::Card;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fonts = FontStore::discover()?;
//! let compositor = Compositor::with_defaults(fonts);
//!
//! let card = Card::lead("Breaking: Market hits record high today", "", "Reuters");
//! let composite = compositor.compose(None, &card)?;
//! std::fs::write("card_1.jpg", &composite.jpeg_data)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod api;
pub mod card;
pub mod compositor;
pub mod pipeline;
pub mod state;
pub mod styles;

pub use api::{ApiClient, ApiConfig, Headline};
pub use card::{Card, CardKind, CompositeImage};
pub use compositor::{Compositor, CompositorConfig};
pub use pipeline::{GeneratedPost, Generator};
pub use state::{event_channel, AppState, GenerationEvent};
pub use styles::{style_by_id, ImageStyle, IMAGE_STYLES, NEWS_CATEGORIES};
