//! Application state and progress events.
//!
//! The original UI hung everything off a process-wide mutable `state`
//! singleton with ad-hoc listeners. Here the state is a plain value owned by
//! the caller, and generation progress flows through a typed
//! [`GenerationEvent`] channel instead of key-string callbacks.

use tokio::sync::mpsc;

use crate::api::Headline;
use crate::styles::ImageStyle;

/// What the application currently knows. Owned and passed down explicitly;
/// there is no global.
#[derive(Debug, Default, Clone)]
pub struct AppState {
    /// Headlines fetched for the chosen category.
    pub headlines: Vec<Headline>,
    /// The headline picked for generation, if any.
    pub selected_headline: Option<Headline>,
    /// The visual style picked for generation, if any.
    pub selected_style: Option<&'static ImageStyle>,
}

/// Progress updates emitted while a story is generated.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// The LLM produced the caption sequence; `count` cards follow.
    ContentReady { count: usize },
    /// Image synthesis started for card `index` (0-based) of `total`.
    ImageStarted { index: usize, total: usize },
    /// The base image for card `index` arrived.
    ImageReady { index: usize },
    /// Image synthesis failed for card `index`; the card will composite over
    /// the neutral fill.
    ImageFailed { index: usize, reason: String },
    /// Card `index` was composited.
    CardComposited { index: usize },
    /// The whole story is done.
    Finished,
}

/// Sender half for progress events.
pub type EventSender = mpsc::UnboundedSender<GenerationEvent>;

/// Create an event channel. The receiver is yours to drain (UI, logger,
/// test harness); senders never block.
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<GenerationEvent>) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::IMAGE_STYLES;

    #[test]
    fn state_tracks_the_session_selection() {
        let mut state = AppState::default();
        assert!(state.selected_headline.is_none());
        assert!(state.selected_style.is_none());

        state.headlines = vec![Headline {
            headline: "Market hits record high".into(),
            source: "Reuters".into(),
            url: "https://example.com/markets".into(),
        }];
        state.selected_headline = state.headlines.first().cloned();
        state.selected_style = Some(&IMAGE_STYLES[0]);

        let selected = state.selected_headline.as_ref().map(|h| h.source.as_str());
        assert_eq!(selected, Some("Reuters"));
        assert_eq!(state.selected_style.map(|s| s.id), Some(IMAGE_STYLES[0].id));
    }

    #[test]
    fn events_flow_through_the_channel() {
        let (tx, mut rx) = event_channel();
        tx.send(GenerationEvent::ContentReady { count: 7 }).unwrap();
        tx.send(GenerationEvent::Finished).unwrap();
        drop(tx);

        assert_eq!(rx.try_recv().unwrap(), GenerationEvent::ContentReady { count: 7 });
        assert_eq!(rx.try_recv().unwrap(), GenerationEvent::Finished);
        assert!(rx.try_recv().is_err());
    }
}
