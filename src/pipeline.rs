//! Story generation pipeline: content, then images, then composites.
//!
//! Mirrors the interactive flow: one content call produces the caption
//! sequence, images are synthesized per card in order, and every card is
//! composited as soon as its image (or the decision to go without one)
//! lands. An image failure never aborts the story; the card falls back to
//! the neutral fill, exactly like the original UI kept going.

use log::{info, warn};

use crate::api::{ApiClient, GeneratedContent, Headline, SavePostRequest, SavedCard};
use crate::card::{Card, CompositeImage};
use crate::compositor::{decode_image_payload, Compositor};
use crate::error::Result;
use crate::state::{EventSender, GenerationEvent};
use crate::styles::ImageStyle;

/// A finished story: the cards, their composites and the content metadata
/// needed for saving.
#[derive(Debug)]
pub struct GeneratedPost {
    pub headline: Headline,
    pub content: GeneratedContent,
    pub cards: Vec<Card>,
    pub composites: Vec<CompositeImage>,
}

impl GeneratedPost {
    /// Build the persistence payload for `/api/save-post`.
    pub fn save_request(&self, category: &str) -> SavePostRequest {
        use base64::Engine as _;
        let cards = self
            .cards
            .iter()
            .map(|card| SavedCard {
                text: card.text.clone(),
                image_prompt: card.image_prompt.clone(),
                image_base64: card
                    .base_image
                    .as_ref()
                    .map(|b| base64::engine::general_purpose::STANDARD.encode(b)),
                image_source: card.image_source.clone(),
            })
            .collect();
        // the service expects a per-modality map here, not a bare string
        let image_model = self
            .cards
            .iter()
            .find_map(|c| c.image_source.clone())
            .unwrap_or_else(|| "none".to_string());
        SavePostRequest {
            category: category.to_string(),
            headline: self.headline.headline.clone(),
            source: self.headline.source.clone(),
            url: self.headline.url.clone(),
            tiktok_title: self.content.tiktok_title.clone(),
            tiktok_summary: self.content.tiktok_summary.clone(),
            cards,
            generation_time: self.content.generation_time,
            model_used: serde_json::json!({
                "text": self.content.model_used,
                "image": image_model,
            }),
        }
    }
}

/// Drives one story from a selected headline + style to composited cards.
pub struct Generator {
    api: ApiClient,
    compositor: Compositor,
}

impl Generator {
    pub fn new(api: ApiClient, compositor: Compositor) -> Self {
        Self { api, compositor }
    }

    /// Generate a full story. Progress is reported on `events`; the call
    /// fails only if content generation or compositing fails. Per-card
    /// image errors are reported and skipped.
    pub async fn generate(
        &self,
        headline: &Headline,
        style: &ImageStyle,
        events: &EventSender,
    ) -> Result<GeneratedPost> {
        info!("generating story for: {}", headline.headline);
        let content = self.api.generate_content(headline, style.prompt).await?;

        let mut cards: Vec<Card> = content
            .flashcards
            .iter()
            .enumerate()
            .map(|(i, fc)| {
                if i == 0 {
                    Card::lead(fc.text.as_str(), fc.image_prompt.as_str(), headline.source.as_str())
                } else {
                    Card::follow(fc.text.as_str(), fc.image_prompt.as_str())
                }
            })
            .collect();

        let total = cards.len();
        let _ = events.send(GenerationEvent::ContentReady { count: total });

        for (i, card) in cards.iter_mut().enumerate() {
            let _ = events.send(GenerationEvent::ImageStarted { index: i, total });
            match self
                .api
                .generate_image(&card.image_prompt, style.prompt, &card.text, i + 1)
                .await
            {
                Ok(img) => match decode_image_payload(&img.image_base64) {
                    Some(bytes) => {
                        card.base_image = Some(bytes);
                        if !img.image_source.is_empty() {
                            card.image_source = Some(img.image_source);
                        }
                        let _ = events.send(GenerationEvent::ImageReady { index: i });
                    }
                    None => {
                        warn!("card {}: image payload was not valid base64", i + 1);
                        let _ = events.send(GenerationEvent::ImageFailed {
                            index: i,
                            reason: "invalid base64 payload".to_string(),
                        });
                    }
                },
                Err(e) => {
                    warn!("card {}: image generation failed: {e}", i + 1);
                    let _ = events.send(GenerationEvent::ImageFailed { index: i, reason: e.to_string() });
                }
            }
        }

        let mut composites = Vec::with_capacity(total);
        for (i, card) in cards.iter().enumerate() {
            composites.push(self.compositor.compose_card(card)?);
            let _ = events.send(GenerationEvent::CardComposited { index: i });
        }

        let _ = events.send(GenerationEvent::Finished);
        Ok(GeneratedPost { headline: headline.clone(), content, cards, composites })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ContentCard, GeneratedContent};

    fn sample_post() -> GeneratedPost {
        let content = GeneratedContent {
            flashcards: vec![ContentCard { text: "t".into(), image_prompt: "p".into() }],
            tiktok_title: "Title".into(),
            tiktok_summary: "Summary".into(),
            generation_time: 1.5,
            model_used: "Gemini 1.5 Flash".into(),
            scraped_content: true,
        };
        let mut card = Card::lead("t", "p", "Reuters");
        card.image_source = Some("diffusers".into());
        GeneratedPost {
            headline: Headline {
                headline: "h".into(),
                source: "Reuters".into(),
                url: "https://example.com".into(),
            },
            content,
            cards: vec![card],
            composites: Vec::new(),
        }
    }

    #[test]
    fn save_request_sends_model_used_as_object() {
        let save = sample_post().save_request("Economia");
        let json = serde_json::to_value(&save).unwrap();
        // the persistence endpoint validates modelUsed as a map
        assert!(json["modelUsed"].is_object(), "modelUsed must be an object, got {:?}", json["modelUsed"]);
        assert_eq!(json["modelUsed"]["text"], "Gemini 1.5 Flash");
        assert_eq!(json["modelUsed"]["image"], "diffusers");
        assert_eq!(json["cards"][0]["imageSource"], "diffusers");
    }

    #[test]
    fn save_request_without_images_reports_no_image_model() {
        let mut post = sample_post();
        post.cards = vec![Card::follow("t", "p")];
        let json = serde_json::to_value(&post.save_request("Economia")).unwrap();
        assert_eq!(json["modelUsed"]["image"], "none");
        assert!(json["cards"][0].get("imageSource").is_none());
    }
}
