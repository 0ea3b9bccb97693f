//! HTTP/JSON client for the generation backend.
//!
//! The backend (headline search, LLM content generation, image synthesis and
//! post persistence) is an opaque remote service; this module owns only the
//! wire shapes and transport. Field names stay camelCase on the wire to match
//! the service.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the generation backend.
    pub base_url: String,
    /// Request timeout. Image synthesis can take minutes on local models.
    pub timeout_ms: u64,
    /// User agent string to send with requests.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 300_000,
            user_agent: concat!("flashnews/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Async client over all backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

// --- wire shapes ---

/// A curated headline as returned by `/api/headlines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub headline: String,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlinesRequest<'a> {
    category: &'a str,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    headlines: Vec<Headline>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlineFromUrlRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    headline: &'a str,
    url: &'a str,
    source: &'a str,
    style_prompt: &'a str,
}

/// One caption + image prompt pair from the content generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCard {
    pub text: String,
    pub image_prompt: String,
}

/// Full LLM output for one story.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub flashcards: Vec<ContentCard>,
    #[serde(default)]
    pub tiktok_title: String,
    #[serde(default)]
    pub tiktok_summary: String,
    #[serde(default)]
    pub generation_time: f64,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub scraped_content: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageRequest<'a> {
    prompt: &'a str,
    style_prompt: &'a str,
    text: &'a str,
    card_number: usize,
}

/// One synthesized base image, base64-encoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub image_base64: String,
    #[serde(default)]
    pub image_source: String,
    #[serde(default)]
    pub generation_time: f64,
}

/// Card payload persisted with a saved post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub text: String,
    pub image_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
}

/// `/api/save-post` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePostRequest {
    pub category: String,
    pub headline: String,
    pub source: String,
    pub url: String,
    pub tiktok_title: String,
    pub tiktok_summary: String,
    pub cards: Vec<SavedCard>,
    pub generation_time: f64,
    pub model_used: serde_json::Value,
}

/// Acknowledgement from `/api/save-post`.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedPostRef {
    pub id: String,
    #[serde(default)]
    pub path: String,
}

/// Post summary entry from the saved-posts index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub tiktok_title: String,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    posts: Vec<PostSummary>,
}

/// Full saved-post metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetails {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tiktok_title: String,
    #[serde(default)]
    pub tiktok_summary: String,
    #[serde(default)]
    pub cards: Vec<SavedCard>,
}

/// `/api/status` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStatus {
    pub status: String,
    #[serde(default)]
    pub text_service: String,
    #[serde(default)]
    pub text_health: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::ConfigError(format!("invalid base URL {}: {e}", config.base_url)))?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Error::InitializationError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::ConfigError(format!("invalid endpoint {path}: {e}")))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {path}");
        let res = self.http.post(self.endpoint(path)?).json(body).send().await?;
        Self::decode(res).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {path}");
        let res = self.http.get(self.endpoint(path)?).send().await?;
        Self::decode(res).await
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(Error::BackendStatus { status: status.as_u16(), message });
        }
        Ok(res.json::<T>().await?)
    }

    /// Fetch curated headlines for a news category.
    pub async fn headlines(&self, category: &str, count: usize) -> Result<Vec<Headline>> {
        let res: HeadlinesResponse = self
            .post_json("/api/headlines", &HeadlinesRequest { category, count })
            .await?;
        Ok(res.headlines)
    }

    /// Resolve a pasted article URL into a headline record.
    pub async fn headline_from_url(&self, url: &str) -> Result<Headline> {
        self.post_json("/api/headline-from-url", &HeadlineFromUrlRequest { url })
            .await
    }

    /// Generate the caption + image-prompt sequence for a headline.
    pub async fn generate_content(
        &self,
        headline: &Headline,
        style_prompt: &str,
    ) -> Result<GeneratedContent> {
        self.post_json(
            "/api/generate-content",
            &GenerateContentRequest {
                headline: &headline.headline,
                url: &headline.url,
                source: &headline.source,
                style_prompt,
            },
        )
        .await
    }

    /// Synthesize one base image. `card_number` is 1-indexed.
    pub async fn generate_image(
        &self,
        prompt: &str,
        style_prompt: &str,
        text: &str,
        card_number: usize,
    ) -> Result<GeneratedImage> {
        self.post_json(
            "/api/generate-image",
            &GenerateImageRequest { prompt, style_prompt, text, card_number },
        )
        .await
    }

    /// Persist a finished post.
    pub async fn save_post(&self, post: &SavePostRequest) -> Result<SavedPostRef> {
        self.post_json("/api/save-post", post).await
    }

    /// List saved posts, optionally filtered by category.
    pub async fn posts(&self, category: Option<&str>, limit: usize) -> Result<Vec<PostSummary>> {
        let mut url = self.endpoint("/api/posts")?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(c) = category {
                q.append_pair("category", c);
            }
            q.append_pair("limit", &limit.to_string());
        }
        debug!("GET {url}");
        let res = self.http.get(url).send().await?;
        let res: PostsResponse = Self::decode(res).await?;
        Ok(res.posts)
    }

    /// Fetch full metadata for one saved post.
    pub async fn post_details(&self, post_id: &str) -> Result<PostDetails> {
        self.get_json(&format!("/api/posts/{post_id}")).await
    }

    /// Delete a saved post.
    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        debug!("DELETE /api/posts/{post_id}");
        let res = self
            .http
            .delete(self.endpoint(&format!("/api/posts/{post_id}"))?)
            .send()
            .await?;
        let _: serde_json::Value = Self::decode(res).await?;
        Ok(())
    }

    /// Backend health probe.
    pub async fn status(&self) -> Result<BackendStatus> {
        self.get_json("/api/status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let cfg = ApiConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(ApiClient::new(cfg), Err(Error::ConfigError(_))));
    }

    #[test]
    fn requests_serialize_camel_case() {
        let req = GenerateImageRequest {
            prompt: "a city",
            style_prompt: "neon",
            text: "caption",
            card_number: 2,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stylePrompt"], "neon");
        assert_eq!(json["cardNumber"], 2);
    }

    #[test]
    fn content_response_tolerates_missing_optionals() {
        let content: GeneratedContent = serde_json::from_str(
            r#"{"flashcards":[{"text":"t","imagePrompt":"p"}]}"#,
        )
        .unwrap();
        assert_eq!(content.flashcards.len(), 1);
        assert_eq!(content.flashcards[0].image_prompt, "p");
        assert!(!content.scraped_content);
    }
}
