//! End-to-end story generation against a running backend.
//!
//! Run with: cargo run --example generate_post
//! Expects the generation backend on http://localhost:8000.

use flashnews::compositor::font::FontStore;
use flashnews::{
    event_channel, ApiClient, ApiConfig, Compositor, GenerationEvent, Generator, IMAGE_STYLES,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let api = ApiClient::new(ApiConfig::default())?;
    let fonts = FontStore::discover()?;
    let generator = Generator::new(api.clone(), Compositor::with_defaults(fonts));

    let mut headlines = api.headlines("Tecnologia", 5).await?;
    anyhow::ensure!(!headlines.is_empty(), "backend returned no headlines");
    let headline = headlines.remove(0);
    println!("Headline: {} ({})", headline.headline, headline.source);

    let (tx, mut rx) = event_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let GenerationEvent::ImageStarted { index, total } = event {
                println!("image {}/{total}...", index + 1);
            }
        }
    });

    let post = generator.generate(&headline, &IMAGE_STYLES[0], &tx).await?;
    drop(tx);
    let _ = printer.await;

    for (i, composite) in post.composites.iter().enumerate() {
        let path = format!("card_{}.jpg", i + 1);
        std::fs::write(&path, &composite.jpeg_data)?;
        println!("Wrote {path}");
    }
    Ok(())
}
