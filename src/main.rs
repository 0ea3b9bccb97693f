use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use flashnews::compositor::font::FontStore;
use flashnews::compositor::layout::OverflowPolicy;
use flashnews::{
    event_channel, style_by_id, ApiClient, ApiConfig, AppState, Card, Compositor,
    CompositorConfig, GenerationEvent, Generator, IMAGE_STYLES, NEWS_CATEGORIES,
};

#[derive(Parser)]
#[command(name = "flashnews", version, about = "News-to-flashcard story generator")]
struct Cli {
    /// Base URL of the generation backend
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    api_url: String,

    /// Explicit TTF to composite with (default: discover a system sans)
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch curated headlines for a category
    Headlines {
        #[arg(long, default_value = "Brasil")]
        category: String,
        #[arg(long, default_value_t = 15)]
        count: usize,
    },
    /// Generate a full story and write the composited cards
    Generate {
        /// News category to pull a headline from
        #[arg(long, conflicts_with = "url")]
        category: Option<String>,
        /// Pasted article URL instead of a category headline
        #[arg(long)]
        url: Option<String>,
        /// Which fetched headline to use (0-based)
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Image style preset id
        #[arg(long, default_value = "default")]
        style: String,
        /// Output directory for card_N.jpg files
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Persist the post on the backend after generating
        #[arg(long)]
        save: bool,
    },
    /// Composite a single card offline from local inputs
    Compose {
        /// Caption text
        #[arg(long)]
        text: String,
        /// Base image file (omit for the neutral fill)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Treat as the lead card (requires --source)
        #[arg(long, requires = "source")]
        first: bool,
        /// Source byline for the lead card
        #[arg(long)]
        source: Option<String>,
        /// Truncate overflowing captions with an ellipsis
        #[arg(long)]
        truncate: bool,
        /// Output JPEG path
        #[arg(long, default_value = "card.jpg")]
        out: PathBuf,
    },
    /// List the style presets and news categories
    Styles,
    /// Saved posts on the backend
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },
    /// Backend health check
    Status,
}

#[derive(Subcommand)]
enum PostsAction {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
}

fn load_fonts(font: Option<&PathBuf>) -> anyhow::Result<FontStore> {
    match font {
        Some(path) => FontStore::from_path(path).context("loading font"),
        None => FontStore::discover().context("discovering a system font"),
    }
}

fn client(api_url: &str) -> anyhow::Result<ApiClient> {
    let config = ApiConfig { base_url: api_url.to_string(), ..Default::default() };
    ApiClient::new(config).context("building backend client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Headlines { category, count } => {
            let api = client(&cli.api_url)?;
            let headlines = api.headlines(&category, count).await?;
            for (i, h) in headlines.iter().enumerate() {
                println!("{i:>2}. {} — {} ({})", h.headline, h.source, h.url);
            }
        }
        Command::Generate { category, url, index, style, out, save } => {
            let api = client(&cli.api_url)?;
            let mut state = AppState::default();
            state.selected_style = Some(
                style_by_id(&style)
                    .with_context(|| format!("unknown style '{style}'; see `flashnews styles`"))?,
            );

            state.selected_headline = Some(match (category.as_deref(), url.as_deref()) {
                (_, Some(u)) => api.headline_from_url(u).await?,
                (Some(c), None) => {
                    state.headlines = api.headlines(c, index + 1).await?;
                    state
                        .headlines
                        .get(index)
                        .cloned()
                        .with_context(|| format!("no headline at index {index}"))?
                }
                (None, None) => bail!("pass --category or --url"),
            });
            let headline = state.selected_headline.clone().context("no headline selected")?;
            let style = state.selected_style.context("no style selected")?;
            println!("Headline: {} ({})", headline.headline, headline.source);

            let fonts = load_fonts(cli.font.as_ref())?;
            let generator = Generator::new(api.clone(), Compositor::with_defaults(fonts));
            let (tx, mut rx) = event_channel();
            let progress = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    match event {
                        GenerationEvent::ContentReady { count } => {
                            println!("Content ready: {count} cards");
                        }
                        GenerationEvent::ImageStarted { index, total } => {
                            println!("Generating image {}/{total}...", index + 1);
                        }
                        GenerationEvent::ImageFailed { index, reason } => {
                            println!("Image {} failed ({reason}); using plain card", index + 1);
                        }
                        GenerationEvent::CardComposited { index } => {
                            println!("Card {} composited", index + 1);
                        }
                        _ => {}
                    }
                }
            });

            let post = generator.generate(&headline, style, &tx).await?;
            drop(tx);
            let _ = progress.await;

            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            for (i, composite) in post.composites.iter().enumerate() {
                let path = out.join(format!("card_{}.jpg", i + 1));
                std::fs::write(&path, &composite.jpeg_data)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Wrote {}", path.display());
            }

            if save {
                let cat = category.as_deref().unwrap_or("Web");
                let saved = api.save_post(&post.save_request(cat)).await?;
                println!("Saved post: {}", saved.id);
            }
        }
        Command::Compose { text, image, first, source, truncate, out } => {
            let fonts = load_fonts(cli.font.as_ref())?;
            let config = CompositorConfig {
                overflow: if truncate { OverflowPolicy::Truncate } else { OverflowPolicy::Allow },
                ..Default::default()
            };
            let compositor = Compositor::new(fonts, config);

            let card = if first {
                // clap guarantees --source is present with --first
                Card::lead(text, "", source.unwrap_or_default())
            } else {
                Card::follow(text, "")
            };
            let base = match &image {
                Some(path) => Some(
                    std::fs::read(path).with_context(|| format!("reading {}", path.display()))?,
                ),
                None => None,
            };

            let composite = compositor.compose(base.as_deref(), &card)?;
            std::fs::write(&out, &composite.jpeg_data)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} ({}x{})", out.display(), composite.width, composite.height);
        }
        Command::Styles => {
            println!("Styles:");
            for s in IMAGE_STYLES {
                println!("  {} {} — {}", s.emoji, s.id, s.label);
            }
            println!("Categories: {}", NEWS_CATEGORIES.join(", "));
        }
        Command::Posts { action } => {
            let api = client(&cli.api_url)?;
            match action {
                PostsAction::List { category, limit } => {
                    let posts = api.posts(category.as_deref(), limit).await?;
                    for p in posts {
                        println!("{} [{}] {}", p.id, p.category, p.headline);
                    }
                }
                PostsAction::Show { id } => {
                    let post = api.post_details(&id).await?;
                    println!("{} — {} ({})", post.id, post.headline, post.source);
                    println!("Title: {}", post.tiktok_title);
                    println!("Summary: {}", post.tiktok_summary);
                    for (i, card) in post.cards.iter().enumerate() {
                        println!("  card {}: {}", i + 1, card.text);
                    }
                }
                PostsAction::Delete { id } => {
                    api.delete_post(&id).await?;
                    println!("Deleted {id}");
                }
            }
        }
        Command::Status => {
            let api = client(&cli.api_url)?;
            let status = api.status().await?;
            println!(
                "Backend: {} (text: {} / {})",
                status.status, status.text_service, status.text_health
            );
        }
    }

    Ok(())
}
