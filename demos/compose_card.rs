//! Composite a single card offline, no backend required.
//!
//! Run with: cargo run --example compose_card

use flashnews::compositor::font::FontStore;
use flashnews::{Card, Compositor};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let fonts = FontStore::discover()?;
    let compositor = Compositor::with_defaults(fonts);

    let lead = Card::lead("Breaking: Market hits record high today", "", "Reuters");
    let composite = compositor.compose(None, &lead)?;
    std::fs::write("card_1.jpg", &composite.jpeg_data)?;
    println!("Wrote card_1.jpg ({}x{})", composite.width, composite.height);

    let follow = Card::follow("Analysts credit steady rate policy for the rally", "");
    let composite = compositor.compose(None, &follow)?;
    std::fs::write("card_2.jpg", &composite.jpeg_data)?;
    println!("Wrote card_2.jpg ({}x{})", composite.width, composite.height);

    Ok(())
}
