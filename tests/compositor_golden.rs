//! Golden test for the compositor raster.
//!
//! The raster depends on the system font, so the golden is created per
//! machine with `UPDATE_GOLDENS=1` and the test skips when no golden (or no
//! font) is present.

use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use flashnews::compositor::font::FontStore;
use flashnews::{Card, Compositor};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn raster_digest(compositor: &Compositor, card: &Card) -> String {
    let raster = compositor.render(None, card);
    hex::encode(Sha256::digest(raster.as_raw()))
}

#[test]
fn golden_lead_card_raster() {
    let Ok(fonts) = FontStore::discover() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let compositor = Compositor::with_defaults(fonts);
    let card = Card::lead("Breaking: Market hits record high today", "a chart", "Reuters");

    let digest = raster_digest(&compositor, &card);
    let expected_path = golden_path("lead_card.sha256");

    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {expected_path:?}");
        return;
    }

    if !expected_path.exists() {
        println!("No golden at {expected_path:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.");
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}

#[test]
fn raster_is_deterministic() {
    let Ok(fonts) = FontStore::discover() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let compositor = Compositor::with_defaults(fonts);
    let card = Card::follow("Analysts credit steady rate policy", "a trading floor");

    // same inputs, same pixels: layout derives only from text and card kind
    assert_eq!(raster_digest(&compositor, &card), raster_digest(&compositor, &card));
}
