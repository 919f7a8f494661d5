//! Paints a small gallery of seeded stills side by side with the network behind each.

use anyhow::Context as _;
use neural_painter::{GenerationConfig, LogObserver, Painter, RandomArchitecture};
use std::{fs, path::PathBuf};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out = PathBuf::from("gallery");
    fs::create_dir_all(&out).context("create gallery dir")?;

    let config = GenerationConfig {
        width: 128,
        height: 128,
        layer_count: 5,
        hidden_width: 16,
        ..GenerationConfig::default()
    }
    .still();

    for seed in 0..6 {
        let mut painter = Painter::with_architecture(config.clone(), RandomArchitecture::with_seed(seed))?;
        let painting = painter.image(LogObserver::new(0.5))?;

        let activations: Vec<String> = painting
            .network
            .activations()
            .iter()
            .map(|a| a.to_string())
            .collect();
        println!("seed {}: {}", seed, activations.join(" -> "));

        let path = out.join(format!("seed-{}.png", seed));
        fs::write(&path, painting.pixels.to_png()?)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }
    Ok(())
}
