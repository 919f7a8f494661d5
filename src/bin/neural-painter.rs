use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{builder::RangedU64ValueParser, Args, Parser, Subcommand, ValueEnum};
use neural_painter::{
    Chunking, GenerationConfig, GifAnimation, LogObserver, Network, Painter, RandomArchitecture,
};

const MAX_SIDE: u32 = 1024;
const MAX_LAYERS: usize = 50;
const MAX_HIDDEN: usize = 100;
const MAX_FRAMES: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "neural-painter", version)]
struct Cli {
    /// More log output, repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a single image as a PNG.
    Image(ImageArgs),
    /// Paint a looping animation as a GIF.
    Animate(AnimateArgs),
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// JSON configuration file, flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE as i64))]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SIDE as i64))]
    height: Option<u32>,

    /// Number of dense layers.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_LAYERS as u64))]
    layers: Option<usize>,

    /// Units of every hidden layer.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_HIDDEN as u64))]
    hidden: Option<usize>,

    /// How much of the canvas is evaluated between progress reports.
    #[arg(long, value_enum)]
    chunking: Option<ChunkingChoice>,

    /// Seed for the network weights and activations, random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the generated network as JSON.
    #[arg(long)]
    describe: bool,
}

#[derive(Args, Debug)]
struct ImageArgs {
    #[command(flatten)]
    network: NetworkArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    network: NetworkArgs,

    /// Number of frames in one loop.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_FRAMES as u64))]
    frames: Option<usize>,

    /// Amplitude of the time signal.
    #[arg(long)]
    radius: Option<f32>,

    /// Delay between frames in milliseconds.
    #[arg(long, default_value_t = GifAnimation::<Vec<u8>>::DEFAULT_DELAY_MS)]
    delay_ms: u32,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChunkingChoice {
    Rows,
    Field,
}

impl From<ChunkingChoice> for Chunking {
    fn from(choice: ChunkingChoice) -> Self {
        match choice {
            ChunkingChoice::Rows => Chunking::Rows,
            ChunkingChoice::Field => Chunking::Field,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn load_config(args: &NetworkArgs) -> anyhow::Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(layers) = args.layers {
        config.layer_count = layers;
    }
    if let Some(hidden) = args.hidden {
        config.hidden_width = hidden;
    }
    if let Some(chunking) = args.chunking {
        config.chunking = chunking.into();
    }
    Ok(config)
}

/// Values from a config file don't go through the flag parsers, so the same limits
/// are checked here.
fn check_limits(config: &GenerationConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        config.width <= MAX_SIDE && config.height <= MAX_SIDE,
        "canvas {}x{} exceeds {}x{}",
        config.width,
        config.height,
        MAX_SIDE,
        MAX_SIDE
    );
    anyhow::ensure!(
        config.layer_count <= MAX_LAYERS,
        "{} layers exceed the limit of {}",
        config.layer_count,
        MAX_LAYERS
    );
    anyhow::ensure!(
        config.hidden_width <= MAX_HIDDEN,
        "{} hidden units exceed the limit of {}",
        config.hidden_width,
        MAX_HIDDEN
    );
    anyhow::ensure!(
        config.frame_count <= MAX_FRAMES,
        "{} frames exceed the limit of {}",
        config.frame_count,
        MAX_FRAMES
    );
    Ok(())
}

fn make_painter(config: GenerationConfig, seed: Option<u64>) -> anyhow::Result<Painter> {
    check_limits(&config)?;
    let architecture = match seed {
        Some(seed) => RandomArchitecture::with_seed(seed),
        None => RandomArchitecture::new(),
    };
    Painter::with_architecture(config, architecture).context("invalid configuration")
}

fn describe(network: &Network) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(network).context("serialize network")?;
    println!("{json}");
    Ok(())
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let config = load_config(&args.network)?.still();
    let mut painter = make_painter(config, args.network.seed)?;

    let painting = painter.image(LogObserver::default())?;
    if args.network.describe {
        describe(&painting.network)?;
    }

    create_parent(&args.out)?;
    let pixels = &painting.pixels;
    image::save_buffer_with_format(
        &args.out,
        pixels.as_bytes(),
        pixels.width(),
        pixels.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.network)?;
    if let Some(frames) = args.frames {
        config.frame_count = frames;
    }
    if let Some(radius) = args.radius {
        config.time_radius = radius;
    }
    let mut painter = make_painter(config, args.network.seed)?;

    // a failed animation leaves no half written file behind
    let mut bytes = Vec::new();
    let gif = GifAnimation::new(&mut bytes, args.delay_ms)?;
    let animation = painter.animation(gif, LogObserver::default())?;
    if args.network.describe {
        describe(&animation.network)?;
    }

    create_parent(&args.out)?;
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
