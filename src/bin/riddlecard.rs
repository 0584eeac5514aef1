use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use riddlecard::capture::CameraBackend;
use riddlecard::share::{DownloadDir, NativeShare, NoNativeShare};
use riddlecard::text::FontSet;
use riddlecard::{
    AppConfig, CaptureOrchestrator, CaptureOutcome, Color, Compositor, NoCamera, OutputFormat,
    RiddleCatalog, ShareDispatcher, ShareOutcome, StillImageCamera, Suit, VideoFrame,
};

#[derive(Parser, Debug)]
#[command(name = "riddlecard", version)]
struct Cli {
    /// Application config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List card colors with their accent and suits.
    Colors,
    /// Draw a random riddle for a color.
    Draw(DrawArgs),
    /// Render one share image to a file.
    Render(RenderArgs),
    /// Run the capture and share flow with a photo standing in for the camera.
    Share(ShareArgs),
}

#[derive(Parser, Debug)]
struct DrawArgs {
    #[arg(long)]
    color: String,

    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the answer too.
    #[arg(long)]
    answer: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long)]
    color: String,

    #[arg(long)]
    suit: String,

    /// Photo drawn inside the camera circle.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Parser, Debug)]
struct ShareArgs {
    #[arg(long)]
    color: String,

    /// Fixed suit; a random one is drawn otherwise.
    #[arg(long)]
    suit: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Photo used as the live camera frame; without it the camera is reported missing.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Download directory, overriding the config.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for OutputFormat {
    fn from(f: FormatChoice) -> Self {
        match f {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Jpeg => OutputFormat::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = AppConfig::load(cli.config.as_deref()).context("load config")?;
    match cli.cmd {
        Command::Colors => cmd_colors(&cfg),
        Command::Draw(args) => cmd_draw(&cfg, args),
        Command::Render(args) => runtime()?.block_on(cmd_render(&cfg, args)),
        Command::Share(args) => runtime()?.block_on(cmd_share(&cfg, args)),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")
}

fn load_catalog(cfg: &AppConfig) -> anyhow::Result<RiddleCatalog> {
    match &cfg.catalog {
        Some(path) => RiddleCatalog::from_path(path)
            .with_context(|| format!("load catalog '{}'", path.display())),
        None => RiddleCatalog::builtin().context("load built-in catalog"),
    }
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn compositor(cfg: &AppConfig) -> anyhow::Result<Compositor> {
    let fonts = FontSet::resolve(&cfg.fonts).context("resolve fonts")?;
    Ok(Compositor::new(fonts).with_encode_timeout(cfg.encode_timeout()))
}

fn cmd_colors(cfg: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(cfg)?;
    let suits: Vec<String> = catalog
        .suits()
        .iter()
        .map(|s| format!("{} {s}", s.glyph()))
        .collect();
    for color in catalog.colors() {
        println!(
            "{color:<6} {}  {}",
            cfg.theme.palette.accent(color),
            suits.join("  ")
        );
    }
    Ok(())
}

fn cmd_draw(cfg: &AppConfig, args: DrawArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(cfg)?;
    let mut rng = rng_for(args.seed);
    let riddle = catalog.random_riddle_named(&args.color, &mut rng)?;
    println!("{} {} {}", riddle.color, riddle.suit.glyph(), riddle.suit);
    println!("{}", riddle.question);
    if args.answer && !riddle.answer.is_empty() {
        println!("answer: {}", riddle.answer);
    }
    Ok(())
}

async fn cmd_render(cfg: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(cfg)?;
    let color: Color = args.color.parse()?;
    let suit: Suit = args.suit.parse()?;
    let riddle = catalog.riddle(color, suit);

    let frame = args
        .photo
        .as_deref()
        .map(VideoFrame::from_image_path)
        .transpose()
        .context("load photo")?;

    let mut request = cfg.theme.request_for(&riddle);
    if let Some(format) = args.format {
        request.format = format.into();
    }

    let mut compositor = compositor(cfg)?;
    let image = compositor
        .compose(&request, frame.as_ref())
        .await
        .context("compose share image")?;
    write_file(&args.out, &image.bytes)?;
    println!(
        "wrote {} ({}x{}, {} bytes)",
        args.out.display(),
        image.width,
        image.height,
        image.bytes.len()
    );
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

async fn cmd_share(cfg: &AppConfig, args: ShareArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(cfg)?;
    let color: Color = args.color.parse()?;
    let riddle = match args.suit.as_deref() {
        Some(s) => catalog.riddle(color, s.parse()?),
        None => catalog.random_riddle(color, &mut rng_for(args.seed)),
    };

    let downloads = DownloadDir::new(
        args.out_dir
            .clone()
            .unwrap_or_else(|| cfg.share.download_dir.clone()),
    );

    let camera = match &args.photo {
        Some(path) => Some(
            StillImageCamera::from_path(path)
                .with_context(|| format!("load photo '{}'", path.display()))?,
        ),
        None => None,
    };

    match (camera, cfg.share.command_share()) {
        (Some(cam), Some(native)) => run_share(cfg, cam, native, downloads, &riddle).await,
        (Some(cam), None) => run_share(cfg, cam, NoNativeShare, downloads, &riddle).await,
        (None, Some(native)) => {
            run_share(cfg, NoCamera::default(), native, downloads, &riddle).await
        }
        (None, None) => {
            run_share(cfg, NoCamera::default(), NoNativeShare, downloads, &riddle).await
        }
    }
}

async fn run_share<C: CameraBackend, S: NativeShare>(
    cfg: &AppConfig,
    camera: C,
    native: S,
    downloads: DownloadDir,
    riddle: &riddlecard::Riddle,
) -> anyhow::Result<()> {
    let dispatcher = ShareDispatcher::new(native, downloads, cfg.share.meta.clone());
    let orchestrator = CaptureOrchestrator::new(
        camera,
        compositor(cfg)?,
        dispatcher,
        cfg.theme.clone(),
        cfg.capture_settings(),
    );

    if let Some(err) = orchestrator.open().await {
        eprintln!("{}", err.user_message());
    }
    let outcome = orchestrator.capture(riddle).await.context("capture share image");
    orchestrator.close();

    match outcome? {
        CaptureOutcome::Delivered(ShareOutcome::Shared) => println!("shared"),
        CaptureOutcome::Delivered(ShareOutcome::Downloaded(path)) => {
            println!("Image downloaded to {}", path.display());
        }
        CaptureOutcome::Discarded => println!("capture discarded"),
    }
    Ok(())
}
