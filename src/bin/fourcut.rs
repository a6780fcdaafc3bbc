use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fourcut", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frames of a catalog.
    Frames(FramesArgs),
    /// Compose four photos into a frame and write a PNG.
    Compose(ComposeArgs),
    /// Print resolved slot geometry as JSON.
    Geometry(GeometryArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Frame catalog JSON (built-in frames when omitted).
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Frame id.
    #[arg(long)]
    frame: u32,

    /// Photo file, once per slot in slot order.
    #[arg(long = "photo", num_args = 1, required = true)]
    photos: Vec<PathBuf>,

    /// Pan offset `X,Y` in slot pixels, once per slot.
    #[arg(long = "pan", value_parser = parse_pan, allow_hyphen_values = true)]
    pans: Vec<fourcut::PanOffset>,

    /// Frame catalog JSON.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Booth config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of caption fonts.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Device pixel scale for the canonical 1200x1600 output.
    #[arg(long, conflicts_with = "preview_width")]
    scale: Option<f64>,

    /// Render a preview this many pixels wide instead.
    #[arg(long)]
    preview_width: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print the SHA-256 content key of the PNG.
    #[arg(long)]
    print_key: bool,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Frame id.
    #[arg(long)]
    frame: u32,

    /// Canvas width in pixels.
    #[arg(long)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long)]
    height: u32,

    /// Frame catalog JSON.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Geometry(args) => cmd_geometry(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_pan(s: &str) -> Result<fourcut::PanOffset, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad pan x '{x}': {e}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad pan y '{y}': {e}"))?;
    Ok(fourcut::PanOffset::new(x, y))
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<fourcut::FrameCatalog> {
    Ok(match path {
        Some(p) => fourcut::FrameCatalog::from_path(p)?,
        None => fourcut::FrameCatalog::builtin(),
    })
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    for frame in catalog.frames() {
        println!("{}\t{}", frame.id, frame.name);
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    if args.photos.len() != fourcut::SLOT_COUNT {
        anyhow::bail!(
            "expected {} --photo arguments, got {}",
            fourcut::SLOT_COUNT,
            args.photos.len()
        );
    }
    if !args.pans.is_empty() && args.pans.len() != fourcut::SLOT_COUNT {
        anyhow::bail!(
            "expected 0 or {} --pan arguments, got {}",
            fourcut::SLOT_COUNT,
            args.pans.len()
        );
    }

    let mut cfg = match &args.config {
        Some(p) => fourcut::BoothConfig::from_path(p)?,
        None => fourcut::BoothConfig::default(),
    };
    cfg.apply_env_overrides()?;
    if let Some(catalog) = args.catalog {
        cfg.catalog = Some(catalog);
    }
    if let Some(fonts) = args.fonts {
        cfg.fonts_dir = Some(fonts);
    }

    let target = match (args.preview_width, args.scale) {
        (Some(w), _) => fourcut::RenderTarget::preview(w)?,
        (None, Some(s)) => fourcut::RenderTarget::new(
            cfg.render.logical_width,
            cfg.render.logical_height,
            s,
        )?,
        (None, None) => cfg.final_target()?,
    };

    let catalog = cfg.load_catalog()?;
    let frame = catalog.get(args.frame)?;
    let mut compositor = cfg.build_compositor(&catalog)?;

    let mut sources: [Option<fourcut::PhotoSource>; fourcut::SLOT_COUNT] = Default::default();
    for (slot, path) in sources.iter_mut().zip(&args.photos) {
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        *slot = Some(fourcut::PhotoSource::Encoded(Arc::new(bytes)));
    }
    let mut pans = [fourcut::PanOffset::ZERO; fourcut::SLOT_COUNT];
    for (slot, pan) in pans.iter_mut().zip(&args.pans) {
        *slot = *pan;
    }

    let photos = fourcut::decode_slots(sources);
    for (idx, photo) in photos.iter().enumerate() {
        if let fourcut::SlotPhoto::Failed(reason) = photo {
            eprintln!("slot {idx}: {reason}");
        }
    }

    let surface = compositor.compose(&frame.layout, &photos, &pans, target)?;
    surface.write_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());

    if args.print_key {
        println!("{}", surface.content_key()?);
    }
    Ok(())
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let frame = catalog.get(args.frame)?;
    let geometry = fourcut::FrameGeometry::new(&frame.layout, args.width, args.height);

    let out = serde_json::json!({
        "frame": frame.id,
        "width": geometry.canvas_width,
        "height": geometry.canvas_height,
        "borderPx": geometry.border_px,
        "interior": geometry.interior,
        "footer": geometry.footer,
        "slots": geometry.slots,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize geometry")?
    );
    Ok(())
}
