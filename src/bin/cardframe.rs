use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardframe::{
    CanvasSpace, CardAssets, CpuRenderer, EditorSession, ExportFormat, InteractionMode,
    NameCatalog, Point, Template,
};

#[derive(Parser, Debug)]
#[command(name = "cardframe", version)]
struct Cli {
    /// Log at debug level (otherwise `RUST_LOG` or `warn`).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a card from a template, a photo and a name.
    Compose(ComposeArgs),
    /// List or search the name catalog.
    Names(NamesArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template JSON. Artwork and font paths are relative to its directory.
    #[arg(long)]
    template: PathBuf,

    /// Photo to place inside the mask.
    #[arg(long)]
    photo: PathBuf,

    /// Name drawn under the photo.
    #[arg(long, conflicts_with = "name_id")]
    name: Option<String>,

    /// Pick the name by id from `--catalog`.
    #[arg(long, requires = "catalog")]
    name_id: Option<u64>,

    /// Name catalog JSON.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output path for the full-resolution card.
    #[arg(long)]
    out: PathBuf,

    /// Width of the simulated preview container, in pixels.
    #[arg(long, default_value_t = 472.0)]
    preview_width: f64,

    /// Also write the preview canvas (with handles) as PNG.
    #[arg(long)]
    preview_out: Option<PathBuf>,

    /// JSON array of pointer events replayed against the preview before export.
    #[arg(long)]
    gestures: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = InteractionMode::Handles)]
    mode: InteractionMode,

    #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,
}

#[derive(Parser, Debug)]
struct NamesArgs {
    /// Name catalog JSON.
    #[arg(long)]
    catalog: PathBuf,

    /// Only print labels containing this text (case and diacritics ignored).
    #[arg(long)]
    query: Option<String>,
}

/// One recorded preview event.
#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
enum Gesture {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Click { x: f64, y: f64 },
    Wheel { delta_y: f64 },
    ResizeViewport { width: f64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Names(args) => cmd_names(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let template = Template::from_path(&args.template)?;
    let assets_root = args
        .template
        .parent()
        .unwrap_or_else(|| Path::new("."));
    let assets = CardAssets::load(&template, assets_root)?;

    let name = resolve_name(&args)?;
    let mut session = EditorSession::new(template, args.mode)?;
    session.observe_viewport(args.preview_width);
    session.set_name(name);

    let photo = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    session.load_photo_bytes(&photo)?;

    if let Some(path) = &args.gestures {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open gesture script '{}'", path.display()))?;
        let script: Vec<Gesture> = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse gesture script '{}'", path.display()))?;
        replay(&mut session, &script);
    }

    if !session.can_export() {
        anyhow::bail!("export needs a non-empty name");
    }

    let mut renderer = CpuRenderer::new(assets);

    if let Some(path) = &args.preview_out {
        let scene = session.scene(CanvasSpace::Preview)?;
        let frame = renderer.render(&scene)?;
        let bytes = cardframe::encode_frame(&frame, ExportFormat::Png)?;
        write_output(path, &bytes)?;
    }

    let bytes = cardframe::export_card(&session, &mut renderer, args.format)?;
    write_output(&args.out, &bytes)
}

fn resolve_name(args: &ComposeArgs) -> anyhow::Result<String> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }
    let (Some(id), Some(catalog)) = (args.name_id, &args.catalog) else {
        anyhow::bail!("pass --name or --catalog with --name-id");
    };
    let catalog = NameCatalog::from_path(catalog)?;
    let entry = catalog
        .get(id)
        .with_context(|| format!("name id {id} not found in '{}'", catalog_path(args)))?;
    Ok(entry.name.clone())
}

fn catalog_path(args: &ComposeArgs) -> String {
    args.catalog
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn replay(session: &mut EditorSession, script: &[Gesture]) {
    for g in script {
        match *g {
            Gesture::PointerDown { x, y } => {
                let target = session.pointer_down(Point::new(x, y));
                tracing::debug!(?target, x, y, "pointer down");
            }
            Gesture::PointerMove { x, y } => session.pointer_move(Point::new(x, y)),
            Gesture::PointerUp => {
                session.pointer_up();
            }
            Gesture::Click { x, y } => {
                session.click(Point::new(x, y));
            }
            Gesture::Wheel { delta_y } => {
                session.wheel(delta_y);
            }
            Gesture::ResizeViewport { width } => session.observe_viewport(width),
        }
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_names(args: NamesArgs) -> anyhow::Result<()> {
    let catalog = NameCatalog::from_path(&args.catalog)?;
    let options = match &args.query {
        Some(q) => catalog.search(q),
        None => catalog.options(),
    };
    for o in options {
        println!("{}", o.label);
    }
    Ok(())
}
