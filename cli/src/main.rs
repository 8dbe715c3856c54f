mod probe;
mod script;
mod store;


use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ring_canvas::assets::DesignStore;
use ring_canvas::config::DocumentConfig;
use ring_canvas::design::DesignDocument;
use ring_canvas::document::Document;
use ring_canvas::error::{AssetError, DocumentError, SceneError};
use ring_canvas::scene::Scene;
use tracing_subscriber::EnvFilter;

use crate::probe::FileImageLoader;
use crate::script::{Runner, ScriptError};
use crate::store::HttpDesignStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("invalid design: {0}")]
    Design(#[from] SceneError),
    #[error("design store failed: {0}")]
    Store(#[from] AssetError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ring-cli", about = "Ring designer document CLI")]
struct Cli {
    #[arg(long, env = "RING_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a command script and write the resulting design document.
    Apply(ApplyArgs),
    /// Print the layer list of a design document, top layer first.
    Inspect { design: PathBuf },
    /// Download a saved design from the design service.
    Fetch {
        design_id: String,
        #[arg(long, help = "Output file path; stdout when omitted")]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[arg(long, help = "JSON command script; image paths resolve relative to it")]
    script: PathBuf,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, help = "Output file path; stdout when omitted")]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Also save the design to the design service")]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Apply(args) => run_apply(&cli.base_url, args).await,
        Command::Inspect { design } => run_inspect(&design),
        Command::Fetch { design_id, out } => run_fetch(&cli.base_url, &design_id, out.as_deref()).await,
    }
}

async fn run_apply(base_url: &str, args: ApplyArgs) -> Result<(), CliError> {
    let text = read_file(&args.script)?;
    let commands = script::parse(&text)?;
    let base = args.script.parent().map(Path::to_path_buf).unwrap_or_default();
    let loader = FileImageLoader::new(base);

    let mut doc = Document::new(DocumentConfig::from_env());
    let mut runner = Runner::new(&loader);
    runner.run(&mut doc, commands).await?;
    eprintln!("applied script: elements={} history={}", doc.scene().len(), doc.history().len());

    let design = doc.design_document(&args.name)?;
    write_json(&serde_json::to_value(&design)?, args.out.as_deref())?;

    if args.save {
        let store = HttpDesignStore::new(base_url);
        let design_id = doc.save(&store, &args.name).await?;
        eprintln!("saved design: {design_id}");
    }
    Ok(())
}

fn run_inspect(path: &Path) -> Result<(), CliError> {
    let design: DesignDocument = serde_json::from_str(&read_file(path)?)?;
    let scene = design.scene()?;
    println!("{} ({} layers)", design.name, scene.len());
    for line in layer_lines(&scene) {
        println!("{line}");
    }
    Ok(())
}

async fn run_fetch(base_url: &str, design_id: &str, out: Option<&Path>) -> Result<(), CliError> {
    let store = HttpDesignStore::new(base_url);
    let design = store.load(design_id).await?;
    // Reject designs this engine could not open.
    design.scene()?;
    write_json(&serde_json::to_value(&design)?, out)
}

/// One line per layer, top of the paint order first.
fn layer_lines(scene: &Scene) -> Vec<String> {
    scene
        .iter()
        .rev()
        .map(|el| {
            let linked = if el.link_id.is_some() { " (linked)" } else { "" };
            format!("{:<8} {}{linked}", el.kind.as_str().to_uppercase(), el.display_name())
        })
        .collect()
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}

fn write_json(value: &serde_json::Value, out: Option<&Path>) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            fs::write(path, rendered).map_err(|source| CliError::Write { path: path.display().to_string(), source })?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
