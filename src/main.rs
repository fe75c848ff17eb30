use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use lingua_tree::build::{self, BuildEvent};
use lingua_tree::emit::OutputFormat;
use lingua_tree::mapping::TreeMapping;
use lingua_tree::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Build(args) => execute_build(args),
    }
}

fn execute_build(args: BuildArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let mapping = match &args.mapping {
        Some(path) => TreeMapping::load(path)?,
        None => TreeMapping::builtin(),
    };

    build::excel_to_tree_with_progress(
        &args.input,
        &args.output,
        &mapping,
        args.format.into(),
        |event| match event {
            BuildEvent::SheetSkipped(skipped) => println!("{skipped}"),
            BuildEvent::RootWritten(root) => println!("{root}"),
            BuildEvent::SheetWritten(_) => {}
        },
    )?;
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Turn a bilingual translation workbook into a tree of JS modules or JSON files."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the translation tree from a workbook.
    Build(BuildArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Workbook holding one translation sheet per tree node.
    #[arg(long, default_value = "translation.xlsx")]
    input: PathBuf,

    /// Root folder of the generated tree.
    #[arg(long, default_value = "./output")]
    output: PathBuf,

    /// Artifact flavour to write.
    #[arg(long, value_enum, default_value_t = FormatKind::Module)]
    format: FormatKind,

    /// JSON file mapping sheet names to output folders.
    #[arg(long)]
    mapping: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatKind {
    /// JavaScript modules (`.js`).
    Module,
    /// JSON documents (`.json`).
    Document,
}

impl From<FormatKind> for OutputFormat {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Module => OutputFormat::Module,
            FormatKind::Document => OutputFormat::Document,
        }
    }
}
