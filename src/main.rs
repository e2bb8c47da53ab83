use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use chainscope::bundle::{Metafile, WebpackStats};
use chainscope::config::{EntryPoints, TracerConfig};
use chainscope::export::{export, ChainReport, ExportFormat};
use chainscope::graph::LookupMode;
use chainscope::parser::ExtractorKind;
use chainscope::plugin::{ImportChainPlugin, StandaloneHost};

#[derive(Parser)]
#[command(name = "chainscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Trace the import chains that pull a file into a JavaScript build", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every import chain from an entry point to each target
    Trace(TraceArgs),
    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct TraceArgs {
    /// Files to trace
    #[arg(required = true)]
    targets: Vec<String>,

    /// Entry point (repeatable); overrides the config file's list
    #[arg(short, long = "entry")]
    entries: Vec<String>,

    /// Also load every source file under this directory
    #[arg(long = "scan")]
    scan_dirs: Vec<PathBuf>,

    /// esbuild metafile to merge
    #[arg(long)]
    metafile: Option<PathBuf>,

    /// webpack stats.json to merge
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Keep node_modules files and bare imports in the graph
    #[arg(long)]
    track_external: bool,

    /// Only match targets by exact (normalized) path
    #[arg(long)]
    strict: bool,

    /// Use the tree-sitter extractor instead of the lexical one
    #[arg(long)]
    syntax: bool,

    /// Maximum number of chains to print
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output format: text, json, markdown
    #[arg(short, long, default_value = "text")]
    format: ExportFormat,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_config(args: &TraceArgs) -> Result<TracerConfig> {
    let mut config = match &args.config {
        Some(path) => TracerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TracerConfig::default(),
    };

    if !args.entries.is_empty() {
        config.entry_points = EntryPoints::List(args.entries.clone());
    }
    if args.track_external {
        config.track_external = true;
    }
    if args.strict {
        config.lookup = LookupMode::Strict;
    }
    if args.syntax {
        config.extractor = ExtractorKind::Syntax;
    }
    if args.limit.is_some() {
        config.chain_limit = args.limit;
    }
    Ok(config)
}

fn run_trace(args: &TraceArgs) -> Result<()> {
    let config = load_config(args)?;
    if config.entry_points.is_empty() {
        anyhow::bail!("no entry points given; pass --entry or set entry_points in the config");
    }
    debug!(?config, "resolved configuration");

    let plugin = ImportChainPlugin::new(config.clone()).context("initializing tracer")?;
    let mut host = args
        .scan_dirs
        .iter()
        .fold(StandaloneHost::new(plugin), |host, dir| host.with_scan_dir(dir));

    let summary = host.build();
    info!(%summary, "graph built");

    if let Some(path) = &args.metafile {
        let metafile = Metafile::from_file(path)
            .with_context(|| format!("reading metafile {}", path.display()))?;
        host.merge_metadata(&metafile);
    }
    if let Some(path) = &args.stats {
        let stats = WebpackStats::from_file(path)
            .with_context(|| format!("reading webpack stats {}", path.display()))?;
        host.merge_metadata(&stats);
    }

    let results = args
        .targets
        .iter()
        .map(|target| host.plugin().get_import_chains(target))
        .collect();
    let report = ChainReport::new(results)
        .with_indent(config.indent.clone())
        .with_limit(config.chain_limit);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    export(args.format, &report, &mut out).context("writing report")?;
    out.flush().context("writing report")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Trace(args)) => run_trace(args)?,
        Some(Commands::Version) => {
            println!("chainscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("chainscope - import chain tracer for JavaScript builds");
            println!("Run 'chainscope trace <FILE> --entry <ENTRY>' to trace a file");
            println!("Run 'chainscope --help' for more information");
        }
    }
    Ok(())
}
