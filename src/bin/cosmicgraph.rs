//! cosmicgraph CLI: load COSMIC exports and PubMed references into a graph.
//!
//! Usage:
//!   cosmicgraph load <kind> <file> [--db path] [--journal path]
//!   cosmicgraph pubmed origin <ids>... [--citations] [--reset]
//!   cosmicgraph pubmed cosmic <file> [--citations]
//!   cosmicgraph pubmed clear
//!   cosmicgraph stats

use clap::{Parser, Subcommand, ValueEnum};
use cosmicgraph::config::{LoaderConfig, NcbiCredentials};
use cosmicgraph::model::{
    CosmicBreakpoint, CosmicClassification, CosmicCompleteCna, CosmicDiffMethylation,
    CosmicGeneCensus, CosmicHallmark, CosmicHgnc, CosmicMutation, CosmicResistanceMutation,
    CosmicSample, CosmicTumor, ParseContext,
};
use cosmicgraph::pipeline::{load_records, CancellationToken, LoadOptions, RateLimit};
use cosmicgraph::pubmed::{
    collect_pubmed_ids, DeadLetterLog, EutilsFetcher, ReferenceGraphWalker, WalkOptions,
};
use cosmicgraph::resolve::{EntityKind, GraphMerger, ANNOTATION_LABEL};
use cosmicgraph::source::{DelimitedFile, TumorTypes};
use cosmicgraph::storage::{GraphStore, JournaledStore, NodeFilter, OpenStore, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cosmicgraph",
    version,
    about = "Load COSMIC and PubMed data into a property graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append the Cypher text of every write to this file
    #[arg(long, global = true)]
    journal: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one COSMIC export file
    Load {
        /// Record kind held by the file
        kind: RecordKind,
        /// Tab- or comma-separated file with a header row
        file: PathBuf,
    },
    /// Walk PubMed references and citations
    Pubmed {
        #[command(subcommand)]
        action: PubmedAction,
    },
    /// Print node and relationship counts
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    Tumor,
    Sample,
    Mutation,
    GeneCensus,
    Hgnc,
    Classification,
    Breakpoint,
    Cna,
    Methylation,
    Resistance,
    Hallmark,
}

#[derive(Subcommand)]
enum PubmedAction {
    /// Walk the given PubMed ids as origins
    Origin {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Also link the articles citing each origin
        #[arg(long)]
        citations: bool,
        /// Delete each origin first so it is rebuilt from scratch
        #[arg(long)]
        reset: bool,
    },
    /// Walk every PubMed id cited in a COSMIC file
    Cosmic {
        file: PathBuf,
        /// Also link the articles citing each origin
        #[arg(long)]
        citations: bool,
    },
    /// Remove walk relationships and role labels, keeping the articles
    Clear,
}

fn load_config(cli: &Cli) -> Result<LoaderConfig, String> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path).map_err(|e| e.to_string())?,
        None => LoaderConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Some(journal) = &cli.journal {
        config.cypher_journal = Some(journal.clone());
    }
    Ok(config)
}

fn open_store(config: &LoaderConfig) -> Result<Arc<dyn GraphStore>, String> {
    let store = SqliteStore::open(&config.database)
        .map_err(|e| format!("Failed to open database: {}", e))?;
    match &config.cypher_journal {
        Some(path) => {
            let journaled = JournaledStore::open(store, path)
                .map_err(|e| format!("Failed to open journal: {}", e))?;
            Ok(Arc::new(journaled))
        }
        None => Ok(Arc::new(store)),
    }
}

fn parse_context(config: &LoaderConfig) -> Result<ParseContext, String> {
    let tumor_types = match &config.cosmic.tumor_type_abbreviations {
        Some(path) => TumorTypes::load(path).map_err(|e| e.to_string())?,
        None => TumorTypes::new(),
    };
    Ok(ParseContext::new(tumor_types))
}

fn build_walker(
    merger: &GraphMerger,
    config: &LoaderConfig,
    citations: bool,
    cancel: &CancellationToken,
) -> Result<ReferenceGraphWalker, String> {
    let fetcher = EutilsFetcher::new(&config.pubmed, NcbiCredentials::from_env())
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
    let dead_letters = DeadLetterLog::open(config.dead_letter_path())
        .map_err(|e| format!("Failed to open dead-letter log: {}", e))?;
    let mut options = WalkOptions::from_settings(&config.pubmed);
    options.expand_citations |= citations;
    Ok(ReferenceGraphWalker::new(
        merger.clone(),
        Arc::new(fetcher),
        dead_letters,
        options,
    )
    .with_cancellation(cancel.clone()))
}

async fn cmd_load(
    merger: &GraphMerger,
    config: &LoaderConfig,
    kind: RecordKind,
    file: &Path,
    cancel: &CancellationToken,
) -> i32 {
    let context = match parse_context(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let options = LoadOptions {
        channel_capacity: config.pipeline.channel_capacity,
        rate: RateLimit::from_option(config.pipeline.records_per_second),
        context,
    };
    let source = DelimitedFile::new(file);
    let result = match kind {
        RecordKind::Tumor => load_records::<CosmicTumor, _>(&source, merger, &options, cancel).await,
        RecordKind::Sample => load_records::<CosmicSample, _>(&source, merger, &options, cancel).await,
        RecordKind::Mutation => {
            load_records::<CosmicMutation, _>(&source, merger, &options, cancel).await
        }
        RecordKind::GeneCensus => {
            load_records::<CosmicGeneCensus, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Hgnc => load_records::<CosmicHgnc, _>(&source, merger, &options, cancel).await,
        RecordKind::Classification => {
            load_records::<CosmicClassification, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Breakpoint => {
            load_records::<CosmicBreakpoint, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Cna => {
            load_records::<CosmicCompleteCna, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Methylation => {
            load_records::<CosmicDiffMethylation, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Resistance => {
            load_records::<CosmicResistanceMutation, _>(&source, merger, &options, cancel).await
        }
        RecordKind::Hallmark => {
            load_records::<CosmicHallmark, _>(&source, merger, &options, cancel).await
        }
    };
    match result {
        Ok(report) => {
            println!("{}", report);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_pubmed_origin(walker: &ReferenceGraphWalker, ids: &[String], reset: bool) -> i32 {
    if reset {
        for id in ids {
            if let Err(e) = walker.reset_origin(id) {
                eprintln!("Error: cannot reset {}: {}", id, e);
                return 1;
            }
        }
    }
    match walker.walk_origins(ids).await {
        Ok(report) => {
            println!("{}", report);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_pubmed_cosmic(walker: &ReferenceGraphWalker, file: &Path) -> i32 {
    let ids = match collect_pubmed_ids(&DelimitedFile::new(file)) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if ids.is_empty() {
        println!("No PubMed ids in {}", file.display());
        return 0;
    }
    match walker.walk_cosmic_articles(&ids).await {
        Ok(report) => {
            println!("{}", report);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_pubmed_clear(walker: &ReferenceGraphWalker) -> i32 {
    match walker.clear_walk_state() {
        Ok(cleared) => {
            println!(
                "Removed {} relationships and {} role labels",
                cleared.relationships, cleared.labels
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_stats(store: &dyn GraphStore) -> i32 {
    let totals = store.count_nodes().and_then(|nodes| {
        let edges = store.count_edges()?;
        let skeletons = store
            .find_nodes(&NodeFilter::new().with_skeleton(true))?
            .len();
        Ok((nodes, edges, skeletons))
    });
    let (nodes, edges, skeletons) = match totals {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("{:<28}  {:>10}", "LABEL", "NODES");
    println!("{}", "-".repeat(40));
    let labels = EntityKind::LABELLED
        .iter()
        .map(|kind| kind.label())
        .chain([ANNOTATION_LABEL]);
    for label in labels {
        match store.count_label(label) {
            Ok(0) => {}
            Ok(n) => println!("{:<28}  {:>10}", label, n),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    println!("{}", "-".repeat(40));
    println!("{:<28}  {:>10}", "nodes", nodes);
    println!("{:<28}  {:>10}", "  of which skeletons", skeletons);
    println!("{:<28}  {:>10}", "relationships", edges);
    0
}

async fn run(cli: Cli) -> i32 {
    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let merger = GraphMerger::new(Arc::clone(&store));
    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrl_c();

    match cli.command {
        Commands::Load { kind, file } => cmd_load(&merger, &config, kind, &file, &cancel).await,
        Commands::Stats => cmd_stats(store.as_ref()),
        Commands::Pubmed { action } => {
            let citations = match &action {
                PubmedAction::Origin { citations, .. } | PubmedAction::Cosmic { citations, .. } => {
                    *citations
                }
                PubmedAction::Clear => false,
            };
            let walker = match build_walker(&merger, &config, citations, &cancel) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            };
            match action {
                PubmedAction::Origin { ids, reset, .. } => {
                    cmd_pubmed_origin(&walker, &ids, reset).await
                }
                PubmedAction::Cosmic { file, .. } => cmd_pubmed_cosmic(&walker, &file).await,
                PubmedAction::Clear => cmd_pubmed_clear(&walker),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let code = run(cli).await;
    std::process::exit(code);
}
