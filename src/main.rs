use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dupscan::{
    BackendConfig, CancelToken, DetectionMethod, FsDocumentSource, ScanConfig, ScanPhase,
    ScanProgress, Scanner, SignatureCache,
};

/// Find exact and near-duplicate text documents under a directory.
#[derive(Debug, Parser)]
#[command(name = "dupscan", version, about)]
struct Cli {
    /// Directory to scan.
    root: PathBuf,

    /// Minimum similarity for a near-duplicate pair, in [0, 1].
    #[arg(long, default_value_t = 0.7)]
    threshold: f64,

    /// Word tokens per shingle.
    #[arg(long, default_value_t = 3)]
    shingle_size: usize,

    /// MinHash signature length.
    #[arg(long, default_value_t = 128)]
    num_hashes: usize,

    /// Skip documents whose normalized content is shorter than this many
    /// characters.
    #[arg(long, default_value_t = 50)]
    min_length: usize,

    /// Folder prefix to exclude; repeatable.
    #[arg(long = "exclude-folder")]
    exclude_folders: Vec<String>,

    /// Regex over document paths to exclude; repeatable.
    #[arg(long = "exclude-pattern")]
    exclude_patterns: Vec<String>,

    /// Drop shingles occurring in more than this fraction of documents,
    /// in (0, 1). Disables the signature cache for the run.
    #[arg(long)]
    filter_threshold: Option<f64>,

    /// Seed for reproducible fuzzy results.
    #[arg(long)]
    seed: Option<u64>,

    /// File extensions to scan, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "md,txt")]
    extensions: Vec<String>,

    /// Persistent signature cache file. Without it signatures are
    /// recomputed every run.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Emit the full scan result as JSON instead of a pair listing.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(%err, "scan failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = ScanConfig::new()
        .with_similarity_threshold(cli.threshold)
        .with_shingle_size(cli.shingle_size)
        .with_num_hashes(cli.num_hashes)
        .with_min_content_len(cli.min_length);
    config.exclude_folders = cli.exclude_folders;
    config.exclude_patterns = cli.exclude_patterns;
    config.filter_threshold = cli.filter_threshold;
    config.seed = cli.seed;

    let mut scanner = Scanner::new(config)?;
    if let Some(path) = cli.cache {
        let backend = BackendConfig::redb(path.display().to_string());
        scanner = scanner.with_cache(SignatureCache::open(backend)?);
    }

    let source = FsDocumentSource::new(&cli.root).with_extensions(cli.extensions);
    let on_progress = |progress: ScanProgress| match progress.phase {
        ScanPhase::Reading => {
            tracing::info!(documents = progress.total, "enumerated documents")
        }
        ScanPhase::Comparing if progress.current == 0 => {
            tracing::info!(comparisons = progress.total, "comparing signatures")
        }
        _ => {}
    };

    let result = scanner.scan(&source, &CancelToken::new(), Some(&on_progress))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    for pair in &result.duplicates {
        let method = match pair.method {
            DetectionMethod::Exact => "exact",
            DetectionMethod::Minhash => "minhash",
        };
        println!(
            "{:>6.1}%  {:<7}  {}  {}",
            pair.similarity * 100.0,
            method,
            pair.path_a,
            pair.path_b
        );
    }
    tracing::info!(
        duplicates = result.duplicates.len(),
        scanned = result.scanned_count,
        skipped = result.skipped_count,
        duration_ms = result.duration_ms,
        "scan complete"
    );

    Ok(ExitCode::SUCCESS)
}
