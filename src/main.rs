use anyhow::Context;
use clap::{Parser, Subcommand};
use rankwise::request::{load_config, read_input, SimilarityRequest, TopsisRequest};
use rankwise::{EmbeddingProvider, HashEmbedder, RecommendationBundle, Recommender, TracingAuditSink};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Multi-criteria ranking and similarity recommendations
#[derive(Parser, Debug)]
#[command(name = "rankwise")]
#[command(about = "TOPSIS ranking and vector-similarity recommendations", long_about = None)]
struct Args {
    /// Engine configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Pretty-print the output
    #[arg(long, global = true)]
    pretty: bool,

    /// Decimals for displayed scores (defaults to the configured precision)
    #[arg(long, global = true)]
    precision: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank alternatives of a decision matrix with TOPSIS
    Rank {
        /// Request file, or - for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Recommend the most similar catalog entries for a subject
    Similar {
        /// Request file, or - for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Print the hash embedding of a JSON attribute object
    Embed {
        /// Embedding dimension (defaults to vector_dim, then 64)
        #[arg(long)]
        dim: Option<usize>,
        /// Attributes as a JSON object
        attributes: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(args.config.as_deref())?;
    info!("rankwise v{}", env!("CARGO_PKG_VERSION"));
    info!("Config: {:?}", config);

    let precision = args.precision.unwrap_or(config.display_precision);
    let hash_dim = config.vector_dim.unwrap_or(rankwise::DEFAULT_HASH_DIM);

    match args.command {
        Command::Rank { input } => {
            let request: TopsisRequest = serde_json::from_str(&read_input(&input)?)
                .context("invalid TOPSIS request")?;
            let recommender = Recommender::new(config)?.with_audit_sink(Arc::new(TracingAuditSink));
            let bundle = request.run(&recommender)?;
            print_bundle(&bundle, precision, args.pretty)?;
        }
        Command::Similar { input } => {
            let request: SimilarityRequest = serde_json::from_str(&read_input(&input)?)
                .context("invalid similarity request")?;
            let provider = HashEmbedder::new(hash_dim)?;
            let recommender = Recommender::new(config)?.with_audit_sink(Arc::new(TracingAuditSink));
            let bundle = request.run(&recommender, &provider)?;
            print_bundle(&bundle, precision, args.pretty)?;
        }
        Command::Embed { dim, attributes } => {
            let attributes: serde_json::Value =
                serde_json::from_str(&attributes).context("attributes must be JSON")?;
            let provider = HashEmbedder::new(dim.unwrap_or(hash_dim))?;
            let vector = provider.embed(&attributes)?;
            println!("{}", serde_json::to_string(&vector)?);
        }
    }

    Ok(())
}

fn print_bundle(bundle: &RecommendationBundle, precision: u32, pretty: bool) -> anyhow::Result<()> {
    let display = bundle.rounded(precision);
    let json = if pretty {
        serde_json::to_string_pretty(&display)?
    } else {
        serde_json::to_string(&display)?
    };
    println!("{}", json);
    Ok(())
}
