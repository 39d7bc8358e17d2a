use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hphysics-metadata")]
#[command(about = "Check stored physics publication records, match author names and segment PACS keywords")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split PACS keyword strings into vocabulary codes and leftover phrases
    Segment(SegmentArgs),

    /// Compare two author names given as "Last, Given Given[, Lineage]"
    CompareNames(CompareNamesArgs),

    /// Load and re-dump every document of a JSONL file, reporting anything that does not survive
    Check(CheckArgs),

    /// Look an author name up in an alias store
    ResolveAlias(ResolveAliasArgs),
}

#[derive(Parser, Clone)]
pub struct SegmentArgs {
    /// PACS vocabulary JSON: {"42.50": {"name": "Quantum optics"}, ...}
    #[arg(short, long, required = true)]
    pub vocabulary: String,

    /// Keyword string to segment, units separated by ", "
    #[arg(conflicts_with = "input")]
    pub keywords: Option<String>,

    /// File with one keyword string per line
    #[arg(short, long)]
    pub input: Option<String>,

    /// Write JSONL results here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct CompareNamesArgs {
    /// First name, e.g. "Lukin, M. D."
    pub first: String,

    /// Second name, e.g. "Lukin, Mikhail"
    pub second: String,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct CheckArgs {
    /// JSONL file of dumped documents
    #[arg(short, long, required = true)]
    pub input: String,

    /// Write the re-dumped documents here
    #[arg(short, long)]
    pub output: Option<String>,

    /// Stop at the first document that fails to load
    #[arg(long, default_value = "false")]
    pub fail_fast: bool,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct ResolveAliasArgs {
    /// Alias store (JSONL)
    #[arg(short, long, required = true)]
    pub store: String,

    /// Name to resolve, e.g. "Lukin, M."
    pub name: String,

    /// When the name is not a known alias, store it linked to this person id
    #[arg(long)]
    pub link: Option<String>,

    /// Likelihood recorded with --link
    #[arg(long, default_value = "1.0")]
    pub likelihood: f64,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}
