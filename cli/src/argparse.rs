use clap::{Args, Parser, Subcommand};
use rwapi::Operator;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rw",
    about = "Query a ReliefWeb style search API",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// TOML file with base_url, appname and timeout_seconds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Application name sent with every request
    #[arg(long, global = true, env = "RWAPI_APPNAME")]
    pub appname: Option<String>,

    /// API base URL, e.g. https://api.reliefweb.int/v1/
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Overall request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log request details
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a resource (reports, jobs, countries, ...)
    Search(SearchArgs),
    /// Fetch a single item of a resource by ID
    Item(ItemArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Resource to query
    pub resource: String,

    /// Full text search
    #[arg(long, short)]
    pub query: Option<String>,

    /// Restrict the full text search to a field (repeatable)
    #[arg(long = "query-field", requires = "query")]
    pub query_fields: Vec<String>,

    /// Operator between the search terms (and, or)
    #[arg(long, requires = "query")]
    pub query_operator: Option<Operator>,

    /// Filter condition: field=value, field!=value, field=a|b or field=from..to (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Operator combining several --filter conditions (and, or)
    #[arg(long, default_value = "and")]
    pub filter_operator: Operator,

    /// Facet on a field, optionally with a date interval: field or field:year|month|day (repeatable)
    #[arg(long = "facet")]
    pub facets: Vec<String>,

    /// Maximum number of buckets for term facets
    #[arg(long)]
    pub facet_limit: Option<u32>,

    /// Comma separated fields to include
    #[arg(long, value_delimiter = ',')]
    pub fields_include: Vec<String>,

    /// Comma separated fields to exclude
    #[arg(long, value_delimiter = ',')]
    pub fields_exclude: Vec<String>,

    /// Sort criterion field:asc or field:desc (repeatable, applied in order)
    #[arg(long = "sort")]
    pub sorts: Vec<String>,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub offset: Option<u32>,

    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long)]
    pub profile: Option<String>,

    /// Print the URL and payload without sending the request
    #[arg(long)]
    pub dry_run: bool,

    /// Print the response body as returned by the API
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct ItemArgs {
    /// Resource the item belongs to
    pub resource: String,

    /// Item ID
    pub id: String,

    /// Comma separated fields to include
    #[arg(long, value_delimiter = ',')]
    pub fields_include: Vec<String>,

    /// Print the response body as returned by the API
    #[arg(long)]
    pub raw: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
