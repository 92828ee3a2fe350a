use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use spotlight_mcp::runtime_env::parse_roots;
use spotlight_mcp::tools::{catalog, ScopePolicy, ToolResponse, ToolRouter};
use spotlight_mcp::ServerConfig;
use std::io;
use std::path::PathBuf;

use flags::EngineFlag;

mod flags;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "spotlight")]
#[command(about = "Search desktop file metadata from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Metadata engine backend
    #[arg(long, global = true, value_enum, env = "SPOTLIGHT_MCP_ENGINE")]
    engine: Option<EngineFlag>,

    /// Require scopes to be existing, readable directories
    #[arg(long, global = true, env = "SPOTLIGHT_MCP_STRICT_SCOPE")]
    strict_scope: bool,

    /// `:`-separated directories every scope and path must stay within
    #[arg(long, global = true, env = "SPOTLIGHT_MCP_ALLOWED_ROOTS")]
    allowed_roots: Option<String>,

    /// Bytes read per file when matching text content (filesystem engine)
    #[arg(long, global = true, env = "SPOTLIGHT_MCP_TEXT_CONTENT_MAX_BYTES")]
    text_content_max_bytes: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find files whose content contains a text
    Search(SearchArgs),

    /// Find files of a kind (document, image, video, audio, pdf, code)
    Kind(KindArgs),

    /// Find files modified since a date
    Recent(RecentArgs),

    /// Print every metadata attribute of one file
    Metadata(MetadataArgs),

    /// Run a native query fragment
    Query(QueryArgs),

    /// Print the tool inventory as JSON
    Tools,
}

#[derive(Args)]
struct ScopeArgs {
    /// Absolute directory to search under
    #[arg(short, long)]
    scope: PathBuf,

    /// Maximum number of results (1-1000)
    #[arg(short, long)]
    limit: Option<i64>,
}

#[derive(Args)]
struct SearchArgs {
    /// Text to look for
    query: String,

    #[command(flatten)]
    scope: ScopeArgs,
}

#[derive(Args)]
struct KindArgs {
    /// Kind name
    kind: String,

    #[command(flatten)]
    scope: ScopeArgs,
}

#[derive(Args)]
struct RecentArgs {
    /// ISO-8601 date or date-time (default: seven days ago)
    #[arg(long)]
    since: Option<String>,

    #[command(flatten)]
    scope: ScopeArgs,
}

#[derive(Args)]
struct MetadataArgs {
    /// Absolute path of the file
    path: PathBuf,
}

#[derive(Args)]
struct QueryArgs {
    /// Query fragment passed to the engine verbatim
    #[arg(long)]
    raw: String,

    #[command(flatten)]
    scope: ScopeArgs,
}

impl Cli {
    fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(engine) = self.engine {
            config.engine = engine.as_domain();
        }
        if self.strict_scope {
            config.scope_policy = ScopePolicy::Strict;
        }
        if let Some(roots) = &self.allowed_roots {
            config.allowed_roots = parse_roots(roots);
        }
        if let Some(max) = self.text_content_max_bytes {
            config.text_content_max_bytes = max;
        }
        config
    }
}

fn scope_arguments(scope: &ScopeArgs) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert(
        "scope".to_string(),
        Value::String(scope.scope.to_string_lossy().into_owned()),
    );
    if let Some(limit) = scope.limit {
        args.insert("limit".to_string(), json!(limit));
    }
    args
}

fn run_tool(router: &ToolRouter, name: &str, args: Map<String, Value>) -> ToolResponse {
    router.call(name, Some(&args))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = cli.config();
    log::debug!("Using {} engine", config.engine.as_str());
    let router = config.build_router();

    let response = match &cli.command {
        Commands::Search(args) => {
            let mut request = scope_arguments(&args.scope);
            request.insert("query".to_string(), Value::String(args.query.clone()));
            run_tool(&router, "search", request)
        }
        Commands::Kind(args) => {
            let mut request = scope_arguments(&args.scope);
            request.insert("kind".to_string(), Value::String(args.kind.clone()));
            run_tool(&router, "search_by_kind", request)
        }
        Commands::Recent(args) => {
            let mut request = scope_arguments(&args.scope);
            if let Some(since) = &args.since {
                request.insert("since".to_string(), Value::String(since.clone()));
            }
            run_tool(&router, "recent_files", request)
        }
        Commands::Metadata(args) => {
            let mut request = Map::new();
            request.insert(
                "path".to_string(),
                Value::String(args.path.to_string_lossy().into_owned()),
            );
            run_tool(&router, "get_metadata", request)
        }
        Commands::Query(args) => router.call_raw(&args.raw, &args.scope.scope, args.scope.limit),
        Commands::Tools => {
            let inventory = catalog::tool_inventory_json(env!("CARGO_PKG_VERSION"));
            print_stdout(&serde_json::to_string_pretty(&inventory)?)?;
            return Ok(());
        }
    };

    print_stdout(&response.text)?;
    if response.is_error {
        std::process::exit(1);
    }
    Ok(())
}
