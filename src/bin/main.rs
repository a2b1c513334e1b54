//! Bard CLI - Parse and validate data API requests
//!
//! Usage:
//!   bard parse --schema <schema.toml> --table <table> [request options]
//!   bard validate --schema <schema.toml> --table <table> [request options]
//!   bard dimension <name> --schema <schema.toml> [--filters ...]
//!   bard schema --schema <schema.toml>
//!
//! Examples:
//!   bard parse --schema schema.toml --table sales --grain day \
//!       --metrics revenue --intervals 2024-01-01/2024-02-01 \
//!       --filters 'region.id-in[US,CA]'
//!   bard schema --schema schema.toml

use bard::config::Settings;
use bard::request::{
    build_data_request, build_dimensions_request, ApiRequest, RequestParameters,
};
use bard::schema::{SchemaCatalog, SchemaResolver};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bard")]
#[command(about = "Bard - Parse and validate analytical data API requests")]
#[command(version)]
struct Cli {
    /// Schema catalog (defaults to [schema].path from the settings)
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a data request and print it as JSON
    Parse(RequestArgs),

    /// Parse and validate a data request
    Validate(RequestArgs),

    /// Parse a dimension values request and print it as JSON
    Dimension {
        /// Dimension name
        name: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// List the tables, dimensions and metrics in the catalog
    Schema,
}

#[derive(Args)]
struct RequestArgs {
    /// Logical table
    #[arg(short, long, default_value = "")]
    table: String,

    /// Time grain: all, hour, day, week, month, quarter, year
    #[arg(short, long)]
    grain: Option<String>,

    /// Grouping dimensions, e.g. region(id|desc),product
    #[arg(short, long)]
    dimensions: Option<String>,

    /// Metrics, comma separated
    #[arg(short, long)]
    metrics: Option<String>,

    /// Intervals, e.g. 2024-01-01/2024-02-01
    #[arg(short, long)]
    intervals: Option<String>,

    /// Filter expressions, e.g. region.id-in[US,CA]
    #[arg(short, long)]
    filters: Option<String>,

    /// Having expressions, e.g. revenue-gt[100]
    #[arg(long)]
    having: Option<String>,

    /// Sorts, e.g. dateTime|asc,revenue|desc
    #[arg(long)]
    sort: Option<String>,

    #[arg(long)]
    count: Option<String>,

    #[arg(long)]
    top_n: Option<String>,

    #[arg(long)]
    per_page: Option<String>,

    #[arg(long)]
    page: Option<String>,

    /// json, jsonapi, csv, debug
    #[arg(long)]
    format: Option<String>,

    /// UTC or an offset such as +05:30
    #[arg(long)]
    time_zone: Option<String>,

    /// never, always, or milliseconds
    #[arg(long)]
    async_after: Option<String>,
}

impl From<RequestArgs> for RequestParameters {
    fn from(args: RequestArgs) -> Self {
        RequestParameters {
            table: args.table,
            granularity: args.grain,
            dimensions: args.dimensions,
            metrics: args.metrics,
            intervals: args.intervals,
            filters: args.filters,
            having: args.having,
            sorts: args.sort,
            count: args.count,
            top_n: args.top_n,
            per_page: args.per_page,
            page: args.page,
            format: args.format,
            time_zone: args.time_zone,
            async_after: args.async_after,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("BARD_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = match load_catalog(cli.schema, &settings) {
        Ok(catalog) => catalog,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Parse(args) => cmd_parse(args.into(), &catalog, &settings, false),
        Commands::Validate(args) => cmd_parse(args.into(), &catalog, &settings, true),
        Commands::Dimension { name, request } => {
            cmd_dimension(&name, request.into(), &catalog, &settings)
        }
        Commands::Schema => cmd_schema(&catalog),
    }
}

fn load_catalog(path: Option<PathBuf>, settings: &Settings) -> Result<SchemaCatalog, String> {
    let path = match path {
        Some(path) => path,
        None => settings
            .schema
            .resolved_path()
            .map_err(|e| format!("Error resolving schema path: {}", e))?
            .ok_or_else(|| "No schema given: pass --schema or set [schema].path".to_string())?,
    };

    let catalog = SchemaCatalog::from_file(&path)
        .map_err(|e| format!("Error loading schema '{}': {}", path.display(), e))?;
    tracing::info!(path = %path.display(), tables = catalog.table_names().len(), "loaded schema");
    Ok(catalog)
}

fn cmd_parse(
    params: RequestParameters,
    catalog: &SchemaCatalog,
    settings: &Settings,
    validate: bool,
) -> ExitCode {
    let built = build_data_request(&params, catalog, settings);
    let result = if validate {
        built.and_then(|request| request.validated())
    } else {
        built
    };

    match result {
        Ok(request) => {
            if validate {
                tracing::info!(table = request.table().name(), "request is valid");
            }
            print_json(&ApiRequest::from(request))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_dimension(
    name: &str,
    params: RequestParameters,
    catalog: &SchemaCatalog,
    settings: &Settings,
) -> ExitCode {
    match build_dimensions_request(name, &params, catalog, settings) {
        Ok(request) => print_json(&ApiRequest::from(request)),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_schema(catalog: &SchemaCatalog) -> ExitCode {
    for name in catalog.table_names() {
        let Some(table) = catalog.resolve_table(name) else {
            continue;
        };
        println!("{}", name);

        let granularities: Vec<String> = table.granularities.iter().map(|g| g.to_string()).collect();
        println!("  granularities: {}", granularities.join(", "));

        println!("  dimensions:");
        for dimension in table.dimension_names() {
            let fields = catalog
                .dimension(dimension)
                .map(|d| d.field_names().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            println!("    - {} ({})", dimension, fields);
        }

        println!("  metrics:");
        for metric in table.metric_names() {
            match catalog.metric(metric).and_then(|m| m.category()) {
                Some(category) => println!("    - {} [{}]", metric, category),
                None => println!("    - {}", metric),
            }
        }
        println!();
    }

    ExitCode::SUCCESS
}

fn print_json(request: &ApiRequest) -> ExitCode {
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing request: {}", e);
            ExitCode::FAILURE
        }
    }
}
