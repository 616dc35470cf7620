use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use cmtquery::{Cmt, Config, Entry, Query, QueryOutput, ReportFormat, Reporter};

/// cmtquery - Query CMT projects, package uses and missing packages
#[derive(Parser, Debug)]
#[command(name = "cmtquery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CMT executable to run (overrides configuration)
    #[arg(long, global = true, value_name = "BIN")]
    tool: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Output file (for json format)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Do not show cmtpath / root paths in terminal output
    #[arg(long, global = true)]
    no_paths: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the projects visible from a directory (`cmt show projects`)
    Projects {
        /// Directory to run CMT in
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// List what the package in a directory uses (`cmt show uses`)
    Uses {
        /// Directory to run CMT in
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// List packages CMT could not find (`cmt show uses` warnings)
    Missing {
        /// Directory to run CMT in
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

impl Command {
    fn query(&self) -> Query {
        match self {
            Command::Projects { .. } => Query::Projects,
            Command::Uses { .. } => Query::Uses,
            Command::Missing { .. } => Query::Missing,
        }
    }

    fn dir(&self) -> &Path {
        match self {
            Command::Projects { dir } | Command::Uses { dir } | Command::Missing { dir } => dir,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Terminal,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("cmtquery v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_query(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(cli.command.dir())?
    };

    // Override with CLI arguments
    if let Some(tool) = &cli.tool {
        config.tool = tool.clone();
    }
    if let Some(format) = &cli.format {
        config.report.format = match format {
            OutputFormat::Terminal => "terminal".to_string(),
            OutputFormat::Json => "json".to_string(),
        };
    }
    if cli.no_paths {
        config.report.show_paths = false;
    }

    debug!("Using configuration: {:?}", config);
    Ok(config)
}

fn run_query(config: &Config, cli: &Cli) -> Result<()> {
    let cmt = Cmt::from_config(config);
    let query = cli.command.query();
    let dir = cli.command.dir();

    info!("Running {} query in {}", query.as_str(), dir.display());

    let output: QueryOutput<Vec<Entry>> = match query {
        Query::Projects => cmt
            .projects(dir)
            .into_diagnostic()?
            .map(|projects| projects.into_iter().map(Entry::from).collect()),
        Query::Uses => cmt.uses(dir).into_diagnostic()?,
        Query::Missing => cmt
            .missing(dir)
            .into_diagnostic()?
            .map(|packages| packages.into_iter().map(Entry::from).collect()),
    };

    // Missing-package warnings are the data for `missing`; otherwise pass
    // CMT's diagnostics through when it failed.
    if !output.success() && query != Query::Missing && !cli.quiet {
        for line in output.stderr.lines() {
            eprintln!("{} {}", "cmt:".dimmed(), line);
        }
    }

    let format = ReportFormat::from_name(&config.report.format);
    let reporter =
        Reporter::new(format, cli.output.clone()).with_paths(config.report.show_paths);
    reporter.report(query, &output)?;

    Ok(())
}
