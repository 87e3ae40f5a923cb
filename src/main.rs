//! License Tools CLI
//!
//! Entry point for the `license-tools` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use license_tools::config::DEFAULT_CONFIG_PATH;
use license_tools::tasks::ensure_reconciled;
use license_tools::{
    ExitCode, FsReportWriter, GraphFileResolver, LicenseToolsConfig, PomMetadataFetcher, Tasks,
    ToolError, YamlManifestStore,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "license-tools")]
#[command(about = "Check third-party licenses and generate license reports", version)]
struct Cli {
    /// Path to config file (default: .license-tools.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Project to resolve (default: the dependency graph's root)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the license manifest with the resolved dependencies
    CheckLicenses {
        /// Output the reconciliation in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check licenses, then write the HTML license page
    GenerateLicensePage,

    /// Check licenses, then write the JSON license list
    GenerateLicenseJson,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match LicenseToolsConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => fail(ToolError::from(e)),
    };

    let resolver = match GraphFileResolver::load(&config.dependency_graph) {
        Ok(r) => r,
        Err(e) => fail(ToolError::from(e)),
    };
    let project = cli.project.unwrap_or_else(|| resolver.root().to_string());
    let store = YamlManifestStore::new(&config.manifest);
    let fetcher = PomMetadataFetcher::new(config.expanded_pom_repositories());
    let writer = FsReportWriter::new(
        &config.output_dir,
        config.html_filename.clone(),
        config.json_filename.clone(),
    );

    let tasks = Tasks {
        config: &config,
        project: &project,
        store: &store,
        resolver: &resolver,
        fetcher: &fetcher,
    };

    match cli.command {
        Commands::CheckLicenses { json } => run_check(&tasks, json),
        Commands::GenerateLicensePage => {
            run_report(tasks.generate_license_page(&writer));
        }
        Commands::GenerateLicenseJson => {
            run_report(tasks.generate_license_json(&writer));
        }
    }
}

fn run_check(tasks: &Tasks<'_>, json: bool) {
    let outcome = match tasks.load_inputs().and_then(|inputs| tasks.reconcile(&inputs)) {
        Ok(o) => o,
        Err(e) => fail(e),
    };

    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(ExitCode::Fatal.as_i32());
            }
        }
    } else {
        for record in &outcome.reconciliation.undocumented {
            println!("  undocumented: {}", record.artifact_id);
        }
        for record in &outcome.reconciliation.stale {
            println!("  stale:        {}", record.artifact_id);
        }
    }

    if let Err(e) = ensure_reconciled(tasks.config, &outcome) {
        fail(e);
    }
    if !json {
        println!("License manifest is up to date: {}", tasks.config.manifest.display());
    }
}

fn run_report(result: Result<PathBuf, ToolError>) {
    match result {
        Ok(path) => println!("Wrote: {}", path.display()),
        Err(e) => fail(e),
    }
}

fn fail(error: ToolError) -> ! {
    eprintln!("Error: {}", error);
    process::exit(error.exit_code().as_i32());
}
