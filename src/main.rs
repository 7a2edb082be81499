mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use output::{CheckOutput, OverridesOutput};
use py3ready::check;
use py3ready::config::Config;
use py3ready::http::{HttpClient, UreqClient};
use py3ready::requirements;
use py3ready::{LookupService, OverrideStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit status when at least one project blocks Python 3
const EXIT_BLOCKED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Check {
            projects,
            requirements,
        } => run_check(&cli, projects, requirements),
        Command::Overrides => run_overrides(&cli).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_BLOCKED),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the lookup service and override store sharing one HTTP client
fn build_services(cli: &Cli) -> Result<(LookupService, OverrideStore), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let http: Arc<dyn HttpClient> = Arc::new(UreqClient::new(config.timeout()));

    let registry_url = cli
        .registry
        .clone()
        .unwrap_or_else(|| config.registry_url.clone());
    let lookup = LookupService::new(Arc::clone(&http))
        .with_registry_url(registry_url)
        .with_cache_capacity(config.cache_capacity);
    let overrides =
        OverrideStore::new(http, config.overrides_url.clone()).with_extra(&config.overrides);

    Ok((lookup, overrides))
}

/// Returns `Ok(false)` when any project blocks Python 3
fn run_check(
    cli: &Cli,
    projects: &[String],
    requirement_files: &[std::path::PathBuf],
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut specs = projects.to_vec();
    for path in requirement_files {
        specs.extend(requirements::read_specifiers(path)?);
    }
    if specs.is_empty() {
        return Err("No projects given. Pass project names or -r <requirements file>.".into());
    }

    let (lookup, overrides) = build_services(cli)?;
    let entries = check::check_all(&specs, &lookup, &overrides, cli.jobs)?;
    let report = CheckOutput::new(&entries);

    if cli.json {
        output::print_json(&report);
    } else {
        print!("{}", output::render_check_text(&report));
    }

    Ok(report.blockers == 0)
}

fn run_overrides(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (_, overrides) = build_services(cli)?;
    let set = overrides.current();

    if cli.json {
        output::print_json(&OverridesOutput::new(&set));
        return Ok(());
    }

    if set.is_empty() {
        println!("No overrides loaded");
        return Ok(());
    }

    for name in set.sorted() {
        println!("{}", name);
    }
    eprintln!("\n{} project(s), {} list for {}", set.len(), set.source(), set.date());
    Ok(())
}
