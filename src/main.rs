//! spacex-mass - SpaceX payload mass to orbit by year
//!
//! A CLI tool that scrapes the Wikipedia launch lists for Falcon 9,
//! Falcon Heavy and Starship, aggregates payload mass by year and orbit
//! type, and renders a stacked bar chart and a cumulative line chart.
//!
//! Exit codes:
//!   0 - Success (charts shown or written)
//!   1 - Runtime error (network, parse, write failure, bad config, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod models;
mod parser;
mod report;
mod source;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use models::LaunchRecord;
use parser::{classify::OrbitClassifier, LaunchParser};
use source::Fetcher;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("spacex-mass v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .spacex-mass.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize pages, cutoff year, orbit rules, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration and run the pipeline.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    run_pipeline(&config, &args)?;
    Ok(())
}

/// Run the complete fetch, parse, aggregate and render workflow.
///
/// Returns the files written in `--output` mode. Nothing is written unless
/// every earlier step succeeded.
fn run_pipeline(config: &Config, args: &Args) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();
    config.validate()?;

    // Step 1: Fetch every launch list
    let pages = &config.source.pages;
    if !args.quiet {
        println!("📥 Fetching {} launch lists...", pages.len());
    }

    let fetcher = Fetcher::new(&config.source)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let fetched = runtime.block_on(fetcher.fetch_all(pages, !args.quiet))?;
    drop(runtime);

    // Step 2: Parse the launch tables
    let parser = LaunchParser::new(OrbitClassifier::new(&config.classification));
    let records = parser.parse_pages(&fetched)?;

    // Step 3: Aggregate
    let aggregates = analysis::aggregate(&records, config.general.cutoff_year);
    if aggregates.totals.is_empty() {
        warn!("No launch with a counted payload mass; charts will be empty");
    }
    debug!("{} year/orbit cells", aggregates.totals.len());
    debug!("Cumulative series: {:?}", aggregates.series.pairs());

    if !args.quiet {
        print_summary(&records, config.general.verbose);
    }

    // Step 4: Render
    if args.output {
        let mut artifacts = chart::render_svgs(&aggregates);
        if config.output.export_csv {
            artifacts.push(report::render_launches_csv(&records)?);
        }
        let written = report::write_artifacts(&artifacts, &config.output.dir)?;

        if !args.quiet {
            println!(
                "\n✅ Done in {:.1}s. Files written:",
                start_time.elapsed().as_secs_f64()
            );
            for path in &written {
                println!("   📄 {}", path.display());
            }
        }
        Ok(written)
    } else {
        if !args.quiet {
            println!("\n📈 Opening chart window (close it to exit)...");
        }
        chart::show(&aggregates)?;
        Ok(Vec::new())
    }
}

/// Print launch counts and mass coverage.
fn print_summary(records: &[LaunchRecord], per_year: bool) {
    let uncounted = analysis::uncounted_launches(records);
    let total_kg = analysis::mass_by_year(records)
        .values()
        .fold(0u64, |acc, kg| acc.saturating_add(*kg));

    println!("\n📊 Launch Summary:");
    println!("   Launches parsed: {}", records.len());
    println!(
        "   Counted payload mass: {} kg",
        chart::axis::format_thousands(total_kg)
    );
    println!("   Failed or unknown mass: {}", uncounted);

    if per_year {
        let counts = analysis::launch_counts_by_year(records);
        let masses = analysis::mass_by_year(records);
        for (year, count) in &counts {
            println!(
                "     {}: {} launches, {} kg",
                year,
                count,
                chart::axis::format_thousands(masses.get(year).copied().unwrap_or(0))
            );
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e.context(format!("Invalid {}", DEFAULT_CONFIG_FILE))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::error::PipelineError;
    use crate::source::{PageLayout, PageSource};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tempfile::TempDir;

    const FALCON_PAGE: &str = include_str!("../fixtures/falcon_launches.html");

    fn output_args() -> Args {
        Args::try_parse_from(["spacex-mass", "--output", "--quiet"]).unwrap()
    }

    fn config_for(url: String, dir: PathBuf) -> Config {
        let mut config = Config::default();
        config.source.timeout_seconds = 5;
        config.source.pages = vec![PageSource {
            url,
            layout: PageLayout::Falcon,
        }];
        config.output.dir = dir;
        config
    }

    /// Serve `body` once as an HTML page and return its URL.
    fn serve_page(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        format!("http://{}/wiki/List", addr)
    }

    #[test]
    fn test_unreachable_host_writes_nothing() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("outputs");
        let config = config_for(format!("http://127.0.0.1:{}/", port), out.clone());

        let err = run_pipeline(&config, &output_args()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Network { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_mode_writes_charts_and_csv() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("outputs");
        let config = config_for(serve_page(FALCON_PAGE), out.clone());

        let written = run_pipeline(&config, &output_args()).unwrap();

        assert_eq!(
            written,
            vec![
                out.join(chart::BAR_CHART_FILE),
                out.join(chart::LINE_CHART_FILE),
                out.join(report::launches_csv::LAUNCHES_CSV_FILE),
            ]
        );
        let csv = std::fs::read_to_string(&written[2]).unwrap();
        assert!(csv.contains("Transporter-1"));
        assert_eq!(csv.lines().count(), 6);
    }

    #[test]
    fn test_invalid_cutoff_fails_before_fetching() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("outputs");
        let mut config = config_for("http://127.0.0.1:1/".to_string(), out.clone());
        config.general.cutoff_year = -2_000_000_000;

        let err = run_pipeline(&config, &output_args()).unwrap_err();

        assert!(err.to_string().contains("cutoff_year"));
        assert!(!out.exists());
    }
}
