mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use forecast_engine::{ForecastConfig, ForecastEngine, ForecastRequest};
use log::{LevelFilter, info};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for a terminal
    Console,
    /// Full forecast as pretty-printed JSON
    Json,
    /// Markdown tables for pasting into issues
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "forecast-tester", version)]
#[command(about = "Run the encounter forecasting engine against a JSON request and report the outcomes")]
struct Args {
    /// Forecast request JSON (adventurer, items, purchases, upgrades, potions, entropy)
    #[arg(long)]
    request: PathBuf,

    /// Optional forecast config JSON; command-line overrides win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Encounters to look ahead (1-20)
    #[arg(long)]
    horizon: Option<usize>,

    /// Stop each branch at its first level-up
    #[arg(long)]
    halt_on_level_up: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Number of ranked paths to list in console and markdown reports
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = resolve_config(&args)?;
    let engine = ForecastEngine::new(config).context("invalid forecast configuration")?;
    let request = load_request(&args.request)?;

    let start_time = Instant::now();
    let forecast = engine
        .forecast(&request)
        .with_context(|| format!("forecast failed for {}", args.request.display()))?;
    info!(
        "forecast finished in {:?}: {} paths",
        start_time.elapsed(),
        forecast.paths.len()
    );

    let mut out = open_output(args.output.as_deref())?;
    match args.report {
        ReportFormat::Console => {
            reports::write_console_report(&mut out, &forecast, config, args.top)?;
        }
        ReportFormat::Json => reports::write_json_report(&mut out, &forecast)?,
        ReportFormat::Markdown => reports::write_markdown_report(&mut out, &forecast, args.top)?,
    }
    out.flush().context("failed to flush report output")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    // A logger may already be installed when embedded in tests.
    let _ = builder.try_init();
}

fn resolve_config(args: &Args) -> Result<ForecastConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ForecastConfig::from_json(&text)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ForecastConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }
    if args.halt_on_level_up {
        config.halt_on_level_up = true;
    }
    Ok(config)
}

fn load_request(path: &Path) -> Result<ForecastRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse forecast request {}", path.display()))
}

/// Buffered report sink: the `--output` file when given, stdout otherwise.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(stdout().lock())));
    };
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Banner shown at the top of console reports.
pub(crate) fn banner() -> String {
    format!(
        "{}\n{}",
        "🔮 Encounter Forecast".bright_cyan().bold(),
        "=====================".cyan()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["forecast-tester", "--request", "req.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn defaults_use_console_report_and_default_config() {
        let args = parse(&[]);
        assert_eq!(args.report, ReportFormat::Console);
        assert_eq!(args.top, 5);
        assert_eq!(resolve_config(&args).unwrap(), ForecastConfig::default());
    }

    #[test]
    fn command_line_overrides_config() {
        let args = parse(&["--horizon", "4", "--halt-on-level-up", "--report", "json"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.horizon, 4);
        assert!(config.halt_on_level_up);
        assert_eq!(args.report, ReportFormat::Json);
    }

    #[test]
    fn request_is_required() {
        assert!(Args::try_parse_from(["forecast-tester"]).is_err());
    }

    #[test]
    fn output_file_receives_report_bytes() {
        let path = std::env::temp_dir().join(format!("forecast-output-{}.txt", std::process::id()));
        {
            let mut out = open_output(Some(&path)).unwrap();
            write!(out, "ranked").unwrap();
            out.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ranked");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_output_reports_path() {
        let err = open_output(Some(Path::new("/definitely/not/here/out.txt"))).err().unwrap();
        assert!(format!("{err:#}").contains("/definitely/not/here/out.txt"));
    }

    #[test]
    fn missing_request_file_reports_path() {
        let err = load_request(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
