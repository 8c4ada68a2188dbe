use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wafdiff::{run_report, ColorMode, ReportFormat, ReportOptions, Settings, Status, Surface, Theme, Tool};

#[derive(Parser, Debug)]
#[command(name = "wafdiff")]
#[command(about = "Compare WAF test metrics captured before and after a change")]
struct Args {
    /// Name of the test run; collector output is read from <raw-output>/<test-name>/
    #[arg(short = 'n', long)]
    test_name: String,

    /// Collectors to report on, comma separated (ftw, locust, cAdvisor)
    #[arg(short, long, value_delimiter = ',', required = true)]
    utils: Vec<Tool>,

    /// Directory holding collector output [default: ./data]
    #[arg(short, long)]
    raw_output: Option<PathBuf>,

    /// Directory holding <tool>.threshold.json files
    #[arg(short, long)]
    threshold_conf: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Also write every threshold outcome to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// When to colour the report
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Settings file (default: wafdiff.toml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Size of the terminal stdout is attached to.
fn terminal_surface() -> Surface {
    match crossterm::terminal::size() {
        Ok((columns, lines)) => Surface::new(columns, lines),
        Err(e) => {
            tracing::debug!("no terminal size ({}), assuming {:?}", e, Surface::FALLBACK);
            Surface::FALLBACK
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(raw_output) = args.raw_output {
        settings.raw_output = raw_output;
    }
    if let Some(threshold_conf) = args.threshold_conf {
        settings.threshold_conf = Some(threshold_conf);
    }
    if let Some(color) = args.color {
        settings.color = color;
    }

    let mut tools: Vec<Tool> = Vec::with_capacity(args.utils.len());
    for tool in args.utils {
        if !tools.contains(&tool) {
            tools.push(tool);
        }
    }

    let options = ReportOptions {
        test_name: args.test_name,
        tools,
        raw_output: settings.raw_output.clone(),
        threshold_conf: settings.threshold_conf.clone(),
        format: args.format,
        surface: terminal_surface(),
        minimum: settings.minimum_surface(),
    };
    let theme = Theme::for_mode(settings.color);

    let run = run_report(&options, &theme)?;
    print!("{}", run.text());

    if let Some(export_path) = args.export {
        run.export(&export_path)?;
        println!("Exported threshold outcomes to: {}", export_path.display());
    }

    let failed = run.count(Status::Failed) + run.count(Status::Error);
    if failed > 0 {
        eprintln!("{} of {} thresholds did not pass", failed, run.outcomes.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
