//! Classification report tool - render report heatmaps from label files
//!
//! Usage:
//!   cargo run -- labels.csv
//!   cargo run -- labels.csv --names neg,pos --out showcase/report.png
//!   cargo run -- labels.csv --compare other.csv --mode diff
//!   cargo run -- labels.csv --compare other.csv --mode overlay
//!   cargo run -- --demo 500 --mode overlay

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use classreport::metrics::classification_report_dict;
use classreport::settings::SETTINGS_FILE;
use classreport::{
    ClassificationReport, LabelSet, Renderer, ReportOptions, ReportSettings, Result, ZeroDivision,
};

const DEFAULT_OUTPUT: &str = "classification_report.png";
const DEMO_CLASSES: usize = 4;
const DEMO_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlotMode {
    Single,
    Difference,
    Overlay,
}

fn parse_mode(value: &str) -> Option<PlotMode> {
    match value.to_lowercase().as_str() {
        "single" => Some(PlotMode::Single),
        "diff" | "difference" | "sub" => Some(PlotMode::Difference),
        "overlay" | "compare" | "add" => Some(PlotMode::Overlay),
        _ => None,
    }
}

/// Configuration for the report tool
struct ReportConfig {
    labels_path: Option<PathBuf>,
    compare_path: Option<PathBuf>,
    demo_samples: Option<usize>,
    target_names: Option<Vec<String>>,
    zero_division: Option<ZeroDivision>,
    mode: PlotMode,
    output: PathBuf,
    json_output: Option<PathBuf>,
    settings_path: PathBuf,
    font_path: Option<PathBuf>,
    show_help: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            labels_path: None,
            compare_path: None,
            demo_samples: None,
            target_names: None,
            zero_division: None,
            mode: PlotMode::Single,
            output: PathBuf::from(DEFAULT_OUTPUT),
            json_output: None,
            settings_path: PathBuf::from(SETTINGS_FILE),
            font_path: None,
            show_help: false,
        }
    }
}

impl ReportConfig {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            let arg = args[i].as_str();
            let mut value = || -> std::result::Result<String, String> {
                i += 1;
                args.get(i)
                    .cloned()
                    .ok_or_else(|| format!("{} requires a value", arg))
            };
            match arg {
                "--compare" => config.compare_path = Some(PathBuf::from(value()?)),
                "--names" => {
                    config.target_names =
                        Some(value()?.split(',').map(|s| s.trim().to_string()).collect());
                }
                "--zero-division" => {
                    config.zero_division =
                        Some(value()?.parse().map_err(|e| format!("{}", e))?);
                }
                "--mode" => {
                    let raw = value()?;
                    config.mode = parse_mode(&raw).ok_or_else(|| format!("Unknown mode: {}", raw))?;
                }
                "--out" | "-o" => config.output = PathBuf::from(value()?),
                "--json" => config.json_output = Some(PathBuf::from(value()?)),
                "--config" => config.settings_path = PathBuf::from(value()?),
                "--font" => config.font_path = Some(PathBuf::from(value()?)),
                "--demo" => {
                    let raw = value()?;
                    config.demo_samples =
                        Some(raw.parse().map_err(|_| format!("Invalid sample count: {}", raw))?);
                }
                "--help" | "-h" => config.show_help = true,
                positional if !positional.starts_with('-') => {
                    config.labels_path = Some(PathBuf::from(positional));
                }
                unknown => return Err(format!("Unknown option: {}", unknown)),
            }
            i += 1;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match ReportConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    if config.show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ReportConfig) -> Result<()> {
    let mut settings = ReportSettings::load(&config.settings_path);
    if let Some(font) = &config.font_path {
        settings.render.font_path = Some(font.clone());
    }

    let (primary, secondary) = load_label_sets(config)?;
    if primary.is_empty() {
        println!("No labels given. Pass a label file or --demo <samples>.");
        print_help();
        return Ok(());
    }

    let options = report_options(config, &settings, &primary);
    let metrics = classification_report_dict(&primary.y_true, &primary.y_pred, &options)?;
    println!("{}", metrics.format_table(settings.digits));
    if let Some(path) = &config.json_output {
        metrics.save_json(path)?;
        println!("Report written to {}", path.display());
    }

    let report = ClassificationReport::new(&primary.y_true, &primary.y_pred, &options)?;
    let plot = match (config.mode, &secondary) {
        (PlotMode::Single, _) => report,
        (mode, Some(other_labels)) => {
            let other_options = report_options(config, &settings, other_labels);
            let other = ClassificationReport::new(
                &other_labels.y_true,
                &other_labels.y_pred,
                &other_options,
            )?;
            if mode == PlotMode::Difference {
                (&report - &other)?
            } else {
                (&report + &other)?
            }
        }
        (_, None) => {
            println!("--mode needs --compare <file> (or --demo); drawing a single report");
            report
        }
    };

    let renderer = Renderer::new(settings.render.clone());
    if !renderer.has_font() {
        println!("No font found, labels are skipped. Pass --font <FILE> to draw them.");
    }
    plot.save(&renderer, &config.output)?;
    println!("Saved {}", config.output.display());
    Ok(())
}

fn load_label_sets(config: &ReportConfig) -> Result<(LabelSet, Option<LabelSet>)> {
    if let Some(samples) = config.demo_samples {
        let primary = LabelSet::synthetic(DEMO_CLASSES, samples, 0.8, DEMO_SEED);
        let secondary = LabelSet::synthetic(DEMO_CLASSES, samples, 0.6, DEMO_SEED + 1);
        return Ok((primary, Some(secondary)));
    }

    let primary = match &config.labels_path {
        Some(path) => LabelSet::load(path)?,
        None => LabelSet::default(),
    };
    let secondary = config
        .compare_path
        .as_deref()
        .map(LabelSet::load)
        .transpose()?;
    Ok((primary, secondary))
}

fn report_options(
    config: &ReportConfig,
    settings: &ReportSettings,
    labels: &LabelSet,
) -> ReportOptions {
    ReportOptions {
        target_names: config.target_names.clone(),
        sample_weight: labels.sample_weight.clone(),
        zero_division: config.zero_division.unwrap_or(settings.zero_division),
    }
}

fn print_help() {
    println!(
        r#"Classification report tool - render report heatmaps

USAGE:
    cargo run --bin classreport -- [LABELS_CSV] [OPTIONS]

ARGUMENTS:
    LABELS_CSV              CSV with y_true,y_pred[,weight] columns

OPTIONS:
    --compare <FILE>        Second label file to compare against
    --mode <MODE>           single (default), diff, overlay
    --names <A,B,...>       Class display names in sorted label order
    --zero-division <V>     warn, 0 or 1 (default from config, else 0)
    --out, -o <FILE>        PNG output (default: {DEFAULT_OUTPUT})
    --json <FILE>           Also write the metrics report as JSON
    --config <FILE>         Settings file, TOML or JSON (default: {SETTINGS_FILE})
    --font <FILE>           Font used for labels and annotations
    --demo <SAMPLES>        Use synthetic labels instead of files
    --help, -h              Show this help

EXAMPLES:
    cargo run --bin classreport -- run_a.csv --names cat,dog,bird
    cargo run --bin classreport -- run_a.csv --compare run_b.csv --mode diff
    cargo run --bin classreport -- --demo 500 --mode overlay -o overlay.png
"#
    );
}
