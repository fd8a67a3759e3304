use std::path::PathBuf;

use clap::Parser;
use log::error;
use phenocube::config::{DebugConfig, DebugMode, LogLevel};
use phenocube::read_data;

#[derive(Parser, Debug)]
#[command(
    name = "phenocube",
    version = env!("CARGO_PKG_VERSION"),
    about = "Read a hyperspectral datacube and summarize its metadata",
    long_about = None,
)]
struct Cli {
    /// Binary data file; the header is read from <DATA_FILE>.hdr
    data_file: PathBuf,
    /// Debug configuration (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Preview handling: disabled, plot, print
    #[arg(short, long, value_parser = parse_debug_mode)]
    debug: Option<DebugMode>,
    /// Directory for printed previews
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Device counter used in preview file names
    #[arg(long)]
    device: Option<u32>,
    /// Log verbosity: error, warn, info, debug, trace
    #[arg(short, long, default_value = "warn", value_parser = parse_log_level)]
    log_level: LogLevel,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn parse_debug_mode(s: &str) -> Result<DebugMode, String> {
    match s.to_lowercase().as_str() {
        "disabled" | "none" | "off" => Ok(DebugMode::Disabled),
        "plot" => Ok(DebugMode::Plot),
        "print" => Ok(DebugMode::Print),
        _ => Err(format!(
            "Unknown debug mode '{s}'. Use: disabled, plot, print"
        )),
    }
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    match s.to_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" | "warning" => Ok(LogLevel::Warn),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        _ => Err(format!(
            "Unknown log level '{s}'. Use: error, warn, info, debug, trace"
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.to_level_filter())
        .format_target(false)
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(path) => match DebugConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("--config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => DebugConfig::default(),
    };
    if let Some(mode) = cli.debug {
        config.mode = mode;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(device) = cli.device {
        config.device_counter = device;
    }

    let record = match read_data(&cli.data_file, &config) {
        Ok(record) => record,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&record.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize summary: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", record.summary());
    }
}
