use std::path::PathBuf;
use structopt::StructOpt;

use authscan::config::Config;
use authscan::detection::LineClassifier;
use authscan::input::LogReader;
use authscan::output::{OutputFormat, OutputHandler};

/// SSH login auditing for authentication logs
#[derive(StructOpt, Debug)]
#[structopt(name = "authscan", about = "Report failed and successful SSH logins from an auth log")]
pub enum Cli {
    /// Scan a log file and print the login report
    Scan {
        /// Path to configuration file
        #[structopt(short, long)]
        config: Option<PathBuf>,
        /// Path to the auth log (overrides the configuration)
        #[structopt(short, long)]
        file: Option<PathBuf>,
        /// Output format: json, jsonl or console
        #[structopt(long)]
        format: Option<String>,
        /// Write the report to this file instead of stdout
        #[structopt(short, long)]
        output: Option<PathBuf>,
        /// Also write failed_logins.json and successful_logins.json into this directory
        #[structopt(long)]
        split_dir: Option<PathBuf>,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match Cli::from_args() {
        Cli::Scan { config, file, format, output, split_dir } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };

            // Command line flags win over the configuration file
            if file.is_some() {
                config.input.file_path = file;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if output.is_some() {
                config.output.file_path = output;
            }
            if split_dir.is_some() {
                config.output.split_dir = split_dir;
            }

            run_scan(&config)?;
        }
        Cli::Config { output } => {
            Config::default().to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
    }

    Ok(())
}

fn run_scan(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let log_path = match &config.input.file_path {
        Some(path) => path.clone(),
        None => {
            eprintln!("No log file given; use --file or set input.file_path");
            std::process::exit(1);
        }
    };

    let classifier = LineClassifier::new()?;
    let mut reader = LogReader::new(log_path);

    let report = match reader.scan(&classifier) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Scan aborted: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Scanned {} line(s) from {:?}: {} failed, {} successful",
        reader.lines_read(),
        reader.file_path(),
        report.failed_logins().len(),
        report.successful_logins().len()
    );

    let report = report.finalize();

    let mut handler = OutputHandler::new(
        OutputFormat::from_str(&config.output.format),
        config.output.file_path.clone(),
    )?;
    handler.write_report(&report)?;
    handler.flush()?;

    if let Some(ref dir) = config.output.split_dir {
        let (failed_path, successful_path) = OutputHandler::write_split(&report, dir)?;
        log::info!("Parsed data saved to {:?} and {:?}", failed_path, successful_path);
    }

    Ok(())
}
