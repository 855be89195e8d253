use crate::export::export_events;
use beacon_common_logger::setup_logger;
use beacon_composer_braze::BrazeComposer;
use clap::Parser;
use log::*;
use std::fs::File;
use std::io::BufReader;

mod config;
mod export;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let args = config::Args::parse();

    let exporter_config = config::build_config(&args.config_dir)?;
    let _guard = setup_logger(&exporter_config.logger)?;

    let composer = BrazeComposer::new(&exporter_config.braze)?;
    info!(
        "Starting {} - Braze region [{}], exported events: {:?}",
        composer,
        composer.config().region,
        composer.config().events_to_export.iter().collect::<Vec<_>>()
    );

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    let summary = match &args.input {
        Some(input) => {
            info!("Reading events from file: [{}]", input);
            let file = File::open(input).map_err(|err| export::ExporterError::IoError {
                message: format!("Cannot open the input file [{}]. Err: {}", input, err),
            })?;
            export_events(BufReader::new(file), &mut writer, &composer)?
        }
        None => {
            info!("Reading events from stdin");
            let stdin = std::io::stdin();
            export_events(stdin.lock(), &mut writer, &composer)?
        }
    };

    info!(
        "Export completed - composed: {}, skipped: {}, invalid: {}",
        summary.composed, summary.skipped, summary.invalid
    );

    Ok(())
}
