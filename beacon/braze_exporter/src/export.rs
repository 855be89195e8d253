use beacon_common_api::Event;
use beacon_composer_common::{ComposerError, StatelessComposer};
use log::*;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("IoError: [{message}]")]
    IoError { message: String },
    #[error("ComposerError: [{0}]")]
    ComposerError(#[from] ComposerError),
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::IoError { message: format!("{}", err) }
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::ComposerError(err.into())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub composed: usize,
    pub skipped: usize,
    pub invalid: usize,
}

/// Parses a single input line. A line that is not an Event is reported as a missing argument.
pub fn parse_event(line: &str) -> Result<Event, ComposerError> {
    Event::from_json(line).map_err(ComposerError::from)
}

/// Composes a request for each event line of the reader and writes it to the writer as a JSON line.
/// Lines that are not valid events are logged and skipped.
pub fn export_events<R: BufRead, W: Write, C: StatelessComposer>(
    reader: R,
    writer: &mut W,
    composer: &C,
) -> Result<ExportSummary, ExporterError> {
    let mut summary = ExportSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_event(line) {
            Ok(event) => event,
            Err(err) => {
                warn!("BrazeExporter - Skipping invalid event at line {}. Err: {}", index + 1, err);
                summary.invalid += 1;
                continue;
            }
        };

        match composer.compose(&event) {
            Ok(Some(request)) => {
                writeln!(writer, "{}", serde_json::to_string(&request)?)?;
                summary.composed += 1;
            }
            Ok(None) => summary.skipped += 1,
            Err(err) => {
                error!(
                    "BrazeExporter - Cannot compose request for event [{}] at line {}. Err: {}",
                    event.name,
                    index + 1,
                    err
                );
                summary.invalid += 1;
            }
        }
    }

    writer.flush()?;
    Ok(summary)
}
