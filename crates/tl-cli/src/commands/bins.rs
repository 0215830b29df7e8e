//! Bins command: the full pipeline from Takeout files to journey tables.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tl_core::{Bin, BinStream, JourneyRecord, StreamSummary, TemporalPolicy, extract};
use tl_takeout::{LoadReport, TakeoutError, TakeoutReader};

use crate::Config;

pub const JSON_FILE: &str = "bins.json";
pub const CSV_FILE: &str = "bins.csv";

/// Column titles of `bins.csv`, in record field order.
const CSV_HEADER: [&str; 7] = [
    "Startlocatie Naam",
    "Startlocatie Adres",
    "Begintijd reis",
    "Eindtijd reis",
    "Afstand in m",
    "Eindlocatie Naam",
    "Eindlocatie Adres",
];

/// Where to read and write, after applying flags over configuration.
#[derive(Debug, Clone)]
pub struct BinsOptions {
    pub folder: PathBuf,
    pub year: i32,
    pub output_dir: PathBuf,
}

impl BinsOptions {
    /// Flags win over configuration. A folder must come from one of them.
    pub fn resolve(
        config: &Config,
        folder: Option<PathBuf>,
        year: Option<i32>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let Some(folder) = folder.or_else(|| config.folder.clone()) else {
            bail!("no location history folder given; pass --folder or set `folder` in the config");
        };
        Ok(Self {
            folder,
            year: year.unwrap_or(config.year),
            output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
        })
    }
}

/// Accepted bins and what was dropped on the way.
#[derive(Debug)]
pub struct Outcome {
    pub accepted: Vec<Bin>,
    pub stream: StreamSummary,
    pub load: LoadReport,
}

pub fn run<W: Write>(writer: &mut W, config: &Config, options: &BinsOptions) -> Result<()> {
    let delimiter = csv_delimiter(config.csv_delimiter)?;
    let policy =
        TemporalPolicy::new(config.policy.clone()).context("invalid policy configuration")?;

    let outcome = find_bins(options, &policy)?;
    let records: Vec<JourneyRecord> = outcome.accepted.iter().map(extract).collect();
    let unknown_endpoints = count_unknown_endpoints(&records);

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            options.output_dir.display()
        )
    })?;
    let json_path = options.output_dir.join(JSON_FILE);
    write_json(&json_path, &outcome.accepted)?;
    tracing::info!(path = %json_path.display(), "bins written");

    let csv_path = options.output_dir.join(CSV_FILE);
    let file = File::create(&csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;
    write_csv(file, &records, delimiter)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    tracing::info!(path = %csv_path.display(), "journeys written");

    writeln!(
        writer,
        "Found {} bins, {} within business hours",
        outcome.stream.bins_emitted,
        outcome.accepted.len()
    )?;
    writeln!(
        writer,
        "Read {} months ({} missing), {} events, {} malformed entries skipped",
        outcome.load.months_read,
        outcome.load.months_missing,
        outcome.load.events,
        outcome.load.malformed
    )?;
    if outcome.stream.leading_events_skipped > 0 || outcome.stream.trailing_events_dropped > 0 {
        writeln!(
            writer,
            "Dropped {} events before the first place and {} after the last complete bin",
            outcome.stream.leading_events_skipped, outcome.stream.trailing_events_dropped
        )?;
    }
    if unknown_endpoints > 0 {
        writeln!(
            writer,
            "{unknown_endpoints} journeys have an unknown start or end location"
        )?;
    }
    writeln!(writer, "Wrote {} and {}", json_path.display(), csv_path.display())?;

    Ok(())
}

/// Streams the year through the binning engine and keeps the bins `policy`
/// accepts.
///
/// Stops at the first month file that cannot be loaded.
pub fn find_bins(options: &BinsOptions, policy: &TemporalPolicy) -> Result<Outcome> {
    let mut reader = TakeoutReader::new(&options.folder, options.year, policy.config().timezone);
    let mut source_error: Option<TakeoutError> = None;

    let (accepted, stream) = {
        let events = reader.by_ref().map_while(|item| match item {
            Ok(event) => Some(event),
            Err(err) => {
                source_error = Some(err);
                None
            }
        });
        let mut bins = BinStream::new(events);
        let accepted: Vec<Bin> = bins.by_ref().filter(|bin| policy.accepts(bin)).collect();
        (accepted, bins.summary())
    };

    if let Some(err) = source_error {
        return Err(err).context("failed to read location history");
    }

    let load = reader.report();
    if stream.trailing_events_dropped > 0 {
        tracing::warn!(
            events = stream.trailing_events_dropped,
            "history ends in an incomplete journey, dropped"
        );
    }
    tracing::info!(
        found = stream.bins_emitted,
        accepted = accepted.len(),
        "bins found"
    );

    Ok(Outcome {
        accepted,
        stream,
        load,
    })
}

/// Records whose origin or destination had no named place, logged one by one.
fn count_unknown_endpoints(records: &[JourneyRecord]) -> usize {
    let mut count = 0;
    for record in records.iter().filter(|record| record.has_unknown_endpoint()) {
        count += 1;
        tracing::warn!(
            trip_start = %record.trip_start,
            start = %record.start_location_name,
            end = %record.end_location_name,
            "journey has an unknown start or end location"
        );
    }
    count
}

fn write_json(path: &Path, bins: &[Bin]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, bins)
        .with_context(|| format!("failed to write {}", path.display()))?;
    out.flush()?;
    Ok(())
}

/// Writes the header row and one row per record.
pub fn write_csv<W: Write>(out: W, records: &[JourneyRecord], delimiter: u8) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(out);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

fn csv_delimiter(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() => Ok(byte),
        _ => bail!("csv_delimiter must be a single ASCII character, got {delimiter:?}"),
    }
}
