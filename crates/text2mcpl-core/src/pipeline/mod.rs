//! Text hit list to MCPL conversion: read, validate, emit, in input order.

mod emit;
mod parser;
mod report;
mod validate;

pub use emit::RecordEmitter;
pub use parser::{ReadTermination, RecordReader, parse_record_line};
pub use report::{ConversionSummary, RecordTally, render_human_summary, write_summary_report};
pub use validate::RecordValidator;

use crate::common::config::ConversionRequest;
use crate::container::{ContainerBuilder, ContainerError, ParticleSink};
use crate::domain::{ConvertError, ConvertResult, InputRecord};
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

/// Drives every record through validation and into `sink`. Rejections are
/// logged and counted; only read and append failures abort.
pub fn convert_records<R, S>(
    records: &mut RecordReader<R>,
    validator: &RecordValidator,
    emitter: &RecordEmitter,
    sink: &mut S,
) -> ConvertResult<RecordTally>
where
    R: BufRead,
    S: ParticleSink + ?Sized,
{
    let mut tally = RecordTally::default();

    for (index, record) in records.by_ref().enumerate() {
        let record: InputRecord = record?;
        tally.records_read += 1;

        match validator.validate(index, &record) {
            Ok(particle) => {
                emitter.emit(&mut *sink, &particle).map_err(|source| {
                    container_error("CONTAINER.APPEND", "append particle", None, source)
                })?;
                tally.accepted += 1;
                info!(index, "particle added");
            }
            Err(rejection) => {
                warn!(index, reason = %rejection.reason, "skipping particle");
                tally.record_rejection(&rejection.reason);
            }
        }
    }

    if let Some(ReadTermination::MalformedLine {
        line_number,
        content,
    }) = records.termination()
    {
        warn!(line_number, content = %content, "input ended at malformed line");
    }

    Ok(tally)
}

/// Runs a whole conversion: opens the input, brackets the record loop with
/// container create/finalize and optionally writes the JSON summary.
///
/// The input is opened first so an unreadable input never touches the output.
/// A failure after the container was created leaves the partial file behind.
pub fn run_conversion(request: &ConversionRequest) -> ConvertResult<ConversionSummary> {
    let config = &request.config;
    let mut records = RecordReader::open(&request.input_path)?;

    let source_name = request.source_name();
    let builder = ContainerBuilder::new(&request.output_path)
        .source_name(source_name.clone())
        .add_comment(config.comment.clone())
        .precision(config.precision);
    let container_path = builder.path().to_path_buf();
    let mut writer = builder.create().map_err(|source| {
        container_error(
            "CONTAINER.CREATE",
            "create container",
            Some(container_path.as_path()),
            source,
        )
    })?;
    info!(
        input = %request.input_path.display(),
        output = %container_path.display(),
        "converting text hit list"
    );

    let validator = RecordValidator::new(config.unit_tolerance);
    let emitter = RecordEmitter::new(config.emitter_policy());
    let tally = convert_records(&mut records, &validator, &emitter, &mut writer)?;
    let termination = records
        .termination()
        .cloned()
        .unwrap_or(ReadTermination::EndOfInput);

    let finalized = writer.finalize(config.gzip).map_err(|source| {
        container_error(
            "CONTAINER.FINALIZE",
            "finalize container",
            Some(container_path.as_path()),
            source,
        )
    })?;
    info!(
        output = %finalized.path.display(),
        particles = finalized.particle_count,
        compressed = finalized.compressed,
        "container finalized"
    );

    let summary = ConversionSummary {
        input_path: request.input_path.to_string_lossy().into_owned(),
        output_path: finalized.path.to_string_lossy().into_owned(),
        source_name,
        pdg_code: config.pdg_code,
        weight: config.weight,
        precision: config.precision,
        compressed: finalized.compressed,
        particle_count: finalized.particle_count,
        tally,
        termination,
    };

    if let Some(summary_path) = &request.summary_path {
        write_summary_report(summary_path, &summary)?;
    }

    Ok(summary)
}

fn container_error(
    placeholder: &'static str,
    action: &str,
    path: Option<&Path>,
    source: ContainerError,
) -> ConvertError {
    let message = match path {
        Some(path) => format!("failed to {} '{}': {}", action, path.display(), source),
        None => format!("failed to {}: {}", action, source),
    };
    ConvertError::container(placeholder, message)
}
