use super::parser::ReadTermination;
use crate::container::FloatPrecision;
use crate::domain::{ConvertError, ConvertResult, RejectionReason};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecordTally {
    pub records_read: usize,
    pub accepted: usize,
    pub rejected_zero_momentum: usize,
    pub rejected_non_unit_direction: usize,
}

impl RecordTally {
    pub fn rejected(&self) -> usize {
        self.rejected_zero_momentum + self.rejected_non_unit_direction
    }

    pub(crate) fn record_rejection(&mut self, reason: &RejectionReason) {
        match reason {
            RejectionReason::ZeroMomentum => self.rejected_zero_momentum += 1,
            RejectionReason::NonUnitDirection { .. } => self.rejected_non_unit_direction += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub input_path: String,
    pub output_path: String,
    pub source_name: String,
    pub pdg_code: i32,
    pub weight: f64,
    pub precision: FloatPrecision,
    pub compressed: bool,
    pub particle_count: u64,
    #[serde(flatten)]
    pub tally: RecordTally,
    pub termination: ReadTermination,
}

pub fn render_human_summary(summary: &ConversionSummary) -> String {
    let mut lines = vec![
        format!("Input: {}", summary.input_path),
        format!("Output: {}", summary.output_path),
        format!("Records read: {}", summary.tally.records_read),
        format!("Particles written: {}", summary.particle_count),
        format!(
            "Records rejected: {} (zero momentum: {}, non-unit direction: {})",
            summary.tally.rejected(),
            summary.tally.rejected_zero_momentum,
            summary.tally.rejected_non_unit_direction
        ),
    ];
    if let ReadTermination::MalformedLine { line_number, .. } = &summary.termination {
        lines.push(format!("Input ended at malformed line {line_number}"));
    }
    lines.join("\n")
}

pub fn write_summary_report(path: &Path, summary: &ConversionSummary) -> ConvertResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| {
            ConvertError::io_system(
                "IO.SUMMARY_WRITE",
                format!(
                    "failed to create summary directory '{}': {}",
                    parent.display(),
                    source
                ),
            )
        })?;
    }

    let mut content = serde_json::to_string_pretty(summary).map_err(|source| {
        ConvertError::internal(
            "INTERNAL.SUMMARY_SERIALIZE",
            format!("failed to serialize conversion summary: {}", source),
        )
    })?;
    content.push('\n');

    fs::write(path, content).map_err(|source| {
        ConvertError::io_system(
            "IO.SUMMARY_WRITE",
            format!("failed to write summary '{}': {}", path.display(), source),
        )
    })
}
