use crate::domain::{ConvertError, InputRecord, ParserResult};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Why the record sequence ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadTermination {
    EndOfInput,
    MalformedLine { line_number: usize, content: String },
}

/// Lazy, non-restartable sequence of 7-field hit records.
///
/// Blank lines are skipped. The first non-blank line that is not exactly seven
/// floating-point tokens, or is not UTF-8 at all, ends the sequence without an
/// error. Only failures of the underlying reader are fatal.
pub struct RecordReader<R> {
    input: R,
    line: Vec<u8>,
    line_number: usize,
    termination: Option<ReadTermination>,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: &Path) -> ParserResult<Self> {
        let file = File::open(path).map_err(|source| {
            ConvertError::io_system(
                "IO.INPUT_OPEN",
                format!("failed to open input '{}': {}", path.display(), source),
            )
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: Vec::new(),
            line_number: 0,
            termination: None,
        }
    }

    /// `None` until the sequence has been exhausted.
    pub fn termination(&self) -> Option<&ReadTermination> {
        self.termination.as_ref()
    }

    fn next_record(&mut self) -> ParserResult<Option<InputRecord>> {
        loop {
            self.line.clear();
            let read = self.input.read_until(b'\n', &mut self.line).map_err(|source| {
                ConvertError::io_system(
                    "IO.INPUT_READ",
                    format!(
                        "failed to read input after line {}: {}",
                        self.line_number, source
                    ),
                )
            })?;
            if read == 0 {
                self.termination = Some(ReadTermination::EndOfInput);
                return Ok(None);
            }
            self.line_number += 1;

            let text = std::str::from_utf8(&self.line).ok();
            if text.is_some_and(|text| text.trim().is_empty()) {
                continue;
            }

            return Ok(match text.and_then(parse_record_line) {
                Some(record) => Some(record),
                None => {
                    self.termination = Some(ReadTermination::MalformedLine {
                        line_number: self.line_number,
                        content: String::from_utf8_lossy(&self.line).trim().to_string(),
                    });
                    None
                }
            });
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = ParserResult<InputRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.termination.is_some() {
            return None;
        }
        self.next_record().transpose()
    }
}

pub fn parse_record_line(line: &str) -> Option<InputRecord> {
    let mut fields = [0.0_f64; InputRecord::FIELD_COUNT];
    let mut tokens = line.split_whitespace();
    for field in &mut fields {
        *field = tokens.next()?.parse::<f64>().ok()?;
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(InputRecord::from_fields(fields))
}
