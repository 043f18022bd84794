//! Run configuration for a text-to-MCPL conversion.

use super::constants::{
    DEFAULT_HEADER_COMMENT, DEFAULT_WEIGHT, NEUTRON_PDG_CODE, UNIT_DIRECTION_TOLERANCE,
};
use crate::container::FloatPrecision;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub pdg_code: i32,
    pub weight: f64,
    pub comment: String,
    /// Header source label. `None` uses the output path exactly as given.
    pub source_name: Option<String>,
    pub gzip: bool,
    pub precision: FloatPrecision,
    pub unit_tolerance: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pdg_code: NEUTRON_PDG_CODE,
            weight: DEFAULT_WEIGHT,
            comment: DEFAULT_HEADER_COMMENT.to_string(),
            source_name: None,
            gzip: true,
            precision: FloatPrecision::Single,
            unit_tolerance: UNIT_DIRECTION_TOLERANCE,
        }
    }
}

impl ConversionConfig {
    pub fn emitter_policy(&self) -> EmitterPolicy {
        EmitterPolicy {
            pdg_code: self.pdg_code,
            weight: self.weight,
        }
    }
}

/// Species and weight stamped onto every emitted particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterPolicy {
    pub pdg_code: i32,
    pub weight: f64,
}

impl Default for EmitterPolicy {
    fn default() -> Self {
        ConversionConfig::default().emitter_policy()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub config: ConversionConfig,
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            summary_path: None,
            config: ConversionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_summary_path(mut self, summary_path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(summary_path.into());
        self
    }

    pub fn source_name(&self) -> String {
        self.config
            .source_name
            .clone()
            .unwrap_or_else(|| self.output_path.to_string_lossy().into_owned())
    }
}
