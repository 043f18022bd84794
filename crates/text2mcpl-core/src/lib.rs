//! Converts plain-text particle hit lists into MCPL particle-list containers.
//!
//! Each input line holds `x y z px py pz ekin`. Records with a degenerate
//! momentum are skipped; the rest are written as neutrons with unit weight
//! unless [`common::config::ConversionConfig`] says otherwise.

pub mod common;
pub mod container;
pub mod domain;
pub mod pipeline;

pub use common::config::{ConversionConfig, ConversionRequest, EmitterPolicy};
pub use domain::{ConvertError, ConvertErrorCategory, ConvertResult};
pub use pipeline::{ConversionSummary, render_human_summary, run_conversion};
