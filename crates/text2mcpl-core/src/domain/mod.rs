pub mod errors;

pub use errors::{ConvertError, ConvertErrorCategory, ConvertResult, ParserResult};

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One hit record as read from the text input, in `x y z px py pz ekin` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRecord {
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    pub ekin: f64,
}

impl InputRecord {
    pub const FIELD_COUNT: usize = 7;

    pub fn from_fields(fields: [f64; Self::FIELD_COUNT]) -> Self {
        Self {
            position: [fields[0], fields[1], fields[2]],
            momentum: [fields[3], fields[4], fields[5]],
            ekin: fields[6],
        }
    }

    pub fn momentum_magnitude(&self) -> f64 {
        let [px, py, pz] = self.momentum;
        (px * px + py * py + pz * pz).sqrt()
    }
}

/// A record that passed validation. Only the validator constructs these, so
/// `direction` is always unit length within tolerance and momentum was nonzero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedParticle {
    index: usize,
    position: [f64; 3],
    direction: [f64; 3],
    ekin: f64,
}

impl ValidatedParticle {
    pub(crate) fn new(index: usize, position: [f64; 3], direction: [f64; 3], ekin: f64) -> Self {
        Self {
            index,
            position,
            direction,
            ekin,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn direction(&self) -> [f64; 3] {
        self.direction
    }

    pub fn ekin(&self) -> f64 {
        self.ekin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    ZeroMomentum,
    NonUnitDirection { dirsq: f64 },
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMomentum => f.write_str("momentum length is zero"),
            Self::NonUnitDirection { dirsq } => {
                write!(f, "direction vector is not normalized (dirsq = {dirsq})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordRejection {
    pub index: usize,
    pub reason: RejectionReason,
}

impl Display for RecordRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "particle index {}: {}", self.index, self.reason)
    }
}
