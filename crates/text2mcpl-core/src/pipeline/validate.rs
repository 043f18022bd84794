use crate::common::constants::UNIT_DIRECTION_TOLERANCE;
use crate::domain::{InputRecord, RecordRejection, RejectionReason, ValidatedParticle};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordValidator {
    unit_tolerance: f64,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(UNIT_DIRECTION_TOLERANCE)
    }
}

impl RecordValidator {
    pub fn new(unit_tolerance: f64) -> Self {
        Self { unit_tolerance }
    }

    /// Normalizes the momentum into a direction and checks it is unit length.
    ///
    /// Non-finite components survive normalization as NaN and fail the
    /// tolerance check.
    pub fn validate(
        &self,
        index: usize,
        record: &InputRecord,
    ) -> Result<ValidatedParticle, RecordRejection> {
        let length = record.momentum_magnitude();
        if length == 0.0 {
            return Err(RecordRejection {
                index,
                reason: RejectionReason::ZeroMomentum,
            });
        }

        let direction = record.momentum.map(|component| component / length);
        let dirsq = direction.iter().map(|component| component * component).sum::<f64>();
        debug!(index, dirsq, "normalized momentum direction");

        let deviation = (dirsq - 1.0).abs();
        if deviation.is_nan() || deviation > self.unit_tolerance {
            return Err(RecordRejection {
                index,
                reason: RejectionReason::NonUnitDirection { dirsq },
            });
        }

        Ok(ValidatedParticle::new(
            index,
            record.position,
            direction,
            record.ekin,
        ))
    }
}
