//! Fixed conversion policy values.
//!
//! Species and weight are assigned by the emitter from these defaults unless a
//! caller overrides them through [`crate::common::config::ConversionConfig`].

/// PDG Monte Carlo numbering code for the neutron.
pub const NEUTRON_PDG_CODE: i32 = 2112;
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Maximum allowed `| |dir|^2 - 1 |` for a normalized direction.
pub const UNIT_DIRECTION_TOLERANCE: f64 = 1.0e-5;
pub const DEFAULT_HEADER_COMMENT: &str = "Extracting Neutrons from the txt file";

#[cfg(test)]
mod tests {
    use super::{DEFAULT_WEIGHT, NEUTRON_PDG_CODE, UNIT_DIRECTION_TOLERANCE};

    #[test]
    fn policy_constants_match_neutron_defaults() {
        assert_eq!(NEUTRON_PDG_CODE, 2112);
        assert_eq!(DEFAULT_WEIGHT, 1.0);
        assert!(UNIT_DIRECTION_TOLERANCE > 0.0 && UNIT_DIRECTION_TOLERANCE < 1.0e-3);
    }
}
