use crate::common::config::EmitterPolicy;
use crate::container::{ContainerResult, McplParticle, ParticleSink};
use crate::domain::ValidatedParticle;
use tracing::warn;

/// Maps validated particles onto the container schema. Species and weight are
/// stamped here from the policy, not by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecordEmitter {
    policy: EmitterPolicy,
}

impl RecordEmitter {
    pub fn new(policy: EmitterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EmitterPolicy {
        self.policy
    }

    pub fn container_particle(&self, particle: &ValidatedParticle) -> McplParticle {
        McplParticle {
            position: particle.position(),
            direction: particle.direction(),
            ekin: particle.ekin(),
            time: 0.0,
            weight: self.policy.weight,
            pdgcode: self.policy.pdg_code,
        }
    }

    pub fn emit<S: ParticleSink + ?Sized>(
        &self,
        sink: &mut S,
        particle: &ValidatedParticle,
    ) -> ContainerResult<()> {
        if particle.ekin() < 0.0 {
            // The packed record keeps a direction sign in the ekin slot.
            warn!(
                index = particle.index(),
                ekin = particle.ekin(),
                "negative kinetic energy is stored as its magnitude"
            );
        }
        sink.append_particle(&self.container_particle(particle))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordEmitter;
    use crate::common::config::EmitterPolicy;
    use crate::container::{ContainerError, ContainerResult, McplParticle, ParticleSink};
    use crate::domain::ValidatedParticle;

    struct FailingSink;

    impl ParticleSink for FailingSink {
        fn append_particle(&mut self, _particle: &McplParticle) -> ContainerResult<()> {
            Err(ContainerError::from(std::io::Error::other("disk full")))
        }

        fn particle_count(&self) -> u64 {
            0
        }
    }

    fn validated(index: usize) -> ValidatedParticle {
        ValidatedParticle::new(index, [1.0, 2.0, 3.0], [0.0, 0.6, 0.8], 0.5)
    }

    #[test]
    fn default_policy_tags_neutron_with_unit_weight() {
        let particle = RecordEmitter::default().container_particle(&validated(0));
        assert_eq!(particle.pdgcode, 2112);
        assert_eq!(particle.weight, 1.0);
        assert_eq!(particle.position, [1.0, 2.0, 3.0]);
        assert_eq!(particle.direction, [0.0, 0.6, 0.8]);
        assert_eq!(particle.ekin, 0.5);
        assert_eq!(particle.time, 0.0);
    }

    #[test]
    fn custom_policy_overrides_species_and_weight() {
        let emitter = RecordEmitter::new(EmitterPolicy {
            pdg_code: 22,
            weight: 0.25,
        });
        let mut sink: Vec<McplParticle> = Vec::new();
        emitter
            .emit(&mut sink, &validated(3))
            .expect("vec sink should accept");
        assert_eq!(sink[0].pdgcode, 22);
        assert_eq!(sink[0].weight, 0.25);
    }

    #[test]
    fn negative_ekin_is_handed_to_the_sink_unchanged() {
        let mut sink: Vec<McplParticle> = Vec::new();
        let particle = ValidatedParticle::new(7, [0.0; 3], [0.0, 0.0, 1.0], -2.5);
        RecordEmitter::default()
            .emit(&mut sink, &particle)
            .expect("vec sink should accept");
        assert_eq!(sink[0].ekin, -2.5);
    }

    #[test]
    fn append_failures_propagate() {
        let error = RecordEmitter::default()
            .emit(&mut FailingSink, &validated(0))
            .expect_err("failing sink should surface the error");
        assert!(error.to_string().contains("disk full"));
    }
}
