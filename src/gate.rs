// Motiongate — Activity Gate
//
// Decides from a single instantaneous sample whether a capture should start
// (or keep going). L1 magnitude, not Euclidean: no square root on a
// constrained core, and the original thresholds were tuned against it.

use crate::events::Sample;

/// Stateless threshold test over the sample's L1 magnitude.
#[derive(Debug, Clone, Copy)]
pub struct ActivityGate;

impl ActivityGate {
    /// `true` iff `|x| + |y| + |z| >= threshold`. The boundary counts as
    /// activity.
    pub fn should_capture(sample: Sample, threshold: f32) -> bool {
        sample.magnitude() >= threshold
    }
}
