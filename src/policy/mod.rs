// Motiongate — Decision Policies
//
// Two strategies over classifier output: single-shot goal attribution with
// a shared scoreboard, and continuous step counting with an adaptive
// threshold. Selected at runtime, not compile time; both run on the same
// sampling/windowing substrate.

pub mod goal;
pub mod step;

pub use goal::{ChannelReading, Scoreboard, ThresholdGoalPolicy};
pub use step::AdaptiveStepPolicy;

/// Which decision policy a pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Two-channel goal detection with scoreboard and win bound.
    Goal,
    /// Single-channel adaptive step counting.
    Step,
}

/// Learning-phase progress as a truncated integer percent. Truncating
/// division is deliberate: downstream consumers were built against it.
pub fn learning_percent(completed: u32, total: u32) -> u32 {
    (completed * 100) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_truncates() {
        assert_eq!(learning_percent(1, 70), 1);
        assert_eq!(learning_percent(2, 70), 2);
        assert_eq!(learning_percent(34, 70), 48); // 48.57 truncates to 48
        assert_eq!(learning_percent(70, 70), 100);
        assert_eq!(learning_percent(17, 50), 34);
    }
}
