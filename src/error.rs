// Motiongate — Error Taxonomy
//
// The original firmware handled neither case: a stalled sensor spun forever
// in the polling loop and a classifier fault was undefined behavior. Both
// now surface as explicit errors at the pipeline boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sensor returned the same reading `polls` times in a row without
    /// producing a fresh sample.
    #[error("sensor stalled after {polls} duplicate polls")]
    SensorStall { polls: u32 },

    /// The classifier capability failed.
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The cancellation token was raised; observed at sample boundaries.
    #[error("pipeline cancelled")]
    Cancelled,
}
