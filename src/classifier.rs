// Motiongate — Classifier Capability
//
// The pattern model is opaque to the pipeline: it is taught complete
// windows during the learning phase and afterwards scores complete windows
// with a similarity percentage. The real implementation links an external
// library; the pipeline only ever sees this trait.

use crate::error::PipelineError;

/// Similarity score out of 100. Both decision policies treat a score
/// strictly above [`crate::config::SIMILARITY_THRESHOLD`] as "pattern
/// recognized".
pub type Similarity = u8;

pub trait Classifier {
    /// One-time model setup before any learn/score call.
    fn initialize(&mut self) -> Result<(), PipelineError>;

    /// Incorporate one full-length window (`3 * N` floats, sample-major)
    /// into the model.
    fn learn(&mut self, window: &[f32]) -> Result<(), PipelineError>;

    /// Score one full-length window against the learned pattern, 0..=100.
    fn score(&mut self, window: &[f32]) -> Result<Similarity, PipelineError>;
}
