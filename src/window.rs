// Motiongate — Window Buffer
//
// Fixed-capacity accumulator of motion samples. One buffer per pipeline,
// allocated once and overwritten on every fill pass. The flat layout
// (x0 y0 z0 x1 y1 z1 …) is the classifier's input format; the parallel
// per-axis series exist for the step policy's extrema scans.

use crate::config::AXIS_COUNT;
use crate::error::PipelineError;
use crate::events::Axis;
use crate::sensor::{Accelerometer, SampleSource};

pub struct WindowBuffer {
    len: usize,
    flat: Vec<f32>,
    x_series: Vec<f32>,
    y_series: Vec<f32>,
    z_series: Vec<f32>,
}

impl WindowBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            flat: vec![0.0; len * AXIS_COUNT],
            x_series: vec![0.0; len],
            y_series: vec![0.0; len],
            z_series: vec![0.0; len],
        }
    }

    /// Number of samples per window.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pull exactly `len` fresh samples from the source. Either the whole
    /// window is rewritten or an error propagates before anything scores
    /// it; partial windows never reach the classifier.
    pub fn fill<A: Accelerometer>(
        &mut self,
        source: &mut SampleSource<A>,
    ) -> Result<(), PipelineError> {
        for i in 0..self.len {
            let sample = source.next_sample()?;
            self.flat[AXIS_COUNT * i] = sample.x;
            self.flat[AXIS_COUNT * i + 1] = sample.y;
            self.flat[AXIS_COUNT * i + 2] = sample.z;
            self.x_series[i] = sample.x;
            self.y_series[i] = sample.y;
            self.z_series[i] = sample.z;
        }
        Ok(())
    }

    /// Classifier input view, length `3 * len`.
    pub fn flat(&self) -> &[f32] {
        &self.flat
    }

    pub fn axis_series(&self, axis: Axis) -> &[f32] {
        match axis {
            Axis::X => &self.x_series,
            Axis::Y => &self.y_series,
            Axis::Z => &self.z_series,
        }
    }
}
