// Motiongate — Adaptive Step Policy
//
// Self-calibrating peak counter. Stride amplitude and gravity-axis
// alignment vary with device orientation and gait speed, so a fixed global
// threshold miscounts; instead each walking bout re-derives the dominant
// axis and a midpoint baseline from its first recognized window, then
// tracks that baseline window-over-window with a hysteresis band.

use crate::classifier::Similarity;
use crate::config::{StepPolicyConfig, SIMILARITY_THRESHOLD};
use crate::events::{Axis, Event};
use crate::window::WindowBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
enum StepState {
    /// No step pattern currently tracked.
    Armed,
    /// Oscillation recognized; baseline established on `axis`.
    Tracking { axis: Axis, threshold: f32 },
}

pub struct AdaptiveStepPolicy {
    config: StepPolicyConfig,
    state: StepState,
    step_count: u32,
}

impl AdaptiveStepPolicy {
    pub fn new(config: StepPolicyConfig) -> Self {
        Self {
            config,
            state: StepState::Armed,
            step_count: 0,
        }
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Apply one scored window. Returns the event to emit, if any.
    pub fn on_window(&mut self, window: &WindowBuffer, similarity: Similarity) -> Option<Event> {
        if similarity <= SIMILARITY_THRESHOLD {
            // Lost the pattern: disarm. The next recognized window starts a
            // fresh bout with a freshly selected dominant axis.
            let was_tracking = matches!(self.state, StepState::Tracking { .. });
            self.state = StepState::Armed;
            if was_tracking {
                log::debug!("step pattern lost, re-arming");
            }
            return Some(Event::NoActivity);
        }

        match self.state {
            StepState::Armed => {
                let (axis, threshold) = select_dominant_axis(window);
                log::debug!(
                    "tracking started: dominant axis {:?}, baseline {:.3}",
                    axis,
                    threshold
                );
                // First window only establishes the baseline; no step yet.
                self.state = StepState::Tracking { axis, threshold };
                None
            }
            StepState::Tracking { axis, threshold } => {
                let (min, max) = series_extrema(window.axis_series(axis));
                let candidate = (max + min) / 2.0;
                let stepped = candidate > self.config.hysteresis * threshold;
                // The baseline drifts with every window either way, so slow
                // changes in gait amplitude are absorbed.
                self.state = StepState::Tracking {
                    axis,
                    threshold: candidate,
                };
                if stepped {
                    self.step_count += 1;
                    Some(Event::StepCounted {
                        count: self.step_count,
                    })
                } else {
                    None
                }
            }
        }
    }
}

fn series_extrema(series: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in series {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}

/// Pick the axis with the largest peak-to-peak spread and return it with
/// the midpoint baseline of that axis. Ties resolve X, then Y, then Z.
fn select_dominant_axis(window: &WindowBuffer) -> (Axis, f32) {
    let (min_x, max_x) = series_extrema(window.axis_series(Axis::X));
    let (min_y, max_y) = series_extrema(window.axis_series(Axis::Y));
    let (min_z, max_z) = series_extrema(window.axis_series(Axis::Z));

    let spread_x = max_x - min_x;
    let spread_y = max_y - min_y;
    let spread_z = max_z - min_z;

    if spread_x >= spread_y && spread_x >= spread_z {
        (Axis::X, (max_x + min_x) / 2.0)
    } else if spread_y >= spread_x && spread_y >= spread_z {
        (Axis::Y, (max_y + min_y) / 2.0)
    } else {
        (Axis::Z, (max_z + min_z) / 2.0)
    }
}
