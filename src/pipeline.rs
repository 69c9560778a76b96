// Motiongate — Pipeline Drivers
//
// One cooperative loop per monitored configuration: gate, fill, classify,
// decide, emit. Events leave over an mpsc channel to whatever presentation
// sink the harness wired up; a dropped receiver shuts the pipeline down
// cleanly, and the cancellation token is honored at every sample boundary.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crate::classifier::Classifier;
use crate::config::{GoalPolicyConfig, StepPolicyConfig};
use crate::error::PipelineError;
use crate::events::{Event, Sample, Side};
use crate::gate::ActivityGate;
use crate::policy::goal::{ChannelReading, Scoreboard, ThresholdGoalPolicy};
use crate::policy::step::AdaptiveStepPolicy;
use crate::policy::learning_percent;
use crate::sensor::{Accelerometer, SampleSource, SensorConfig};
use crate::window::WindowBuffer;

/// A cancelled run is a clean shutdown, not a failure.
fn finish(result: Result<(), PipelineError>) -> Result<(), PipelineError> {
    match result {
        Err(PipelineError::Cancelled) => Ok(()),
        other => other,
    }
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

// ---------------------------------------------------------------------------
// Step pipeline — one channel, adaptive step counting
// ---------------------------------------------------------------------------

pub struct StepPipeline<A: Accelerometer, C: Classifier> {
    source: SampleSource<A>,
    window: WindowBuffer,
    classifier: C,
    policy: AdaptiveStepPolicy,
    config: StepPolicyConfig,
    sensor_config: SensorConfig,
    events: Sender<Event>,
}

impl<A: Accelerometer, C: Classifier> StepPipeline<A, C> {
    pub fn new(
        source: SampleSource<A>,
        classifier: C,
        config: StepPolicyConfig,
        events: Sender<Event>,
    ) -> Self {
        Self {
            window: WindowBuffer::new(config.window_len),
            policy: AdaptiveStepPolicy::new(config),
            source,
            classifier,
            config,
            sensor_config: SensorConfig::default(),
            events,
        }
    }

    /// Learning phase, then the infinite detection loop. Returns when the
    /// token is cancelled, the event receiver is dropped, or a sensor /
    /// classifier fault surfaces.
    pub fn run(mut self) -> Result<(), PipelineError> {
        self.source.configure(self.sensor_config)?;
        self.classifier.initialize()?;
        finish(self.run_inner())
    }

    fn run_inner(&mut self) -> Result<(), PipelineError> {
        log::info!(
            "step pipeline: learning phase, {} repetitions",
            self.config.learning_reps
        );
        for rep in 1..=self.config.learning_reps {
            self.wait_for_trigger()?;
            // The jolt that armed the gate is not part of the gait pattern;
            // let it pass before capturing.
            pause(self.config.settle_delay_ms);
            self.window.fill(&mut self.source)?;
            self.classifier.learn(self.window.flat())?;

            let percent = learning_percent(rep, self.config.learning_reps);
            log::info!("learning {} percent", percent);
            if !self.emit(Event::LearningProgress {
                side: None,
                percent,
            }) {
                return Ok(());
            }
        }

        log::info!("step pipeline: detection running");
        loop {
            self.window.fill(&mut self.source)?;
            let similarity = self.classifier.score(self.window.flat())?;
            if let Some(event) = self.policy.on_window(&self.window, similarity) {
                if !self.emit(event) {
                    return Ok(());
                }
            }
        }
    }

    /// Block (in bounded sample steps) until a sample crosses the trigger
    /// threshold.
    fn wait_for_trigger(&mut self) -> Result<Sample, PipelineError> {
        loop {
            let sample = self.source.next_sample()?;
            if ActivityGate::should_capture(sample, self.config.gate.trigger_threshold) {
                return Ok(sample);
            }
        }
    }

    fn emit(&self, event: Event) -> bool {
        if self.events.send(event).is_err() {
            log::warn!("event channel closed, stopping step pipeline");
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Goal pipeline — two channels, shared scoreboard
// ---------------------------------------------------------------------------

struct GoalChannel<A: Accelerometer> {
    source: SampleSource<A>,
    window: WindowBuffer,
}

pub struct GoalPipeline<A: Accelerometer, C: Classifier> {
    blue: GoalChannel<A>,
    red: GoalChannel<A>,
    classifier: C,
    policy: ThresholdGoalPolicy,
    config: GoalPolicyConfig,
    sensor_config: SensorConfig,
    events: Sender<Event>,
    pending: Vec<Event>,
}

impl<A: Accelerometer, C: Classifier> GoalPipeline<A, C> {
    pub fn new(
        blue_source: SampleSource<A>,
        red_source: SampleSource<A>,
        classifier: C,
        scoreboard: Scoreboard,
        config: GoalPolicyConfig,
        events: Sender<Event>,
    ) -> Self {
        Self {
            blue: GoalChannel {
                source: blue_source,
                window: WindowBuffer::new(config.window_len),
            },
            red: GoalChannel {
                source: red_source,
                window: WindowBuffer::new(config.window_len),
            },
            classifier,
            policy: ThresholdGoalPolicy::new(scoreboard, config.win_bound),
            config,
            sensor_config: SensorConfig::default(),
            events,
            pending: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<(), PipelineError> {
        self.blue.source.configure(self.sensor_config)?;
        self.red.source.configure(self.sensor_config)?;
        self.classifier.initialize()?;
        finish(self.run_inner())
    }

    fn run_inner(&mut self) -> Result<(), PipelineError> {
        // Manual learning, one side at a time: every repetition is its own
        // gate-trigger -> fill -> learn cycle on that side's channel.
        for side in [Side::Blue, Side::Red] {
            log::info!(
                "{} goal learning, {} repetitions",
                side.display_name(),
                self.config.learning_reps
            );
            for rep in 1..=self.config.learning_reps {
                let channel = match side {
                    Side::Blue => &mut self.blue,
                    Side::Red => &mut self.red,
                };
                loop {
                    let sample = channel.source.next_sample()?;
                    if ActivityGate::should_capture(
                        sample,
                        self.config.gate.trigger_threshold,
                    ) {
                        break;
                    }
                }
                channel.window.fill(&mut channel.source)?;
                self.classifier.learn(channel.window.flat())?;

                let percent = learning_percent(rep, self.config.learning_reps);
                log::info!("{} learning {} percent", side.display_name(), percent);
                if !self.emit(Event::LearningProgress {
                    side: Some(side),
                    percent,
                }) {
                    return Ok(());
                }
                pause(self.config.learn_cooldown_ms);
            }
        }

        log::info!("goal pipeline: play phase");
        self.play()
    }

    /// Play loop: strictly sequential alternation between the two channels
    /// inside one loop body. The two blocking reads mean the channels skew
    /// in real time; the policy only compares magnitudes, never timestamps.
    fn play(&mut self) -> Result<(), PipelineError> {
        loop {
            let blue_sample = self.blue.source.next_sample()?;
            let red_sample = self.red.source.next_sample()?;

            let active = ActivityGate::should_capture(
                blue_sample,
                self.config.gate.continuous_threshold,
            ) || ActivityGate::should_capture(
                red_sample,
                self.config.gate.continuous_threshold,
            );

            let detected = if active {
                self.blue.window.fill(&mut self.blue.source)?;
                self.red.window.fill(&mut self.red.source)?;
                let blue_similarity = self.classifier.score(self.blue.window.flat())?;
                let red_similarity = self.classifier.score(self.red.window.flat())?;

                self.policy.evaluate(
                    ChannelReading {
                        gate_magnitude: blue_sample.magnitude(),
                        similarity: blue_similarity,
                    },
                    ChannelReading {
                        gate_magnitude: red_sample.magnitude(),
                        similarity: red_similarity,
                    },
                    &mut self.pending,
                )
            } else {
                // Quiescent cycle: skip the classifier but still re-check
                // the win bound so manual adjustments are picked up.
                self.policy.check_win_bound(&mut self.pending);
                false
            };

            let mut delivered = true;
            for event in self.pending.drain(..) {
                if self.events.send(event).is_err() {
                    delivered = false;
                }
            }
            if !delivered {
                log::warn!("event channel closed, stopping goal pipeline");
                return Ok(());
            }

            if detected {
                pause(self.config.goal_cooldown_ms);
            }
        }
    }

    fn emit(&self, event: Event) -> bool {
        if self.events.send(event).is_err() {
            log::warn!("event channel closed, stopping goal pipeline");
            return false;
        }
        true
    }
}
