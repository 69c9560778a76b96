// Motiongate — Motion-Event Detection Pipeline
//
// Samples a 3-axis accelerometer through a capability trait, accumulates
// fixed-size windows, gates them behind an activity threshold, hands them
// to an opaque pattern classifier, and turns similarity scores into
// discrete events: a scored goal on the two-channel table, a counted step
// on the wearable. Sensor register I/O, the classifier model, and event
// presentation all live behind traits / channels on the outside.

pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod pipeline;
pub mod policy;
pub mod sensor;
pub mod window;

pub use classifier::{Classifier, Similarity};
pub use config::{GateConfig, GoalPolicyConfig, StepPolicyConfig};
pub use error::PipelineError;
pub use events::{Axis, Event, Sample, Side};
pub use gate::ActivityGate;
pub use pipeline::{GoalPipeline, StepPipeline};
pub use policy::{AdaptiveStepPolicy, PolicyKind, Scoreboard, ThresholdGoalPolicy};
pub use sensor::{Accelerometer, SampleSource, SensorConfig};
pub use window::WindowBuffer;
