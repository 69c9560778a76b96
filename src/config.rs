// Motiongate — Pipeline Configuration
//
// Compile-time defaults mirror the original deployment values; the runtime
// config structs let a harness (or a test) override thresholds and delays
// without touching the pipeline code.

// ---------------------------------------------------------------------------
// Window geometry
// ---------------------------------------------------------------------------
pub const AXIS_COUNT: usize = 3; // accX, accY, accZ
pub const GOAL_WINDOW_LEN: usize = 128; // samples per goal-detection window
pub const STEP_WINDOW_LEN: usize = 256; // samples per step-detection window

// ---------------------------------------------------------------------------
// Activity gate thresholds (L1 magnitude, accelerometer units)
// ---------------------------------------------------------------------------
pub const TRIGGER_THRESHOLD: f32 = 4.0; // arms a learning capture
pub const CONTINUOUS_THRESHOLD: f32 = 3.0; // keeps the play loop classifying

// ---------------------------------------------------------------------------
// Classifier decision
// ---------------------------------------------------------------------------
pub const SIMILARITY_THRESHOLD: u8 = 90; // score must exceed this to count

// ---------------------------------------------------------------------------
// Learning phase
// ---------------------------------------------------------------------------
pub const GOAL_LEARNING_REPS: u32 = 50;
pub const STEP_LEARNING_REPS: u32 = 70;
pub const SETTLE_DELAY_MS: u64 = 3000; // skip the triggering jolt (step)
pub const LEARN_COOLDOWN_MS: u64 = 3000; // pause between goal repetitions
pub const GOAL_COOLDOWN_MS: u64 = 2000; // pause after a detected goal

// ---------------------------------------------------------------------------
// Game rules
// ---------------------------------------------------------------------------
pub const WIN_BOUND: u32 = 10; // goals needed to end a match

// ---------------------------------------------------------------------------
// Sensor polling
// ---------------------------------------------------------------------------
// Consecutive duplicate reads tolerated before the source reports a stall.
// A live sensor polled faster than its ODR produces a handful of duplicates
// per fresh sample; six figures of them means the sensor stopped updating.
pub const STALL_LIMIT: u32 = 100_000;

/// Runtime knobs for the activity gate.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Magnitude that arms a learning capture.
    pub trigger_threshold: f32,
    /// Lower magnitude that keeps the play loop classifying.
    pub continuous_threshold: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: TRIGGER_THRESHOLD,
            continuous_threshold: CONTINUOUS_THRESHOLD,
        }
    }
}

/// Runtime knobs for the goal-detection pipeline.
#[derive(Debug, Clone, Copy)]
pub struct GoalPolicyConfig {
    pub window_len: usize,
    pub learning_reps: u32,
    pub win_bound: u32,
    pub gate: GateConfig,
    /// Pause between learning repetitions (ms). Zero in tests.
    pub learn_cooldown_ms: u64,
    /// Pause after a detected goal (ms). Zero in tests.
    pub goal_cooldown_ms: u64,
}

impl Default for GoalPolicyConfig {
    fn default() -> Self {
        Self {
            window_len: GOAL_WINDOW_LEN,
            learning_reps: GOAL_LEARNING_REPS,
            win_bound: WIN_BOUND,
            gate: GateConfig::default(),
            learn_cooldown_ms: LEARN_COOLDOWN_MS,
            goal_cooldown_ms: GOAL_COOLDOWN_MS,
        }
    }
}

/// Runtime knobs for the step-detection pipeline.
#[derive(Debug, Clone, Copy)]
pub struct StepPolicyConfig {
    pub window_len: usize,
    pub learning_reps: u32,
    pub gate: GateConfig,
    /// Hysteresis factor a candidate threshold must exceed the current one
    /// by before a step is counted.
    pub hysteresis: f32,
    /// Delay between gate trigger and capture (ms), so the jolt that armed
    /// the gate is not itself recorded. Zero in tests.
    pub settle_delay_ms: u64,
}

impl Default for StepPolicyConfig {
    fn default() -> Self {
        Self {
            window_len: STEP_WINDOW_LEN,
            learning_reps: STEP_LEARNING_REPS,
            gate: GateConfig::default(),
            hysteresis: 1.1,
            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}
