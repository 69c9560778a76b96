// Motiongate — Core Data Types & Emitted Events

// ---------------------------------------------------------------------------
// Sample (one instant of 3-axis accelerometer output, physically scaled)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// L1 magnitude, `|x| + |y| + |z|`. Cheaper than the Euclidean norm and
    /// what the activity gate compares against.
    pub fn magnitude(&self) -> f32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

// ---------------------------------------------------------------------------
// Axis & Side
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One of the two monitored channels / players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
        }
    }
}

// ---------------------------------------------------------------------------
// Events — produced by the decision policies, consumed by a presentation
// sink (LED, serial, Bluetooth — not this crate's concern).
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A goal was attributed to `side`.
    GoalScored { side: Side },
    /// One more step; `count` is the running total.
    StepCounted { count: u32 },
    /// Learning-phase progress, truncated integer percent.
    LearningProgress { side: Option<Side>, percent: u32 },
    /// A window scored below the recognition threshold (step mode).
    NoActivity,
    /// Either score counter reached the win bound; both were reset.
    MatchEnded { winner: Side },
    /// Score counters changed (detection or manual adjustment).
    ScoreChanged { blue: u32, red: u32 },
}
