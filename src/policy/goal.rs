// Motiongate — Threshold Goal Policy & Scoreboard
//
// Single-shot detection for the two-goal table: a recognized impact window
// on either channel scores one goal, attributed by comparing the gate-time
// magnitudes of the two sides. The scoreboard is the only state shared
// across pipelines; the manual score-adjustment path mutates it from
// another thread, so it lives behind a mutex.

use std::sync::{Arc, Mutex};

use crate::classifier::Similarity;
use crate::config::SIMILARITY_THRESHOLD;
use crate::events::{Event, Side};

// ---------------------------------------------------------------------------
// Scoreboard — shared between the detection loop and the command channel
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Scores {
    blue: u32,
    red: u32,
}

/// Cloneable handle to the match score pair.
#[derive(Clone, Default)]
pub struct Scoreboard {
    inner: Arc<Mutex<Scores>>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(blue, red)` snapshot.
    pub fn scores(&self) -> (u32, u32) {
        let scores = self.inner.lock().unwrap();
        (scores.blue, scores.red)
    }

    /// Manual out-of-band adjustment ("B +1", "R -2" over the command
    /// channel). No win-bound check here; the detection loop's next
    /// evaluation pass observes the new totals. Negative deltas saturate
    /// at zero.
    pub fn adjust_score(&self, side: Side, delta: i32) {
        let mut scores = self.inner.lock().unwrap();
        let counter = match side {
            Side::Blue => &mut scores.blue,
            Side::Red => &mut scores.red,
        };
        *counter = counter.saturating_add_signed(delta);
        log::info!(
            "score adjusted: {} {:+} -> Blue {} | Red {}",
            side.display_name(),
            delta,
            scores.blue,
            scores.red
        );
    }

    fn increment(&self, side: Side) -> (u32, u32) {
        let mut scores = self.inner.lock().unwrap();
        match side {
            Side::Blue => scores.blue += 1,
            Side::Red => scores.red += 1,
        }
        (scores.blue, scores.red)
    }

    /// If either counter reached `win_bound`, reset both and return the
    /// winner. Performed under one lock acquisition so a concurrent
    /// adjustment can never be half-observed.
    fn take_winner(&self, win_bound: u32) -> Option<Side> {
        let mut scores = self.inner.lock().unwrap();
        let winner = if scores.blue >= win_bound {
            Some(Side::Blue)
        } else if scores.red >= win_bound {
            Some(Side::Red)
        } else {
            None
        };
        if winner.is_some() {
            scores.blue = 0;
            scores.red = 0;
        }
        winner
    }
}

// ---------------------------------------------------------------------------
// Goal policy
// ---------------------------------------------------------------------------

/// One channel's contribution to a play-cycle decision.
#[derive(Debug, Clone, Copy)]
pub struct ChannelReading {
    /// L1 magnitude of the gate sample that opened this cycle.
    pub gate_magnitude: f32,
    /// Classifier similarity for the filled window.
    pub similarity: Similarity,
}

pub struct ThresholdGoalPolicy {
    scoreboard: Scoreboard,
    win_bound: u32,
}

impl ThresholdGoalPolicy {
    pub fn new(scoreboard: Scoreboard, win_bound: u32) -> Self {
        Self {
            scoreboard,
            win_bound,
        }
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Apply one play cycle's scored windows. Pushes emitted events in
    /// order; returns `true` if a goal was detected this cycle (the driver
    /// inserts its post-goal cooldown on that signal).
    pub fn evaluate(
        &mut self,
        blue: ChannelReading,
        red: ChannelReading,
        events: &mut Vec<Event>,
    ) -> bool {
        let detected = blue.similarity > SIMILARITY_THRESHOLD
            || red.similarity > SIMILARITY_THRESHOLD;

        if detected {
            let side = attribute_goal(blue.gate_magnitude, red.gate_magnitude);
            let (blue_total, red_total) = self.scoreboard.increment(side);
            log::info!(
                "goal for {} -> Blue {} | Red {}",
                side.display_name(),
                blue_total,
                red_total
            );
            events.push(Event::GoalScored { side });
            events.push(Event::ScoreChanged {
                blue: blue_total,
                red: red_total,
            });
        }

        // Win bound is re-checked every cycle, not only after a detection,
        // so manual adjustments land at the very next evaluation pass.
        self.check_win_bound(events);
        detected
    }

    /// Reset-and-emit when a counter reached the bound.
    pub fn check_win_bound(&mut self, events: &mut Vec<Event>) {
        if let Some(winner) = self.scoreboard.take_winner(self.win_bound) {
            log::info!("match over, {} wins", winner.display_name());
            events.push(Event::MatchEnded { winner });
            events.push(Event::ScoreChanged { blue: 0, red: 0 });
        }
    }
}

/// Which side gets the goal on a double detection. The channels are not
/// sampled at the same instant, so magnitudes decide; an exact tie goes to
/// Blue, the first side compared.
fn attribute_goal(blue_magnitude: f32, red_magnitude: f32) -> Side {
    if blue_magnitude >= red_magnitude {
        Side::Blue
    } else {
        Side::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(magnitude: f32, similarity: u8) -> ChannelReading {
        ChannelReading {
            gate_magnitude: magnitude,
            similarity,
        }
    }

    #[test]
    fn goal_goes_to_larger_magnitude() {
        let mut policy = ThresholdGoalPolicy::new(Scoreboard::new(), 10);
        let mut events = Vec::new();

        assert!(policy.evaluate(reading(3.0, 95), reading(5.0, 40), &mut events));
        assert_eq!(events[0], Event::GoalScored { side: Side::Red });
        assert_eq!(events[1], Event::ScoreChanged { blue: 0, red: 1 });
    }

    #[test]
    fn exact_tie_goes_to_blue() {
        assert_eq!(attribute_goal(4.5, 4.5), Side::Blue);
        assert_eq!(attribute_goal(4.5, 4.6), Side::Red);
    }

    #[test]
    fn score_at_threshold_is_not_a_goal() {
        let mut policy = ThresholdGoalPolicy::new(Scoreboard::new(), 10);
        let mut events = Vec::new();
        assert!(!policy.evaluate(reading(5.0, 90), reading(3.0, 90), &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn win_bound_resets_both_and_emits_match_end() {
        let scoreboard = Scoreboard::new();
        let mut policy = ThresholdGoalPolicy::new(scoreboard.clone(), 10);

        for goal in 1..=10 {
            let mut events = Vec::new();
            policy.evaluate(reading(6.0, 95), reading(2.0, 10), &mut events);
            if goal < 10 {
                assert_eq!(events.len(), 2);
            } else {
                assert_eq!(events[2], Event::MatchEnded { winner: Side::Blue });
                assert_eq!(events[3], Event::ScoreChanged { blue: 0, red: 0 });
            }
        }
        assert_eq!(scoreboard.scores(), (0, 0));

        // The 11th goal after the reset starts a fresh count at 1.
        let mut events = Vec::new();
        policy.evaluate(reading(6.0, 95), reading(2.0, 10), &mut events);
        assert_eq!(events[1], Event::ScoreChanged { blue: 1, red: 0 });
    }

    #[test]
    fn manual_adjustment_lands_at_next_evaluation() {
        let scoreboard = Scoreboard::new();
        let mut policy = ThresholdGoalPolicy::new(scoreboard.clone(), 10);

        scoreboard.adjust_score(Side::Red, 9);
        let mut events = Vec::new();
        // Quiet cycle: no detection, but the win-bound check still runs
        // after one more adjustment tips Red over the bound.
        policy.evaluate(reading(1.0, 10), reading(1.0, 10), &mut events);
        assert!(events.is_empty());

        scoreboard.adjust_score(Side::Red, 1);
        policy.evaluate(reading(1.0, 10), reading(1.0, 10), &mut events);
        assert_eq!(events[0], Event::MatchEnded { winner: Side::Red });
        assert_eq!(scoreboard.scores(), (0, 0));
    }

    #[test]
    fn negative_adjustment_saturates_at_zero() {
        let scoreboard = Scoreboard::new();
        scoreboard.adjust_score(Side::Blue, -3);
        assert_eq!(scoreboard.scores(), (0, 0));
        scoreboard.adjust_score(Side::Blue, 2);
        scoreboard.adjust_score(Side::Blue, -1);
        assert_eq!(scoreboard.scores(), (1, 0));
    }
}
