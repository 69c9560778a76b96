// End-to-end pipeline tests against the public API, with scripted sensor
// and classifier doubles standing in for the hardware collaborators.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use motiongate::{
    Accelerometer, Classifier, Event, GoalPipeline, GoalPolicyConfig, PipelineError,
    SampleSource, Scoreboard, SensorConfig, Side, StepPipeline, StepPolicyConfig,
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Replays a canned list of readings, repeating the last one when it runs
/// dry (which the dedup loop then reports as a sensor stall).
struct ScriptedSensor {
    readings: Vec<(f32, f32, f32)>,
    index: usize,
}

impl Accelerometer for ScriptedSensor {
    fn configure(&mut self, _config: SensorConfig) -> Result<(), PipelineError> {
        Ok(())
    }

    fn read_xyz(&mut self) -> Result<(f32, f32, f32), PipelineError> {
        let reading = self.readings[self.index.min(self.readings.len() - 1)];
        if self.index < self.readings.len() {
            self.index += 1;
        }
        Ok(reading)
    }
}

/// Hands out readings fed from the test thread, so the test controls
/// exactly when the pipeline advances. A closed feed reads as a stall.
struct FedSensor {
    feed: Receiver<(f32, f32, f32)>,
}

impl Accelerometer for FedSensor {
    fn configure(&mut self, _config: SensorConfig) -> Result<(), PipelineError> {
        Ok(())
    }

    fn read_xyz(&mut self) -> Result<(f32, f32, f32), PipelineError> {
        self.feed
            .recv()
            .map_err(|_| PipelineError::SensorStall { polls: 0 })
    }
}

struct ScriptedClassifier {
    scores: Vec<u8>,
    next: usize,
}

impl ScriptedClassifier {
    fn new(scores: Vec<u8>) -> Self {
        Self { scores, next: 0 }
    }
}

impl Classifier for ScriptedClassifier {
    fn initialize(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn learn(&mut self, window: &[f32]) -> Result<(), PipelineError> {
        // Full-length windows only, by construction.
        assert_eq!(window.len() % 3, 0);
        Ok(())
    }

    fn score(&mut self, window: &[f32]) -> Result<u8, PipelineError> {
        assert_eq!(window.len() % 3, 0);
        let score = self.scores[self.next.min(self.scores.len() - 1)];
        if self.next < self.scores.len() {
            self.next += 1;
        }
        Ok(score)
    }
}

/// `len` distinct readings sweeping the x axis from `lo` to `hi`.
fn ramp_x(len: usize, lo: f32, hi: f32) -> Vec<(f32, f32, f32)> {
    let span = hi - lo;
    (0..len)
        .map(|i| {
            let t = i as f32 / (len - 1).max(1) as f32;
            (lo + span * t, 0.001 * i as f32, 0.0)
        })
        .collect()
}

/// Same sweep on the y axis.
fn ramp_y(len: usize, lo: f32, hi: f32) -> Vec<(f32, f32, f32)> {
    let span = hi - lo;
    (0..len)
        .map(|i| {
            let t = i as f32 / (len - 1).max(1) as f32;
            (0.001 * i as f32, lo + span * t, 0.0)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step pipeline
// ---------------------------------------------------------------------------

#[test]
fn step_pipeline_full_session() {
    const WINDOW: usize = 4;

    let mut readings: Vec<(f32, f32, f32)> = Vec::new();
    // Learning: trigger jolt, then one window.
    readings.push((5.0, 0.0, 0.0));
    readings.extend(ramp_x(WINDOW, 0.0, 1.0));
    // Bout 1: baseline 10.0, then 11.5 (counts: 11.5 > 1.1 * 10.0).
    readings.extend(ramp_x(WINDOW, 5.0, 15.0));
    readings.extend(ramp_x(WINDOW, 6.5, 16.5));
    // A window the classifier rejects: bout ends.
    readings.extend(ramp_x(WINDOW, 6.0, 16.0));
    // Bout 2 on the y axis: the dominant axis must be re-selected.
    readings.extend(ramp_y(WINDOW, -8.0, 12.0));

    let cancel = Arc::new(AtomicBool::new(false));
    let source = SampleSource::new(
        ScriptedSensor { readings, index: 0 },
        cancel,
    )
    .with_stall_limit(20);

    let config = StepPolicyConfig {
        window_len: WINDOW,
        learning_reps: 1,
        settle_delay_ms: 0,
        ..StepPolicyConfig::default()
    };
    let (tx, rx) = mpsc::channel();
    let result = StepPipeline::new(
        source,
        ScriptedClassifier::new(vec![95, 95, 50, 95]),
        config,
        tx,
    )
    .run();

    // The script runs dry after the fourth detection window.
    assert!(matches!(result, Err(PipelineError::SensorStall { .. })));

    let events: Vec<Event> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            Event::LearningProgress {
                side: None,
                percent: 100
            },
            Event::StepCounted { count: 1 },
            Event::NoActivity,
            // Bout 2's first window only re-establishes the baseline; no
            // step and no event.
        ]
    );
}

// ---------------------------------------------------------------------------
// Goal pipeline with an interleaved manual score adjustment
// ---------------------------------------------------------------------------

#[test]
fn goal_pipeline_manual_adjustment_ends_match() {
    const WINDOW: usize = 4;

    let (blue_feed, blue_rx) = mpsc::channel();
    let (red_feed, red_rx) = mpsc::channel();

    let cancel = Arc::new(AtomicBool::new(false));
    let blue_source = SampleSource::new(FedSensor { feed: blue_rx }, Arc::clone(&cancel));
    let red_source = SampleSource::new(FedSensor { feed: red_rx }, Arc::clone(&cancel));

    let scoreboard = Scoreboard::new();
    let config = GoalPolicyConfig {
        window_len: WINDOW,
        learning_reps: 1,
        win_bound: 10,
        learn_cooldown_ms: 0,
        goal_cooldown_ms: 0,
        ..GoalPolicyConfig::default()
    };
    let (event_tx, event_rx) = mpsc::channel();

    let pipeline_board = scoreboard.clone();
    let handle = thread::spawn(move || {
        GoalPipeline::new(
            blue_source,
            red_source,
            ScriptedClassifier::new(vec![0]),
            pipeline_board,
            config,
            event_tx,
        )
        .run()
    });

    let feed = |tx: &Sender<(f32, f32, f32)>, readings: Vec<(f32, f32, f32)>| {
        for r in readings {
            tx.send(r).unwrap();
        }
    };

    // Learning: one repetition per side.
    feed(&blue_feed, vec![(5.0, 0.0, 0.0)]);
    feed(&blue_feed, ramp_x(WINDOW, 0.0, 1.0));
    feed(&red_feed, vec![(0.0, 5.0, 0.0)]);
    feed(&red_feed, ramp_x(WINDOW, 0.0, 1.0));

    assert_eq!(
        event_rx.recv().unwrap(),
        Event::LearningProgress {
            side: Some(Side::Blue),
            percent: 100
        }
    );
    assert_eq!(
        event_rx.recv().unwrap(),
        Event::LearningProgress {
            side: Some(Side::Red),
            percent: 100
        }
    );

    // The pipeline is now blocked on the first play-cycle gate sample.
    // Push Red to the win bound out of band, then release one quiet cycle:
    // the adjustment must be observed at that very evaluation pass.
    scoreboard.adjust_score(Side::Red, 10);
    feed(&blue_feed, vec![(0.1, 0.0, 0.0)]);
    feed(&red_feed, vec![(0.0, 0.1, 0.0)]);

    assert_eq!(
        event_rx.recv().unwrap(),
        Event::MatchEnded { winner: Side::Red }
    );
    assert_eq!(
        event_rx.recv().unwrap(),
        Event::ScoreChanged { blue: 0, red: 0 }
    );
    assert_eq!(scoreboard.scores(), (0, 0));

    // Closing the feeds reads as a sensor fault and stops the pipeline.
    drop(blue_feed);
    drop(red_feed);
    let result = handle.join().unwrap();
    assert!(matches!(result, Err(PipelineError::SensorStall { .. })));
}
