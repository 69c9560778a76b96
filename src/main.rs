// Motiongate — Demo Harness
//
// Runs the detection pipeline on a host with a simulated accelerometer and
// a magnitude-heuristic classifier, so the whole gate -> window -> classify
// -> decide path can be exercised end to end without hardware. Mode is
// picked at runtime:
//
//   motiongate step   — single-channel adaptive step counting (default)
//   motiongate goal   — two-channel goal detection; type "B +1" or "R -2"
//                       on stdin to adjust the score mid-match
//
// The simulated signal alternates quiet stretches with activity bursts, so
// learning triggers and detections both occur within a few seconds.

use std::io::BufRead;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use motiongate::{
    Accelerometer, Classifier, Event, GoalPipeline, GoalPolicyConfig, PipelineError,
    PolicyKind, SampleSource, Scoreboard, SensorConfig, Side, StepPipeline,
    StepPolicyConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let mode = match std::env::args().nth(1).as_deref() {
        Some("goal") => PolicyKind::Goal,
        Some("step") | None => PolicyKind::Step,
        Some(other) => anyhow::bail!("unknown mode '{}', expected 'step' or 'goal'", other),
    };
    log::info!("motiongate starting in {:?} mode", mode);

    let cancel = Arc::new(AtomicBool::new(false));
    let (event_tx, event_rx) = mpsc::channel();

    match mode {
        PolicyKind::Step => {
            // Short learning phase so the demo reaches detection quickly.
            let config = StepPolicyConfig {
                learning_reps: 5,
                settle_delay_ms: 200,
                ..StepPolicyConfig::default()
            };
            let source = SampleSource::new(
                SimulatedAccelerometer::walking(0),
                Arc::clone(&cancel),
            );
            let classifier = MagnitudeClassifier::new();
            thread::Builder::new()
                .name("pipeline".into())
                .spawn(move || {
                    report_exit(StepPipeline::new(source, classifier, config, event_tx).run());
                })?;
        }
        PolicyKind::Goal => {
            let config = GoalPolicyConfig {
                learning_reps: 5,
                learn_cooldown_ms: 200,
                ..GoalPolicyConfig::default()
            };
            let blue_source = SampleSource::new(
                SimulatedAccelerometer::impacts(0),
                Arc::clone(&cancel),
            );
            let red_source = SampleSource::new(
                SimulatedAccelerometer::impacts(997),
                Arc::clone(&cancel),
            );
            let scoreboard = Scoreboard::new();
            let classifier = MagnitudeClassifier::new();

            // Score-adjustment commands arrive asynchronously on stdin.
            let command_board = scoreboard.clone();
            thread::Builder::new()
                .name("commands".into())
                .spawn(move || command_task(command_board))?;

            thread::Builder::new()
                .name("pipeline".into())
                .spawn(move || {
                    report_exit(
                        GoalPipeline::new(
                            blue_source,
                            red_source,
                            classifier,
                            scoreboard,
                            config,
                            event_tx,
                        )
                        .run(),
                    );
                })?;
        }
    }

    // Presentation sink: the pipeline only guarantees event content; here
    // it is rendered as log lines.
    for event in event_rx {
        match event {
            Event::LearningProgress { side: Some(side), percent } => {
                log::info!("[{}] learning {} percent", side.display_name(), percent)
            }
            Event::LearningProgress { side: None, percent } => {
                log::info!("learning {} percent", percent)
            }
            Event::GoalScored { side } => log::info!("GOAL for {}", side.display_name()),
            Event::ScoreChanged { blue, red } => {
                log::info!("score: Blue {} | Red {}", blue, red)
            }
            Event::MatchEnded { winner } => {
                log::info!("end of the game, {} wins", winner.display_name())
            }
            Event::StepCounted { count } => log::info!("steps: {}", count),
            Event::NoActivity => log::debug!("no activity"),
        }
    }

    log::info!("pipeline finished, exiting");
    Ok(())
}

fn report_exit(result: Result<(), PipelineError>) {
    if let Err(e) = result {
        log::error!("pipeline stopped: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Score-adjustment commands: "<B|R> <±n>" per line on stdin
// ---------------------------------------------------------------------------

fn command_task(scoreboard: Scoreboard) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => return,
        };
        match parse_adjustment(&line) {
            Some((side, delta)) => scoreboard.adjust_score(side, delta),
            None => log::warn!("incorrect command '{}', expected e.g. 'B +1' or 'R -2'", line),
        }
    }
}

fn parse_adjustment(line: &str) -> Option<(Side, i32)> {
    let mut parts = line.split_whitespace();
    let side = match parts.next()? {
        "B" | "b" => Side::Blue,
        "R" | "r" => Side::Red,
        _ => return None,
    };
    let delta: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((side, delta))
}

// ---------------------------------------------------------------------------
// Simulated accelerometer
// ---------------------------------------------------------------------------

/// Deterministic signal generator. Every read differs slightly from the
/// previous one (a tiny tick-based dither), so the de-duplication loop in
/// `SampleSource` always sees fresh conversions.
struct SimulatedAccelerometer {
    tick: u64,
    walking: bool,
}

impl SimulatedAccelerometer {
    /// Gait-like oscillation with periodic strong jolts that cross the
    /// learning trigger threshold.
    fn walking(phase: u64) -> Self {
        Self {
            tick: phase,
            walking: true,
        }
    }

    /// Mostly quiet with short impact bursts, as a goal sensor sees.
    fn impacts(phase: u64) -> Self {
        Self {
            tick: phase,
            walking: false,
        }
    }
}

impl Accelerometer for SimulatedAccelerometer {
    fn configure(&mut self, _config: SensorConfig) -> Result<(), PipelineError> {
        Ok(())
    }

    fn read_xyz(&mut self) -> Result<(f32, f32, f32), PipelineError> {
        self.tick += 1;
        let t = self.tick as f32;
        let dither = (self.tick % 97) as f32 * 1e-5;

        let (x, y, z) = if self.walking {
            let in_jolt = self.tick % 600 < 3;
            if in_jolt {
                (3.0 + dither, 2.0, 1.5)
            } else {
                // Stride oscillation on x, gravity plus bounce on z. The
                // amplitude swells slowly so the adaptive threshold has
                // something to chase.
                let amplitude = 1.2 + 0.4 * (t / 2000.0).sin();
                (
                    amplitude * (t / 8.0).sin() + dither,
                    0.2 * (t / 5.0).sin(),
                    1.0 + 0.3 * (t / 8.0).cos(),
                )
            }
        } else {
            let in_burst = self.tick % 1500 < 40;
            if in_burst {
                let decay = 1.0 - (self.tick % 1500) as f32 / 40.0;
                (5.0 * decay * (t / 2.0).sin() + dither, 2.0 * decay, 0.5)
            } else {
                (0.02 * (t / 3.0).sin() + dither, 0.01, 1.0)
            }
        };
        Ok((x, y, z))
    }
}

// ---------------------------------------------------------------------------
// Magnitude-heuristic classifier: stands in for the real pattern model,
// scoring a window by how close its mean |a| sits to the mean it learned.
// ---------------------------------------------------------------------------

struct MagnitudeClassifier {
    learned_mean: f32,
    learned_windows: u32,
}

impl MagnitudeClassifier {
    fn new() -> Self {
        Self {
            learned_mean: 0.0,
            learned_windows: 0,
        }
    }
}

fn mean_abs(window: &[f32]) -> f32 {
    window.iter().map(|v| v.abs()).sum::<f32>() / window.len() as f32
}

impl Classifier for MagnitudeClassifier {
    fn initialize(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn learn(&mut self, window: &[f32]) -> Result<(), PipelineError> {
        let m = mean_abs(window);
        self.learned_windows += 1;
        self.learned_mean += (m - self.learned_mean) / self.learned_windows as f32;
        Ok(())
    }

    fn score(&mut self, window: &[f32]) -> Result<u8, PipelineError> {
        if self.learned_windows == 0 {
            return Err(PipelineError::ClassifierUnavailable(
                "no windows learned".into(),
            ));
        }
        let deviation = (mean_abs(window) - self.learned_mean).abs() / self.learned_mean.max(1e-6);
        let similarity = (100.0 - 100.0 * deviation).clamp(0.0, 100.0);
        Ok(similarity as u8)
    }
}
