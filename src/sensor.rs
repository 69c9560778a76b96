// Motiongate — Sample Acquisition
//
// `Accelerometer` is the capability boundary to the physical sensor: one
// configure call at startup, then scaled (x, y, z) reads. `SampleSource`
// layers staleness rejection on top — polling faster than the sensor's
// output data rate re-reads the same registers, and those duplicates must
// never enter a window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::STALL_LIMIT;
use crate::error::PipelineError;
use crate::events::Sample;

// ---------------------------------------------------------------------------
// Sensor capability
// ---------------------------------------------------------------------------

/// Accelerometer range/bandwidth/ODR/power setup, applied once at startup.
/// Raw register values are the sensor driver's concern, not ours.
#[derive(Debug, Clone, Copy)]
pub struct SensorConfig {
    pub range_g: u8,
    pub bandwidth: u8,
    pub output_data_rate: u16,
    pub low_power: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        // BMI160 deployment values: ±2 g, normal power, ODR below 800 Hz.
        Self {
            range_g: 2,
            bandwidth: 2,
            output_data_rate: 800,
            low_power: false,
        }
    }
}

/// One accelerometer channel. Implementations wrap the actual bus I/O; the
/// pipeline never issues register reads itself.
pub trait Accelerometer {
    fn configure(&mut self, config: SensorConfig) -> Result<(), PipelineError>;

    /// Read the current scaled (x, y, z) registers. May return the same
    /// values repeatedly when polled faster than the sensor updates.
    fn read_xyz(&mut self) -> Result<(f32, f32, f32), PipelineError>;
}

// ---------------------------------------------------------------------------
// SampleSource — de-duplicating poll loop
// ---------------------------------------------------------------------------

/// Produces fresh samples from one sensor channel. Exclusively owned by one
/// pipeline instance; two pipelines on the same bus each get their own
/// source with its own `last_sample`.
pub struct SampleSource<A: Accelerometer> {
    sensor: A,
    last_sample: Sample,
    stall_limit: u32,
    cancel: Arc<AtomicBool>,
}

impl<A: Accelerometer> SampleSource<A> {
    pub fn new(sensor: A, cancel: Arc<AtomicBool>) -> Self {
        Self {
            sensor,
            last_sample: Sample::default(),
            stall_limit: STALL_LIMIT,
            cancel,
        }
    }

    /// Override the duplicate-poll budget (tests use small values).
    pub fn with_stall_limit(mut self, limit: u32) -> Self {
        self.stall_limit = limit;
        self
    }

    pub fn configure(&mut self, config: SensorConfig) -> Result<(), PipelineError> {
        self.sensor.configure(config)
    }

    /// Busy-poll until the reading differs from the previous one in at
    /// least one axis. Exact float inequality on purpose: consecutive
    /// register reads of the same conversion are bit-identical, while any
    /// fresh conversion differs.
    pub fn next_sample(&mut self) -> Result<Sample, PipelineError> {
        let mut polls: u32 = 0;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(PipelineError::Cancelled);
            }

            let (x, y, z) = self.sensor.read_xyz()?;
            let sample = Sample::new(x, y, z);
            if sample != self.last_sample {
                self.last_sample = sample;
                return Ok(sample);
            }

            polls += 1;
            if polls >= self.stall_limit {
                log::warn!("sensor produced {} duplicate reads in a row", polls);
                return Err(PipelineError::SensorStall { polls });
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Canned-sequence sensor: replays a fixed list of readings, repeating
    /// the last one once exhausted (which looks like a stall to the source).
    pub struct ScriptedSensor {
        readings: Vec<(f32, f32, f32)>,
        index: usize,
    }

    impl ScriptedSensor {
        pub fn new(readings: Vec<(f32, f32, f32)>) -> Self {
            Self { readings, index: 0 }
        }
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
}
