//! Buffered collection loop: fill the buffer at a fixed cadence, flush it,
//! pause, repeat until cancelled

use crate::config;
use crate::error::{CaptureError, Result};
use crate::sample::{MotionSensor, Sample, SampleBuffer};
use crate::sink::SampleSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Collection loop parameters
///
/// Defaults come from the build-time constants in [`config`].
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Samples per cycle
    pub capacity: usize,
    /// Delay between consecutive acquisitions
    pub sample_period: Duration,
    /// Pause between a drain phase and the next fill phase
    pub cycle_pause: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            capacity: config::BUFFER_CAPACITY,
            sample_period: Duration::from_millis(config::SAMPLE_PERIOD_MS),
            cycle_pause: Duration::from_millis(config::CYCLE_PAUSE_MS),
        }
    }
}

/// Drives a sensor session through fill/drain cycles
///
/// Owns the sensor and the buffer; nothing is shared, nothing is global.
/// A cycle either delivers a completely refilled buffer to the sink or
/// produces no output at all.
pub struct Collector<S: MotionSensor> {
    sensor: S,
    buffer: SampleBuffer,
    sample_period: Duration,
    cycle_pause: Duration,
}

impl<S: MotionSensor> Collector<S> {
    pub fn new(sensor: S, config: CollectorConfig) -> Self {
        Self {
            sensor,
            buffer: SampleBuffer::with_capacity(config.capacity),
            sample_period: config.sample_period,
            cycle_pause: config.cycle_pause,
        }
    }

    /// Samples collected per cycle
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Fill phase: acquire one buffer of fresh samples at the configured cadence
    ///
    /// Overwrites the buffer slots in increasing order. If either sub-reading
    /// fails the cycle is abandoned immediately and the error reports the
    /// failing slot; no partially filled buffer is ever drained.
    pub fn fill(&mut self) -> Result<()> {
        self.buffer.clear();

        let mut next_sample_time = Instant::now();
        while !self.buffer.is_full() {
            let index = self.buffer.len();

            let accel = self
                .sensor
                .read_accel()
                .map_err(|source| CaptureError::Acquisition { index, source })?;
            let gyro = self
                .sensor
                .read_gyro()
                .map_err(|source| CaptureError::Acquisition { index, source })?;

            self.buffer.push(Sample::new(accel, gyro));

            // Wait until the next sample time; if acquisition ran long, skip
            // the sleep and catch up
            if !self.sample_period.is_zero() {
                next_sample_time += self.sample_period;
                let now = Instant::now();
                if next_sample_time > now {
                    thread::sleep(next_sample_time - now);
                }
            }
        }

        Ok(())
    }

    /// Drain phase: emit every buffered sample in slot order
    ///
    /// Read-only over the buffer; sink failures surface as
    /// [`CaptureError::Sink`], never as acquisition errors.
    pub fn drain<K: SampleSink>(&mut self, sink: &mut K) -> Result<usize> {
        for sample in self.buffer.as_slice() {
            sink.write_sample(sample).map_err(CaptureError::Sink)?;
        }
        sink.flush().map_err(CaptureError::Sink)?;
        Ok(self.buffer.len())
    }

    /// One complete fill + drain cycle; returns the number of samples flushed
    pub fn run_cycle<K: SampleSink>(&mut self, sink: &mut K) -> Result<usize> {
        self.fill()?;
        self.drain(sink)
    }

    /// Run fill/drain cycles until cancelled or `max_cycles` is reached
    ///
    /// The cancellation flag is checked once per cycle, so a clear request
    /// takes effect before the next fill phase starts. Returns the number of
    /// completed cycles on an orderly stop.
    pub fn run<K: SampleSink>(
        &mut self,
        sink: &mut K,
        running: &AtomicBool,
        max_cycles: Option<u64>,
    ) -> Result<u64> {
        let mut cycles = 0u64;

        while running.load(Ordering::SeqCst) {
            if max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }

            let flushed = self.run_cycle(sink)?;
            cycles += 1;
            log::debug!("cycle {cycles} complete, {flushed} samples flushed");

            if !self.cycle_pause.is_zero() {
                thread::sleep(self.cycle_pause);
            }
        }

        Ok(cycles)
    }

    /// Hand the sensor session back for an orderly shutdown
    pub fn into_sensor(self) -> S {
        self.sensor
    }
}
