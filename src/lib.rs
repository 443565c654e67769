//! Buffered motion capture for the MPU6050 6-axis sensor
//!
//! This library samples an accelerometer/gyroscope over I2C in fixed-size
//! batches: a fill phase acquires a buffer of readings at a fixed cadence,
//! a drain phase streams the buffer to an output sink as comma-separated
//! text, and the cycle repeats until cancelled. The bus, the sensor and the
//! sink are all seams, so the loop runs unchanged against real hardware or
//! test stubs.
//!
//! # Quick Start
//!
//! ## Collection against a sensor stub
//! ```
//! use mpu6050_capture::{Collector, CollectorConfig, CsvSink, MotionSensor, SensorError};
//! use std::time::Duration;
//!
//! struct Steady;
//!
//! impl MotionSensor for Steady {
//!     fn read_accel(&mut self) -> Result<[f32; 3], SensorError> {
//!         Ok([0.0, 0.0, 1.0])
//!     }
//!     fn read_gyro(&mut self) -> Result<[f32; 3], SensorError> {
//!         Ok([0.0, 0.0, 0.0])
//!     }
//! }
//!
//! let config = CollectorConfig {
//!     capacity: 4,
//!     sample_period: Duration::ZERO,
//!     cycle_pause: Duration::ZERO,
//! };
//! let mut collector = Collector::new(Steady, config);
//! let mut sink = CsvSink::new(Vec::new());
//!
//! collector.run_cycle(&mut sink)?;
//!
//! let text = String::from_utf8(sink.into_inner())?;
//! assert_eq!(text.lines().count(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Streaming from the real sensor
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use mpu6050_capture::{config, Collector, CollectorConfig, CsvSink, Mpu6050, DEFAULT_ADDRESS};
//! use std::sync::atomic::AtomicBool;
//!
//! let bus = I2cdev::new("/dev/i2c-1")?;
//! let sensor = Mpu6050::new(bus, DEFAULT_ADDRESS, config::ACCEL_RANGE, config::GYRO_RANGE)?;
//!
//! let mut collector = Collector::new(sensor, CollectorConfig::default());
//! let mut sink = CsvSink::new(std::io::stdout());
//! let running = AtomicBool::new(true);
//!
//! collector.run(&mut sink, &running, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Recording labeled phrases
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use mpu6050_capture::{config, Collector, CollectorConfig, CsvSink, Mpu6050};
//! use mpu6050_capture::{Phrase, Session, DEFAULT_ADDRESS};
//! use std::fs::File;
//! use std::sync::atomic::AtomicBool;
//!
//! let bus = I2cdev::new("/dev/i2c-1")?;
//! let sensor = Mpu6050::new(bus, DEFAULT_ADDRESS, config::ACCEL_RANGE, config::GYRO_RANGE)?;
//! let mut collector = Collector::new(sensor, CollectorConfig::default());
//!
//! let phrases = vec![Phrase::new("help"), Phrase::new("water")];
//! let running = AtomicBool::new(true);
//!
//! Session::new(&mut collector).record(&phrases, &running, |label, index| {
//!     Ok(CsvSink::new(File::create(format!("{label}_{index}.csv"))?))
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod mpu6050;
pub mod sample;
pub mod session;
pub mod sink;

// Re-export public API
pub use collector::{Collector, CollectorConfig};
pub use error::{CaptureError, Result, SensorError};
pub use mpu6050::{AccelRange, GyroRange, Mpu6050, DEFAULT_ADDRESS};
pub use sample::{MotionSensor, Sample, SampleBuffer};
pub use session::{Phrase, Session};
pub use sink::{format_sample, CsvSink, SampleSink, CSV_HEADER};
