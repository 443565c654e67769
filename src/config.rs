//! Build-time collection constants

use crate::mpu6050::{AccelRange, GyroRange};

/// Samples collected per cycle before the buffer is flushed
pub const BUFFER_CAPACITY: usize = 400;

/// Delay between consecutive sample acquisitions
pub const SAMPLE_PERIOD_MS: u64 = 10;

/// Pause between a drain phase and the next fill phase
pub const CYCLE_PAUSE_MS: u64 = 1000;

/// Countdown before each labeled capture starts
pub const PHRASE_LEAD_IN_MS: u64 = 8000;

/// Captures recorded per phrase label
pub const PHRASE_CAPTURES: usize = 10;

/// Expected I2C bus clock; on a host adapter the kernel owns the actual rate
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Accelerometer full-scale range the device is configured with
pub const ACCEL_RANGE: AccelRange = AccelRange::G4;

/// Gyroscope full-scale range the device is configured with
pub const GYRO_RANGE: GyroRange = GyroRange::Dps500;
