//! Error types for MPU6050 capture

use thiserror::Error;

/// Error type for sensor-level operations
#[derive(Error, Debug)]
pub enum SensorError {
    /// I2C transfer error
    #[error("I2C transfer failed: {0}")]
    Bus(String),

    /// Invalid WHO_AM_I response
    #[error("Invalid WHO_AM_I response: expected 0x68, got 0x{0:02X}")]
    InvalidDeviceId(u8),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Error type for the collection loop
///
/// Initialization, acquisition and sink failures are distinct variants so a
/// caller can tell a dead sensor from a dead output stream.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Sensor create/configure/wake failure before collection started
    #[error("sensor initialization failed: {0}")]
    Init(#[from] SensorError),

    /// Accelerometer or gyroscope read failure mid-fill; aborts the cycle
    #[error("acquisition failed at sample {index}: {source}")]
    Acquisition { index: usize, source: SensorError },

    /// Output sink write failure
    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;
