//! Sample record and the fixed-capacity collection buffer

use crate::error::SensorError;

/// One combined reading of linear acceleration and angular rate
///
/// Acceleration is in g, angular rate in degrees/second, both already scaled
/// by the full-scale range the sensor was configured with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Acceleration X-axis (g)
    pub accel_x: f32,
    /// Acceleration Y-axis (g)
    pub accel_y: f32,
    /// Acceleration Z-axis (g)
    pub accel_z: f32,
    /// Angular rate X-axis (°/s)
    pub gyro_x: f32,
    /// Angular rate Y-axis (°/s)
    pub gyro_y: f32,
    /// Angular rate Z-axis (°/s)
    pub gyro_z: f32,
}

impl Sample {
    /// Merge an acceleration triple and an angular-rate triple into one record
    pub fn new(accel: [f32; 3], gyro: [f32; 3]) -> Self {
        Self {
            accel_x: accel[0],
            accel_y: accel[1],
            accel_z: accel[2],
            gyro_x: gyro[0],
            gyro_y: gyro[1],
            gyro_z: gyro[2],
        }
    }
}

/// Fixed-capacity sample buffer, allocated once and reused cycle over cycle
///
/// `push` refuses writes once the capacity is reached; the buffer never
/// grows. `clear` resets the length without releasing the allocation, so a
/// new fill phase overwrites the slots in increasing order.
pub struct SampleBuffer {
    capacity: usize,
    samples: Vec<Sample>,
}

impl SampleBuffer {
    /// Create an empty buffer holding at most `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Store a sample in the next slot; returns false if the buffer is full
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(sample);
        true
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Maximum number of samples the buffer holds
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard contents, keeping the allocation for the next fill phase
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Buffered samples in arrival order
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }
}

/// Seam between the collection loop and the sensor session
///
/// One fill tick requests one acceleration triple and one angular-rate
/// triple; the loop merges them into a [`Sample`]. Implemented by the real
/// [`Mpu6050`](crate::Mpu6050) driver and by test stubs.
pub trait MotionSensor {
    /// Current acceleration triple (x, y, z) in g
    fn read_accel(&mut self) -> Result<[f32; 3], SensorError>;

    /// Current angular-rate triple (x, y, z) in °/s
    fn read_gyro(&mut self) -> Result<[f32; 3], SensorError>;
}
