//! MPU6050 sensor driver over a generic I2C bus

use crate::error::SensorError;
use crate::sample::MotionSensor;
use embedded_hal::i2c::I2c;
use std::thread;
use std::time::Duration;

/// Default I2C address (AD0 low)
pub const DEFAULT_ADDRESS: u8 = 0x68;

// MPU6050 register addresses
const REG_WHO_AM_I: u8 = 0x75;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_GYRO_XOUT_H: u8 = 0x43;

// Expected WHO_AM_I value
const WHO_AM_I_VALUE: u8 = 0x68;

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    /// AFS_SEL bits for ACCEL_CONFIG
    fn bits(self) -> u8 {
        let fs_sel = match self {
            AccelRange::G2 => 0,
            AccelRange::G4 => 1,
            AccelRange::G8 => 2,
            AccelRange::G16 => 3,
        };
        fs_sel << 3
    }

    /// Sensitivity in LSB/g
    fn scale(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroRange {
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// FS_SEL bits for GYRO_CONFIG
    fn bits(self) -> u8 {
        let fs_sel = match self {
            GyroRange::Dps250 => 0,
            GyroRange::Dps500 => 1,
            GyroRange::Dps1000 => 2,
            GyroRange::Dps2000 => 3,
        };
        fs_sel << 3
    }

    /// Sensitivity in LSB/(°/s)
    fn scale(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }
}

/// MPU6050 sensor session
///
/// Owns the bus handle for the lifetime of the session; [`release`] hands it
/// back for an orderly shutdown.
///
/// [`release`]: Mpu6050::release
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Bind and initialize the sensor at `address` with fixed measurement ranges
    ///
    /// Wakes the device, verifies WHO_AM_I, then writes the full-scale
    /// configuration.
    ///
    /// # Returns
    /// * `Ok(Mpu6050)` - Initialized sensor session
    /// * `Err(SensorError)` - If any configuration transfer fails
    pub fn new(
        i2c: I2C,
        address: u8,
        accel_range: AccelRange,
        gyro_range: GyroRange,
    ) -> Result<Self, SensorError> {
        // AD0 selects between the two valid addresses
        if address != 0x68 && address != 0x69 {
            return Err(SensorError::InvalidParameter(format!(
                "I2C address must be 0x68 or 0x69, got 0x{address:02X}"
            )));
        }

        let mut sensor = Mpu6050 {
            i2c,
            address,
            accel_range,
            gyro_range,
        };

        sensor.init()?;

        Ok(sensor)
    }

    /// Wake the device and apply the measurement configuration
    fn init(&mut self) -> Result<(), SensorError> {
        // Wake up the sensor (clear sleep bit)
        self.write_register(REG_PWR_MGMT_1, 0x00)?;

        // Small delay for sensor to wake up
        thread::sleep(Duration::from_millis(100));

        // Verify device ID
        let who_am_i = self.read_register(REG_WHO_AM_I)?;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(SensorError::InvalidDeviceId(who_am_i));
        }

        self.write_register(REG_ACCEL_CONFIG, self.accel_range.bits())?;
        self.write_register(REG_GYRO_CONFIG, self.gyro_range.bits())?;

        Ok(())
    }

    /// Write a single byte to a register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|e| SensorError::Bus(format!("write 0x{reg:02X}: {e:?}")))
    }

    /// Read a single byte from a register
    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut data = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .map_err(|e| SensorError::Bus(format!("read 0x{reg:02X}: {e:?}")))?;
        Ok(data[0])
    }

    /// Read three big-endian i16 values from consecutive registers
    fn read_triple_raw(&mut self, reg: u8) -> Result<[i16; 3], SensorError> {
        let mut data = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .map_err(|e| SensorError::Bus(format!("read 0x{reg:02X}: {e:?}")))?;

        Ok([
            i16::from_be_bytes([data[0], data[1]]),
            i16::from_be_bytes([data[2], data[3]]),
            i16::from_be_bytes([data[4], data[5]]),
        ])
    }

    /// Return the underlying bus handle, consuming the session
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> MotionSensor for Mpu6050<I2C> {
    fn read_accel(&mut self) -> Result<[f32; 3], SensorError> {
        let raw = self.read_triple_raw(REG_ACCEL_XOUT_H)?;
        let scale = self.accel_range.scale();
        Ok([
            raw[0] as f32 / scale,
            raw[1] as f32 / scale,
            raw[2] as f32 / scale,
        ])
    }

    fn read_gyro(&mut self) -> Result<[f32; 3], SensorError> {
        let raw = self.read_triple_raw(REG_GYRO_XOUT_H)?;
        let scale = self.gyro_range.scale();
        Ok([
            raw[0] as f32 / scale,
            raw[1] as f32 / scale,
            raw[2] as f32 / scale,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Debug)]
    struct StubBusError;

    impl embedded_hal::i2c::Error for StubBusError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Register-map I2C stub: writes land in `regs`, reads come back from the
    /// last addressed register onward.
    struct StubBus {
        regs: [u8; 128],
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl StubBus {
        fn new() -> Self {
            let mut regs = [0u8; 128];
            regs[REG_WHO_AM_I as usize] = WHO_AM_I_VALUE;
            Self {
                regs,
                writes: Vec::new(),
                fail: false,
            }
        }

        fn set_be16(&mut self, reg: u8, value: i16) {
            let bytes = value.to_be_bytes();
            self.regs[reg as usize] = bytes[0];
            self.regs[reg as usize + 1] = bytes[1];
        }
    }

    impl ErrorType for StubBus {
        type Error = StubBusError;
    }

    impl I2c for StubBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), StubBusError> {
            if self.fail {
                return Err(StubBusError);
            }
            assert_eq!(address, DEFAULT_ADDRESS);

            let mut pointer = 0usize;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        pointer = bytes[0] as usize;
                        for (i, value) in bytes[1..].iter().enumerate() {
                            self.regs[pointer + i] = *value;
                            self.writes.push(((pointer + i) as u8, *value));
                        }
                    }
                    Operation::Read(buffer) => {
                        for (i, slot) in buffer.iter_mut().enumerate() {
                            *slot = self.regs[pointer + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn open(bus: StubBus) -> Mpu6050<StubBus> {
        Mpu6050::new(bus, DEFAULT_ADDRESS, AccelRange::G4, GyroRange::Dps500).unwrap()
    }

    #[test]
    fn test_init_sequence() {
        let sensor = open(StubBus::new());
        let writes = &sensor.i2c.writes;
        assert_eq!(writes[0], (REG_PWR_MGMT_1, 0x00));
        assert!(writes.contains(&(REG_ACCEL_CONFIG, 0x08)));
        assert!(writes.contains(&(REG_GYRO_CONFIG, 0x08)));
    }

    #[test]
    fn test_init_rejects_wrong_device() {
        let mut bus = StubBus::new();
        bus.regs[REG_WHO_AM_I as usize] = 0x70;
        let result = Mpu6050::new(bus, DEFAULT_ADDRESS, AccelRange::G4, GyroRange::Dps500);
        match result {
            Err(SensorError::InvalidDeviceId(0x70)) => {}
            other => panic!("expected InvalidDeviceId, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_accel_conversion() {
        let mut bus = StubBus::new();
        // 8192 LSB at +/-4g is exactly 1 g
        bus.set_be16(REG_ACCEL_XOUT_H, 8192);
        bus.set_be16(REG_ACCEL_XOUT_H + 2, -8192);
        bus.set_be16(REG_ACCEL_XOUT_H + 4, 4096);
        let mut sensor = open(bus);

        let accel = sensor.read_accel().unwrap();
        assert_eq!(accel, [1.0, -1.0, 0.5]);
    }

    #[test]
    fn test_gyro_conversion() {
        let mut bus = StubBus::new();
        // 131 LSB at +/-500 dps is 2 dps
        bus.set_be16(REG_GYRO_XOUT_H, 131);
        bus.set_be16(REG_GYRO_XOUT_H + 2, 0);
        bus.set_be16(REG_GYRO_XOUT_H + 4, -655);
        let mut sensor = open(bus);

        let gyro = sensor.read_gyro().unwrap();
        assert_eq!(gyro, [2.0, 0.0, -10.0]);
    }

    #[test]
    fn test_rejects_invalid_address() {
        let result = Mpu6050::new(StubBus::new(), 0x40, AccelRange::G4, GyroRange::Dps500);
        match result {
            Err(SensorError::InvalidParameter(_)) => {}
            other => panic!("expected InvalidParameter, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_bus_failure_surfaces() {
        let mut sensor = open(StubBus::new());
        sensor.i2c.fail = true;
        match sensor.read_accel() {
            Err(SensorError::Bus(_)) => {}
            other => panic!("expected Bus error, got {other:?}"),
        }
    }
}
