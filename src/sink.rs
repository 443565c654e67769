//! Output sinks for buffered samples
//!
//! The drain phase only needs something that accepts one record at a time;
//! where the records end up (console, file, pipe to a classifier) is the
//! caller's choice.

use crate::sample::Sample;
use std::io::{self, Write};

/// Header line matching the six sample fields
pub const CSV_HEADER: &str = "Acce_X, Acce_Y, Acce_Z, Gyro_X, Gyro_Y, Gyro_Z";

/// Destination for drained samples
pub trait SampleSink {
    /// Emit one record
    fn write_sample(&mut self, sample: &Sample) -> io::Result<()>;

    /// Push any buffered output through; called once per drain phase
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Render one sample as a comma-separated line with two-decimal fields
///
/// Field order is acceleration x/y/z then angular rate x/y/z. Formatting the
/// same sample twice yields byte-identical output.
pub fn format_sample(sample: &Sample) -> String {
    format!(
        "{:.2}, {:.2}, {:.2}, {:.2}, {:.2}, {:.2}",
        sample.accel_x,
        sample.accel_y,
        sample.accel_z,
        sample.gyro_x,
        sample.gyro_y,
        sample.gyro_z
    )
}

/// Line-oriented CSV sink over any writer
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer; no header line is emitted
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Wrap a writer and emit the header line first
    pub fn with_header(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self { writer })
    }

    /// Return the underlying writer, consuming the sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for CsvSink<W> {
    fn write_sample(&mut self, sample: &Sample) -> io::Result<()> {
        writeln!(self.writer, "{}", format_sample(sample))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sample {
        Sample::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0])
    }

    #[test]
    fn test_format_field_order() {
        assert_eq!(
            format_sample(&sample()),
            "1.00, 2.00, 3.00, 4.00, 5.00, 6.00"
        );
    }

    #[test]
    fn test_format_is_idempotent() {
        let s = Sample::new([0.1234, -0.5, 9.81], [-123.456, 0.0, 250.0]);
        assert_eq!(format_sample(&s), format_sample(&s));
    }

    #[test]
    fn test_format_rounds_to_two_decimals() {
        let s = Sample::new([0.005, -0.004, 1.555], [0.0, -0.0, 99.999]);
        let line = format_sample(&s);
        for field in line.split(", ") {
            let decimals = field.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 2, "field {field} in {line}");
        }
    }

    #[test]
    fn test_csv_sink_writes_lines() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_sample(&sample()).unwrap();
        sink.write_sample(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "1.00, 2.00, 3.00, 4.00, 5.00, 6.00\n1.00, 2.00, 3.00, 4.00, 5.00, 6.00\n"
        );
    }

    #[test]
    fn test_header_is_opt_in() {
        let sink = CsvSink::with_header(Vec::new()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, format!("{CSV_HEADER}\n"));

        let sink = CsvSink::new(Vec::new());
        assert!(sink.into_inner().is_empty());
    }
}
