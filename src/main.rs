//! MPU6050 capture binary
//!
//! Streams buffered sensor cycles to stdout or a file, or records labeled
//! phrase captures for a classifier.
//!
//! Usage:
//!   capture --output data.csv --capacity 400 --period-ms 10
//!   capture --phrase help --phrase water:5 --output-dir collected_data

use clap::Parser;
use linux_embedded_hal::I2cdev;
use mpu6050_capture::{
    config, CaptureError, Collector, CollectorConfig, CsvSink, Mpu6050, Phrase, SensorError,
    Session, DEFAULT_ADDRESS,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "capture")]
#[command(about = "Collect buffered MPU6050 motion data", long_about = None)]
struct Args {
    /// I2C bus device
    #[arg(long, default_value = "/dev/i2c-1")]
    bus: String,

    /// Sensor I2C address
    #[arg(long, default_value_t = DEFAULT_ADDRESS)]
    address: u8,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Samples per cycle
    #[arg(long, default_value_t = config::BUFFER_CAPACITY)]
    capacity: usize,

    /// Delay between samples in milliseconds
    #[arg(long, default_value_t = config::SAMPLE_PERIOD_MS)]
    period_ms: u64,

    /// Pause between cycles in milliseconds
    #[arg(long, default_value_t = config::CYCLE_PAUSE_MS)]
    pause_ms: u64,

    /// Stop after this many cycles (runs until Ctrl+C if omitted)
    #[arg(long)]
    cycles: Option<u64>,

    /// Emit a header line before the samples
    #[arg(long)]
    header: bool,

    /// Record a labeled phrase instead of streaming; repeatable,
    /// LABEL or LABEL:CAPTURES
    #[arg(long = "phrase", value_parser = parse_phrase)]
    phrases: Vec<Phrase>,

    /// Directory for phrase capture files
    #[arg(long, default_value = "collected_data")]
    output_dir: PathBuf,

    /// Countdown before each phrase capture in milliseconds
    #[arg(long, default_value_t = config::PHRASE_LEAD_IN_MS)]
    lead_in_ms: u64,
}

fn parse_phrase(raw: &str) -> Result<Phrase, String> {
    match raw.split_once(':') {
        None if !raw.is_empty() => Ok(Phrase::new(raw)),
        None => Err("empty phrase label".to_string()),
        Some((label, captures)) => {
            let captures: usize = captures
                .parse()
                .map_err(|_| format!("invalid capture count in '{raw}'"))?;
            if label.is_empty() || captures == 0 {
                return Err(format!("invalid phrase argument '{raw}'"));
            }
            Ok(Phrase::with_captures(label, captures))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!(
        "collection started at {}",
        chrono::Local::now().to_rfc3339()
    );
    log::debug!("expected I2C bus clock: {} Hz", config::I2C_FREQUENCY_HZ);

    let bus = I2cdev::new(&args.bus)
        .map_err(|e| CaptureError::Init(SensorError::Bus(format!("open {}: {e}", args.bus))))?;

    let sensor = match Mpu6050::new(bus, args.address, config::ACCEL_RANGE, config::GYRO_RANGE) {
        Ok(sensor) => sensor,
        Err(SensorError::InvalidDeviceId(id)) => {
            log::error!("unexpected WHO_AM_I 0x{id:02X}; check wiring and the sensor address");
            return Err(CaptureError::Init(SensorError::InvalidDeviceId(id)).into());
        }
        Err(e) => {
            log::error!("sensor initialization failed: {e}");
            return Err(CaptureError::Init(e).into());
        }
    };
    log::info!("sensor initialized on {} at 0x{:02X}", args.bus, args.address);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("received Ctrl+C, stopping after the current cycle");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut collector = Collector::new(
        sensor,
        CollectorConfig {
            capacity: args.capacity,
            sample_period: Duration::from_millis(args.period_ms),
            cycle_pause: Duration::from_millis(args.pause_ms),
        },
    );

    let started = Instant::now();
    let result = if args.phrases.is_empty() {
        stream(&mut collector, &args, &running)
    } else {
        record_phrases(&mut collector, &args, &running)
    };

    // Release the session on every exit path, including failures
    let sensor = collector.into_sensor();
    drop(sensor.release());
    log::info!("sensor session released");

    match result {
        Ok(samples) => {
            let elapsed = started.elapsed().as_secs_f64();
            log::info!("collected {samples} samples in {elapsed:.2} s");
            Ok(())
        }
        Err(e) => {
            log::error!("{e}");
            Err(e.into())
        }
    }
}

/// Continuous fill/drain cycles into one sink
fn stream(
    collector: &mut Collector<Mpu6050<I2cdev>>,
    args: &Args,
    running: &AtomicBool,
) -> mpu6050_capture::Result<usize> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            log::info!("writing to {}", path.display());
            Box::new(File::create(path).map_err(CaptureError::Sink)?)
        }
        None => Box::new(io::stdout()),
    };

    let mut sink = if args.header {
        CsvSink::with_header(writer).map_err(CaptureError::Sink)?
    } else {
        CsvSink::new(writer)
    };

    let cycles = collector.run(&mut sink, running, args.cycles)?;
    Ok(cycles as usize * collector.capacity())
}

/// One capture file per phrase repetition
fn record_phrases(
    collector: &mut Collector<Mpu6050<I2cdev>>,
    args: &Args,
    running: &AtomicBool,
) -> mpu6050_capture::Result<usize> {
    std::fs::create_dir_all(&args.output_dir).map_err(CaptureError::Sink)?;

    let capacity = collector.capacity();
    let mut session =
        Session::new(collector).lead_in(Duration::from_millis(args.lead_in_ms));

    let captures = session.record(&args.phrases, running, |label, index| {
        let path = args.output_dir.join(format!("{label}_{index}.csv"));
        log::info!("writing capture to {}", path.display());
        let file = File::create(path)?;
        if args.header {
            CsvSink::with_header(file)
        } else {
            Ok(CsvSink::new(file))
        }
    })?;

    Ok(captures * capacity)
}
