//! Labeled recording sessions
//!
//! Records a set of motion phrases for later classification: each phrase is
//! captured several times, one buffer per capture, with a countdown before
//! every capture so the wearer can get ready.

use crate::config;
use crate::error::Result;
use crate::sample::MotionSensor;
use crate::collector::Collector;
use crate::sink::SampleSink;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// One motion phrase to record
#[derive(Debug, Clone)]
pub struct Phrase {
    /// Label attached to every capture of this phrase
    pub label: String,
    /// Number of captures to record
    pub captures: usize,
}

impl Phrase {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            captures: config::PHRASE_CAPTURES,
        }
    }

    pub fn with_captures(label: impl Into<String>, captures: usize) -> Self {
        Self {
            label: label.into(),
            captures,
        }
    }
}

/// Runs a collector through a list of labeled captures
pub struct Session<'a, S: MotionSensor> {
    collector: &'a mut Collector<S>,
    lead_in: Duration,
}

impl<'a, S: MotionSensor> Session<'a, S> {
    pub fn new(collector: &'a mut Collector<S>) -> Self {
        Self {
            collector,
            lead_in: Duration::from_millis(config::PHRASE_LEAD_IN_MS),
        }
    }

    /// Override the countdown before each capture
    pub fn lead_in(mut self, lead_in: Duration) -> Self {
        self.lead_in = lead_in;
        self
    }

    /// Record every capture of every phrase, in order
    ///
    /// `make_sink` produces the sink for one capture from its label and
    /// per-phrase index. The cancellation flag is checked between captures;
    /// a clear request stops the session before the next countdown. Returns
    /// the number of captures completed.
    pub fn record<K, F>(
        &mut self,
        phrases: &[Phrase],
        running: &AtomicBool,
        mut make_sink: F,
    ) -> Result<usize>
    where
        K: SampleSink,
        F: FnMut(&str, usize) -> io::Result<K>,
    {
        let mut completed = 0;

        for phrase in phrases {
            for index in 0..phrase.captures {
                if !running.load(Ordering::SeqCst) {
                    log::info!("session cancelled after {completed} captures");
                    return Ok(completed);
                }

                log::info!(
                    "phrase '{}': capture {} of {} starts in {:.0?}",
                    phrase.label,
                    index + 1,
                    phrase.captures,
                    self.lead_in
                );
                if !self.lead_in.is_zero() {
                    thread::sleep(self.lead_in);
                }

                log::info!(
                    "phrase '{}': collecting {} samples",
                    phrase.label,
                    self.collector.capacity()
                );
                self.collector.fill()?;

                let mut sink = make_sink(&phrase.label, index)?;
                self.collector.drain(&mut sink)?;
                completed += 1;
            }
            log::info!("phrase '{}' done", phrase.label);
        }

        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::error::SensorError;
    use crate::sink::CsvSink;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    struct SteadySensor;

    impl MotionSensor for SteadySensor {
        fn read_accel(&mut self) -> std::result::Result<[f32; 3], SensorError> {
            Ok([0.0, 0.0, 1.0])
        }

        fn read_gyro(&mut self) -> std::result::Result<[f32; 3], SensorError> {
            Ok([0.0, 0.0, 0.0])
        }
    }

    /// io::Write that appends into a shared capture log keyed by file name
    #[derive(Clone)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn collector() -> Collector<SteadySensor> {
        Collector::new(
            SteadySensor,
            CollectorConfig {
                capacity: 2,
                sample_period: Duration::ZERO,
                cycle_pause: Duration::ZERO,
            },
        )
    }

    #[test]
    fn test_one_capture_per_label_and_index() {
        let captures: Rc<RefCell<Vec<(String, Rc<RefCell<Vec<u8>>>)>>> =
            Rc::new(RefCell::new(Vec::new()));

        let mut collector = collector();
        let mut session = Session::new(&mut collector).lead_in(Duration::ZERO);
        let running = AtomicBool::new(true);

        let phrases = vec![
            Phrase::with_captures("help", 2),
            Phrase::with_captures("water", 1),
        ];

        let log = captures.clone();
        let completed = session
            .record(&phrases, &running, |label, index| {
                let buf = Rc::new(RefCell::new(Vec::new()));
                log.borrow_mut()
                    .push((format!("{label}_{index}"), buf.clone()));
                Ok(CsvSink::new(SharedBuf(buf)))
            })
            .unwrap();

        assert_eq!(completed, 3);
        let captures = captures.borrow();
        let names: Vec<&str> = captures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["help_0", "help_1", "water_0"]);

        for (_, buf) in captures.iter() {
            let text = String::from_utf8(buf.borrow().clone()).unwrap();
            assert_eq!(text.lines().count(), 2);
            for line in text.lines() {
                assert_eq!(line, "0.00, 0.00, 1.00, 0.00, 0.00, 0.00");
            }
        }
    }

    #[test]
    fn test_cancelled_session_stops_between_captures() {
        let mut collector = collector();
        let mut session = Session::new(&mut collector).lead_in(Duration::ZERO);
        let running = AtomicBool::new(false);

        let phrases = vec![Phrase::new("stop")];
        let completed = session
            .record(&phrases, &running, |_, _| {
                Ok(CsvSink::new(Vec::new()))
            })
            .unwrap();

        assert_eq!(completed, 0);
    }
}
