//! Time-bounded console echo
//!
//! Reads lines from a [`LineSource`] and copies the decoded text to an
//! output stream until the session window closes. Read and write failures
//! inside the loop are counted and logged at trace level only, so a flaky
//! adapter never cuts the session short.

use super::{EchoConfig, EchoError, LineSource};
use std::io::Write;
use std::time::{Duration, Instant};

/// Elapsed-time source for the session window
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Wall clock started when the connection is established
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Counters collected over one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoSummary {
    /// Total read attempts
    pub reads: usize,
    /// Reads that returned data
    pub lines: usize,
    /// Raw bytes received
    pub bytes: usize,
    /// Read or write failures that were suppressed
    pub errors: usize,
    /// Session length when the loop exited
    pub elapsed: Duration,
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// A validated echo session
#[derive(Debug, Clone)]
pub struct EchoSession {
    config: EchoConfig,
}

impl EchoSession {
    pub fn new(config: EchoConfig) -> Result<Self, EchoError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    /// Echo lines from `source` to `out` until the session window elapses.
    ///
    /// The window is checked between reads, so the loop overruns it by at
    /// most one read timeout.
    pub fn run<S, W, C>(&self, source: &mut S, out: &mut W, clock: &C) -> EchoSummary
    where
        S: LineSource + ?Sized,
        W: Write + ?Sized,
        C: Clock + ?Sized,
    {
        let mut summary = EchoSummary::default();

        while clock.elapsed() < self.config.session_duration {
            summary.reads += 1;

            let line = match source.read_line() {
                Ok(line) => line,
                Err(e) => {
                    summary.errors += 1;
                    log::trace!("suppressed read error: {:#}", e);
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            summary.lines += 1;
            summary.bytes += line.len();

            let text = decode_ignoring_invalid(&line);
            if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
                summary.errors += 1;
                log::trace!("suppressed write error: {}", e);
            }
        }

        summary.elapsed = clock.elapsed();
        log::debug!(
            "echo session on {} finished: {} reads, {} lines, {} bytes, {} suppressed errors in {:?}",
            self.config.device_path,
            summary.reads,
            summary.lines,
            summary.bytes,
            summary.errors,
            summary.elapsed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Clock advanced manually by the fake sources
    #[derive(Clone, Default)]
    struct FakeClock(Rc<Cell<Duration>>);

    impl FakeClock {
        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for FakeClock {
        fn elapsed(&self) -> Duration {
            self.0.get()
        }
    }

    /// Each read costs one full timeout and yields the next scripted result
    struct ScriptedSource {
        clock: FakeClock,
        timeout: Duration,
        script: VecDeque<anyhow::Result<Vec<u8>>>,
        fail_when_empty: bool,
    }

    impl ScriptedSource {
        fn silent(clock: &FakeClock) -> Self {
            Self {
                clock: clock.clone(),
                timeout: Duration::from_secs(1),
                script: VecDeque::new(),
                fail_when_empty: false,
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self) -> anyhow::Result<Vec<u8>> {
            self.clock.advance(self.timeout);
            match self.script.pop_front() {
                Some(result) => result,
                None if self.fail_when_empty => Err(anyhow!("device reports an error")),
                None => Ok(Vec::new()),
            }
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_ignoring_invalid(b"boot ok\r\n"), "boot ok\r\n");
        assert_eq!(decode_ignoring_invalid(b"a\xffb\xc3\x28c\n"), "ab(c\n");
        assert_eq!(decode_ignoring_invalid("héllo".as_bytes()), "héllo");
        assert_eq!(decode_ignoring_invalid(b""), "");
    }

    #[test]
    fn test_silent_source_ends_at_window() {
        let clock = FakeClock::default();
        let mut source = ScriptedSource::silent(&clock);
        let mut out: Vec<u8> = Vec::new();

        let session = EchoSession::new(EchoConfig::default()).unwrap();
        let summary = session.run(&mut source, &mut out, &clock);

        assert!(out.is_empty());
        assert_eq!(summary.reads, 10);
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.elapsed, Duration::from_secs(10));
    }

    #[test]
    fn test_echoes_without_adding_line_breaks() {
        let clock = FakeClock::default();
        let mut source = ScriptedSource::silent(&clock);
        source.script.extend([
            Ok(b"SHA256: a1f2".to_vec()),
            Ok(Vec::new()),
            Ok(b"59d4\r\n".to_vec()),
            Ok(b"PASS\xfe\n".to_vec()),
        ]);
        let mut out: Vec<u8> = Vec::new();

        let session = EchoSession::new(EchoConfig::default()).unwrap();
        let summary = session.run(&mut source, &mut out, &clock);

        assert_eq!(String::from_utf8(out).unwrap(), "SHA256: a1f259d4\r\nPASS\n");
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.bytes, 24);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_read_errors_are_suppressed() {
        let clock = FakeClock::default();
        let mut source = ScriptedSource::silent(&clock);
        source.fail_when_empty = true;
        let mut out: Vec<u8> = Vec::new();

        let session = EchoSession::new(EchoConfig::default()).unwrap();
        let summary = session.run(&mut source, &mut out, &clock);

        assert_eq!(summary.errors, summary.reads);
        assert_eq!(summary.errors, 10);
        assert!(out.is_empty());
    }

    #[test]
    fn test_errors_between_lines_keep_session_alive() {
        let clock = FakeClock::default();
        let mut source = ScriptedSource::silent(&clock);
        source.script.extend([
            Ok(b"one\n".to_vec()),
            Err(anyhow!("framing error")),
            Ok(b"two\n".to_vec()),
        ]);
        let mut out: Vec<u8> = Vec::new();

        let session = EchoSession::new(EchoConfig::default()).unwrap();
        let summary = session.run(&mut source, &mut out, &clock);

        assert_eq!(out, b"one\ntwo\n");
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.reads, 10);
    }

    #[test]
    fn test_write_errors_are_suppressed() {
        let clock = FakeClock::default();
        let mut source = ScriptedSource::silent(&clock);
        source.script.extend([Ok(b"x\n".to_vec()), Ok(b"y\n".to_vec())]);

        let session = EchoSession::new(EchoConfig::default()).unwrap();
        let summary = session.run(&mut source, &mut BrokenPipe, &clock);

        assert_eq!(summary.lines, 2);
        assert_eq!(summary.errors, 2);
    }

    #[test]
    fn test_wall_clock_window() {
        struct SlowSilence(Duration);

        impl LineSource for SlowSilence {
            fn read_line(&mut self) -> anyhow::Result<Vec<u8>> {
                std::thread::sleep(self.0);
                Ok(Vec::new())
            }
        }

        let config = EchoConfig::default()
            .with_read_timeout(Duration::from_millis(20))
            .with_session_duration(Duration::from_millis(200));
        let session = EchoSession::new(config).unwrap();

        let clock = MonotonicClock::start();
        let mut source = SlowSilence(Duration::from_millis(20));
        let mut out: Vec<u8> = Vec::new();
        let summary = session.run(&mut source, &mut out, &clock);

        assert!(summary.elapsed >= Duration::from_millis(200));
        assert!(summary.elapsed < Duration::from_secs(2));
        assert!(summary.reads >= 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EchoConfig::default().with_read_timeout(Duration::ZERO);
        assert!(EchoSession::new(config).is_err());
    }
}
