//! Tick Loop - Streams the driving cycle to a byte sink
//!
//! Once per tick: read the monotonic clock, fold it into the 60 s cycle,
//! compute the snapshot and emit it as ten TLV records. The loop then sleeps
//! for a fixed period; time spent computing and writing is not compensated,
//! so the cadence drifts slightly late.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crate::cycle::{CycleSimulator, Phase, PhaseTime};
use crate::protocol::{TlvEncoder, TransportError};
use crate::snapshot::Snapshot;

/// Default tick period (20 Hz)
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Source of monotonic time
pub trait Clock {
    /// Microseconds since an arbitrary, fixed epoch
    fn now_micros(&self) -> u64;
}

/// Blocks until the next tick is due
pub trait Ticker {
    /// Wait out one tick period
    fn sleep_until_next(&mut self, period: Duration);
}

/// [`Clock`] backed by [`Instant`], with the epoch at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Start a clock; `now_micros` counts from this instant
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_micros(&self) -> u64 {
        // u64 microseconds covers ~584k years of uptime.
        self.epoch.elapsed().as_micros() as u64
    }
}

/// [`Ticker`] that sleeps the current thread for the full period
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepTicker;

impl Ticker for SleepTicker {
    fn sleep_until_next(&mut self, period: Duration) {
        thread::sleep(period);
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Position in the cycle this tick was computed for
    pub phase_time: PhaseTime,
    /// Phase active at that position
    pub phase: Phase,
    /// Values that were emitted
    pub snapshot: Snapshot,
    /// Bytes written to the sink
    pub bytes_written: usize,
}

/// Drives the simulator and encoder at a fixed cadence
pub struct Generator<C: Clock, T: Ticker> {
    simulator: CycleSimulator,
    encoder: TlvEncoder,
    clock: C,
    ticker: T,
    period: Duration,
    ticks: u64,
}

impl Generator<MonotonicClock, SleepTicker> {
    /// Generator on the system monotonic clock, sleeping between ticks
    pub fn realtime(simulator: CycleSimulator, period: Duration) -> Self {
        Self::new(simulator, MonotonicClock::new(), SleepTicker, period)
    }
}

impl<C: Clock, T: Ticker> Generator<C, T> {
    /// Generator with explicit time collaborators
    pub fn new(simulator: CycleSimulator, clock: C, ticker: T, period: Duration) -> Self {
        Self {
            simulator,
            encoder: TlvEncoder::new(),
            clock,
            ticker,
            period,
            ticks: 0,
        }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Compute and emit one snapshot, without sleeping
    pub fn tick<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<TickReport, TransportError> {
        let phase_time = PhaseTime::from_micros(self.clock.now_micros());
        let phase = Phase::at(phase_time);
        let snapshot = self.simulator.compute(phase_time);

        let bytes_written = self.encoder.emit_snapshot(&snapshot, sink)?;
        sink.flush()?;
        self.ticks += 1;

        tracing::trace!(
            tick = self.ticks,
            t = phase_time.as_secs(),
            %phase,
            rpm = snapshot.engine_rpm,
            speed = snapshot.vehicle_speed,
            gear = snapshot.gear_position,
            "tick"
        );

        Ok(TickReport {
            phase_time,
            phase,
            snapshot,
            bytes_written,
        })
    }

    /// Run the tick loop.
    ///
    /// With `limit` set, stops after that many ticks and returns the number
    /// completed; otherwise runs until a write fails.
    pub fn run<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
        limit: Option<u64>,
    ) -> Result<u64, TransportError> {
        tracing::info!(
            "Telemetry generator started ({} ms period, {:?} narrowing)",
            self.period.as_millis(),
            self.simulator.narrowing()
        );

        let mut last_phase = None;
        let mut completed = 0u64;
        while limit.map_or(true, |n| completed < n) {
            let report = self.tick(sink)?;
            completed += 1;

            if last_phase != Some(report.phase) {
                tracing::debug!("Entering phase '{}' at {}", report.phase, report.phase_time);
                last_phase = Some(report.phase);
            }

            if limit.map_or(true, |n| completed < n) {
                self.ticker.sleep_until_next(self.period);
            }
        }

        tracing::info!("Telemetry generator stopped after {} ticks", completed);
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SNAPSHOT_WIRE_LEN;
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    /// Clock advanced by the ticker, so each sleep moves time forward
    #[derive(Clone)]
    struct FakeClock(Rc<Cell<u64>>);

    impl Clock for FakeClock {
        fn now_micros(&self) -> u64 {
            self.0.get()
        }
    }

    struct FakeTicker {
        now: Rc<Cell<u64>>,
        sleeps: Vec<Duration>,
    }

    impl Ticker for FakeTicker {
        fn sleep_until_next(&mut self, period: Duration) {
            self.now.set(self.now.get() + period.as_micros() as u64);
            self.sleeps.push(period);
        }
    }

    fn fake_generator(start_micros: u64) -> Generator<FakeClock, FakeTicker> {
        let now = Rc::new(Cell::new(start_micros));
        Generator::new(
            CycleSimulator::new(),
            FakeClock(now.clone()),
            FakeTicker {
                now,
                sleeps: Vec::new(),
            },
            DEFAULT_TICK_PERIOD,
        )
    }

    #[test]
    fn test_tick_uses_clock_position() {
        let mut generator = fake_generator(75_000_000);
        let mut sink = Vec::new();
        let report = generator.tick(&mut sink).unwrap();

        assert_eq!(report.phase_time.as_secs(), 15.0);
        assert_eq!(report.phase, Phase::Launch);
        assert_eq!(report.snapshot.engine_rpm, 2500);
        assert_eq!(report.bytes_written, 37);
        assert_eq!(sink.len(), SNAPSHOT_WIRE_LEN);
    }

    #[test]
    fn test_run_with_limit_sleeps_between_ticks() {
        let mut generator = fake_generator(0);
        let mut sink = Vec::new();
        let done = generator.run(&mut sink, Some(4)).unwrap();

        assert_eq!(done, 4);
        assert_eq!(generator.ticks(), 4);
        assert_eq!(sink.len(), 4 * SNAPSHOT_WIRE_LEN);
        assert_eq!(generator.ticker.sleeps, vec![DEFAULT_TICK_PERIOD; 3]);
        // Fourth tick was computed 150 ms into the cycle.
        assert_eq!(generator.clock.now_micros(), 150_000);
    }

    #[test]
    fn test_zero_limit_emits_nothing() {
        let mut generator = fake_generator(0);
        let mut sink = Vec::new();
        assert_eq!(generator.run(&mut sink, Some(0)).unwrap(), 0);
        assert!(sink.is_empty());
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_stops_loop() {
        let mut generator = fake_generator(0);
        let err = generator.run(&mut BrokenSink, None).unwrap_err();
        assert!(matches!(err, TransportError::IoError(_)));
        assert_eq!(generator.ticks(), 0);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now_micros();
        thread::sleep(Duration::from_millis(2));
        assert!(clock.now_micros() > a);
    }
}
