//! Driving Cycle - Simulated sensor data for one 60 second lap
//!
//! Maps a position inside the cycle to a coherent set of sensor values:
//! idle, launch, a 1-2 upshift, cruise, hard acceleration through the gears,
//! braking and a return to idle. The simulator never reads a clock; callers
//! hand it a [`PhaseTime`].

mod narrowing;

pub use narrowing::Narrowing;

use narrowing::trunc;
use std::fmt;

use crate::snapshot::Snapshot;

/// Length of one driving cycle in seconds
pub const CYCLE_SECS: f32 = 60.0;

const CYCLE_MICROS: u64 = 60_000_000;

/// Position inside the driving cycle, in seconds within `[0, 60)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct PhaseTime(f32);

impl PhaseTime {
    /// Derive the phase time from a monotonic microsecond counter
    pub fn from_micros(micros: u64) -> Self {
        let rem = micros % CYCLE_MICROS;
        let secs = (rem / 1_000_000) as f32 + (rem % 1_000_000) as f32 / 1_000_000.0;
        Self(secs.min(last_instant()))
    }

    /// Fold an arbitrary number of seconds into the cycle.
    ///
    /// Non-finite input maps to the start of the cycle.
    pub fn from_secs(secs: f32) -> Self {
        if !secs.is_finite() {
            return Self(0.0);
        }
        Self(secs.rem_euclid(CYCLE_SECS).min(last_instant()))
    }

    /// Seconds since the start of the cycle
    pub fn as_secs(self) -> f32 {
        self.0
    }
}

impl fmt::Display for PhaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

/// Largest representable instant before the cycle wraps
fn last_instant() -> f32 {
    f32::from_bits(CYCLE_SECS.to_bits() - 1)
}

/// Named segment of the driving cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Engine idling, vehicle stationary
    Idle,
    /// Pulling away in first gear
    Launch,
    /// Shift from first to second
    Upshift,
    /// Steady driving in second
    Cruise,
    /// Wide-open acceleration through second, third and fourth
    Accelerate,
    /// Hard stop with a downshift
    Braking,
    /// Back to idle at the end of the lap
    IdleReturn,
}

impl Phase {
    /// Phase active at `t`
    pub fn at(t: PhaseTime) -> Phase {
        span_for(t.as_secs()).phase
    }

    /// Human-readable phase name
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Launch => "launch",
            Phase::Upshift => "upshift 1-2",
            Phase::Cruise => "cruise",
            Phase::Accelerate => "accelerate",
            Phase::Braking => "braking",
            Phase::IdleReturn => "idle (return)",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unnarrowed readings, held in `i32` until the snapshot is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reading {
    rpm: i32,
    boost: i32,
    oil: i32,
    speed: i32,
    brake: i32,
    throttle: i32,
    gear: i32,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            rpm: 1000,
            boost: 800,
            oil: 1600,
            speed: 0,
            brake: 0,
            throttle: 0,
            gear: 1,
        }
    }
}

/// One row of the phase table. A span covers `[previous until, until)`.
struct PhaseSpan {
    until: f32,
    phase: Phase,
    apply: fn(f32, &mut Reading),
}

/// Evaluated top to bottom, first match wins.
static PHASES: [PhaseSpan; 7] = [
    PhaseSpan { until: 10.0, phase: Phase::Idle, apply: idle },
    PhaseSpan { until: 20.0, phase: Phase::Launch, apply: launch },
    PhaseSpan { until: 22.0, phase: Phase::Upshift, apply: upshift },
    PhaseSpan { until: 35.0, phase: Phase::Cruise, apply: cruise },
    PhaseSpan { until: 45.0, phase: Phase::Accelerate, apply: accelerate },
    PhaseSpan { until: 50.0, phase: Phase::Braking, apply: braking },
    PhaseSpan { until: CYCLE_SECS, phase: Phase::IdleReturn, apply: idle_return },
];

fn span_for(t: f32) -> &'static PhaseSpan {
    PHASES
        .iter()
        .find(|span| t < span.until)
        .unwrap_or(&PHASES[PHASES.len() - 1])
}

fn idle(t: f32, r: &mut Reading) {
    let wobble = t.sin();
    r.rpm = 1000 + trunc(wobble * 100.0);
    r.speed = 0;
    r.throttle = 2 + trunc(wobble * 2.0);
    r.gear = 1;
    r.boost = 800;
    r.oil = 1600 + trunc(wobble * 50.0);
}

fn launch(t: f32, r: &mut Reading) {
    let f = (t - 10.0) / 10.0;
    r.rpm = 1000 + trunc(f * 3000.0);
    r.speed = trunc(f * 40.0);
    r.throttle = 10 + trunc(f * 50.0);
    r.gear = 1;
    r.boost = 800 + trunc(f * 400.0);
    r.oil = 1700 + trunc(f * 500.0);
}

fn upshift(t: f32, r: &mut Reading) {
    let f = (t - 20.0) / 2.0;
    r.rpm = 4000 - trunc(f * 2000.0);
    r.speed = 40 + trunc(f * 5.0);
    r.throttle = 60 - trunc(f * 30.0);
    r.gear = 2;
    r.boost = 1200 - trunc(f * 200.0);
}

fn cruise(t: f32, r: &mut Reading) {
    let swing = t.sin();
    r.rpm = 2000 + trunc(swing * 500.0);
    r.speed = 45 + trunc((t * 0.5).sin() * 15.0);
    r.throttle = 20 + trunc(swing * 20.0);
    r.gear = 2;
    r.boost = 900 + trunc(swing * 100.0);
}

fn accelerate(t: f32, r: &mut Reading) {
    let f = (t - 35.0) / 10.0;
    r.rpm = 2500 + trunc(f * 3500.0);
    r.speed = 60 + trunc(f * 60.0);
    r.throttle = 40 + trunc(f * 50.0);
    r.gear = if t < 40.0 {
        2
    } else if t < 43.0 {
        3
    } else {
        4
    };
    r.boost = 1100 + trunc(f * 700.0);
}

fn braking(t: f32, r: &mut Reading) {
    let f = (t - 45.0) / 5.0;
    r.rpm = 6000 - trunc(f * 4500.0);
    r.speed = 120 - trunc(f * 90.0);
    r.throttle = 0;
    r.brake = trunc(f * 1200.0);
    r.gear = if t < 48.0 { 4 } else { 2 };
    r.boost = 1000;
}

fn idle_return(t: f32, r: &mut Reading) {
    idle(t, r);
    r.brake = 0;
}

/// Driving-cycle simulator
///
/// Stateless apart from the narrowing policy: the same phase time always
/// yields the same [`Snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSimulator {
    narrowing: Narrowing,
}

impl CycleSimulator {
    /// Create a simulator with the wire-compatible wrap-around policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator with an explicit narrowing policy
    pub fn with_narrowing(narrowing: Narrowing) -> Self {
        Self { narrowing }
    }

    /// Narrowing policy in use
    pub fn narrowing(&self) -> Narrowing {
        self.narrowing
    }

    /// Compute the sensor snapshot for `t`
    pub fn compute(&self, t: PhaseTime) -> Snapshot {
        let secs = t.as_secs();
        let mut reading = Reading::default();
        (span_for(secs).apply)(secs, &mut reading);

        let fuel = 3500 - trunc(secs * 50.0);
        let steering = trunc((secs * 0.5).sin() * 300.0);

        let n = self.narrowing;
        Snapshot {
            engine_rpm: n.to_u16(reading.rpm),
            boost_pressure: n.to_u16(reading.boost),
            oil_pressure: n.to_u16(reading.oil),
            fuel_level: n.to_u16(fuel),
            vehicle_speed: n.to_u16(reading.speed),
            // Reserved for fault bits; nothing in the cycle raises one.
            status_flags: 0,
            steering_angle: n.to_i16(steering),
            brake_pressure: n.to_u16(reading.brake),
            throttle_position: n.to_u8(reading.throttle),
            gear_position: n.to_u8(reading.gear),
        }
    }
}

/// Compute the snapshot for `t` with the default narrowing policy
pub fn compute(t: PhaseTime) -> Snapshot {
    CycleSimulator::new().compute(t)
}
