//! Whole-cycle properties of the driving simulator

use drivesim_core::cycle::{compute, CycleSimulator, Narrowing, Phase, PhaseTime};
use pretty_assertions::assert_eq;

/// Every 10 ms across the cycle
fn cycle_times() -> impl Iterator<Item = PhaseTime> {
    (0..6000).map(|i| PhaseTime::from_secs(i as f32 * 0.01))
}

#[test]
fn test_compute_is_deterministic() {
    for t in cycle_times() {
        assert_eq!(compute(t), compute(t), "t = {}", t);
    }
}

#[test]
fn test_gear_always_in_range() {
    for t in cycle_times() {
        let gear = compute(t).gear_position;
        assert!((1..=4).contains(&gear), "gear {} at {}", gear, t);
    }
}

#[test]
fn test_throttle_and_flags() {
    for t in cycle_times() {
        let s = compute(t);
        assert!(s.throttle_position <= 100, "throttle {} at {}", s.throttle_position, t);
        assert_eq!(s.status_flags, 0);
    }
}

#[test]
fn test_steering_bounded() {
    let mut min = i16::MAX;
    let mut max = i16::MIN;
    for t in cycle_times() {
        let angle = compute(t).steering_angle;
        assert!((-300..=300).contains(&angle), "steering {} at {}", angle, t);
        min = min.min(angle);
        max = max.max(angle);
    }
    // sin(0.5t) sweeps nearly a full period over the cycle.
    assert!(min < -290 && max > 290, "range {}..{}", min, max);
}

#[test]
fn test_documented_ranges() {
    for t in cycle_times() {
        let s = compute(t);
        assert!(s.engine_rpm <= 6500, "rpm {} at {}", s.engine_rpm, t);
        assert!(s.boost_pressure <= 1900, "boost {} at {}", s.boost_pressure, t);
        assert!(s.oil_pressure <= 2200, "oil {} at {}", s.oil_pressure, t);
        assert!(s.vehicle_speed <= 120, "speed {} at {}", s.vehicle_speed, t);
        assert!(s.brake_pressure <= 1200, "brake {} at {}", s.brake_pressure, t);
    }
}

#[test]
fn test_brake_only_while_braking() {
    for t in cycle_times() {
        let s = compute(t);
        if Phase::at(t) != Phase::Braking {
            assert_eq!(s.brake_pressure, 0, "t = {}", t);
        }
    }
}

#[test]
fn test_fuel_never_increases_within_cycle() {
    let mut previous = u16::MAX;
    for t in cycle_times() {
        let fuel = compute(t).fuel_level;
        assert!(fuel <= previous, "fuel rose to {} at {}", fuel, t);
        previous = fuel;
    }
    assert_eq!(compute(PhaseTime::from_secs(0.0)).fuel_level, 3500);
}

#[test]
fn test_phase_sequence() {
    let mut phases: Vec<Phase> = Vec::new();
    for t in cycle_times() {
        let phase = Phase::at(t);
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
    }
    assert_eq!(
        phases,
        vec![
            Phase::Idle,
            Phase::Launch,
            Phase::Upshift,
            Phase::Cruise,
            Phase::Accelerate,
            Phase::Braking,
            Phase::IdleReturn,
        ]
    );
}

#[test]
fn test_return_idle_uses_idle_formulas() {
    // sin(55) is close to -1, so the truncated wobble terms are non-zero.
    let s = compute(PhaseTime::from_secs(55.0));
    let wobble = 55.0f32.sin();
    assert_eq!(s.engine_rpm as i32, 1000 + (wobble * 100.0) as i32);
    assert_eq!(s.oil_pressure as i32, 1600 + (wobble * 50.0) as i32);
    assert_eq!(s.throttle_position as i32, 2 + (wobble * 2.0) as i32);
    assert_eq!(s.vehicle_speed, 0);
    assert_eq!(s.gear_position, 1);
    assert_eq!(s.boost_pressure, 800);
}

#[test]
fn test_cycle_wraps_from_clock() {
    let first = compute(PhaseTime::from_micros(12_345_000));
    let later = compute(PhaseTime::from_micros(12_345_000 + 3 * 60_000_000));
    assert_eq!(first, later);
}

#[test]
fn test_narrowing_policies_agree_over_cycle() {
    let wrap = CycleSimulator::with_narrowing(Narrowing::Wrap);
    let saturate = CycleSimulator::with_narrowing(Narrowing::Saturate);
    for t in cycle_times() {
        assert_eq!(wrap.compute(t), saturate.compute(t), "t = {}", t);
    }
}
