//! Sensor snapshot produced once per tick

use serde::Serialize;

use crate::protocol::{ChannelValue, TlvError, TlvRecord, CHANNELS};

/// Identifies one field of a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// [`Snapshot::engine_rpm`]
    EngineRpm,
    /// [`Snapshot::boost_pressure`]
    BoostPressure,
    /// [`Snapshot::oil_pressure`]
    OilPressure,
    /// [`Snapshot::fuel_level`]
    FuelLevel,
    /// [`Snapshot::vehicle_speed`]
    VehicleSpeed,
    /// [`Snapshot::status_flags`]
    StatusFlags,
    /// [`Snapshot::steering_angle`]
    SteeringAngle,
    /// [`Snapshot::brake_pressure`]
    BrakePressure,
    /// [`Snapshot::throttle_position`]
    ThrottlePosition,
    /// [`Snapshot::gear_position`]
    GearPosition,
}

/// Complete set of simulated sensor values for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Snapshot {
    /// Engine speed (RPM)
    pub engine_rpm: u16,
    /// Boost pressure (mbar)
    pub boost_pressure: u16,
    /// Oil pressure (mbar)
    pub oil_pressure: u16,
    /// Fuel level, counts down over the cycle
    pub fuel_level: u16,
    /// Vehicle speed (km/h)
    pub vehicle_speed: u16,
    /// Fault bitfield, currently always zero
    pub status_flags: u8,
    /// Steering angle in degrees, negative is left
    pub steering_angle: i16,
    /// Brake line pressure, zero unless braking
    pub brake_pressure: u16,
    /// Throttle opening (0-100 %)
    pub throttle_position: u8,
    /// Selected gear (1-4)
    pub gear_position: u8,
}

/// Mutable view of one field, typed by its wire width
enum Slot<'a> {
    U8(&'a mut u8),
    U16(&'a mut u16),
    I16(&'a mut i16),
}

impl Snapshot {
    /// Read a field as a typed wire value
    pub fn get(&self, field: Field) -> ChannelValue {
        match field {
            Field::EngineRpm => ChannelValue::U16(self.engine_rpm),
            Field::BoostPressure => ChannelValue::U16(self.boost_pressure),
            Field::OilPressure => ChannelValue::U16(self.oil_pressure),
            Field::FuelLevel => ChannelValue::U16(self.fuel_level),
            Field::VehicleSpeed => ChannelValue::U16(self.vehicle_speed),
            Field::StatusFlags => ChannelValue::U8(self.status_flags),
            Field::SteeringAngle => ChannelValue::I16(self.steering_angle),
            Field::BrakePressure => ChannelValue::U16(self.brake_pressure),
            Field::ThrottlePosition => ChannelValue::U8(self.throttle_position),
            Field::GearPosition => ChannelValue::U8(self.gear_position),
        }
    }

    fn slot(&mut self, field: Field) -> Slot<'_> {
        match field {
            Field::EngineRpm => Slot::U16(&mut self.engine_rpm),
            Field::BoostPressure => Slot::U16(&mut self.boost_pressure),
            Field::OilPressure => Slot::U16(&mut self.oil_pressure),
            Field::FuelLevel => Slot::U16(&mut self.fuel_level),
            Field::VehicleSpeed => Slot::U16(&mut self.vehicle_speed),
            Field::StatusFlags => Slot::U8(&mut self.status_flags),
            Field::SteeringAngle => Slot::I16(&mut self.steering_angle),
            Field::BrakePressure => Slot::U16(&mut self.brake_pressure),
            Field::ThrottlePosition => Slot::U8(&mut self.throttle_position),
            Field::GearPosition => Slot::U8(&mut self.gear_position),
        }
    }

    /// Store a typed wire value into a field.
    ///
    /// Fails if the value kind does not match the field's width and signedness.
    pub fn set(&mut self, field: Field, value: ChannelValue) -> Result<(), TlvError> {
        match (self.slot(field), value) {
            (Slot::U8(slot), ChannelValue::U8(v)) => *slot = v,
            (Slot::U16(slot), ChannelValue::U16(v)) => *slot = v,
            (Slot::I16(slot), ChannelValue::I16(v)) => *slot = v,
            _ => return Err(TlvError::KindMismatch(field)),
        }
        Ok(())
    }

    /// Rebuild a snapshot from one tick's worth of records.
    ///
    /// Unknown tags are skipped. Every channel must be present; when a tag
    /// repeats, the last record wins.
    pub fn from_records<'a, I>(records: I) -> Result<Self, TlvError>
    where
        I: IntoIterator<Item = &'a TlvRecord>,
    {
        let mut snapshot = Snapshot::default();
        let mut seen = [false; CHANNELS.len()];

        for record in records {
            let Some(index) = CHANNELS.iter().position(|c| c.tag == record.tag()) else {
                tracing::warn!("Skipping record with unknown tag {:#04x}", record.tag());
                continue;
            };
            let channel = CHANNELS[index];
            snapshot.set(channel.field, channel.decode(record)?)?;
            seen[index] = true;
        }

        match CHANNELS.iter().zip(seen).find(|(_, seen)| !seen) {
            Some((missing, _)) => Err(TlvError::MissingChannel(missing.label)),
            None => Ok(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            engine_rpm: 2500,
            boost_pressure: 1000,
            oil_pressure: 1950,
            fuel_level: 2750,
            vehicle_speed: 20,
            status_flags: 0,
            steering_angle: -287,
            brake_pressure: 0,
            throttle_position: 35,
            gear_position: 1,
        }
    }

    #[test]
    fn test_get_set_every_field() {
        let source = sample();
        let mut copy = Snapshot::default();
        for channel in CHANNELS {
            copy.set(channel.field, source.get(channel.field)).unwrap();
        }
        assert_eq!(copy, source);
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut s = Snapshot::default();
        let err = s.set(Field::GearPosition, ChannelValue::U16(3)).unwrap_err();
        assert!(matches!(err, TlvError::KindMismatch(Field::GearPosition)));
        assert_eq!(s.gear_position, 0);
    }

    #[test]
    fn test_from_records_requires_all_channels() {
        let records: Vec<TlvRecord> = CHANNELS
            .iter()
            .filter(|c| c.field != Field::BrakePressure)
            .map(|c| TlvRecord::from_value(c.tag, sample().get(c.field)))
            .collect();
        let err = Snapshot::from_records(&records).unwrap_err();
        assert!(matches!(err, TlvError::MissingChannel("Brake Pressure")));
    }

    #[test]
    fn test_from_records_skips_unknown_tags() {
        let mut records = vec![TlvRecord::encode_u8(0x7F, 9)];
        records.extend(
            CHANNELS
                .iter()
                .map(|c| TlvRecord::from_value(c.tag, sample().get(c.field))),
        );
        assert_eq!(Snapshot::from_records(&records).unwrap(), sample());
    }
}
