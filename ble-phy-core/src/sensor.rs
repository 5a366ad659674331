//! The sensor-monitor record consumer contract (§6, §10.6).
//!
//! This is the hysteresis/alarm state machine a "BTLE sensor monitor" peripheral runs against
//! decoded advertising records, with the timer and signal/slot wiring stripped out: the caller
//! feeds it `&PacketRecord`s as they're decoded and polls `check_alarm` with its own clock.

use std::time::{Duration, Instant};

use crate::record::{PacketRecord, Value};

/// Reported state of a [`SensorMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    Active,
    Inactive,
    Alarm,
}

/// Static configuration for a [`SensorMonitor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorMonitorConfig {
    /// Service Data UUID16 this monitor listens for.
    pub service_uuid16: u16,
    /// Sensor value above which the monitor activates.
    pub activation_level: f64,
    /// Sensor value below which the monitor deactivates (hysteresis band below
    /// `activation_level`).
    pub deactivation_level: f64,
    /// Wall-clock time since the last matching packet after which the monitor alarms.
    pub alarm_timeout: Duration,
}

/// Hysteresis/alarm state machine fed by decoded advertising records.
///
/// Mirrors the original `processSensorData`/`triggerReport` pair: `observe` is the per-packet
/// hook (filters by service UUID, extracts the sensor value, applies hysteresis), and
/// `check_alarm` is the periodic poll that forces the monitor inactive once it has gone too long
/// without a matching packet.
pub struct SensorMonitor {
    config: SensorMonitorConfig,
    active: bool,
    last_value: f64,
    last_seen: Option<Instant>,
}

impl SensorMonitor {
    pub fn new(config: SensorMonitorConfig) -> Self {
        SensorMonitor {
            config,
            active: false,
            last_value: 0.0,
            last_seen: None,
        }
    }

    pub fn state(&self) -> SensorState {
        if self.is_alarmed_as_of(Instant::now()) {
            SensorState::Alarm
        } else if self.active {
            SensorState::Active
        } else {
            SensorState::Inactive
        }
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    /// Feeds one decoded record. Returns the new state if the record matched this monitor's
    /// service UUID and carried a parseable sensor value; `None` if the record was unrelated
    /// (most advertising records from unrelated devices won't be).
    pub fn observe(&mut self, record: &PacketRecord, now: Instant) -> Option<SensorState> {
        let uuid_field = record
            .get("Service Data UUID16")
            .or_else(|| record.get("Service Data"))?;
        let uuid16 = parse_uuid16(uuid_field)?;
        if uuid16 != self.config.service_uuid16 {
            return None;
        }
        let value = match record.get("Service Data") {
            Some(Value::Str(s)) => s.parse::<f64>().ok()?,
            Some(Value::Int(i)) => *i as f64,
            _ => return None,
        };

        self.last_value = value;
        self.last_seen = Some(now);

        if !self.active && value > self.config.activation_level {
            self.active = true;
        } else if self.active && value < self.config.deactivation_level {
            self.active = false;
        }

        Some(self.state())
    }

    /// Polls the alarm timeout against `now`. If the monitor has gone longer than
    /// `alarm_timeout` without a matching packet, forces it inactive and reports `Alarm`.
    pub fn check_alarm(&mut self, now: Instant) -> SensorState {
        if self.is_alarmed_as_of(now) {
            self.active = false;
            SensorState::Alarm
        } else if self.active {
            SensorState::Active
        } else {
            SensorState::Inactive
        }
    }

    fn is_alarmed_as_of(&self, now: Instant) -> bool {
        match self.last_seen {
            None => true,
            Some(seen) => now.saturating_duration_since(seen) > self.config.alarm_timeout,
        }
    }
}

fn parse_uuid16(value: &Value) -> Option<u16> {
    match value {
        Value::Str(s) => u16::from_str_radix(s, 16).ok(),
        Value::Int(i) => u16::try_from(*i).ok(),
    }
}
