//! Runtime configuration.
use std::env;
use std::str::FromStr;

use tracker_core::{AlertSettings, Setting};

const ALERT_VARS: [(&str, Setting); 4] = [
    ("TRACKER_ALERT_OVERSPEND", Setting::Overspend),
    ("TRACKER_ALERT_REACTION_OVERSPEND", Setting::ReactionOverspend),
    ("TRACKER_ALERT_UNDERSPEND", Setting::Underspend),
    ("TRACKER_SUSTAIN_REMINDERS", Setting::SustainReminder),
];

/// Settings for a [`Tracker`](crate::Tracker) instance.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub alerts: AlertSettings,
    /// Commands buffered per combatant worker before senders wait.
    pub movement_queue: usize,
    /// Events buffered per topic before slow subscribers lag.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            alerts: AlertSettings::default(),
            movement_queue: 32,
            event_capacity: 128,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_ALERT_OVERSPEND` - Overspend alerts (default: true)
    /// - `TRACKER_ALERT_REACTION_OVERSPEND` - Reaction overspend alerts (default: true)
    /// - `TRACKER_ALERT_UNDERSPEND` - End-of-turn underspend alerts (default: true)
    /// - `TRACKER_SUSTAIN_REMINDERS` - Start-of-turn sustain reminders (default: true)
    /// - `TRACKER_MOVEMENT_QUEUE` - Per-combatant queue capacity (default: 32)
    /// - `TRACKER_EVENT_CAPACITY` - Per-topic event capacity (default: 128)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        for (key, setting) in ALERT_VARS {
            if let Some(enabled) = read_env::<bool>(lookup(key)) {
                config.alerts.set(setting, enabled);
            }
        }
        if let Some(capacity) = read_env::<usize>(lookup("TRACKER_MOVEMENT_QUEUE")) {
            config.movement_queue = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>(lookup("TRACKER_EVENT_CAPACITY")) {
            config.event_capacity = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(value: Option<String>) -> Option<T>
where
    T: FromStr,
{
    value?.trim().parse().ok()
}
