//! The fixed MQTT topic namespace used by Comet thermostats.
//!
//! Every device publishes value updates under `03/00002F71/<mac>/V/` and
//! accepts commands under `03/00002F71/<mac>/S/`. The sub-topic names are
//! register-style codes: `A1` is the measured temperature, `A0` the setpoint.

/// Root shared by every Comet topic.
pub const TOPIC_ROOT: &str = "03/00002F71";

const CURRENT_SUFFIX: &str = "/V/A1";
const TARGET_SUFFIX: &str = "/V/A0";

/// Which thermostat reading an inbound message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Current,
    Target,
}

/// The topics tied to one device. Derived deterministically from the device
/// id and immutable for the lifetime of the channel.
#[derive(Debug, Clone)]
pub struct TopicBinding {
    inbound_pattern: String,
    target_command_topic: String,
}

impl TopicBinding {
    pub fn for_device(device_id: &str) -> Self {
        Self {
            inbound_pattern: format!("{TOPIC_ROOT}/{device_id}/V/#"),
            target_command_topic: format!("{TOPIC_ROOT}/{device_id}/S/A0"),
        }
    }

    /// Wildcard subscription covering every value the device publishes.
    pub fn inbound_pattern(&self) -> &str {
        &self.inbound_pattern
    }

    /// Where setpoint commands are published.
    pub fn target_command_topic(&self) -> &str {
        &self.target_command_topic
    }
}

/// Classifies an inbound topic by its sub-value suffix.
///
/// Returns `None` for sub-values the bridge does not track; callers ignore
/// those messages.
pub fn classify(topic: &str) -> Option<Reading> {
    if topic.ends_with(CURRENT_SUFFIX) {
        Some(Reading::Current)
    } else if topic.ends_with(TARGET_SUFFIX) {
        Some(Reading::Target)
    } else {
        None
    }
}

/// Extracts the device id segment from a namespaced topic, if present.
pub fn device_id(topic: &str) -> Option<&str> {
    let rest = topic.strip_prefix(TOPIC_ROOT)?.strip_prefix('/')?;
    let id = rest.split('/').next()?;
    (!id.is_empty()).then_some(id)
}
