//! The seam between device channels and the message bus.
//!
//! Channels depend on the [`MessageBus`] trait only; the production
//! implementation wraps a `rumqttc` client. Every operation here is
//! non-blocking: commands are queued for the client's event loop, never
//! awaited against the network.

use comet_common::error::TransportError;

mod mqtt;

pub use mqtt::{MqttBus, connect};

/// MQTT delivery guarantee levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QosLevel {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// Publish/subscribe operations a device channel needs from the bus.
pub trait MessageBus: Send + Sync {
    fn subscribe(&self, topic: &str, qos: QosLevel) -> Result<(), TransportError>;

    fn unsubscribe(&self, topic: &str) -> Result<(), TransportError>;

    fn publish(
        &self,
        topic: &str,
        payload: &str,
        qos: QosLevel,
        retain: bool,
    ) -> Result<(), TransportError>;
}
