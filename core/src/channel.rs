//! Per-device bridge between the message bus and a thermostat model.
//!
//! One channel owns one [`ThermostatModel`]. The transport's delivery loop
//! feeds it inbound messages through [`DeviceStateChannel::handle_message`];
//! the host issues setpoint changes through
//! [`DeviceStateChannel::request_target_temperature`]. Per-message failures
//! never escape: a bad payload is logged and dropped, prior state retained.

use std::sync::Arc;

use comet_common::device::DeviceDescriptor;
use comet_common::error::{TransportError, ValidationError};
use tracing::{debug, error, warn};

use crate::codec;
use crate::model::{ThermostatModel, ThermostatState};
use crate::topics::{self, Reading, TopicBinding};
use crate::transport::{MessageBus, QosLevel};

/// Observer invoked exactly once per accepted state mutation.
pub type StateListener = Box<dyn Fn(ThermostatState) + Send + Sync>;

/// Lifecycle of a channel's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Subscribing,
    Active,
    Unsubscribed,
}

pub struct DeviceStateChannel {
    descriptor: DeviceDescriptor,
    binding: TopicBinding,
    model: ThermostatModel,
    bus: Arc<dyn MessageBus>,
    listener: Option<StateListener>,
    state: ChannelState,
}

impl DeviceStateChannel {
    /// Subscribes to the device's inbound wildcard and activates the channel.
    ///
    /// The bus has no subscribe-ack surface, so a successful subscribe call
    /// moves the channel straight from `Subscribing` to `Active`.
    pub fn open(
        descriptor: DeviceDescriptor,
        bus: Arc<dyn MessageBus>,
    ) -> Result<Self, TransportError> {
        let binding = TopicBinding::for_device(&descriptor.id());
        let mut channel = Self {
            descriptor,
            binding,
            model: ThermostatModel::default(),
            bus,
            listener: None,
            state: ChannelState::Subscribing,
        };
        channel
            .bus
            .subscribe(channel.binding.inbound_pattern(), QosLevel::AtMostOnce)?;
        channel.state = ChannelState::Active;
        debug!(device = %channel.descriptor.id(), "subscribed to device topics");
        Ok(channel)
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> ThermostatState {
        self.model.state()
    }

    pub fn channel_state(&self) -> ChannelState {
        self.state
    }

    /// Registers the observer notified on every accepted mutation.
    pub fn on_state_change(&mut self, listener: StateListener) {
        self.listener = Some(listener);
    }

    /// Entry point for the transport's delivery loop.
    ///
    /// Dispatches by topic suffix, decodes, and updates the model. Unknown
    /// suffixes are ignored; malformed or out-of-range payloads are logged
    /// and dropped without touching existing state. A closed channel ignores
    /// everything, so no callback can fire after teardown.
    pub fn handle_message(&mut self, topic: &str, payload: &[u8]) {
        if self.state == ChannelState::Unsubscribed {
            return;
        }
        let Some(reading) = topics::classify(topic) else {
            return;
        };

        let device = self.descriptor.id();
        let Ok(text) = std::str::from_utf8(payload) else {
            warn!(%device, %topic, "dropping non-UTF-8 payload");
            return;
        };
        let value = match codec::decode_temperature(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(%device, %topic, %e, "dropping malformed payload");
                return;
            }
        };

        let applied = match reading {
            Reading::Current => self.model.set_current_temperature(value),
            Reading::Target => self.model.set_target_temperature(value),
        };
        match applied {
            Ok(()) => self.notify(),
            Err(e) => warn!(%device, %topic, %e, "rejected inbound temperature"),
        }
    }

    /// Optimistically sets the local target temperature and publishes the
    /// command to the device.
    ///
    /// Fire-and-forget: the publish is queued with QoS 2, not retained, and
    /// real confirmation arrives later through the device's own value
    /// updates. A publish failure is a non-fatal warning; the channel stays
    /// in its current state.
    pub fn request_target_temperature(&mut self, value: f64) -> Result<(), ValidationError> {
        if self.state == ChannelState::Unsubscribed {
            warn!(device = %self.descriptor.id(), "ignoring setpoint request on a closed channel");
            return Ok(());
        }
        self.model.set_target_temperature(value)?;
        self.notify();

        let payload = match codec::encode_temperature(value) {
            Ok(payload) => payload,
            Err(e) => {
                // Unreachable after validation; do not leave the model and
                // the device permanently divergent without a trace.
                error!(device = %self.descriptor.id(), %e, "validated temperature failed to encode");
                return Ok(());
            }
        };
        if let Err(e) = self.bus.publish(
            self.binding.target_command_topic(),
            &payload,
            QosLevel::ExactlyOnce,
            false,
        ) {
            warn!(device = %self.descriptor.id(), %e, "failed to publish target temperature");
        }
        Ok(())
    }

    /// Unsubscribes and retires the channel. Idempotent; afterwards no
    /// inbound message reaches the model or the listener.
    pub fn close(&mut self) {
        if self.state == ChannelState::Unsubscribed {
            return;
        }
        self.state = ChannelState::Unsubscribed;
        if let Err(e) = self.bus.unsubscribe(self.binding.inbound_pattern()) {
            warn!(device = %self.descriptor.id(), %e, "failed to unsubscribe");
        }
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(self.model.state());
        }
    }
}
