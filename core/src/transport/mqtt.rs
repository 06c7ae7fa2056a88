use comet_common::config::BrokerConfig;
use comet_common::error::TransportError;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};

use super::{MessageBus, QosLevel};

const COMMAND_QUEUE_CAP: usize = 64;

impl From<QosLevel> for QoS {
    fn from(qos: QosLevel) -> Self {
        match qos {
            QosLevel::AtMostOnce => QoS::AtMostOnce,
            QosLevel::AtLeastOnce => QoS::AtLeastOnce,
            QosLevel::ExactlyOnce => QoS::ExactlyOnce,
        }
    }
}

/// Builds the MQTT client and its event loop from broker settings.
///
/// The returned [`EventLoop`] must be polled for anything to move; the
/// bridge runtime owns that loop.
pub fn connect(cfg: &BrokerConfig) -> (MqttBus, EventLoop) {
    let mut options = MqttOptions::new(&cfg.client_id, &cfg.host, cfg.port);
    options.set_keep_alive(cfg.keep_alive);
    if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
        options.set_credentials(user, pass);
    }

    let (client, event_loop) = AsyncClient::new(options, COMMAND_QUEUE_CAP);
    (MqttBus { client }, event_loop)
}

/// [`MessageBus`] backed by a `rumqttc` client.
///
/// Uses the `try_*` variants throughout so callers never block on the
/// network; the queued commands are flushed by the event loop.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MessageBus for MqttBus {
    fn subscribe(&self, topic: &str, qos: QosLevel) -> Result<(), TransportError> {
        self.client
            .try_subscribe(topic, qos.into())
            .map_err(|e| TransportError::Subscribe {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        self.client
            .try_unsubscribe(topic)
            .map_err(|e| TransportError::Unsubscribe {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    fn publish(
        &self,
        topic: &str,
        payload: &str,
        qos: QosLevel,
        retain: bool,
    ) -> Result<(), TransportError> {
        self.client
            .try_publish(topic, qos.into(), retain, payload)
            .map_err(|e| TransportError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}
