//! Shared in-memory fakes for the integration tests: a recording message
//! bus and a scripted ARP probe. No network, no broker.

use std::time::Duration;

use comet_common::error::{DiscoveryError, TransportError};
use comet_core::discovery::probe::{ProbeReply, ProbeTransport};
use comet_core::transport::{MessageBus, QosLevel};
use parking_lot::Mutex;
use pnet::ipnetwork::Ipv4Network;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub topic: String,
    pub payload: String,
    pub qos: QosLevel,
    pub retain: bool,
}

/// A bus that records every call and optionally fails publishes.
#[derive(Default)]
pub struct FakeBus {
    pub subscriptions: Mutex<Vec<String>>,
    pub unsubscriptions: Mutex<Vec<String>>,
    pub publishes: Mutex<Vec<PublishRecord>>,
    pub fail_publishes: Mutex<bool>,
}

impl FakeBus {
    pub fn published_payloads(&self) -> Vec<(String, String)> {
        self.publishes
            .lock()
            .iter()
            .map(|p| (p.topic.clone(), p.payload.clone()))
            .collect()
    }
}

impl MessageBus for FakeBus {
    fn subscribe(&self, topic: &str, _qos: QosLevel) -> Result<(), TransportError> {
        self.subscriptions.lock().push(topic.to_string());
        Ok(())
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        self.unsubscriptions.lock().push(topic.to_string());
        Ok(())
    }

    fn publish(
        &self,
        topic: &str,
        payload: &str,
        qos: QosLevel,
        retain: bool,
    ) -> Result<(), TransportError> {
        if *self.fail_publishes.lock() {
            return Err(TransportError::Publish {
                topic: topic.to_string(),
                reason: "broker unavailable".to_string(),
            });
        }
        self.publishes.lock().push(PublishRecord {
            topic: topic.to_string(),
            payload: payload.to_string(),
            qos,
            retain,
        });
        Ok(())
    }
}

/// A probe that replays a fixed reply set, as if those hosts answered.
pub struct ScriptedProbe {
    pub replies: Vec<ProbeReply>,
}

impl ProbeTransport for ScriptedProbe {
    fn sweep(
        &self,
        _block: Ipv4Network,
        _timeout: Duration,
    ) -> Result<Vec<ProbeReply>, DiscoveryError> {
        Ok(self.replies.clone())
    }
}
