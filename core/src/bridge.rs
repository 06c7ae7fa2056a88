//! The bridge runtime: routes bus traffic to device channels and exposes a
//! thin climate facade for the host platform.
//!
//! Each inbound publish is dispatched to at most one channel, keyed by the
//! device-id segment of the topic, and handled as one atomic step under that
//! channel's lock. Messages for different devices may interleave freely;
//! models are disjoint so there is nothing to contend on. No lock is held
//! across a network operation — publishes are queued, not awaited.

use std::collections::HashMap;
use std::sync::Arc;

use comet_common::device::DeviceDescriptor;
use comet_common::error::{TransportError, ValidationError};
use parking_lot::Mutex;
use rumqttc::{Event, EventLoop, Packet};
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

use crate::channel::{DeviceStateChannel, StateListener};
use crate::model::ThermostatState;
use crate::topics;
use crate::transport::MessageBus;

pub const MANUFACTURER: &str = "Eurotronic";
pub const MODEL: &str = "Comet WiFi";

const POLL_FAILURE_BACKOFF: Duration = Duration::from_secs(1);

/// What the host platform needs to register a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub id: String,
    pub display_name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

impl From<&DeviceDescriptor> for DeviceSummary {
    fn from(descriptor: &DeviceDescriptor) -> Self {
        Self {
            id: descriptor.id(),
            display_name: descriptor.display_name(),
            manufacturer: MANUFACTURER,
            model: MODEL,
        }
    }
}

/// Climate-control facade handed to the host, cheap to clone.
#[derive(Clone)]
pub struct ClimateHandle {
    summary: DeviceSummary,
    channel: Arc<Mutex<DeviceStateChannel>>,
}

impl ClimateHandle {
    pub fn summary(&self) -> &DeviceSummary {
        &self.summary
    }

    pub fn state(&self) -> ThermostatState {
        self.channel.lock().state()
    }

    pub fn set_target_temperature(&self, value: f64) -> Result<(), ValidationError> {
        self.channel.lock().request_target_temperature(value)
    }

    pub fn on_state_change(&self, listener: StateListener) {
        self.channel.lock().on_state_change(listener);
    }
}

/// Owns one channel per discovered device and routes inbound messages.
pub struct Bridge {
    bus: Arc<dyn MessageBus>,
    channels: HashMap<String, Arc<Mutex<DeviceStateChannel>>>,
}

impl Bridge {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self {
            bus,
            channels: HashMap::new(),
        }
    }

    /// Opens a channel for one discovered device and returns its facade.
    pub fn attach(&mut self, descriptor: DeviceDescriptor) -> Result<ClimateHandle, TransportError> {
        let channel = DeviceStateChannel::open(descriptor, self.bus.clone())?;
        let handle = ClimateHandle {
            summary: DeviceSummary::from(&descriptor),
            channel: Arc::new(Mutex::new(channel)),
        };
        self.channels.insert(descriptor.id(), handle.channel.clone());
        Ok(handle)
    }

    pub fn handles(&self) -> Vec<ClimateHandle> {
        self.channels
            .values()
            .map(|channel| ClimateHandle {
                summary: DeviceSummary::from(channel.lock().descriptor()),
                channel: channel.clone(),
            })
            .collect()
    }

    pub fn device_count(&self) -> usize {
        self.channels.len()
    }

    /// Routes one inbound message to the owning device channel, if any.
    pub fn dispatch(&self, topic: &str, payload: &[u8]) {
        let Some(id) = topics::device_id(topic) else {
            return;
        };
        if let Some(channel) = self.channels.get(id) {
            channel.lock().handle_message(topic, payload);
        }
    }

    /// Closes every channel. After this no listener fires again.
    pub fn shutdown(&mut self) {
        for channel in self.channels.values() {
            channel.lock().close();
        }
        self.channels.clear();
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drives the MQTT event loop, feeding incoming publishes to the bridge.
///
/// Runs until the task is cancelled. Connection errors are logged and the
/// loop keeps polling; reconnection itself is the transport's job.
pub async fn run_event_loop(bridge: &Bridge, event_loop: &mut EventLoop) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                bridge.dispatch(&publish.topic, &publish.payload);
            }
            Ok(event) => {
                debug!(?event, "bus event");
            }
            Err(e) => {
                warn!(%e, "bus connection error");
                sleep(POLL_FAILURE_BACKOFF).await;
            }
        }
    }
}
