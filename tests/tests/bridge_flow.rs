//! End-to-end bridge scenarios against the in-memory bus.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use comet_common::device::DeviceDescriptor;
use comet_common::network::hwaddr::HardwareAddr;
use comet_core::bridge::Bridge;
use comet_core::model::HvacMode;
use comet_core::transport::QosLevel;
use comet_integration_tests::FakeBus;

fn descriptor(octets: [u8; 6]) -> DeviceDescriptor {
    DeviceDescriptor::new(HardwareAddr::new(octets))
}

#[test]
fn full_inbound_outbound_cycle_for_one_device() {
    let bus = Arc::new(FakeBus::default());
    let mut bridge = Bridge::new(bus.clone());
    let handle = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC]))
        .unwrap();

    assert_eq!(
        *bus.subscriptions.lock(),
        vec!["03/00002F71/D43D39AABBCC/V/#".to_string()]
    );
    assert_eq!(handle.summary().manufacturer, "Eurotronic");
    assert_eq!(handle.summary().model, "Comet WiFi");

    // Device reports its measured and target temperatures.
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"#28");
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A0", b"#2a");
    let state = handle.state();
    assert_eq!(state.current_temperature, 20.0);
    assert_eq!(state.target_temperature, 21.0);
    assert_eq!(state.mode, HvacMode::Heat);

    // Host raises the setpoint; the command goes out once, QoS 2, no retain.
    handle.set_target_temperature(21.5).unwrap();
    assert_eq!(handle.state().target_temperature, 21.5);
    let publishes = bus.publishes.lock();
    assert_eq!(publishes.len(), 1);
    assert_eq!(publishes[0].topic, "03/00002F71/D43D39AABBCC/S/A0");
    assert_eq!(publishes[0].payload, "#2b");
    assert_eq!(publishes[0].qos, QosLevel::ExactlyOnce);
    assert!(!publishes[0].retain);
}

#[test]
fn devices_are_isolated_from_each_other() {
    let bus = Arc::new(FakeBus::default());
    let mut bridge = Bridge::new(bus);
    let first = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0x00, 0x00, 0x01]))
        .unwrap();
    let second = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0x00, 0x00, 0x02]))
        .unwrap();

    bridge.dispatch("03/00002F71/D43D39000001/V/A1", b"#2e");

    assert_eq!(first.state().current_temperature, 23.0);
    assert_eq!(second.state().current_temperature, 20.0);
}

#[test]
fn malformed_payloads_never_corrupt_state_or_panic() {
    let bus = Arc::new(FakeBus::default());
    let mut bridge = Bridge::new(bus);
    let handle = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC]))
        .unwrap();

    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"#2b");
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"nonsense");
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"#xyz");
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", &[0x80, 0x81]);

    assert_eq!(handle.state().current_temperature, 21.5);
}

#[test]
fn publish_failure_is_non_fatal_and_keeps_optimistic_state() {
    let bus = Arc::new(FakeBus::default());
    let mut bridge = Bridge::new(bus.clone());
    let handle = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC]))
        .unwrap();

    *bus.fail_publishes.lock() = true;
    handle.set_target_temperature(23.0).unwrap();

    // Local state already moved; the device will re-sync on its next report.
    assert_eq!(handle.state().target_temperature, 23.0);
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A0", b"#2a");
    assert_eq!(handle.state().target_temperature, 21.0);
}

#[test]
fn observers_fire_once_per_mutation_until_shutdown() {
    let bus = Arc::new(FakeBus::default());
    let mut bridge = Bridge::new(bus.clone());
    let handle = bridge
        .attach(descriptor([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC]))
        .unwrap();

    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = notifications.clone();
    handle.on_state_change(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"#28");
    handle.set_target_temperature(22.0).unwrap();
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A9", b"#28"); // untracked suffix
    bridge.dispatch("03/00002F71/D43D39AABBCC/V/A1", b"bad"); // dropped

    assert_eq!(notifications.load(Ordering::SeqCst), 2);

    bridge.shutdown();
    assert_eq!(
        *bus.unsubscriptions.lock(),
        vec!["03/00002F71/D43D39AABBCC/V/#".to_string()]
    );

    // Nothing fires after teardown, even through a retained handle.
    handle.set_target_temperature(24.0).ok();
    assert_eq!(notifications.load(Ordering::SeqCst), 2);
}
