use std::sync::Arc;

use comet_common::config::BrokerConfig;
use comet_core::bridge::{self, Bridge};
use comet_core::discovery;
use comet_core::transport;
use tracing::{info, warn};

use crate::commands::RunArgs;
use crate::commands::discover::discovery_config;

pub async fn run(args: &RunArgs) -> anyhow::Result<()> {
    let cfg = discovery_config(&args.scan);
    let devices = discovery::discover_devices(&cfg).await?;
    anyhow::ensure!(
        !devices.is_empty(),
        "no Comet thermostats found, nothing to bridge"
    );

    let broker = BrokerConfig {
        host: args.host.clone(),
        port: args.port,
        username: args.username.clone(),
        password: args.password.clone(),
        ..BrokerConfig::default()
    };
    let (bus, mut event_loop) = transport::connect(&broker);

    let mut bridge = Bridge::new(Arc::new(bus));
    for device in devices {
        match bridge.attach(device) {
            Ok(handle) => {
                let summary = handle.summary().clone();
                info!("bridging {} ({})", summary.display_name, summary.id);
                handle.on_state_change(Box::new(move |state| {
                    info!(
                        device = %summary.id,
                        current = state.current_temperature,
                        target = state.target_temperature,
                        "state updated"
                    );
                }));
            }
            Err(e) => warn!(device = %device.id(), %e, "could not attach device"),
        }
    }

    info!(
        "bridging {} device(s) via {}:{}, press Ctrl-C to stop",
        bridge.device_count(),
        broker.host,
        broker.port
    );

    tokio::select! {
        _ = bridge::run_event_loop(&bridge, &mut event_loop) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    bridge.shutdown();
    Ok(())
}
