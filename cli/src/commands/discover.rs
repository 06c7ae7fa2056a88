use colored::*;
use comet_common::config::DiscoveryConfig;
use comet_core::discovery;

use crate::commands::ScanArgs;

pub async fn discover(args: &ScanArgs) -> anyhow::Result<()> {
    let cfg = discovery_config(args);
    let mut devices: Vec<_> = discovery::discover_devices(&cfg).await?.into_iter().collect();

    if devices.is_empty() {
        println!("{}", "No Comet thermostats found.".yellow());
        return Ok(());
    }

    devices.sort_by_key(|d| d.id());
    for device in devices {
        println!(
            "{} {} ({})",
            "*".green().bold(),
            device.display_name().bold(),
            device.id().dimmed()
        );
    }
    Ok(())
}

pub fn discovery_config(args: &ScanArgs) -> DiscoveryConfig {
    let mut cfg = DiscoveryConfig {
        scan_timeout: std::time::Duration::from_secs(args.timeout),
        ..DiscoveryConfig::default()
    };
    if !args.prefixes.is_empty() {
        cfg.vendor_prefixes = args.prefixes.clone();
    }
    cfg
}
