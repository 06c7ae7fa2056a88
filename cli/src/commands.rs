pub mod discover;
pub mod run;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cometd")]
#[command(about = "Discover Eurotronic Comet WiFi thermostats and bridge them to MQTT.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the local network for Comet thermostats
    #[command(alias = "d")]
    Discover(ScanArgs),
    /// Discover thermostats and bridge their state to an MQTT broker
    #[command(alias = "r")]
    Run(RunArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Seconds to collect ARP replies
    #[arg(long, default_value_t = 3)]
    pub timeout: u64,

    /// Vendor MAC prefix to match, repeatable
    #[arg(long = "prefix")]
    pub prefixes: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// MQTT broker host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = 1883)]
    pub port: u16,

    /// MQTT username
    #[arg(long)]
    pub username: Option<String>,

    /// MQTT password
    #[arg(long)]
    pub password: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
