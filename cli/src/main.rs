mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover, run};
use terminal::logging;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    if !is_root::is_root() {
        warn!("ARP discovery needs raw-socket capability; run as root or grant CAP_NET_RAW");
    }

    match commands.command {
        Commands::Discover(args) => discover::discover(&args).await,
        Commands::Run(args) => run::run(&args).await,
    }
}
