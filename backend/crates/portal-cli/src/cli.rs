use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "portalctl")]
#[command(about = "Operate the subsystems behind a running portal-server")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Portal URL
    #[arg(long, global = true, env = "PORTAL_URL", default_value = crate::DEFAULT_SERVER_URL)]
    pub server: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
