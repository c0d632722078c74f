//! portalctl - portal-server operator CLI
//!
//! # Examples
//!
//! ```bash
//! # Status of every subsystem
//! portalctl status --pretty
//!
//! # Start an out-of-process subsystem on another host
//! portalctl --server http://10.0.0.5:9000 start alpha
//! ```

use portal_cli::{Cli, Client, Commands};

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let client = Client::new(&cli.server);

    let result = match cli.command {
        Commands::Status { name: None } => client.all_status().await,
        Commands::Status { name: Some(name) } => client.status(&name).await,
        Commands::Start { name } => client.start(&name).await,
        Commands::Stop { name } => client.stop(&name).await,
        Commands::ResetStats { name } => client.reset_stats(&name).await,
        Commands::Launch { name } => client.launch(&name).await,
        Commands::Monitoring => client.monitoring().await,
        Commands::Health { name: None } => client.health().await,
        Commands::Health { name: Some(name) } => client.unit_health(&name).await,
        Commands::Systems => client.systems().await,
    };

    // Handle result
    match result {
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(output) = e.output() {
                eprintln!();
                eprintln!("Captured output:");
                eprintln!("{}", output.trim_end());
            }
            ExitCode::FAILURE
        }
    }
}
