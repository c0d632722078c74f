use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Status of one service, or of all of them
    Status { name: Option<String> },

    /// Start a service (no-op when already running)
    Start { name: String },

    /// Stop a service and disable its auto-restart
    Stop { name: String },

    /// Clear restart counters so the monitor may restart the service again
    ResetStats { name: String },

    /// Start a service, wait until it is running, and print its URL
    Launch { name: String },

    /// Monitor configuration and per-service bookkeeping
    Monitoring,

    /// Aggregate health, or the health of one service
    Health { name: Option<String> },

    /// List configured subsystems
    Systems,
}
