use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] portal_config::ConfigError),

    #[error("Supervisor error: {0}")]
    Supervisor(#[from] portal_supervisor::SupervisorError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Metrics exporter error: {message}")]
    Metrics { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
