pub mod error;
pub mod launch;
pub mod monitoring;
pub mod services;
pub mod systems;
