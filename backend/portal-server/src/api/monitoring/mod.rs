pub mod monitoring;
pub mod monitoring_response;
