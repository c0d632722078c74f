pub mod service_action_response;
pub mod service_status_response;
pub mod services;
pub mod services_status_response;
