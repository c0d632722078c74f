pub mod launch;
pub mod launch_response;
