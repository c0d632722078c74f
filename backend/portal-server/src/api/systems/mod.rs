pub mod system_dto;
pub mod system_list_response;
pub mod systems;
