pub mod access_guard;
pub mod attachment_pipeline;
pub mod conversation_service;
pub mod jwt_service;
