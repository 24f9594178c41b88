// Feature modules: thin request/response wrappers over the API gateway client.
// AI-assisted ones also go through llm_client; none of them call the completion API directly.

pub mod auth;
pub mod cover_letter;
pub mod dashboard;
pub mod interview;
pub mod quiz;
pub mod resume;
pub mod user;
