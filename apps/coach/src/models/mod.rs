pub mod cover_letter;
pub mod dashboard;
pub mod interview;
pub mod quiz;
pub mod resume;
pub mod user;
