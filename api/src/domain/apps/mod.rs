pub mod app;
pub mod app_installation;
pub mod job_status;
pub mod manifest;
pub mod permission;
