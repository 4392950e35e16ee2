pub mod app_installation_repository;
pub mod app_installer_client;
pub mod app_repository;
pub mod install_task_queue;
pub mod user_repository;
