use std::sync::Arc;

use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::application::ports::app_repository::AppRepository;
use crate::application::ports::install_task_queue::InstallTaskQueue;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    app_installations: Arc<dyn AppInstallationRepository>,
    apps: Arc<dyn AppRepository>,
    user_repo: Arc<dyn UserRepository>,
    install_tasks: Arc<dyn InstallTaskQueue>,
}

impl AppServices {
    pub fn new(
        app_installations: Arc<dyn AppInstallationRepository>,
        apps: Arc<dyn AppRepository>,
        user_repo: Arc<dyn UserRepository>,
        install_tasks: Arc<dyn InstallTaskQueue>,
    ) -> Self {
        Self {
            app_installations,
            apps,
            user_repo,
            install_tasks,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn app_installations(&self) -> Arc<dyn AppInstallationRepository> {
        self.services.app_installations.clone()
    }

    pub fn apps(&self) -> Arc<dyn AppRepository> {
        self.services.apps.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn install_tasks(&self) -> Arc<dyn InstallTaskQueue> {
        self.services.install_tasks.clone()
    }
}
