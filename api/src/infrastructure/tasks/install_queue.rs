use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::application::ports::app_installer_client::AppInstallerClient;
use crate::application::ports::app_repository::AppRepository;
use crate::application::ports::install_task_queue::{InstallAppJob, InstallTaskQueue};
use crate::application::use_cases::apps::run_installation::{
    InstallationOutcome, RunAppInstallation,
};

/// In-process queue; jobs are lost on restart and their rows failed on the next boot.
#[derive(Clone)]
pub struct ChannelInstallTaskQueue {
    sender: mpsc::UnboundedSender<InstallAppJob>,
}

impl ChannelInstallTaskQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<InstallAppJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl InstallTaskQueue for ChannelInstallTaskQueue {
    async fn enqueue(&self, job: InstallAppJob) -> anyhow::Result<()> {
        self.sender
            .send(job)
            .map_err(|_| anyhow::anyhow!("install worker is not running"))?;
        tracing::debug!(
            installation_id = job.installation_id,
            "install_job_enqueued"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct InstallWorker {
    pub installations: Arc<dyn AppInstallationRepository>,
    pub apps: Arc<dyn AppRepository>,
    pub client: Arc<dyn AppInstallerClient>,
}

impl InstallWorker {
    pub async fn run_job(&self, job: InstallAppJob) -> anyhow::Result<InstallationOutcome> {
        let uc = RunAppInstallation {
            installations: self.installations.as_ref(),
            apps: self.apps.as_ref(),
            client: self.client.as_ref(),
        };
        uc.execute(job).await
    }

    /// Drains the queue, running at most `max_concurrent` jobs at a time.
    pub fn spawn(
        self,
        mut receiver: mpsc::UnboundedReceiver<InstallAppJob>,
        max_concurrent: usize,
    ) -> JoinHandle<()> {
        let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                let worker = self.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    match worker.run_job(job).await {
                        Ok(outcome) => tracing::debug!(
                            installation_id = job.installation_id,
                            ?outcome,
                            "install_job_finished"
                        ),
                        Err(err) => tracing::error!(
                            installation_id = job.installation_id,
                            error = ?err,
                            "install_job_crashed"
                        ),
                    }
                });
            }
            tracing::info!("install_worker_stopped");
        })
    }
}
