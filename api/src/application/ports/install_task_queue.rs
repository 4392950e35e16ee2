use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallAppJob {
    pub installation_id: i32,
    pub activate_after_installation: bool,
}

/// Fire-and-forget dispatch of installation jobs.
#[async_trait]
pub trait InstallTaskQueue: Send + Sync {
    async fn enqueue(&self, job: InstallAppJob) -> anyhow::Result<()>;
}
