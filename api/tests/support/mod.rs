#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};

use api::application::access::Requestor;
use api::application::ports::app_installation_repository::AppInstallationRepository;
use api::application::ports::app_installer_client::AppInstallerClient;
use api::application::ports::app_repository::AppRepository;
use api::application::ports::install_task_queue::{InstallAppJob, InstallTaskQueue};
use api::application::ports::user_repository::{StaffUserRow, UserRepository};
use api::bootstrap::app_context::{AppContext, AppServices};
use api::bootstrap::config::Config;
use api::domain::apps::app::{App, NewApp, NewAppToken};
use api::domain::apps::app_installation::{AppInstallation, NewAppInstallation};
use api::domain::apps::job_status::JobStatus;
use api::domain::apps::manifest::AppManifest;
use api::domain::apps::permission::{Permission, PermissionSet};
use api::presentation::graphql::schema::{AdminSchema, build_schema};
use async_graphql::{Request, Variables};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

pub const MANIFEST_URL: &str = "http://localhost:3000/manifest";

#[derive(Default)]
pub struct InMemoryInstallations {
    rows: Mutex<BTreeMap<i32, AppInstallation>>,
    next_id: AtomicI32,
    stale_read: Mutex<Option<AppInstallation>>,
    fail_deletes: AtomicBool,
}

impl InMemoryInstallations {
    /// The next `get` returns `row` instead of the stored state, as if it
    /// had been read just before a concurrent write.
    pub fn serve_stale_once(&self, row: AppInstallation) {
        *self.stale_read.lock().unwrap() = Some(row);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, status: JobStatus, permissions: &[Permission]) -> AppInstallation {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = chrono::Utc::now();
        let row = AppInstallation {
            id,
            app_name: "External App".into(),
            manifest_url: MANIFEST_URL.into(),
            status,
            message: None,
            permissions: permissions.iter().copied().collect(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(id, row.clone());
        row
    }

    pub fn find(&self, id: i32) -> Option<AppInstallation> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AppInstallationRepository for InMemoryInstallations {
    async fn create(&self, new: &NewAppInstallation) -> anyhow::Result<AppInstallation> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = chrono::Utc::now();
        let row = AppInstallation {
            id,
            app_name: new.app_name.clone(),
            manifest_url: new.manifest_url.clone(),
            status: JobStatus::Pending,
            message: None,
            permissions: new.permissions.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i32) -> anyhow::Result<Option<AppInstallation>> {
        if let Some(stale) = self.stale_read.lock().unwrap().take() {
            return Ok(Some(stale));
        }
        Ok(self.find(id))
    }

    async fn list(&self) -> anyhow::Result<Vec<AppInstallation>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn transition_status(
        &self,
        id: i32,
        from: JobStatus,
        to: JobStatus,
        message: Option<&str>,
    ) -> anyhow::Result<Option<AppInstallation>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) if row.status == from => {
                row.status = to;
                row.message = message.map(str::to_string);
                row.updated_at = chrono::Utc::now();
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset by peer");
        }
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_if_status(
        &self,
        id: i32,
        status: JobStatus,
    ) -> anyhow::Result<Option<AppInstallation>> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&id).is_some_and(|row| row.status == status) {
            Ok(rows.remove(&id))
        } else {
            Ok(None)
        }
    }
}

#[derive(Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<InstallAppJob>>,
}

impl RecordingQueue {
    pub fn jobs(&self) -> Vec<InstallAppJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstallTaskQueue for RecordingQueue {
    async fn enqueue(&self, job: InstallAppJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

/// Queue whose worker has gone away.
pub struct ClosedQueue;

#[async_trait]
impl InstallTaskQueue for ClosedQueue {
    async fn enqueue(&self, _job: InstallAppJob) -> anyhow::Result<()> {
        anyhow::bail!("install worker is not running")
    }
}

#[derive(Default)]
pub struct InMemoryApps {
    apps: Mutex<Vec<(App, NewAppToken)>>,
}

impl InMemoryApps {
    pub fn all(&self) -> Vec<(App, NewAppToken)> {
        self.apps.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppRepository for InMemoryApps {
    async fn create_with_token(&self, app: &NewApp, token: &NewAppToken) -> anyhow::Result<App> {
        let mut apps = self.apps.lock().unwrap();
        let created = App {
            id: apps.len() as i32 + 1,
            name: app.name.clone(),
            identifier: app.identifier.clone(),
            version: app.version.clone(),
            is_active: app.is_active,
            permissions: app.permissions.clone(),
            manifest_url: app.manifest_url.clone(),
            about_app: app.about_app.clone(),
            data_privacy: app.data_privacy.clone(),
            data_privacy_url: app.data_privacy_url.clone(),
            homepage_url: app.homepage_url.clone(),
            support_url: app.support_url.clone(),
            configuration_url: app.configuration_url.clone(),
            app_url: app.app_url.clone(),
            created_at: chrono::Utc::now(),
        };
        apps.push((created.clone(), token.clone()));
        Ok(created)
    }

    async fn find_active_by_token_hash(&self, token_hash: &str) -> anyhow::Result<Option<App>> {
        Ok(self
            .apps
            .lock()
            .unwrap()
            .iter()
            .find(|(app, token)| app.is_active && token.token_hash == token_hash)
            .map(|(app, _)| app.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<StaffUserRow>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        is_superuser: bool,
        permissions: &PermissionSet,
    ) -> anyhow::Result<StaffUserRow> {
        let row = StaffUserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: Some(password_hash.to_string()),
            is_active: true,
            is_superuser,
            permissions: permissions.clone(),
        };
        self.users.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<StaffUserRow>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StaffUserRow>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

/// Serves a canned manifest and records delivered tokens.
pub struct StubInstallerClient {
    manifest: Mutex<Result<Value, String>>,
    sent_tokens: Mutex<Vec<(String, String)>>,
}

impl StubInstallerClient {
    pub fn serving(manifest: Value) -> Self {
        Self {
            manifest: Mutex::new(Ok(manifest)),
            sent_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(reason: &str) -> Self {
        Self {
            manifest: Mutex::new(Err(reason.to_string())),
            sent_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn serve(&self, manifest: Value) {
        *self.manifest.lock().unwrap() = Ok(manifest);
    }

    pub fn sent_tokens(&self) -> Vec<(String, String)> {
        self.sent_tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppInstallerClient for StubInstallerClient {
    async fn fetch_manifest(&self, _manifest_url: &str) -> anyhow::Result<AppManifest> {
        let manifest = self.manifest.lock().unwrap().clone();
        match manifest {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(reason) => anyhow::bail!("{reason}"),
        }
    }

    async fn send_token(&self, target_url: &str, auth_token: &str) -> anyhow::Result<()> {
        self.sent_tokens
            .lock()
            .unwrap()
            .push((target_url.to_string(), auth_token.to_string()));
        Ok(())
    }
}

/// Serves a valid manifest after `delay` and tracks how many fetches overlap.
pub struct SlowInstallerClient {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowInstallerClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppInstallerClient for SlowInstallerClient {
    async fn fetch_manifest(&self, _manifest_url: &str) -> anyhow::Result<AppManifest> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(serde_json::from_value(manifest_json(&[]))?)
    }

    async fn send_token(&self, _target_url: &str, _auth_token: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// User store whose database is unreachable.
pub struct UnreachableUsers;

#[async_trait]
impl UserRepository for UnreachableUsers {
    async fn create_user(
        &self,
        _email: &str,
        _name: &str,
        _password_hash: &str,
        _is_superuser: bool,
        _permissions: &PermissionSet,
    ) -> anyhow::Result<StaffUserRow> {
        anyhow::bail!("pool timed out while waiting for an open connection")
    }

    async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<StaffUserRow>> {
        anyhow::bail!("pool timed out while waiting for an open connection")
    }

    async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<StaffUserRow>> {
        anyhow::bail!("pool timed out while waiting for an open connection")
    }
}

pub fn manifest_json(permissions: &[&str]) -> Value {
    serde_json::json!({
        "id": "app.external",
        "version": "1.0.0",
        "name": "External App",
        "permissions": permissions,
        "tokenTargetUrl": "http://localhost:3000/register",
        "appUrl": "http://localhost:3000/app",
    })
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

pub fn staff(permissions: &[Permission]) -> Requestor {
    Requestor::Staff {
        user_id: Uuid::new_v4(),
        is_superuser: false,
        permissions: permissions.iter().copied().collect(),
    }
}

pub fn superuser() -> Requestor {
    Requestor::Staff {
        user_id: Uuid::new_v4(),
        is_superuser: true,
        permissions: PermissionSet::new(),
    }
}

pub fn app(permissions: &[Permission]) -> Requestor {
    Requestor::App {
        app_id: 1,
        permissions: permissions.iter().copied().collect(),
    }
}

pub struct TestApi {
    pub schema: AdminSchema,
    pub ctx: AppContext,
    pub installations: Arc<InMemoryInstallations>,
    pub queue: Arc<RecordingQueue>,
    pub apps: Arc<InMemoryApps>,
}

impl TestApi {
    pub fn new() -> Self {
        Self::with_users(Arc::new(InMemoryUsers::default()))
    }

    pub fn with_users(users: Arc<dyn UserRepository>) -> Self {
        let installations = Arc::new(InMemoryInstallations::default());
        let queue = Arc::new(RecordingQueue::default());
        let apps = Arc::new(InMemoryApps::default());
        let services = AppServices::new(installations.clone(), apps.clone(), users, queue.clone());
        let ctx = AppContext::new(test_config(), services);
        Self {
            schema: build_schema(ctx.clone()),
            ctx,
            installations,
            queue,
            apps,
        }
    }

    /// Runs a request and returns the JSON body a client would receive.
    pub async fn post_graphql(
        &self,
        query: &str,
        variables: Value,
        requestor: Option<Requestor>,
    ) -> Value {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(requestor) = requestor {
            request = request.data(requestor);
        }
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).expect("serialize graphql response")
    }
}

/// Like `post_graphql`, but fails the test on top-level GraphQL errors.
pub async fn graphql_content(
    api: &TestApi,
    query: &str,
    variables: Value,
    requestor: Requestor,
) -> Value {
    let content = api.post_graphql(query, variables, Some(requestor)).await;
    assert!(
        content.get("errors").is_none(),
        "unexpected graphql errors: {content}"
    );
    content
}
