use anyhow::Context;
use finqa_client::{ApiClient, ChatClient, UploadClient};
use finqa_config::Config;
use finqa_core::{FileValidator, SessionIdentity};
use finqa_session::{ControllerOptions, ProgressSimulation, SessionController};
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs, resolved from flags and the config file
pub struct App {
    pub config: Config,
    pub api: ApiClient,
    pub identity: SessionIdentity,
    pub debug: bool,
}

impl App {
    pub fn new(
        config: Config,
        api_url: Option<&str>,
        user_id: Option<&str>,
        debug: bool,
    ) -> anyhow::Result<Self> {
        let base_url = api_url.unwrap_or(&config.api.base_url);
        let timeout = config.api.timeout_seconds.map(Duration::from_secs);
        let api = ApiClient::with_timeout(base_url, timeout)
            .with_context(|| format!("invalid backend URL {}", base_url))?;
        let identity = resolve_identity(user_id, &config);

        tracing::debug!("Backend {} as {}", api.base_url(), identity);

        Ok(Self {
            config,
            api,
            identity,
            debug,
        })
    }

    pub fn controller(&self) -> Arc<SessionController> {
        Arc::new(SessionController::new(
            self.identity.clone(),
            Arc::new(ChatClient::new(self.api.clone())),
            Arc::new(UploadClient::new(self.api.clone())),
            controller_options(&self.config),
        ))
    }
}

pub fn controller_options(config: &Config) -> ControllerOptions {
    let upload = &config.upload;
    let validator = FileValidator::new(upload.accepted_type.clone(), upload.max_size_bytes);
    let progress = upload
        .simulate_progress
        .then(|| ProgressSimulation::new(Duration::from_millis(upload.progress_interval_ms)));

    ControllerOptions::new(validator)
        .with_welcome(config.session.welcome_message.clone())
        .with_progress(progress)
}

/// `--user-id`, then `session.identity`, then a fresh random identity
pub fn resolve_identity(user_id: Option<&str>, config: &Config) -> SessionIdentity {
    user_id
        .or(config.session.identity.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(SessionIdentity::new)
        .unwrap_or_else(SessionIdentity::generate)
}
