use crate::app::App;
use crate::render;
use crate::repl;
use anyhow::{bail, Context};
use colored::Colorize;
use finqa_config::{Config, ConfigManager};
use finqa_core::{DocumentFile, UploadStatus};
use finqa_session::SessionController;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One question, optionally about a document uploaded first
pub async fn ask(app: &App, question: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let controller = app.controller();

    if let Some(path) = file {
        upload_document(&controller, path).await?;
    }

    let outcome = controller.send_message(question).await;
    if let Some(reason) = outcome.reason() {
        bail!("question not sent: {}", reason);
    }

    let session = controller.snapshot();
    if let Some(answer) = session.last_message().filter(|m| m.is_assistant()) {
        println!("{}", render::message(answer));
    }
    controller.shutdown();
    Ok(())
}

pub async fn upload(app: &App, path: &Path) -> anyhow::Result<()> {
    let controller = app.controller();
    upload_document(&controller, path).await?;
    println!(
        "{}",
        format!(
            "Uploaded for session {}; pass --user-id {} to ask about it later",
            app.identity, app.identity
        )
        .dimmed()
    );
    controller.shutdown();
    Ok(())
}

async fn upload_document(controller: &Arc<SessionController>, path: &Path) -> anyhow::Result<()> {
    let file = DocumentFile::from_path(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    repl::upload_file(controller, file).await?;

    let view = controller.view();
    if view.upload_status != UploadStatus::Success {
        bail!(
            "upload of {} failed: {}",
            path.display(),
            view.upload_error.as_deref().unwrap_or("cancelled")
        );
    }
    Ok(())
}

pub async fn docs(app: &App) -> anyhow::Result<()> {
    let documents = app
        .controller()
        .list_documents()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("could not list documents")?;
    println!("{}", render::documents(&documents));
    Ok(())
}

pub async fn health(app: &App) -> anyhow::Result<()> {
    match app.api.health().await {
        Ok(message) => {
            println!("{}", format!("✅ {} is up", app.api.base_url()).green());
            if !message.is_empty() {
                println!("{}", message.dimmed());
            }
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Health check failed: {}", e);
            println!("{}", format!("❌ {}: {}", app.api.base_url(), e.user_message()).red());
            bail!("backend is not reachable")
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigAction {
    Get { key: String },
    Set { key: String, value: String },
    Show,
    Init { force: bool },
}

pub async fn config(action: ConfigAction, config_path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let manager = ConfigManager::load(config_path).await?;
            match manager.snapshot().await.get_value(&key) {
                Some(value) => println!("{}", format!("{} = {}", key, value).green()),
                None => bail!("key not set or unknown: {}", key),
            }
        }
        ConfigAction::Set { key, value } => {
            let manager = ConfigManager::load(config_path).await?;
            manager
                .update(|config| config.set_value(&key, &value))
                .await
                .with_context(|| format!("could not set {}", key))?;
            println!("{}", format!("✅ Set {} = {}", key, value).green());
        }
        ConfigAction::Show => {
            let manager = ConfigManager::load(config_path).await?;
            println!("{}", format!("📋 Configuration ({})", config_path.display()).cyan().bold());
            println!();
            println!("{}", serde_json::to_string_pretty(&manager.snapshot().await)?);
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                let notice = format!("⚠️  Config already exists at {}", config_path.display());
                println!("{}", notice.yellow());
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }
            let manager = ConfigManager::new(Config::default(), PathBuf::from(config_path));
            manager.save().await?;
            println!("{}", format!("✅ Config initialized at {}", config_path.display()).green());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_init_set_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        config(ConfigAction::Init { force: false }, &path).await.unwrap();
        assert!(path.exists());

        config(
            ConfigAction::Set {
                key: "upload.max_size_bytes".to_string(),
                value: "5242880".to_string(),
            },
            &path,
        )
        .await
        .unwrap();

        let saved = ConfigManager::load(&path).await.unwrap().snapshot().await;
        assert_eq!(saved.upload.max_size_bytes, 5 * 1024 * 1024);

        assert!(config(ConfigAction::Get { key: "nope".to_string() }, &path).await.is_err());
        assert!(config(
            ConfigAction::Set {
                key: "upload.max_size_bytes".to_string(),
                value: "0".to_string(),
            },
            &path,
        )
        .await
        .is_err());
    }

    #[tokio::test]
    async fn test_init_keeps_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"session": {"identity": "42"}}"#).await.unwrap();

        config(ConfigAction::Init { force: false }, &path).await.unwrap();
        let kept = ConfigManager::load(&path).await.unwrap().snapshot().await;
        assert_eq!(kept.session.identity.as_deref(), Some("42"));

        config(ConfigAction::Init { force: true }, &path).await.unwrap();
        let reset = ConfigManager::load(&path).await.unwrap().snapshot().await;
        assert!(reset.session.identity.is_none());
    }
}
