use crate::config::toml_config::TomlConfig;
use crate::core::session::MailDesk;
use crate::domain::model::{Notice, SettingsForm};
use crate::domain::ports::{Backend, Storage};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "maildesk")]
#[command(about = "Command-line client for the MailDesk bulk email backend")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a comma-separated recipient list
    Check { addresses: String },
    /// Extract addresses from a csv, txt, html, xls or xlsx file
    Extract { file: String },
    /// Show the backend's display messages
    Lang,
    /// List server templates
    Templates,
    /// Show or change SMTP / proxy settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Send an email to every recipient
    Send(SendArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsAction {
    Show,
    Save(SettingsArgs),
}

/// 沒給的欄位沿用後端目前的值
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub smtp_server: Option<String>,
    #[arg(long)]
    pub smtp_port: Option<String>,
    #[arg(long)]
    pub smtp_username: Option<String>,
    #[arg(long)]
    pub smtp_password: Option<String>,
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long)]
    pub proxy_enabled: Option<bool>,
    #[arg(long)]
    pub proxy_type: Option<String>,
    #[arg(long)]
    pub proxy_host: Option<String>,
    #[arg(long)]
    pub proxy_port: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
}

impl SettingsArgs {
    /// 每個欄位都有給，不需要後端目前的值也能存
    pub fn is_complete(&self) -> bool {
        [
            &self.smtp_server,
            &self.smtp_port,
            &self.smtp_username,
            &self.smtp_password,
            &self.display_name,
            &self.proxy_type,
            &self.proxy_host,
            &self.proxy_port,
            &self.language,
        ]
        .iter()
        .all(|value| value.is_some())
            && self.proxy_enabled.is_some()
    }

    /// Loads the backend's settings, overlays the given flags and saves.
    ///
    /// When the load fails the form would still hold blank defaults, so the
    /// save only goes ahead if every field was given.
    pub async fn save<B: Backend, S: Storage>(&self, desk: &mut MailDesk<B, S>) -> Result<Notice> {
        if let Err(e) = desk.try_load_settings().await {
            if !self.is_complete() {
                return Err(ClientError::SettingsNotLoaded {
                    message: e.to_string(),
                });
            }
            tracing::warn!("⚠️ Current settings unavailable ({}), overwriting all fields", e);
        }

        self.apply_to(&mut desk.settings_form);
        if let Some(language) = &self.language {
            desk.change_language(language).await;
        }
        desk.save_settings().await
    }

    pub fn apply_to(&self, form: &mut SettingsForm) {
        let overrides = [
            (&self.smtp_server, &mut form.smtp_server),
            (&self.smtp_port, &mut form.smtp_port),
            (&self.smtp_username, &mut form.smtp_username),
            (&self.smtp_password, &mut form.smtp_password),
            (&self.display_name, &mut form.display_name),
            (&self.proxy_type, &mut form.proxy_type),
            (&self.proxy_host, &mut form.proxy_host),
            (&self.proxy_port, &mut form.proxy_port),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(enabled) = self.proxy_enabled {
            form.proxy_enabled = enabled;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SendArgs {
    /// Comma-separated recipients
    #[arg(long, default_value = "")]
    pub to: String,

    #[arg(long, default_value = "")]
    pub subject: String,

    /// Server template to use as the body
    #[arg(long)]
    pub template: Option<String>,

    /// Local HTML file to use as the body
    #[arg(long)]
    pub html_file: Option<String>,

    /// Files to import recipients from (repeatable)
    #[arg(long = "import")]
    pub imports: Vec<String>,
}

impl CliConfig {
    /// 設定檔為底，命令列參數覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.backend.timeout_seconds = Some(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}
