use crate::core::address::{extract_addresses, merge_recipients, validate_address_list};
use crate::core::import::{read_import_text, FileKind};
use crate::core::lang::LangContext;
use crate::domain::model::{ImportReport, Notice, SendForm, SendRequest, SettingsForm};
use crate::domain::ports::{Backend, Storage};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::is_blank;

const INVALID_RECIPIENTS: &str = "Please enter valid email addresses separated by commas.";
const MISSING_CONTENT: &str = "Please select a template or enter HTML content.";
const PROXY_INCOMPLETE: &str = "Please fill Proxy Host, Port, Type when Proxy is enabled.";
const SEND_SUCCEEDED: &str = "Email sent successfully";
const SEND_FAILED: &str = "Failed to send email";
const SETTINGS_SAVED: &str = "Settings saved successfully";

/// One user's working session against a MailDesk backend.
///
/// Every operation borrows the session mutably, so only one request can be
/// in flight at a time.
pub struct MailDesk<B: Backend, S: Storage> {
    backend: B,
    storage: S,
    lang: LangContext,
    templates: Vec<String>,
    pub send_form: SendForm,
    pub settings_form: SettingsForm,
}

impl<B: Backend, S: Storage> MailDesk<B, S> {
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            lang: LangContext::default(),
            templates: Vec::new(),
            send_form: SendForm::default(),
            settings_form: SettingsForm::default(),
        }
    }

    pub fn lang(&self) -> &LangContext {
        &self.lang
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// 啟動時先載入訊息，再載入範本清單
    pub async fn start(&mut self) {
        self.reload_messages().await;
        self.refresh_templates().await;
    }

    pub async fn reload_messages(&mut self) {
        match self.backend.fetch_messages().await {
            Ok(messages) => {
                tracing::debug!("Loaded {} display messages", messages.len());
                self.lang.replace(messages);
            }
            Err(e) => tracing::debug!("Keeping current display messages: {}", e),
        }
    }

    pub async fn refresh_templates(&mut self) {
        match self.backend.list_templates().await {
            Ok(templates) => {
                tracing::debug!("Loaded {} templates", templates.len());
                self.templates = templates;
            }
            Err(e) => tracing::debug!("Keeping current template list: {}", e),
        }
    }

    pub async fn load_settings(&mut self) {
        if let Err(e) = self.try_load_settings().await {
            tracing::debug!("Keeping current settings form: {}", e);
        }
    }

    /// Same as [`load_settings`](Self::load_settings) but tells the caller
    /// whether the form now holds the backend's values.
    pub async fn try_load_settings(&mut self) -> Result<()> {
        let payload = self.backend.fetch_settings().await?;
        self.settings_form.apply(payload);
        Ok(())
    }

    /// 後端要等設定存檔後才會換語言，這裡只重抓一次訊息
    pub async fn change_language(&mut self, code: &str) {
        self.settings_form.language = code.to_string();
        self.reload_messages().await;
    }

    pub async fn select_template(&mut self, name: &str) -> Result<()> {
        self.send_form.template = name.to_string();
        if name.is_empty() {
            return Ok(());
        }

        let content = match self.backend.fetch_template(name).await {
            Ok(payload) => {
                if let Some(error) = &payload.error {
                    tracing::warn!("Template '{}': {}", name, error);
                }
                payload.content
            }
            Err(e) => {
                tracing::warn!("Template '{}' could not be fetched: {}", name, e);
                None
            }
        };

        match content {
            Some(content) => {
                self.send_form.html_content = content;
                Ok(())
            }
            None => Err(ClientError::TemplateUnavailable {
                name: name.to_string(),
            }),
        }
    }

    pub async fn load_html_file(&mut self, path: &str) -> Result<()> {
        let bytes = self.storage.read_file(path).await?;
        self.send_form.html_content = String::from_utf8_lossy(&bytes).into_owned();
        tracing::debug!("Loaded HTML body from {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Imports recipients from an uploaded file into the `to` field.
    ///
    /// The extension is checked before the file is read.
    pub async fn import_recipients(&mut self, path: &str) -> Result<ImportReport> {
        let kind = FileKind::from_file_name(path)?;
        let bytes = self.storage.read_file(path).await?;
        let text = read_import_text(kind, bytes)?;

        let addresses = extract_addresses(&text);
        if addresses.is_empty() {
            return Err(ClientError::NoAddressesFound {
                file: path.to_string(),
            });
        }

        let recipients = merge_recipients(&self.send_form.to, &addresses);
        self.send_form.to = recipients.join(", ");
        tracing::info!("📥 Imported {} addresses from {}", addresses.len(), path);

        Ok(ImportReport {
            imported: addresses.len(),
            recipients,
        })
    }

    pub async fn save_settings(&mut self) -> Result<Notice> {
        let form = &self.settings_form;
        if form.proxy_enabled
            && (is_blank(&form.proxy_host) || is_blank(&form.proxy_port) || is_blank(&form.proxy_type))
        {
            return Err(ClientError::validation(PROXY_INCOMPLETE));
        }

        match self.backend.save_settings(form).await {
            Ok(()) => Ok(Notice::success(SETTINGS_SAVED)),
            Err(e) => {
                tracing::warn!("Saving settings failed: {}", e);
                Err(ClientError::SettingsNotSaved)
            }
        }
    }

    pub async fn submit_send(&mut self) -> Result<Notice> {
        if !validate_address_list(&self.send_form.to) {
            return Err(ClientError::validation(
                self.lang.get_or("fail", INVALID_RECIPIENTS),
            ));
        }

        let html_content = self.send_form.html_content.trim();
        if self.send_form.template.is_empty() && html_content.is_empty() {
            return Err(ClientError::validation(MISSING_CONTENT));
        }

        let request = SendRequest {
            to: self.send_form.to.clone(),
            subject: self.send_form.subject.clone(),
            html_content: html_content.to_string(),
        };

        tracing::info!("⏳ {}", self.lang.get_or("sending", "Sending...").trim());
        match self.backend.send(&request).await {
            Ok(response) => {
                tracing::debug!("Send accepted: {:?}", response);
                if let Some(detail) = response.reported_error() {
                    tracing::warn!("⚠️ Backend accepted the send with errors: {}", detail.trim_end());
                }
                let message = self.lang.get_or("success", SEND_SUCCEEDED).to_string();
                self.send_form.reset();
                Ok(Notice::success(message))
            }
            Err(ClientError::BackendRejected { status, message }) => {
                tracing::warn!("Send rejected with HTTP {}", status);
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| self.lang.get_or("fail", SEND_FAILED).to_string());
                Err(ClientError::SendFailed { message })
            }
            Err(e) => {
                tracing::warn!("Send request failed: {}", e);
                Err(ClientError::SendFailed {
                    message: self.lang.get_or("fail", SEND_FAILED).to_string(),
                })
            }
        }
    }
}
