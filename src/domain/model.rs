use serde::{Deserialize, Serialize};

/// 寄信表單，對應畫面上的欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendForm {
    /// 逗號分隔的收件者
    pub to: String,
    pub subject: String,
    /// 已選的伺服器範本名稱，空字串代表沒選
    pub template: String,
    pub html_content: String,
}

impl SendForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub smtp_server: String,
    pub smtp_port: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub display_name: String,
    pub proxy_enabled: bool,
    pub proxy_type: String,
    pub proxy_host: String,
    pub proxy_port: String,
    pub language: String,
}

pub const DEFAULT_PROXY_TYPE: &str = "socks5";
pub const DEFAULT_LANGUAGE: &str = "en";

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            smtp_server: String::new(),
            smtp_port: String::new(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            display_name: String::new(),
            proxy_enabled: false,
            proxy_type: DEFAULT_PROXY_TYPE.to_string(),
            proxy_host: String::new(),
            proxy_port: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SettingsForm {
    /// 套用 `GET /api/settings` 的結果，缺少的區段保留原值
    pub fn apply(&mut self, payload: SettingsPayload) {
        if let Some(smtp) = payload.smtp {
            self.smtp_server = smtp.server.unwrap_or_default();
            self.smtp_port = smtp.port.unwrap_or_default();
            self.smtp_username = smtp.username.unwrap_or_default();
            self.smtp_password = smtp.password.unwrap_or_default();
            self.display_name = smtp.display_name.unwrap_or_default();
        }

        if let Some(proxy) = payload.proxy {
            self.proxy_enabled = proxy.enabled.as_deref() == Some("true");
            self.proxy_type = proxy
                .r#type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_PROXY_TYPE.to_string());
            self.proxy_host = proxy.host.unwrap_or_default();
            self.proxy_port = proxy.port.unwrap_or_default();
        }

        if let Some(language) = payload.language.filter(|l| !l.is_empty()) {
            self.language = language;
        }
    }

    /// `POST /api/settings` 的表單欄位，未勾選 proxy 時不送 `proxy_enabled`
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("smtp_server", self.smtp_server.as_str()),
            ("smtp_port", self.smtp_port.as_str()),
            ("smtp_username", self.smtp_username.as_str()),
            ("smtp_password", self.smtp_password.as_str()),
            ("display_name", self.display_name.as_str()),
        ];
        if self.proxy_enabled {
            fields.push(("proxy_enabled", "on"));
        }
        fields.extend([
            ("proxy_type", self.proxy_type.as_str()),
            ("proxy_host", self.proxy_host.as_str()),
            ("proxy_port", self.proxy_port.as_str()),
            ("language", self.language.as_str()),
        ]);
        fields
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub smtp: Option<SmtpPayload>,
    pub proxy: Option<ProxyPayload>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpPayload {
    pub server: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyPayload {
    /// 後端存的是字串 "true" / "false"
    pub enabled: Option<String>,
    pub r#type: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub content: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub html_content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl SendResponse {
    /// 部分收件者失敗時後端仍回 200，但 `status` 會是 "error"
    pub fn reported_error(&self) -> Option<&str> {
        if self.status.as_deref() != Some("error") {
            return None;
        }
        Some(self.message.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 回報給使用者的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// 從檔案取出的地址數，不含原本就在欄位裡的
    pub imported: usize,
    pub recipients: Vec<String>,
}

impl ImportReport {
    pub fn notice(&self) -> Notice {
        Notice::success(format!(
            "Imported {} valid emails from file.",
            self.imported
        ))
    }
}
