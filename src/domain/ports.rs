use crate::domain::model::{SendRequest, SendResponse, SettingsForm, SettingsPayload, TemplatePayload};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 讀取使用者上傳的檔案
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// MailDesk 後端的 `/api/*` 介面
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/lang`
    async fn fetch_messages(&self) -> Result<HashMap<String, String>>;
    /// `GET /api/settings`
    async fn fetch_settings(&self) -> Result<SettingsPayload>;
    /// `POST /api/settings`，表單編碼
    async fn save_settings(&self, form: &SettingsForm) -> Result<()>;
    /// `GET /api/templates`
    async fn list_templates(&self) -> Result<Vec<String>>;
    /// `GET /api/template/{name}`
    async fn fetch_template(&self, name: &str) -> Result<TemplatePayload>;
    /// `POST /api/send`，非 2xx 回傳 `BackendRejected`
    async fn send(&self, request: &SendRequest) -> Result<SendResponse>;
}
