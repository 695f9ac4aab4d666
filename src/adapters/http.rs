use crate::domain::model::{SendRequest, SendResponse, SettingsForm, SettingsPayload, TemplatePayload};
use crate::domain::ports::Backend;
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// `reqwest` client for the MailDesk backend.
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// 預設不設逾時，慢的後端只會讓指令等比較久
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidConfigValueError {
            field: "backend.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 每個 segment 都會個別編碼，範本名稱裡的 `/` 不會變成路徑
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::ConfigError {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response)?;
        Ok(response.json().await?)
    }

    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::BackendRejected {
                status: status.as_u16(),
                message: None,
            })
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_messages(&self) -> Result<HashMap<String, String>> {
        self.get_json(&["api", "lang"]).await
    }

    async fn fetch_settings(&self) -> Result<SettingsPayload> {
        self.get_json(&["api", "settings"]).await
    }

    async fn save_settings(&self, form: &SettingsForm) -> Result<()> {
        let url = self.endpoint(&["api", "settings"])?;
        tracing::debug!("POST {}", url);

        let response = self.client.post(url).form(&form.form_fields()).send().await?;
        Self::ensure_success(response)?;
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<String>> {
        self.get_json(&["api", "templates"]).await
    }

    async fn fetch_template(&self, name: &str) -> Result<TemplatePayload> {
        self.get_json(&["api", "template", name]).await
    }

    async fn send(&self, request: &SendRequest) -> Result<SendResponse> {
        let url = self.endpoint(&["api", "send"])?;
        tracing::debug!("POST {}", url);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            Ok(serde_json::from_slice(&body)?)
        } else {
            // 失敗時的 body 不一定是 JSON
            let message = serde_json::from_slice::<SendResponse>(&body)
                .ok()
                .and_then(|r| r.message);
            Err(ClientError::BackendRejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_endpoint_encodes_template_name() {
        let backend = HttpBackend::new("http://127.0.0.1:5000").unwrap();
        let url = backend.endpoint(&["api", "template", "promo 10%/a.html"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/api/template/promo%2010%25%2Fa.html"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let backend = HttpBackend::new("https://mail.example.com/desk/").unwrap();
        let url = backend.endpoint(&["api", "lang"]).unwrap();
        assert_eq!(url.as_str(), "https://mail.example.com/desk/api/lang");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ClientError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_messages() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/lang");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"success": "ok!", "fail": "nope"}));
        });

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let messages = backend.fetch_messages().await.unwrap();

        api_mock.assert();
        assert_eq!(messages.get("success").map(String::as_str), Some("ok!"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/templates");
            then.status(503);
        });

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        match backend.list_templates().await {
            Err(ClientError::BackendRejected { status, message }) => {
                assert_eq!(status, 503);
                assert!(message.is_none());
            }
            other => panic!("expected BackendRejected, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_save_settings_posts_form_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/settings")
                .body_contains("smtp_server=smtp.example.com")
                .body_contains("proxy_enabled=on")
                .body_contains("language=vi");
            then.status(200).json_body(serde_json::json!({"status": "success"}));
        });

        let form = SettingsForm {
            smtp_server: "smtp.example.com".to_string(),
            proxy_enabled: true,
            language: "vi".to_string(),
            ..SettingsForm::default()
        };
        let backend = HttpBackend::new(&server.base_url()).unwrap();
        backend.save_settings(&form).await.unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_send_error_carries_backend_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/send")
                .json_body(serde_json::json!({
                    "to": "a@b.co",
                    "subject": "Hi",
                    "html_content": "<p>x</p>"
                }));
            then.status(500)
                .json_body(serde_json::json!({"status": "error", "message": "boom"}));
        });

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let request = SendRequest {
            to: "a@b.co".to_string(),
            subject: "Hi".to_string(),
            html_content: "<p>x</p>".to_string(),
        };

        match backend.send(&request).await {
            Err(ClientError::BackendRejected { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("boom"));
            }
            other => panic!("expected BackendRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_error_with_html_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/send");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let backend = HttpBackend::new(&server.base_url()).unwrap();
        let request = SendRequest {
            to: "a@b.co".to_string(),
            subject: String::new(),
            html_content: "x".to_string(),
        };

        assert!(matches!(
            backend.send(&request).await,
            Err(ClientError::BackendRejected {
                status: 502,
                message: None
            })
        ));
    }
}
