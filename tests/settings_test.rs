use anyhow::Result;
use clap::Parser;
use httpmock::prelude::*;
use maildesk_client::config::cli::{Command, SettingsAction, SettingsArgs};
use maildesk_client::{ClientError, CliConfig, HttpBackend, LocalStorage, MailDesk};

fn desk_for(server: &MockServer) -> MailDesk<HttpBackend, LocalStorage> {
    let backend = HttpBackend::new(&server.base_url()).unwrap();
    MailDesk::new(backend, LocalStorage::new(".".to_string()))
}

fn save_args(flags: &[&str]) -> SettingsArgs {
    let argv = ["maildesk", "settings", "save"].iter().chain(flags);
    match CliConfig::parse_from(argv).command {
        Command::Settings {
            action: SettingsAction::Save(args),
        } => args,
        other => panic!("expected settings save, got {:?}", other),
    }
}

/// 讀取設定 -> 修改 -> 存檔
#[tokio::test]
async fn test_load_edit_and_save_settings() -> Result<()> {
    let server = MockServer::start();
    let load_mock = server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(200).json_body(serde_json::json!({
            "smtp": {
                "server": "smtp.gmail.com",
                "port": "587",
                "username": "me@gmail.com",
                "password": "app-password",
                "display_name": "Me"
            },
            "proxy": {"enabled": "false", "type": "", "host": "", "port": ""},
            "language": "en"
        }));
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/settings")
            .body_contains("smtp_server=smtp.gmail.com")
            .body_contains("smtp_port=465")
            .body_contains("proxy_enabled=on")
            .body_contains("proxy_type=socks5")
            .body_contains("proxy_host=127.0.0.1")
            .body_contains("proxy_port=9050");
        then.status(200).json_body(serde_json::json!({"status": "success"}));
    });

    let mut desk = desk_for(&server);
    desk.load_settings().await;
    load_mock.assert();

    assert_eq!(desk.settings_form.smtp_username, "me@gmail.com");
    assert!(!desk.settings_form.proxy_enabled);
    assert_eq!(desk.settings_form.proxy_type, "socks5");

    desk.settings_form.smtp_port = "465".to_string();
    desk.settings_form.proxy_enabled = true;
    desk.settings_form.proxy_host = "127.0.0.1".to_string();
    desk.settings_form.proxy_port = "9050".to_string();

    let notice = desk.save_settings().await?;
    save_mock.assert();
    assert_eq!(notice.message, "Settings saved successfully");
    Ok(())
}

#[tokio::test]
async fn test_incomplete_proxy_blocks_save() -> Result<()> {
    let server = MockServer::start();
    let save_mock = server.mock(|when, then| {
        when.method(POST).path("/api/settings");
        then.status(200);
    });

    let mut desk = desk_for(&server);
    desk.settings_form.proxy_enabled = true;
    desk.settings_form.proxy_host = "proxy.local".to_string();

    let err = desk.save_settings().await.unwrap_err();
    assert!(matches!(err, ClientError::ValidationError { .. }));
    save_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_save_failure_reported_with_fixed_text() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/settings");
        then.status(500);
    });

    let mut desk = desk_for(&server);
    let err = desk.save_settings().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to save settings");
    Ok(())
}

#[tokio::test]
async fn test_settings_load_error_keeps_form() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(500);
    });

    let mut desk = desk_for(&server);
    desk.settings_form.smtp_server = "typed-but-unsaved".to_string();
    desk.load_settings().await;
    assert_eq!(desk.settings_form.smtp_server, "typed-but-unsaved");
    Ok(())
}

#[tokio::test]
async fn test_language_change_refetches_messages() -> Result<()> {
    let server = MockServer::start();
    let lang_mock = server.mock(|when, then| {
        when.method(GET).path("/api/lang");
        then.status(200).json_body(serde_json::json!({
            "success": "✅ Gửi email thành công!\n"
        }));
    });

    let mut desk = desk_for(&server);
    desk.start().await;
    desk.change_language("vi").await;

    lang_mock.assert_hits(2);
    assert_eq!(desk.settings_form.language, "vi");
    assert_eq!(desk.lang().get("success"), Some("✅ Gửi email thành công!\n"));
    Ok(())
}

/// 讀不到目前設定時，只改一個欄位不能把其他欄位清空
#[tokio::test]
async fn test_partial_save_refused_when_settings_unavailable() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(500);
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST).path("/api/settings");
        then.status(200).json_body(serde_json::json!({"status": "success"}));
    });

    let mut desk = desk_for(&server);
    let err = save_args(&["--smtp-port", "465"])
        .save(&mut desk)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SettingsNotLoaded { .. }));
    save_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_full_save_allowed_when_settings_unavailable() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(500);
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/settings")
            .body_contains("smtp_server=smtp.example.com")
            .body_contains("smtp_password=secret")
            .body_contains("language=vi");
        then.status(200).json_body(serde_json::json!({"status": "success"}));
    });

    let mut desk = desk_for(&server);
    let notice = save_args(&[
        "--smtp-server",
        "smtp.example.com",
        "--smtp-port",
        "587",
        "--smtp-username",
        "me@example.com",
        "--smtp-password",
        "secret",
        "--display-name",
        "Me",
        "--proxy-enabled",
        "false",
        "--proxy-type",
        "socks5",
        "--proxy-host",
        "",
        "--proxy-port",
        "",
        "--language",
        "vi",
    ])
    .save(&mut desk)
    .await?;

    save_mock.assert();
    assert_eq!(notice.message, "Settings saved successfully");
    Ok(())
}

#[tokio::test]
async fn test_partial_save_keeps_loaded_fields() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(200).json_body(serde_json::json!({
            "smtp": {
                "server": "smtp.gmail.com",
                "port": "587",
                "username": "me@gmail.com",
                "password": "app-password",
                "display_name": "Me"
            },
            "proxy": {"enabled": "false", "type": "socks5", "host": "", "port": ""},
            "language": "en"
        }));
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/settings")
            .body_contains("smtp_port=465")
            .body_contains("smtp_password=app-password");
        then.status(200).json_body(serde_json::json!({"status": "success"}));
    });

    let mut desk = desk_for(&server);
    save_args(&["--smtp-port", "465"]).save(&mut desk).await?;
    save_mock.assert();
    Ok(())
}
