use clap::Parser;
use maildesk_client::config::cli::{Command, SendArgs, SettingsAction};
use maildesk_client::core::address::split_address_list;
use maildesk_client::domain::model::{Notice, NoticeLevel};
use maildesk_client::utils::error::ErrorSeverity;
use maildesk_client::utils::logger;
use maildesk_client::{
    is_valid_address, ClientError, CliConfig, HttpBackend, LocalStorage, MailDesk, Result,
    TomlConfig,
};

type Desk = MailDesk<HttpBackend, LocalStorage>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if cli.log_json || config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        print_notice(&Notice::error(e.user_friendly_message()));
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn open_desk(config: &TomlConfig) -> Result<Desk> {
    let backend = HttpBackend::with_timeout(config.base_url(), config.timeout())?;
    tracing::debug!("Using backend {}", backend.base_url());
    let storage = LocalStorage::new(config.import_base_dir().to_string());
    Ok(MailDesk::new(backend, storage))
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("✅ {}: {}", notice.title, notice.message.trim_end()),
        NoticeLevel::Error => eprintln!("❌ {}: {}", notice.title, notice.message.trim_end()),
    }
}

async fn run(command: Command, config: &TomlConfig) -> Result<()> {
    // 檢查地址不需要後端
    if let Command::Check { addresses } = &command {
        return check_addresses(addresses);
    }
    let mut desk = open_desk(config)?;

    match command {
        // 上面已處理
        Command::Check { .. } => Ok(()),
        Command::Extract { file } => {
            // 只讀本機檔案，不會連後端
            let report = desk.import_recipients(&file).await?;
            for address in &report.recipients {
                println!("{}", address);
            }
            tracing::info!("{}", report.notice().message);
            Ok(())
        }
        Command::Lang => {
            desk.reload_messages().await;
            for (key, message) in desk.lang().entries() {
                println!("{} = {}", key, message.trim_end());
            }
            Ok(())
        }
        Command::Templates => {
            desk.refresh_templates().await;
            if desk.templates().is_empty() {
                println!("No templates found");
            }
            for name in desk.templates() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                desk.load_settings().await;
                print_settings(&desk);
                Ok(())
            }
            SettingsAction::Save(args) => {
                let notice = args.save(&mut desk).await?;
                print_notice(&notice);
                Ok(())
            }
        },
        Command::Send(args) => send(&mut desk, args).await,
    }
}

fn check_addresses(addresses: &str) -> Result<()> {
    let invalid: Vec<&str> = split_address_list(addresses)
        .filter(|address| !is_valid_address(address))
        .collect();

    if invalid.is_empty() {
        println!(
            "✅ {} address(es) valid",
            split_address_list(addresses).count()
        );
        return Ok(());
    }

    for address in &invalid {
        println!("✗ {}", address);
    }
    Err(ClientError::validation(
        "Please enter valid email addresses separated by commas.",
    ))
}

fn print_settings(desk: &Desk) {
    let form = &desk.settings_form;
    let password = if form.smtp_password.is_empty() { "" } else { "********" };

    println!("[smtp]");
    println!("server       = {}", form.smtp_server);
    println!("port         = {}", form.smtp_port);
    println!("username     = {}", form.smtp_username);
    println!("password     = {}", password);
    println!("display_name = {}", form.display_name);
    println!("[proxy]");
    println!("enabled      = {}", form.proxy_enabled);
    println!("type         = {}", form.proxy_type);
    println!("host         = {}", form.proxy_host);
    println!("port         = {}", form.proxy_port);
    println!("[language]");
    println!("lang         = {}", form.language);
}

async fn send(desk: &mut Desk, args: SendArgs) -> Result<()> {
    desk.start().await;

    desk.send_form.to = args.to;
    desk.send_form.subject = args.subject;

    for file in &args.imports {
        let report = desk.import_recipients(file).await?;
        print_notice(&report.notice());
    }

    if let Some(template) = &args.template {
        desk.select_template(template).await?;
    }
    if let Some(html_file) = &args.html_file {
        desk.load_html_file(html_file).await?;
    }

    let notice = desk.submit_send().await?;
    print_notice(&notice);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_does_not_open_backend() {
        let mut config = TomlConfig::default();
        config.backend.base_url = "not a url".to_string();
        assert!(open_desk(&config).is_err());

        let command = Command::Check {
            addresses: "a@b.co, c@d.co".to_string(),
        };
        assert!(run(command, &config).await.is_ok());

        let command = Command::Check {
            addresses: "a@b.co, bad".to_string(),
        };
        let err = run(command, &config).await.unwrap_err();
        assert!(matches!(err, ClientError::ValidationError { .. }));
    }
}
