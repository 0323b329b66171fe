//! Wiring & DI. Entry point: bootstrap adapters, inject into services, consume events.
//! No business logic here; mention handling is delegated to EventHandler.

use dotenv::dotenv;
use mention_notify::adapters::directory::{HttpDirectory, SqliteDirectory, StaticDirectory};
use mention_notify::adapters::mail::{LogMailer, SmtpConfig, SmtpMailer};
use mention_notify::adapters::source::{EntityNames, JsonLinesSource};
use mention_notify::ports::{Mailer, UserDirectory};
use mention_notify::shared::config::{AppConfig, DirectoryBackend};
use mention_notify::usecases::{DispatchPolicy, EventHandler, NotificationDispatcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr; stdin carries the event stream.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Directory: exactly one backend ---
    let directory: Arc<dyn UserDirectory> = match cfg.directory_backend() {
        Some(DirectoryBackend::Sqlite(dir)) => {
            info!(path = %dir, "using SQLite user directory");
            let sqlite = SqliteDirectory::connect(&dir)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?;
            if let Some(seed) = cfg.sqlite_seed_file() {
                sqlite
                    .seed_from_file(seed)
                    .await
                    .map_err(|e| anyhow::anyhow!("SQLite seed failed: {}", e))?;
            }
            Arc::new(sqlite)
        }
        Some(DirectoryBackend::Http(url)) => {
            info!(url = %url, "using HTTP user directory");
            Arc::new(HttpDirectory::new(url))
        }
        Some(DirectoryBackend::File(path)) => {
            info!(path = %path, "using JSON user directory");
            Arc::new(
                StaticDirectory::load(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => anyhow::bail!(
            "Set MENTION_NOTIFY_DIRECTORY_DB, MENTION_NOTIFY_DIRECTORY_URL or MENTION_NOTIFY_DIRECTORY_FILE"
        ),
    };

    // --- Mailer: SMTP when configured, otherwise log only ---
    let mailer: Arc<dyn Mailer> = if cfg.is_smtp_configured() {
        let host = cfg.smtp_host.clone().unwrap_or_default();
        let mut smtp = SmtpConfig::new(host, cfg.smtp_port_or_default(), cfg.smtp_from_or_default())
            .with_tls(cfg.smtp_tls_or_default());
        if let (Some(user), Some(pass)) = (cfg.smtp_username.clone(), cfg.smtp_password.clone()) {
            smtp = smtp.with_credentials(user, pass);
        }
        info!(
            host = %smtp.host,
            port = smtp.port,
            tls = smtp.use_tls,
            "SMTP mailer enabled"
        );
        Arc::new(SmtpMailer::new(smtp).map_err(|e| anyhow::anyhow!("{}", e))?)
    } else {
        warn!("MENTION_NOTIFY_SMTP_HOST not set, notifications will only be logged");
        Arc::new(LogMailer::new())
    };

    // --- Services ---
    let policy = DispatchPolicy {
        lookup_timeout: cfg.lookup_timeout(),
        send_timeout: cfg.send_timeout(),
        concurrency: cfg.dispatch_concurrency_or_default(),
    };
    info!(
        lookup_timeout_ms = policy.lookup_timeout.as_millis() as u64,
        send_timeout_ms = policy.send_timeout.as_millis() as u64,
        concurrency = policy.concurrency,
        "dispatch policy"
    );
    let dispatcher = Arc::new(NotificationDispatcher::with_policy(
        directory, mailer, policy,
    ));
    let handler = EventHandler::new(dispatcher);

    // --- Run: one JSON event per stdin line until EOF ---
    let mut source = JsonLinesSource::stdin(EntityNames::from_config(&cfg));
    handler.run(&mut source).await;

    Ok(())
}
