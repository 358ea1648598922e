//! asa-cleaner - Main entry point

use clap::Parser;
use log::debug;
use std::io::Write;
use std::sync::Arc;

use asa_cleaner::{
    AsaClient, Cleaner, Cli, EventLogger, LogEvent, SecretClient, SsmSource, EVENT_TARGET,
};

/// Write every log line as JSON: structured records verbatim, the rest wrapped
///
/// The level only filters diagnostic lines; structured records are always kept.
fn init_logging(level: &str, environment: Option<String>) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .filter_module(EVENT_TARGET, log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if record.target() == EVENT_TARGET {
                writeln!(buf, "{}", record.args())
            } else {
                let line = serde_json::json!({
                    "level": record.level().as_str(),
                    "time": chrono::Utc::now().to_rfc3339(),
                    "target": record.target(),
                    "env": environment,
                    "message": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            }
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.environment.clone());

    debug!(
        "CLI args: team={}, host={}, key_path={}, secret_path={}, environment={:?}",
        cli.team, cli.host, cli.api_key_path, cli.api_secret_path, cli.environment
    );

    let log = EventLogger::new(cli.environment.clone());

    let trigger = match cli.trigger() {
        Ok(trigger) => trigger,
        Err(e) => {
            log.error(LogEvent::new("invalid_trigger", "main", e.to_string()));
            return Err(e.into());
        }
    };

    if let Some(ref event) = trigger.event {
        log.info(
            LogEvent::new(
                "invocation_context",
                "main",
                format!(
                    "Execution info for event {}",
                    event.id.as_deref().unwrap_or("unknown")
                ),
            )
            .field("instance_id", trigger.instance_id.as_str())
            .field("context", event.context()),
        );
    }

    let secrets = SecretClient::new(Arc::new(SsmSource::from_env().await), log.clone());
    let client = AsaClient::new(cli.host.clone(), cli.team.clone());
    let cleaner = Cleaner::new(client, secrets, cli.credential_paths(), log.clone());

    if let Err(e) = cleaner.run(&trigger.instance_id).await {
        log.error(
            LogEvent::new("cleanup_failed", "main", e.to_string())
                .field("instance_id", trigger.instance_id.as_str()),
        );
        return Err(e.into());
    }

    Ok(())
}
