//! CLI argument parsing

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::asa::CredentialPaths;
use crate::config::{api, defaults, env as vars};
use crate::error::{CleanerError, Result};
use crate::event::TerminationEvent;

/// Removes a terminated EC2 instance from ScaleFT / ASA
#[derive(Parser, Debug)]
#[command(name = "asa-cleaner")]
#[command(version)]
#[command(about = "Remove a terminated EC2 instance from ScaleFT / ASA projects", long_about = None)]
#[command(group(ArgGroup::new("trigger").required(true).args(["instance_id", "event"])))]
pub struct Cli {
    /// EC2 instance id to remove
    #[arg(short, long)]
    pub instance_id: Option<String>,

    /// EventBridge state-change event (JSON file, "-" for stdin)
    #[arg(short, long)]
    pub event: Option<PathBuf>,

    /// ASA team name
    #[arg(long, env = vars::TEAM)]
    pub team: String,

    /// ASA host
    #[arg(long, env = vars::HOST, default_value = api::HOST)]
    pub host: String,

    /// SSM parameter holding the API key id
    #[arg(long, env = vars::API_KEY_PATH)]
    pub api_key_path: String,

    /// SSM parameter holding the API key secret
    #[arg(long, env = vars::API_SECRET_PATH)]
    pub api_secret_path: String,

    /// Environment tag attached to every log record
    #[arg(long, env = vars::ENVIRONMENT)]
    pub environment: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = vars::LOG_LEVEL, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,
}

/// What triggered this run
#[derive(Debug, Clone)]
pub struct Trigger {
    pub instance_id: String,
    /// Source event, when the instance id came from one
    pub event: Option<TerminationEvent>,
}

impl Cli {
    /// Resolve the instance id from `--instance-id` or the event document
    pub fn trigger(&self) -> Result<Trigger> {
        match (&self.instance_id, &self.event) {
            (Some(instance_id), _) if instance_id.trim().is_empty() => Err(
                CleanerError::Config("--instance-id must not be empty".to_string()),
            ),
            (Some(instance_id), _) => Ok(Trigger {
                instance_id: instance_id.clone(),
                event: None,
            }),
            (None, Some(path)) => {
                let event = TerminationEvent::load(path)?;
                Ok(Trigger {
                    instance_id: event.instance_id().to_string(),
                    event: Some(event),
                })
            }
            (None, None) => Err(CleanerError::Config(
                "either --instance-id or --event is required".to_string(),
            )),
        }
    }

    pub fn credential_paths(&self) -> CredentialPaths {
        CredentialPaths {
            key_id: self.api_key_path.clone(),
            key_secret: self.api_secret_path.clone(),
        }
    }
}
