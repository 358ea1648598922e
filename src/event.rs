//! Instance termination events
//!
//! The cleaner is triggered by an EventBridge "EC2 Instance State-change
//! Notification". Only `detail.instance-id` drives the run; the remaining
//! envelope fields are kept as execution context for the logs.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::{CleanerError, Result};

/// EventBridge envelope of an instance state change
#[derive(Deserialize, Debug, Clone)]
pub struct TerminationEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub detail: EventDetail,
}

/// Event payload
#[derive(Deserialize, Debug, Clone)]
pub struct EventDetail {
    #[serde(rename = "instance-id")]
    pub instance_id: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl TerminationEvent {
    /// Parse an event document
    pub fn from_json(document: &str) -> Result<Self> {
        let event: TerminationEvent = serde_json::from_str(document)
            .map_err(|e| CleanerError::Event(format!("could not parse event: {}", e)))?;

        if event.detail.instance_id.trim().is_empty() {
            return Err(CleanerError::Event(
                "detail.instance-id is empty".to_string(),
            ));
        }
        Ok(event)
    }

    /// Read an event document from a file, or from stdin when `path` is `-`
    pub fn load(path: &Path) -> Result<Self> {
        let document = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                CleanerError::Event(format!("could not read {}: {}", path.display(), e))
            })?
        };
        Self::from_json(&document)
    }

    pub fn instance_id(&self) -> &str {
        &self.detail.instance_id
    }

    /// Envelope fields worth logging, as a JSON object
    pub fn context(&self) -> serde_json::Value {
        serde_json::json!({
            "event_id": self.id,
            "detail_type": self.detail_type,
            "source": self.source,
            "account": self.account,
            "region": self.region,
            "time": self.time,
            "state": self.detail.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EVENT: &str = r#"{
        "version": "0",
        "id": "7bf73129-1428-4cd3-a780-95db273d1602",
        "detail-type": "EC2 Instance State-change Notification",
        "source": "aws.ec2",
        "account": "123456789012",
        "time": "2026-10-19T08:15:00Z",
        "region": "eu-west-1",
        "resources": ["arn:aws:ec2:eu-west-1:123456789012:instance/i-0abcd1234efgh5678"],
        "detail": {
            "instance-id": "i-0abcd1234efgh5678",
            "state": "terminated"
        }
    }"#;

    #[test]
    fn test_from_json() {
        let event = TerminationEvent::from_json(EVENT).unwrap();
        assert_eq!(event.instance_id(), "i-0abcd1234efgh5678");
        assert_eq!(event.detail.state.as_deref(), Some("terminated"));
        assert_eq!(event.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_from_json_minimal() {
        let event = TerminationEvent::from_json(r#"{"detail": {"instance-id": "i-1"}}"#).unwrap();
        assert_eq!(event.instance_id(), "i-1");
        assert!(event.id.is_none());
    }

    #[test]
    fn test_from_json_missing_instance_id() {
        let err = TerminationEvent::from_json(r#"{"detail": {"state": "terminated"}}"#).unwrap_err();
        match err {
            CleanerError::Event(msg) => assert!(msg.contains("instance-id")),
            other => panic!("Expected CleanerError::Event, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_empty_instance_id() {
        let err = TerminationEvent::from_json(r#"{"detail": {"instance-id": " "}}"#).unwrap_err();
        assert!(matches!(err, CleanerError::Event(_)));
    }

    #[test]
    fn test_context() {
        let event = TerminationEvent::from_json(EVENT).unwrap();
        let ctx = event.context();
        assert_eq!(ctx["event_id"], "7bf73129-1428-4cd3-a780-95db273d1602");
        assert_eq!(ctx["source"], "aws.ec2");
        assert_eq!(ctx["state"], "terminated");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EVENT.as_bytes()).unwrap();

        let event = TerminationEvent::load(file.path()).unwrap();
        assert_eq!(event.instance_id(), "i-0abcd1234efgh5678");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TerminationEvent::load(&dir.path().join("missing.json")).unwrap_err();
        match err {
            CleanerError::Event(msg) => assert!(msg.contains("missing.json")),
            other => panic!("Expected CleanerError::Event, got {:?}", other),
        }
    }
}
