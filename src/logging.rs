//! Structured log records
//!
//! Every outcome of a cleanup run is reported as a single-line JSON record.
//! Records are rendered here and written through the `log` facade under
//! [`EVENT_TARGET`], so the binary decides where they end up.

use log::Level;
use serde_json::{Map, Value};

#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Log target used for structured records
pub const EVENT_TARGET: &str = "asa_cleaner::event";

/// A structured record under construction
#[derive(Debug, Clone)]
pub struct LogEvent {
    fields: Map<String, Value>,
}

impl LogEvent {
    /// Start a record with the fields every record carries
    pub fn new(event_type: &str, method: &str, message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(message.into()));
        fields.insert(
            "event_type".to_string(),
            Value::String(event_type.to_string()),
        );
        fields.insert("method".to_string(), Value::String(method.to_string()));
        Self { fields }
    }

    /// Attach an extra field
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

/// Emits structured records tagged with the deployment environment
///
/// Cheap to clone; collaborators that need to log get their own copy.
#[derive(Debug, Clone)]
pub struct EventLogger {
    env: Option<String>,
    #[cfg(test)]
    captured: Arc<Mutex<Vec<Value>>>,
}

impl EventLogger {
    /// Create a logger that stamps `env` on every record
    pub fn new(env: Option<String>) -> Self {
        Self {
            env,
            #[cfg(test)]
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn info(&self, event: LogEvent) {
        self.emit(Level::Info, event);
    }

    pub fn warn(&self, event: LogEvent) {
        self.emit(Level::Warn, event);
    }

    pub fn error(&self, event: LogEvent) {
        self.emit(Level::Error, event);
    }

    fn emit(&self, level: Level, event: LogEvent) {
        let record = self.render(level, event);
        self.capture(&record);
        log::log!(target: EVENT_TARGET, level, "{}", record);
    }

    /// Render a record to its final JSON shape
    pub(crate) fn render(&self, level: Level, event: LogEvent) -> Value {
        let mut fields = event.fields;
        fields.insert(
            "level".to_string(),
            Value::String(level.as_str().to_string()),
        );
        fields.insert(
            "time".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        fields.insert(
            "env".to_string(),
            self.env.clone().map(Value::String).unwrap_or(Value::Null),
        );
        Value::Object(fields)
    }

    #[cfg(not(test))]
    fn capture(&self, _record: &Value) {}
}

#[cfg(test)]
impl EventLogger {
    fn capture(&self, record: &Value) {
        if let Ok(mut captured) = self.captured.lock() {
            captured.push(record.clone());
        }
    }

    /// All records emitted through this logger (and its clones)
    pub(crate) fn records(&self) -> Vec<Value> {
        self.captured
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records with the given `event_type`
    pub(crate) fn records_of_type(&self, event_type: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|r| r["event_type"] == event_type)
            .collect()
    }
}
