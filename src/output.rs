// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use crate::retention::{StatusEvent, StatusSink};
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a warning (JSON line in json mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_json(&JsonEvent::message("warning", message, None)),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                emit_json(&JsonEvent::message("success", message, self.duration()));
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::message(
                    "error",
                    message,
                    self.duration(),
                )) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

impl StatusSink for Output {
    fn emit(&self, event: &StatusEvent) {
        match self.mode {
            OutputMode::Normal => println!("  → {event}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit_json(&JsonEvent::status(event)),
        }
    }
}

fn emit_json(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn message(event: &'a str, message: &str, duration_secs: Option<f64>) -> Self {
        Self {
            event,
            message: message.to_string(),
            image_id: None,
            image_name: None,
            duration_secs,
        }
    }

    fn status(event: &'a StatusEvent) -> Self {
        Self {
            event: event.kind(),
            message: event.to_string(),
            image_id: Some(event.image_id().as_str()),
            image_name: Some(event.image_name()),
            duration_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageId;

    #[test]
    fn status_event_json_carries_image_fields() {
        let event = StatusEvent::Deleting {
            name: "base".to_string(),
            id: ImageId::new("i-9"),
        };

        let json = serde_json::to_value(JsonEvent::status(&event)).unwrap();
        assert_eq!(json["event"], "deleting");
        assert_eq!(json["message"], "deleting duplicate image base i-9");
        assert_eq!(json["image_id"], "i-9");
        assert_eq!(json["image_name"], "base");
        assert!(json.get("duration_secs").is_none());
    }

    #[test]
    fn plain_messages_omit_image_fields() {
        let json = serde_json::to_value(JsonEvent::message("success", "done", Some(1.5))).unwrap();
        assert_eq!(json["event"], "success");
        assert!(json.get("image_id").is_none());
        assert_eq!(json["duration_secs"], 1.5);
    }

    #[test]
    fn warnings_are_their_own_event() {
        let json =
            serde_json::to_value(JsonEvent::message("warning", "no images named base found", None))
                .unwrap();
        assert_eq!(json["event"], "warning");
        assert_eq!(json["message"], "no images named base found");
        assert!(json.get("duration_secs").is_none());
    }

    #[test]
    fn elapsed_is_zero_without_timer() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
        assert_eq!(output.mode(), OutputMode::Quiet);
    }
}
