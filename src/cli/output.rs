//! Output formatting for CLI commands.
//!
//! This module renders progress events for display, either as colored
//! text or as JSON for scripting.

use colored::Colorize;
use serde_json::Value;
use std::fmt::Write;
use tabled::{Table, Tabled};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Listed resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ARN")]
    arn: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a progress event for display.
    #[must_use]
    pub fn format_event(&self, event: &Value) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(event).unwrap_or_default(),
            OutputFormat::Text => Self::format_event_text(event),
        }
    }

    /// Formats a progress event as text.
    fn format_event_text(event: &Value) -> String {
        let mut output = String::new();

        let status = event["status"].as_str().unwrap_or("UNKNOWN");
        let _ = writeln!(output, "Status: {}", Self::format_status(status));

        if let Some(code) = event["errorCode"].as_str() {
            let _ = writeln!(output, "Error code: {}", code.red());
        }
        if let Some(message) = event["message"].as_str() {
            let _ = writeln!(output, "Message: {message}");
        }
        if let Some(delay) = event["callbackDelaySeconds"].as_u64() {
            let _ = writeln!(output, "Next invocation in: {delay}s");
        }

        if let Some(models) = event["resourceModels"].as_array() {
            let rows: Vec<ResourceRow> = models.iter().map(Self::resource_row).collect();
            if rows.is_empty() {
                output.push_str("No resources found.\n");
            } else {
                let _ = writeln!(output, "{}", Table::new(rows));
            }
            if let Some(token) = event["nextToken"].as_str() {
                let _ = writeln!(output, "Next page token: {token}");
            }
        } else if let Some(model) = event.get("resourceModel") {
            let _ = writeln!(
                output,
                "\n{}",
                serde_json::to_string_pretty(model).unwrap_or_default()
            );
        }

        output
    }

    /// Colors an operation status.
    fn format_status(status: &str) -> String {
        match status {
            "SUCCESS" => status.green().to_string(),
            "FAILED" => status.red().to_string(),
            "IN_PROGRESS" => status.yellow().to_string(),
            other => other.to_string(),
        }
    }

    /// Builds a table row from a listed model.
    fn resource_row(model: &Value) -> ResourceRow {
        let name = ["UserName", "ACLName", "ClusterName", "SubnetGroupName"]
            .iter()
            .find_map(|key| model[*key].as_str())
            .unwrap_or("-");
        ResourceRow {
            name: name.to_string(),
            status: model["Status"].as_str().unwrap_or("-").to_string(),
            arn: ["Arn", "ARN"]
                .iter()
                .find_map(|key| model[*key].as_str())
                .unwrap_or("-")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_format_is_verbatim() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let event = json!({"status": "SUCCESS"});

        let output = formatter.format_event(&event);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_text_format_includes_error_details() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let event = json!({
            "status": "FAILED",
            "errorCode": "NotFound",
            "message": "User not found: test-user"
        });

        let output = formatter.format_event(&event);
        assert!(output.contains("NotFound"));
        assert!(output.contains("test-user"));
    }

    #[test]
    fn test_list_event_renders_table() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let event = json!({
            "status": "SUCCESS",
            "resourceModels": [
                {"UserName": "test-user", "Status": "active"}
            ],
            "nextToken": "page-2"
        });

        let output = formatter.format_event(&event);
        assert!(output.contains("test-user"));
        assert!(output.contains("page-2"));
    }
}
