//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::session::MapSnapshot;

/// JSON formatter - outputs the full snapshot as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full snapshot as JSON"
    }

    fn format(&self, snapshot: &MapSnapshot) -> Result<String> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}
