//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::report::OverlapReport;

/// JSON formatter - outputs the full report as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, report: &OverlapReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
