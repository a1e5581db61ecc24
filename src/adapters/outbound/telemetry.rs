use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::core::ports::TelemetrySink;

/// Forwards controller events to `tracing` under the `chromaprompt::telemetry` target.
#[derive(Debug, Default)]
pub struct TracingTelemetrySink;

impl TracingTelemetrySink {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetrySink for TracingTelemetrySink {
    fn record_event(&self, event_name: &str, properties: HashMap<String, String>) {
        // Sorted so log lines are stable across runs.
        let props: BTreeMap<String, String> = properties.into_iter().collect();
        if event_name.ends_with("_failed") {
            warn!(target: "chromaprompt::telemetry", %event_name, props = ?props);
        } else {
            info!(target: "chromaprompt::telemetry", %event_name, props = ?props);
        }
    }
}
