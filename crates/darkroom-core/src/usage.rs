//! Usage accounting for completed pipeline runs.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;

/// One billable unit of work, recorded after a run succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    /// Who ran the pipeline, if known.
    pub identity: Option<String>,
    /// What was recorded, e.g. "transformation".
    pub operation: String,
    /// How many units the run consumed.
    pub units: u64,
    /// Unix timestamp (seconds) when the record was emitted.
    pub timestamp: u64,
}

impl UsageRecord {
    pub fn transformation(identity: Option<String>, units: u64) -> Self {
        Self {
            identity,
            operation: "transformation".to_string(),
            units,
            timestamp: unix_now(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Destination for usage records.
///
/// Recording is best-effort: the pipeline logs sink failures and still
/// returns the processed image.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, record: &UsageRecord) -> Result<(), String>;
}

/// Sink that emits records to the log stream.
#[derive(Debug, Default)]
pub struct LogUsageSink;

#[async_trait]
impl UsageSink for LogUsageSink {
    async fn record(&self, record: &UsageRecord) -> Result<(), String> {
        tracing::info!(
            identity = record.identity.as_deref().unwrap_or("anonymous"),
            operation = %record.operation,
            units = record.units,
            timestamp = record.timestamp,
            "usage recorded"
        );
        Ok(())
    }
}
