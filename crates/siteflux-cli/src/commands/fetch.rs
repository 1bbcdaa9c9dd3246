use serde_json::{json, Value};
use siteflux_core::{AnalyticsClient, Dimension, FetchOutcome};

use crate::error::CliError;

pub async fn run(
    client: &mut AnalyticsClient,
    metrics: &[String],
    days: u32,
    prev: bool,
) -> Result<Value, CliError> {
    let dimensions = metrics
        .iter()
        .map(|metric| Dimension::parse(metric))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = if prev {
        client.fetch_preceding(dimensions, days).await?
    } else {
        client.fetch_trailing(dimensions, days).await?
    };

    match outcome {
        FetchOutcome::Data(row) => Ok(json!({
            "metrics": metrics,
            "days": days,
            "window": if prev { "preceding" } else { "trailing" },
            "values": row.values,
        })),
        FetchOutcome::Queued(key) => Ok(json!({ "queued": key.as_str() })),
    }
}
