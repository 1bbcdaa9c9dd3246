use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use siteflux_core::{
    AnalyticsClient, Dimension, DispatchKey, FetchError, MetricRow, PRECEDING_TAG, TRAILING_TAG,
};

use crate::error::CliError;

const OVERVIEW_METRICS: [&str; 3] = ["ga:sessions", "ga:pageviews", "ga:users"];

/// Batched traffic overview over the current and previous windows. A
/// failed metric degrades to `null` instead of failing the dashboard.
pub async fn run(client: &mut AnalyticsClient, days: u32) -> Result<Value, CliError> {
    client.set_batch_mode(true);
    for metric in OVERVIEW_METRICS {
        let dimensions = vec![Dimension::parse(metric)?];
        client.fetch_trailing(dimensions.clone(), days).await?;
        client.fetch_preceding(dimensions, days).await?;
    }

    let results = client.execute_batch().await;

    let mut metrics = Map::new();
    for metric in OVERVIEW_METRICS {
        metrics.insert(
            metric.to_owned(),
            json!({
                "now": first_value(&results, &format!("{metric}{TRAILING_TAG}")),
                "prev": first_value(&results, &format!("{metric}{PRECEDING_TAG}")),
            }),
        );
    }

    Ok(json!({ "days": days, "metrics": metrics }))
}

fn first_value(
    results: &BTreeMap<DispatchKey, Result<MetricRow, FetchError>>,
    key: &str,
) -> Value {
    results
        .iter()
        .find(|(dispatch_key, _)| dispatch_key.as_str() == key)
        .and_then(|(_, value)| value.as_ref().ok())
        .and_then(|row| row.values.first())
        .map(|value| Value::String(value.clone()))
        .unwrap_or(Value::Null)
}
