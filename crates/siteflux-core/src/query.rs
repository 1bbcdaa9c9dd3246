use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::{DateWindow, UtcDate};
use crate::ValidationError;

/// Validated metric dimension name, e.g. `ga:sessions`.
///
/// Names must be `<namespace>:<name>` with ASCII alphanumeric parts, which
/// turns silent upstream 400s into local validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dimension(String);

impl Dimension {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::EmptyDimension);
        }

        match input.split_once(':') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {}
            _ => {
                return Err(ValidationError::DimensionMissingNamespace {
                    value: input.to_owned(),
                })
            }
        }

        for (index, ch) in input.char_indices() {
            if !ch.is_ascii_alphanumeric() && ch != ':' {
                return Err(ValidationError::DimensionInvalidChar { ch, index });
            }
        }

        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key a queued query is filed under and demultiplexed by after a batch
/// round trip: the comma-joined dimension list plus the correlation tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DispatchKey(String);

impl DispatchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DispatchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable metric query: dimension list, inclusive date window and a
/// correlation tag disambiguating queued queries that share dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    dimensions: Vec<Dimension>,
    window: DateWindow,
    correlation_tag: String,
}

impl MetricQuery {
    pub fn new(
        dimensions: Vec<Dimension>,
        window: DateWindow,
        correlation_tag: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if dimensions.is_empty() {
            return Err(ValidationError::EmptyDimensionList);
        }
        let correlation_tag = correlation_tag.into();
        if correlation_tag.is_empty() {
            return Err(ValidationError::EmptyCorrelationTag);
        }
        Ok(Self {
            dimensions,
            window,
            correlation_tag,
        })
    }

    /// Query over the trailing `days`-day window ending at `today`.
    pub fn trailing(
        dimensions: Vec<Dimension>,
        today: UtcDate,
        days: u32,
        correlation_tag: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(dimensions, DateWindow::trailing(today, days)?, correlation_tag)
    }

    /// Query over the `days`-day window immediately before the trailing one.
    pub fn preceding(
        dimensions: Vec<Dimension>,
        today: UtcDate,
        days: u32,
        correlation_tag: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            dimensions,
            DateWindow::preceding(today, days)?,
            correlation_tag,
        )
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn correlation_tag(&self) -> &str {
        &self.correlation_tag
    }

    /// Comma-joined dimension list as the reporting API expects it.
    pub fn dimension_expr(&self) -> String {
        self.dimensions
            .iter()
            .map(Dimension::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn dispatch_key(&self) -> DispatchKey {
        DispatchKey(format!("{}{}", self.dimension_expr(), self.correlation_tag))
    }
}

/// One row of metric values as returned by the reporting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub values: Vec<String>,
}
