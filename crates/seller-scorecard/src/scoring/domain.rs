use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier wrapper for sellers tracked by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar month a KPI record belongs to, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KpiPeriod(NaiveDate);

impl KpiPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self(date - chrono::Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for KpiPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse '{0}' as a YYYY-MM period")]
pub struct PeriodParseError(pub String);

impl FromStr for KpiPeriod {
    type Err = PeriodParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.len() != 7 {
            return Err(PeriodParseError(raw.to_string()));
        }

        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| PeriodParseError(raw.to_string()))
    }
}

impl Serialize for KpiPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KpiPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Target and actual for one metric in one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub target: f64,
    pub actual: f64,
}

/// Per-seller, per-month KPI record as handed over by the persistence layer.
///
/// The engine only reads snapshots; readings are keyed by metric key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub period: KpiPeriod,
    pub readings: BTreeMap<String, MetricReading>,
}

impl KpiSnapshot {
    pub fn new(period: KpiPeriod) -> Self {
        Self {
            period,
            readings: BTreeMap::new(),
        }
    }

    pub fn with_reading(mut self, key: impl Into<String>, target: f64, actual: f64) -> Self {
        self.readings
            .insert(key.into(), MetricReading { target, actual });
        self
    }

    pub fn reading(&self, key: &str) -> Option<&MetricReading> {
        self.readings.get(key)
    }
}

/// One validated metric handed to the composite scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricInput {
    pub key: String,
    pub name: String,
    pub target: f64,
    pub actual: f64,
    pub weight: f64,
    #[serde(default)]
    pub inverse: bool,
}
