use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct KpiRow {
    pub(crate) line: u64,
    pub(crate) key: String,
    pub(crate) target: f64,
    pub(crate) actual: Option<f64>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<KpiRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}'))
        .collect();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: RawRow = record.deserialize(Some(&headers))?;

        rows.push(KpiRow {
            line,
            key: normalize_key(&row.metric),
            target: row.target,
            actual: row.actual,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Metric", alias = "metric")]
    metric: String,
    #[serde(rename = "Target", alias = "target")]
    target: f64,
    #[serde(
        rename = "Actual",
        alias = "actual",
        default,
        deserialize_with = "empty_as_none"
    )]
    actual: Option<f64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// `" TPV  M1 "` → `"tpv_m1"`.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}
