use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{PricePoint, PriceSeries};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct HistoryCsvParser;

impl HistoryCsvParser {
    // CSV Header: timestamp,price,volume
    // Example Row: 1735689600000,94321.55,31245678901.2
    // timestamp is epoch milliseconds; volume may be omitted and reads as zero.
    pub fn load_series<P: AsRef<Path>>(file_path: P) -> Result<PriceSeries> {
        let path = file_path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
        Self::read_series(BufReader::new(file))
    }

    pub fn read_series<R: Read>(reader: R) -> Result<PriceSeries> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut points = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.with_context(|| format!("Error reading CSV record at line {}", line))?;

            let timestamp_str = Self::get_field(&record, &headers, "timestamp")
                .ok_or_else(|| anyhow!("Missing 'timestamp' field in CSV record at line {}", line))?;
            let price_str = Self::get_field(&record, &headers, "price")
                .ok_or_else(|| anyhow!("Missing 'price' field in CSV record at line {}", line))?;

            let timestamp = Self::parse_timestamp(timestamp_str)
                .with_context(|| format!("Error parsing 'timestamp' at line {}", line))?;
            let price = price_str
                .parse::<f64>()
                .map_err(|e| anyhow!("Failed to parse price '{}': {}", price_str, e))
                .with_context(|| format!("Error parsing 'price' at line {}", line))?;

            let volume = match Self::get_field(&record, &headers, "volume") {
                Some(s) if !s.is_empty() => s
                    .parse::<f64>()
                    .map_err(|e| anyhow!("Failed to parse volume '{}': {}", s, e))
                    .with_context(|| format!("Error parsing 'volume' at line {}", line))?,
                _ => 0.0,
            };

            points.push(PricePoint { timestamp, price, volume });
        }

        tracing::debug!(rows = points.len(), "CSV history parsed");
        Ok(PriceSeries::new(points))
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let millis = s.parse::<i64>().map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))?;
        DateTime::from_timestamp_millis(millis).ok_or_else(|| anyhow!("Timestamp out of range: {}", millis))
    }

    // Looks a field up by header name so column order does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}
