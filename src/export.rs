//! CSV export of the full record set for the presentation layer's download
//! button. One row per record; `time_bucket` is recomputed from the record's
//! timestamp so it always agrees with the aggregates.

use anyhow::{Context, Result};
use chrono::SecondsFormat;

use crate::aggregate::{bucket_of, Granularity};
use crate::ingest::types::SourceRecord;

pub const CSV_HEADER: [&str; 7] = [
    "timestamp",
    "source",
    "title",
    "content",
    "sentiment_score",
    "sentiment_label",
    "time_bucket",
];

pub fn to_csv(records: &[SourceRecord], granularity: Granularity) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER).context("writing csv header")?;

    for r in records {
        wtr.write_record([
            r.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            r.source.as_str().to_string(),
            r.title.clone(),
            r.content.clone(),
            r.sentiment_score.to_string(),
            r.sentiment_label().to_string(),
            bucket_of(r.timestamp, granularity).to_rfc3339_opts(SecondsFormat::Secs, true),
        ])
        .context("writing csv row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv writer: {e}"))?;
    String::from_utf8(bytes).context("csv output is valid utf-8")
}
