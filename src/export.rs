use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::glossary::{GlossaryEntry, GLOSSARY};
use crate::models::{RetryDepthRow, SkippedSource, SourceSummary};
use crate::pipeline::Analysis;
use crate::report::{RETRY_COLUMNS, SKIPPED_COLUMNS, SUMMARY_COLUMNS};

fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes `summary.csv`, `retry.csv`, `skipped.csv` and `glossary.csv` into `dir`.
pub fn write_csv_exports(analysis: &Analysis, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let summary = dir.join("summary.csv");
    let retry = dir.join("retry.csv");
    let skipped = dir.join("skipped.csv");
    let glossary = dir.join("glossary.csv");

    write_csv(&summary, SUMMARY_COLUMNS, &analysis.summary)?;
    write_csv(&retry, RETRY_COLUMNS, &analysis.retry)?;
    write_csv(&skipped, SKIPPED_COLUMNS, &analysis.skipped)?;
    write_csv(&glossary, &["Metric", "Description"], GLOSSARY)?;

    Ok(vec![summary, retry, skipped, glossary])
}

#[derive(Serialize)]
struct JsonExport<'a> {
    summary: &'a [SourceSummary],
    retry: &'a [RetryDepthRow],
    skipped: &'a [SkippedSource],
    glossary: &'a [GlossaryEntry],
}

pub fn to_json(analysis: &Analysis) -> anyhow::Result<String> {
    let export = JsonExport {
        summary: &analysis.summary,
        retry: &analysis.retry,
        skipped: &analysis.skipped,
        glossary: GLOSSARY,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::summarize;
    use crate::models::{Category, SourceAggregate};

    fn analysis() -> Analysis {
        let mut aggregate = SourceAggregate {
            source: "Baza maj".to_string(),
            records: 4,
            attempts: 0,
            ..SourceAggregate::default()
        };
        aggregate.counts[Category::Open as usize] = 1;
        aggregate.unconsumed = 1;
        Analysis {
            summary: vec![summarize(&aggregate)],
            retry: vec![RetryDepthRow {
                source: "Baza maj".to_string(),
                multi_attempt_records: 3,
                bookings: 3,
                mean_attempt: Some(2.67),
                median_attempt: Some(2.0),
                distribution: "at attempt 2: 2 bookings, at attempt 4: 1 bookings".to_string(),
                callbacks_total: 0,
                callbacks_system: 0,
            }],
            skipped: Vec::new(),
        }
    }

    fn header_line(path: &Path) -> String {
        let content = std::fs::read_to_string(path).unwrap();
        content.lines().next().unwrap_or_default().to_string()
    }

    #[test]
    fn serialized_fields_follow_display_columns() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&analysis().summary[0]).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, SUMMARY_COLUMNS);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&analysis().retry[0]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, RETRY_COLUMNS);
    }

    #[test]
    fn writes_csv_files_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_csv_exports(&analysis(), dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(header_line(&written[0]).starts_with("Source,L100R,CTR,"));

        let summary = std::fs::read_to_string(&written[0]).unwrap();
        let row = summary.lines().nth(1).unwrap();
        // undefined CTR and booking rate stay empty
        assert!(row.starts_with("Baza maj,0.0,,,75.0,25.0,in progress,"));

        let glossary = std::fs::read_to_string(&written[3]).unwrap();
        assert_eq!(glossary.lines().count(), GLOSSARY.len() + 1);
    }

    #[test]
    fn empty_tables_still_get_headers() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_csv_exports(&Analysis::default(), dir.path().join("out").as_path()).unwrap();
        assert!(header_line(&written[1]).starts_with("Source,Multi-attempt records"));
    }

    #[test]
    fn skipped_sources_are_exported() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = Analysis {
            skipped: vec![SkippedSource {
                path: "in/Baza maj.xlsx".to_string(),
                reason: "in/Baza maj.xlsx is not a record table: binary content in header".to_string(),
            }],
            ..Analysis::default()
        };
        let written = write_csv_exports(&analysis, dir.path()).unwrap();
        assert!(written[2].ends_with("skipped.csv"));

        let mut reader = csv::Reader::from_path(&written[2]).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, SKIPPED_COLUMNS);
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "in/Baza maj.xlsx");
        assert!(rows[0][1].ends_with("binary content in header"));
    }

    #[test]
    fn json_uses_null_for_undefined_metrics() {
        let json = to_json(&analysis()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["summary"][0]["CTR"].is_null());
        assert_eq!(value["summary"][0]["Status"], "in progress");
        assert_eq!(value["retry"][0]["Median attempt at booking"], 2.0);
        assert_eq!(value["glossary"].as_array().unwrap().len(), GLOSSARY.len());
    }
}
