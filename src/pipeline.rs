use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::aggregate_by_source;
use crate::classify::classify_all;
use crate::ingest::{self, Delimiter, SourceTable};
use crate::metrics::{sort_summaries, summarize};
use crate::models::{RetryDepthRow, SkippedSource, SourceSummary};
use crate::retry::analyze_retry_depth;

pub const MAX_SOURCES: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: Vec<SourceSummary>,
    pub retry: Vec<RetryDepthRow>,
    pub skipped: Vec<SkippedSource>,
}

/// Classifies every table, then aggregates the concatenated records.
pub fn analyze_tables(sources: &[SourceTable]) -> Analysis {
    let mut records = Vec::new();
    for source in sources {
        if source.table.is_empty() {
            warn!(source = %source.name, "source has no data rows");
            continue;
        }
        records.extend(classify_all(ingest::records_from_table(source)));
    }

    let mut summary: Vec<SourceSummary> = aggregate_by_source(&records)
        .iter()
        .map(summarize)
        .collect();
    sort_summaries(&mut summary);
    let retry = analyze_retry_depth(&records);

    info!(
        records = records.len(),
        sources = summary.len(),
        retry_rows = retry.len(),
        "analysis complete"
    );

    Analysis {
        summary,
        retry,
        skipped: Vec::new(),
    }
}

/// Loads up to [`MAX_SOURCES`] files. Unreadable files are reported, not aggregated.
pub fn analyze_files(paths: &[PathBuf], delimiter: Delimiter) -> Analysis {
    if paths.len() > MAX_SOURCES {
        warn!(
            given = paths.len(),
            limit = MAX_SOURCES,
            "too many input files, ignoring the rest"
        );
    }

    let mut sources = Vec::new();
    let mut skipped = Vec::new();
    for path in paths.iter().take(MAX_SOURCES) {
        match ingest::load_source(path, delimiter) {
            Ok(source) => {
                info!(
                    source = %source.name,
                    rows = source.table.len(),
                    columns = source.table.headers.len(),
                    "loaded source"
                );
                sources.push(source);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable source");
                skipped.push(SkippedSource {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let mut analysis = analyze_tables(&sources);
    analysis.skipped = skipped;
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::NO_BOOKINGS;
    use crate::models::AlertBucket;
    use crate::table::Table;
    use std::io::Write;

    fn source(name: &str, headers: &[&str], rows: Vec<Vec<&str>>) -> SourceTable {
        let mut table = Table::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(
                row.into_iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
            );
        }
        SourceTable {
            name: name.to_string(),
            table,
        }
    }

    /// 100 records: 40 booked with 5 tries each, 10 open with 0 tries, 50 closed with 0 tries.
    fn healthy_source() -> SourceTable {
        let mut rows = Vec::new();
        for _ in 0..40 {
            rows.push(vec!["booking", "Zamknięty", "5"]);
        }
        for _ in 0..10 {
            rows.push(vec!["", "Otwarty", "0"]);
        }
        for _ in 0..50 {
            rows.push(vec!["Nie zainteresowany", "Zamknięty", "0"]);
        }
        source("healthy", &["LastCallCode", "RecordState", "TotalTries"], rows)
    }

    fn dead_source() -> SourceTable {
        let mut rows = Vec::new();
        for _ in 0..5 {
            rows.push(vec!["", "Otwarty", "1"]);
        }
        for _ in 0..45 {
            rows.push(vec!["Nie zainteresowany", "Zamknięty", "2"]);
        }
        source("dead", &["LastCallCode", "RecordState", "TotalTries"], rows)
    }

    #[test]
    fn healthy_source_end_to_end() {
        let analysis = analyze_tables(&[healthy_source()]);
        let row = &analysis.summary[0];
        assert_eq!(row.records, 100);
        assert_eq!(row.bookings, 40);
        assert_eq!(row.attempts, 200);
        assert_eq!(row.open, 10);
        assert_eq!(row.l100r, Some(40.0));
        assert_eq!(row.ctr, Some(5.0));
        assert_eq!(row.booking_rate, Some(20.0));
        assert_eq!(row.unconsumed, Some(10.0));
        assert_eq!(row.utilization, Some(90.0));
    }

    #[test]
    fn dead_source_end_to_end() {
        let analysis = analyze_tables(&[dead_source()]);
        let row = &analysis.summary[0];
        assert_eq!(row.records, 50);
        assert_eq!(row.ctr, None);
        assert_eq!(row.narrative, NO_BOOKINGS);
        assert_eq!(row.alert, AlertBucket::NoData);
    }

    #[test]
    fn best_source_comes_first() {
        let analysis = analyze_tables(&[dead_source(), healthy_source()]);
        let names: Vec<&str> = analysis.summary.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(names, vec!["healthy", "dead"]);
    }

    #[test]
    fn concatenation_matches_per_source_union() {
        let sources = vec![
            healthy_source(),
            dead_source(),
            source(
                "mixed",
                &["ID", "lastcallcode", "TotalTries", "CloseReason"],
                vec![
                    vec!["1", "Sukces", "3", ""],
                    vec!["2", "", "x", "Brak dostępnych telefonów"],
                    vec!["3", "Umówienie magazyn", "2", ""],
                ],
            ),
        ];

        let together = analyze_tables(&sources);

        let mut summary = Vec::new();
        let mut retry = Vec::new();
        for single in &sources {
            let alone = analyze_tables(std::slice::from_ref(single));
            summary.extend(alone.summary);
            retry.extend(alone.retry);
        }
        sort_summaries(&mut summary);
        retry.sort_by(|a, b| a.source.cmp(&b.source));

        assert_eq!(together.summary, summary);
        assert_eq!(together.retry, retry);
    }

    #[test]
    fn postponed_records_are_never_utilized() {
        let analysis = analyze_tables(&[source(
            "przelozone",
            &["LastCallCode", "LastCallReason", "RecordState"],
            vec![
                vec!["Oddzwonić", "Rozmowa", "Przełożony"],
                vec!["Nie zainteresowany", "Rozmowa", "Zamknięty"],
            ],
        )]);
        let row = &analysis.summary[0];
        assert_eq!(row.records, 2);
        assert_eq!(row.callback_system, 0);
        assert_eq!(row.closed_by_agent, 1);
        assert_eq!(row.utilization, Some(50.0));
        assert_eq!(row.unconsumed, Some(50.0));
    }

    #[test]
    fn header_only_source_produces_no_rows() {
        let analysis = analyze_tables(&[source("empty", &["Id"], Vec::new())]);
        assert!(analysis.summary.is_empty());
        assert!(analysis.retry.is_empty());
    }

    #[test]
    fn unreadable_files_are_reported_separately() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Baza A.csv");
        let mut file = std::fs::File::create(&good).unwrap();
        writeln!(file, "Id,LastCallCode,TotalTries").unwrap();
        writeln!(file, "1,Umówienie,2").unwrap();
        let empty = dir.path().join("empty.csv");
        std::fs::File::create(&empty).unwrap();
        let missing = dir.path().join("missing.csv");

        let analysis = analyze_files(&[good, empty, missing], Delimiter::Auto);
        assert_eq!(analysis.summary.len(), 1);
        assert_eq!(analysis.summary[0].source, "Baza A");
        assert_eq!(analysis.skipped.len(), 2);
        assert!(analysis.skipped.iter().any(|s| s.path.ends_with("missing.csv")));
    }

    #[test]
    fn spreadsheet_archive_is_skipped_not_summarized() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = dir.path().join("Baza maj.xlsx");
        let mut content = b"PK\x03\x04\x14\x00\x06\x00\x08\x00".to_vec();
        content.extend_from_slice(b"[Content_Types].xml\x00\x00\xff\xfe\n\x01\x02,\x03\n");
        std::fs::write(&workbook, content).unwrap();

        let analysis = analyze_files(&[workbook], Delimiter::Auto);
        assert!(analysis.summary.is_empty());
        assert!(analysis.retry.is_empty());
        assert_eq!(analysis.skipped.len(), 1);
        assert!(analysis.skipped[0].reason.contains("not a record table"));
    }

    #[test]
    fn input_list_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..MAX_SOURCES + 3)
            .map(|index| {
                let path = dir.path().join(format!("baza-{index:02}.csv"));
                std::fs::write(&path, "Id,LastCallCode\n1,Sukces\n").unwrap();
                path
            })
            .collect();

        let analysis = analyze_files(&paths, Delimiter::Fixed(b','));
        assert_eq!(analysis.summary.len(), MAX_SOURCES);
    }
}
