use std::collections::BTreeMap;

use crate::models::{Category, ClassifiedRecord, SourceAggregate};

/// Reduces classified records to one aggregate per source, ordered by source name.
pub fn aggregate_by_source(records: &[ClassifiedRecord]) -> Vec<SourceAggregate> {
    let mut groups: BTreeMap<&str, SourceAggregate> = BTreeMap::new();

    for classified in records {
        let record = &classified.record;
        let entry = groups
            .entry(record.source.as_str())
            .or_insert_with(|| SourceAggregate {
                source: record.source.clone(),
                ..SourceAggregate::default()
            });

        entry.records += 1;
        entry.attempts += u64::from(record.attempts());
        for category in Category::ALL {
            if classified.is(category) {
                entry.counts[category as usize] += 1;
            }
        }
        if classified.flags.is_unconsumed() {
            entry.unconsumed += 1;
        }
        entry.last_contact = entry.last_contact.max(record.last_try_time);
        entry.imported = match (entry.imported, record.import_created_on) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
    }

    groups.into_values().collect()
}
