//! Cross-referencing of the two harvested lists

use crate::record::{BestSellerRecord, RecordList};

/// Joins `primary` and `secondary` on their identity key
///
/// Every secondary record whose key also appears in `primary` yields one
/// output record carrying the secondary category and the later of the two
/// dates. Unmatched records are dropped, and output order follows
/// `secondary`. A secondary record without a category cannot enter the
/// reading list and is skipped.
///
/// # Arguments
///
/// * `primary` - The number-one records, indexed by identity key
/// * `secondary` - The categorized audio best-seller records
pub fn merge_reading_list(
    primary: &RecordList,
    secondary: &[BestSellerRecord],
) -> Vec<BestSellerRecord> {
    let mut merged = Vec::new();
    for record in secondary {
        let Some(category) = record.category.as_deref() else {
            tracing::warn!(
                "Skipping '{}' by {}: no category to carry into the reading list",
                record.title,
                record.author
            );
            continue;
        };

        let Some(matched) = primary.get(&record.identity_key()) else {
            continue;
        };

        // ISO-8601 calendar dates order lexically
        let date = if matched.date > record.date {
            &matched.date
        } else {
            &record.date
        };

        tracing::debug!("'{}' by {} is on both lists", record.title, record.author);
        merged.push(
            BestSellerRecord::new(&record.author, &record.title, date).with_category(category),
        );
    }

    merged
}
