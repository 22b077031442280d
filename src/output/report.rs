//! Plain-text rendering of the reading list

use crate::record::BestSellerRecord;
use std::io::{self, Write};

/// Formats one reading-list entry as `author, title, date, category`
pub fn format_entry(record: &BestSellerRecord) -> String {
    format!(
        "{}, {}, {}, {}",
        record.author,
        record.title,
        record.date,
        record.category.as_deref().unwrap_or("")
    )
}

/// Writes every reading-list entry, one per line
pub fn write_reading_list<W: Write>(out: &mut W, records: &[BestSellerRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", format_entry(record))?;
    }
    Ok(())
}

/// Prints the reading list to stdout
pub fn print_reading_list(records: &[BestSellerRecord]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_reading_list(&mut handle, records)
}
